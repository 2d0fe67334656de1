use crate::event::AgentStatus;

/// Display metadata for one of the studio's known agents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterAgent {
    pub id: &'static str,
    pub role: &'static str,
    pub emoji: &'static str,
    /// Brand color as `#rrggbb`
    pub color: &'static str,
}

/// The six agents on the office floor, in seating order
pub const ROSTER: [RosterAgent; 6] = [
    RosterAgent {
        id: "Creative Director",
        role: "Visionary Leader",
        emoji: "🎨",
        color: "#ff00aa",
    },
    RosterAgent {
        id: "Artist",
        role: "Digital Painter",
        emoji: "🖌",
        color: "#00f0ff",
    },
    RosterAgent {
        id: "Curator",
        role: "Quality Guardian",
        emoji: "🔍",
        color: "#ffaa00",
    },
    RosterAgent {
        id: "Manager",
        role: "Operations",
        emoji: "📦",
        color: "#00ff88",
    },
    RosterAgent {
        id: "Promoter",
        role: "Marketing Genius",
        emoji: "📣",
        color: "#aa00ff",
    },
    RosterAgent {
        id: "Analyst",
        role: "Data Strategist",
        emoji: "📊",
        color: "#ffff00",
    },
];

/// Message shown for an agent the realtime record has not mentioned yet
pub const WAITING_MESSAGE: &str = "Waiting for next drop...";

/// Look up a roster agent by id
pub fn find(agent_id: &str) -> Option<&'static RosterAgent> {
    ROSTER.iter().find(|a| a.id == agent_id)
}

/// Status assumed for an agent absent from the latest snapshot
pub fn absent_status() -> AgentStatus {
    AgentStatus::new("Sleeping", WAITING_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_ids_are_unique() {
        for (i, a) in ROSTER.iter().enumerate() {
            assert_eq!(ROSTER.iter().position(|b| b.id == a.id), Some(i));
        }
    }

    #[test]
    fn test_unknown_agent_not_found() {
        assert!(find("Publisher").is_none());
        assert_eq!(find("Manager").map(|a| a.role), Some("Operations"));
    }
}
