//! Activity-state classification.
//!
//! Turns a raw action string into the two presentation states the office
//! floor cares about. The studio-wide `System` entry can force every agent
//! to sleep, which is applied before the per-agent rule.

use crate::event::{AgentStatus, Snapshot, SYSTEM_AGENT};

/// Actions of the `System` entry that mean the whole studio is asleep
const ASLEEP_ACTIONS: [&str; 3] = ["Sleep", "Sleeping", "Stopped"];

/// Presentation state of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Active,
    Sleeping,
}

impl Presence {
    pub fn is_active(self) -> bool {
        self == Presence::Active
    }
}

/// Studio-wide awake state derived from the `System` entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemAwake {
    Awake,
    Asleep,
}

impl SystemAwake {
    /// Awake unless the last known `System` action is one of the asleep values
    pub fn from_action(action: Option<&str>) -> Self {
        match action {
            Some(a) if ASLEEP_ACTIONS.contains(&a) => SystemAwake::Asleep,
            _ => SystemAwake::Awake,
        }
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self::from_action(snapshot.get(SYSTEM_AGENT).map(|s| s.action.as_str()))
    }

    pub fn is_awake(self) -> bool {
        self == SystemAwake::Awake
    }
}

/// Per-agent rule: asleep on the literal `Sleeping` or anything mentioning offline
pub fn classify(action: &str) -> Presence {
    if action == "Sleeping" || action.to_lowercase().contains("offline") {
        Presence::Sleeping
    } else {
        Presence::Active
    }
}

/// Classify with the studio-wide override applied first
pub fn classify_with(system: SystemAwake, action: &str) -> Presence {
    if !system.is_awake() {
        return Presence::Sleeping;
    }
    classify(action)
}

/// Synthetic status every agent shows while the studio is stopped
pub fn resting_status() -> AgentStatus {
    AgentStatus::new("Sleeping", "Resting")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_override_forces_sleep() {
        let stopped = SystemAwake::from_action(Some("Stopped"));
        assert_eq!(classify_with(stopped, "Painting"), Presence::Sleeping);

        let awake = SystemAwake::from_action(Some("Running"));
        assert_eq!(classify_with(awake, "Painting"), Presence::Active);
        assert_eq!(classify_with(awake, "Sleeping"), Presence::Sleeping);
    }

    #[test]
    fn test_offline_match_is_case_insensitive() {
        assert_eq!(classify("OFFLINE - maintenance"), Presence::Sleeping);
        assert_eq!(classify("went Offline"), Presence::Sleeping);
        assert_eq!(classify("Analyzing trends"), Presence::Active);
    }

    #[test]
    fn test_sleeping_match_is_exact() {
        assert_eq!(classify("sleeping"), Presence::Active);
        assert_eq!(classify("Sleeping"), Presence::Sleeping);
    }

    #[test]
    fn test_missing_system_entry_is_awake() {
        assert!(SystemAwake::from_snapshot(&Snapshot::new()).is_awake());
        for action in ["Sleep", "Sleeping", "Stopped"] {
            assert!(!SystemAwake::from_action(Some(action)).is_awake());
        }
        assert!(SystemAwake::from_action(Some("stopped")).is_awake());
    }
}
