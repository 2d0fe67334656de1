use std::collections::HashSet;

use crate::event::{AgentStatusEvent, Snapshot, SYSTEM_AGENT};

/// Actions that only drive avatar state and never reach the chat feed
const SILENT_ACTIONS: [&str; 2] = ["Sleeping", "idle"];

/// Turns a stream of full snapshots into the state transitions worth showing.
///
/// Suppression is permanent for the session: a key seen once is never
/// yielded again. The first snapshot only seeds the seen-set so a page of
/// stale current state is not dumped into the feed on start-up.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
    primed: bool,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe a snapshot, yielding unseen events in agent-id order
    pub fn observe(&mut self, snapshot: &Snapshot) -> Vec<AgentStatusEvent> {
        let mut fresh = Vec::new();

        for (agent_id, status) in snapshot.iter() {
            if agent_id == SYSTEM_AGENT || SILENT_ACTIONS.contains(&status.action.as_str()) {
                continue;
            }

            let event = AgentStatusEvent::new(agent_id, status);
            if self.seen.insert(event.dedup_key()) {
                fresh.push(event);
            }
        }

        if !self.primed {
            self.primed = true;
            return Vec::new();
        }
        fresh
    }

    /// Number of distinct keys seen so far
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::AgentStatus;

    fn snapshot(entries: &[(&str, &str, &str)]) -> Snapshot {
        entries
            .iter()
            .map(|(id, action, message)| (id.to_string(), AgentStatus::new(*action, *message)))
            .collect()
    }

    #[test]
    fn test_first_snapshot_is_suppressed() {
        let mut dedup = Deduplicator::new();
        let first = snapshot(&[
            ("Artist", "Painting", "koi"),
            ("Curator", "Reviewing", ""),
            ("Manager", "Uploading", "drop #4"),
        ]);
        assert!(dedup.observe(&first).is_empty());
        assert_eq!(dedup.seen_count(), 3);

        let second = snapshot(&[
            ("Artist", "Painting", "koi"),
            ("Curator", "Approved", ""),
            ("Manager", "Uploading", "drop #4"),
        ]);
        let events = dedup.observe(&second);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].agent_id, "Curator");
        assert_eq!(events[0].action, "Approved");
    }

    #[test]
    fn test_resubmitted_snapshot_yields_nothing() {
        let mut dedup = Deduplicator::new();
        dedup.observe(&Snapshot::new());

        let update = snapshot(&[("Artist", "Painting", "koi"), ("Analyst", "Analyzing", "trends")]);
        assert_eq!(dedup.observe(&update).len(), 2);
        assert!(dedup.observe(&update).is_empty());
        assert!(dedup.observe(&update).is_empty());
    }

    #[test]
    fn test_suppression_is_permanent() {
        let mut dedup = Deduplicator::new();
        dedup.observe(&Snapshot::new());

        assert_eq!(dedup.observe(&snapshot(&[("Artist", "Painting", "koi")])).len(), 1);
        assert_eq!(dedup.observe(&snapshot(&[("Artist", "Uploading", "")])).len(), 1);
        assert!(dedup.observe(&snapshot(&[("Artist", "Painting", "koi")])).is_empty());
    }

    #[test]
    fn test_system_and_silent_actions_never_yield() {
        let mut dedup = Deduplicator::new();
        dedup.observe(&Snapshot::new());

        let update = snapshot(&[
            ("System", "Running", ""),
            ("Artist", "Sleeping", ""),
            ("Curator", "idle", ""),
            ("Promoter", "Drafting", "thread"),
        ]);
        let events = dedup.observe(&update);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].agent_id, "Promoter");
    }
}
