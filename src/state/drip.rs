use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::event::AgentStatusEvent;

use super::display_log::{DisplayLog, DisplayLogEntry};

/// An event waiting for its turn in the chat feed
#[derive(Debug, Clone)]
pub struct PendingEntry {
    pub id: u64,
    pub event: AgentStatusEvent,
    /// Capture time, for display only; ordering is arrival order
    pub captured_at: DateTime<Local>,
}

/// What one drip tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Id of the entry moved into the display log, if any
    pub released: Option<u64>,
    /// Whether a backlog remains, i.e. the typing indicator is shown
    pub typing: bool,
}

/// Releases queued events one per tick, oldest first.
///
/// Bursts of arrivals are throttled into a readable cadence: a tick never
/// releases more than one entry regardless of queue depth.
#[derive(Debug, Default)]
pub struct DripScheduler {
    pending: VecDeque<PendingEntry>,
    next_id: u64,
    typing: bool,
}

impl DripScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event behind everything already pending, returning its id
    pub fn enqueue(&mut self, event: AgentStatusEvent) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.pending.push_back(PendingEntry {
            id,
            event,
            captured_at: Local::now(),
        });
        id
    }

    /// Release at most one entry into `log`
    pub fn tick(&mut self, log: &mut DisplayLog) -> TickOutcome {
        let released = self.pending.pop_front().map(|entry| {
            let id = entry.id;
            log.append(DisplayLogEntry::from(entry));
            id
        });

        self.typing = !self.pending.is_empty();
        TickOutcome {
            released,
            typing: self.typing,
        }
    }

    /// Typing indicator as of the last tick
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn pending(&self) -> impl Iterator<Item = &PendingEntry> {
        self.pending.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::AgentStatus;

    fn event(agent: &str, action: &str) -> AgentStatusEvent {
        AgentStatusEvent::new(agent, &AgentStatus::new(action, ""))
    }

    #[test]
    fn test_releases_in_fifo_order() {
        let mut drip = DripScheduler::new();
        let mut log = DisplayLog::default();
        let a = drip.enqueue(event("Artist", "A"));
        let b = drip.enqueue(event("Curator", "B"));
        let c = drip.enqueue(event("Manager", "C"));

        assert_eq!(drip.tick(&mut log).released, Some(a));
        assert_eq!(drip.tick(&mut log).released, Some(b));
        assert_eq!(drip.tick(&mut log).released, Some(c));
        assert_eq!(drip.tick(&mut log).released, None);

        let actions: Vec<&str> = log.entries().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_one_entry_per_tick_regardless_of_depth() {
        let mut drip = DripScheduler::new();
        let mut log = DisplayLog::default();
        for i in 0..5 {
            drip.enqueue(event("Artist", &format!("step {}", i)));
        }

        drip.tick(&mut log);
        assert_eq!(log.len(), 1);
        assert_eq!(drip.pending_len(), 4);
    }

    #[test]
    fn test_typing_tracks_remaining_backlog() {
        let mut drip = DripScheduler::new();
        let mut log = DisplayLog::default();

        let idle = drip.tick(&mut log);
        assert_eq!(idle, TickOutcome { released: None, typing: false });

        drip.enqueue(event("Artist", "A"));
        drip.enqueue(event("Artist", "B"));

        let first = drip.tick(&mut log);
        assert!(first.typing);
        assert!(drip.is_typing());

        let second = drip.tick(&mut log);
        assert!(second.released.is_some());
        assert!(!second.typing);
    }

    #[test]
    fn test_enqueue_between_ticks_is_seen_by_next_tick() {
        let mut drip = DripScheduler::new();
        let mut log = DisplayLog::default();
        drip.tick(&mut log);

        let id = drip.enqueue(event("Promoter", "Drafting"));
        assert_eq!(drip.tick(&mut log).released, Some(id));
    }
}
