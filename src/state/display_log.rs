//! Bounded log of the entries already dripped into the chat feed.
//!
//! Entries are kept oldest first. Appending past capacity evicts from the
//! front; there is no other way to remove an entry.

use std::collections::VecDeque;
use std::time::Instant;

use chrono::{DateTime, Local};

use super::drip::PendingEntry;

/// Number of chat lines the feed keeps on screen
pub const DEFAULT_CAPACITY: usize = 8;

/// A dripped entry as rendered in the feed
#[derive(Debug, Clone)]
pub struct DisplayLogEntry {
    pub id: u64,
    pub agent_id: String,
    pub action: String,
    pub message: String,
    /// When the change was captured from the source
    pub captured_at: DateTime<Local>,
    /// When this entry reached the feed
    pub displayed_at: Instant,
}

impl DisplayLogEntry {
    /// Get the age of this entry in seconds.
    pub fn age_seconds(&self) -> f32 {
        self.displayed_at.elapsed().as_secs_f32()
    }
}

impl From<PendingEntry> for DisplayLogEntry {
    fn from(entry: PendingEntry) -> Self {
        Self {
            id: entry.id,
            agent_id: entry.event.agent_id,
            action: entry.event.action,
            message: entry.event.message,
            captured_at: entry.captured_at,
            displayed_at: Instant::now(),
        }
    }
}

#[derive(Debug)]
pub struct DisplayLog {
    entries: VecDeque<DisplayLogEntry>,
    capacity: usize,
}

impl DisplayLog {
    /// Create a log holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest when full.
    pub fn append(&mut self, entry: DisplayLogEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Get an iterator over the entries (oldest first).
    pub fn entries(&self) -> impl Iterator<Item = &DisplayLogEntry> {
        self.entries.iter()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DisplayLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64) -> DisplayLogEntry {
        DisplayLogEntry {
            id,
            agent_id: format!("agent-{}", id),
            action: "Painting".to_string(),
            message: String::new(),
            captured_at: Local::now(),
            displayed_at: Instant::now(),
        }
    }

    #[test]
    fn test_display_log_creation() {
        let log = DisplayLog::default();
        assert!(log.is_empty());
        assert_eq!(log.capacity(), 8);
    }

    #[test]
    fn test_appending_ten_keeps_last_eight() {
        let mut log = DisplayLog::new(8);
        for id in 1..=10 {
            log.append(entry(id));
        }

        assert_eq!(log.len(), 8);
        let ids: Vec<u64> = log.entries().map(|e| e.id).collect();
        assert_eq!(ids, (3..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut log = DisplayLog::new(0);
        log.append(entry(1));
        log.append(entry(2));
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries().next().unwrap().id, 2);
    }

    #[test]
    fn test_entry_age() {
        // Age should be very small (just created)
        assert!(entry(1).age_seconds() < 1.0);
    }
}
