use chrono::{DateTime, Local};

use crate::event::{AgentStatus, Snapshot, SourceMessage, SYSTEM_AGENT};

use super::agent::Agent;
use super::dedup::Deduplicator;
use super::display_log::DisplayLog;
use super::drip::{DripScheduler, TickOutcome};
use super::presence::{classify_with, resting_status, Presence, SystemAwake};
use super::roster::{self, ROSTER};

/// Agent whose completion actions mark a new drop
const DROP_AGENT: &str = "Manager";
const DROP_MARKERS: [&str; 2] = ["Success", "updated"];

/// Everything the office view knows during one run.
///
/// Owned by the app actor and handed to whoever needs it; nothing here
/// outlives the process. The realtime source republishes full state on
/// (re)connect, so a fresh session rebuilds itself from the first snapshot.
#[derive(Debug)]
pub struct Session {
    dedup: Deduplicator,
    drip: DripScheduler,
    log: DisplayLog,
    latest: Snapshot,
    system: SystemAwake,
    connected: bool,
    last_drop: Option<DateTime<Local>>,
    agents: Vec<Agent>,
}

impl Session {
    pub fn new(log_capacity: usize) -> Self {
        let agents = ROSTER
            .iter()
            .enumerate()
            .map(|(seat, a)| Agent::new(a.id.to_string(), seat))
            .collect();

        Self {
            dedup: Deduplicator::new(),
            drip: DripScheduler::new(),
            log: DisplayLog::new(log_capacity),
            latest: Snapshot::new(),
            system: SystemAwake::Awake,
            connected: false,
            last_drop: None,
            agents,
        }
    }

    /// Route a message from the realtime source; returns how many events were queued
    pub fn apply_source(&mut self, message: SourceMessage) -> usize {
        match message {
            SourceMessage::Connected => {
                self.connected = true;
                0
            }
            SourceMessage::Disconnected(reason) => {
                tracing::debug!(%reason, "marking studio offline");
                self.connected = false;
                0
            }
            SourceMessage::Snapshot(snapshot) => {
                self.connected = true;
                self.ingest(snapshot)
            }
        }
    }

    /// Take in a full snapshot; returns how many events were queued for the feed
    pub fn ingest(&mut self, snapshot: Snapshot) -> usize {
        if snapshot.is_empty() {
            tracing::trace!("empty office snapshot");
        }
        let events = self.dedup.observe(&snapshot);
        let queued = events.len();
        for event in events {
            self.drip.enqueue(event);
        }

        if let Some(manager) = snapshot.get(DROP_AGENT) {
            if DROP_MARKERS.iter().any(|m| manager.action.contains(m)) {
                self.last_drop = Some(Local::now());
            }
        }

        self.system = SystemAwake::from_snapshot(&snapshot);
        let snapshot_len = snapshot.len();
        self.latest = snapshot;
        self.refresh_agents();

        if queued > 0 {
            tracing::debug!(
                queued,
                agents = snapshot_len,
                backlog = self.drip.pending_len(),
                seen = self.dedup.seen_count(),
                "queued activity"
            );
        }
        queued
    }

    /// One drip tick: move at most one pending event into the display log
    pub fn tick(&mut self) -> TickOutcome {
        self.drip.tick(&mut self.log)
    }

    /// Advance avatar animations
    pub fn animate(&mut self, dt: f32) {
        for agent in &mut self.agents {
            agent.tick(dt);
        }
    }

    /// Status an agent should be shown with, after the studio-wide override
    pub fn effective_status(&self, agent_id: &str) -> AgentStatus {
        if !self.system.is_awake() {
            return resting_status();
        }
        self.latest
            .get(agent_id)
            .cloned()
            .unwrap_or_else(roster::absent_status)
    }

    pub fn presence(&self, agent_id: &str) -> Presence {
        classify_with(self.system, &self.effective_status(agent_id).action)
    }

    fn refresh_agents(&mut self) {
        let unknown: Vec<String> = self
            .latest
            .iter()
            .map(|(id, _)| id)
            .filter(|id| id.as_str() != SYSTEM_AGENT && !self.agents.iter().any(|a| &a.id == *id))
            .cloned()
            .collect();
        for id in unknown {
            let seat = self.agents.len();
            self.agents.push(Agent::new(id, seat));
        }

        let updates: Vec<(AgentStatus, Presence)> = self
            .agents
            .iter()
            .map(|a| (self.effective_status(&a.id), self.presence(&a.id)))
            .collect();
        for (agent, (status, presence)) in self.agents.iter_mut().zip(updates) {
            agent.apply(status, presence);
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn log(&self) -> &DisplayLog {
        &self.log
    }

    pub fn drip(&self) -> &DripScheduler {
        &self.drip
    }

    pub fn system(&self) -> SystemAwake {
        self.system
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn last_drop(&self) -> Option<DateTime<Local>> {
        self.last_drop
    }

    pub fn active_count(&self) -> usize {
        self.agents.iter().filter(|a| a.presence.is_active()).count()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(super::display_log::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(entries: &[(&str, &str, &str)]) -> Snapshot {
        entries
            .iter()
            .map(|(id, action, message)| (id.to_string(), AgentStatus::new(*action, *message)))
            .collect()
    }

    #[test]
    fn test_pipeline_from_snapshot_to_feed() {
        let mut session = Session::default();
        let initial = snapshot(&[
            ("Artist", "Painting", "koi"),
            ("Curator", "Reviewing", ""),
            ("Analyst", "Analyzing", "trends"),
        ]);
        assert_eq!(session.ingest(initial), 0);

        let next = snapshot(&[
            ("Artist", "Uploading", "koi.png"),
            ("Curator", "Approved", "koi"),
            ("Analyst", "Analyzing", "trends"),
        ]);
        assert_eq!(session.ingest(next), 2);

        let first = session.tick();
        assert!(first.typing);
        let second = session.tick();
        assert!(!second.typing);

        let feed: Vec<&str> = session.log().entries().map(|e| e.agent_id.as_str()).collect();
        assert_eq!(feed, vec!["Artist", "Curator"]);
    }

    #[test]
    fn test_stopped_system_puts_everyone_to_sleep() {
        let mut session = Session::default();
        session.ingest(snapshot(&[
            ("System", "Stopped", ""),
            ("Artist", "Painting", "koi"),
        ]));

        assert_eq!(session.presence("Artist"), Presence::Sleeping);
        assert_eq!(session.effective_status("Artist"), resting_status());
        assert_eq!(session.active_count(), 0);

        session.ingest(snapshot(&[
            ("System", "Running", ""),
            ("Artist", "Painting", "koi"),
        ]));
        assert_eq!(session.presence("Artist"), Presence::Active);
        assert_eq!(session.active_count(), 1);
    }

    #[test]
    fn test_absent_agent_shows_waiting_status() {
        let session = Session::default();
        let status = session.effective_status("Promoter");
        assert_eq!(status.action, "Sleeping");
        assert_eq!(status.message, roster::WAITING_MESSAGE);
    }

    #[test]
    fn test_unknown_agents_get_a_seat() {
        let mut session = Session::default();
        session.ingest(snapshot(&[("Publisher", "Posting", "thread"), ("System", "Running", "")]));
        assert_eq!(session.agents().len(), ROSTER.len() + 1);
        assert_eq!(session.agents().last().unwrap().id, "Publisher");
    }

    #[test]
    fn test_manager_success_records_last_drop() {
        let mut session = Session::default();
        assert!(session.last_drop().is_none());
        session.ingest(snapshot(&[("Manager", "Upload Success", "drop #5")]));
        assert!(session.last_drop().is_some());
    }

    #[test]
    fn test_connectivity_follows_source() {
        let mut session = Session::default();
        assert!(!session.is_connected());
        session.apply_source(SourceMessage::Connected);
        assert!(session.is_connected());
        session.apply_source(SourceMessage::Disconnected("timeout".into()));
        assert!(!session.is_connected());
        session.apply_source(SourceMessage::Snapshot(Snapshot::new()));
        assert!(session.is_connected());
    }
}
