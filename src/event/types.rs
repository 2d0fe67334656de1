use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Represents a unique identifier for an agent
pub type AgentId = String;

/// Key of the distinguished entry carrying the studio-wide awake/asleep state
pub const SYSTEM_AGENT: &str = "System";

/// Action assumed when an entry carries none
pub const DEFAULT_ACTION: &str = "Sleeping";

fn default_action() -> String {
    DEFAULT_ACTION.to_string()
}

/// Status of a single agent as published by the realtime source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStatus {
    #[serde(default = "default_action")]
    pub action: String,
    #[serde(default)]
    pub message: String,
}

impl AgentStatus {
    pub fn new(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            message: message.into(),
        }
    }

    /// Parse one agent entry, degrading anything malformed to defaults
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);

        Self {
            action: field("action").unwrap_or_else(default_action),
            message: field("message").unwrap_or_default(),
        }
    }
}

impl Default for AgentStatus {
    fn default() -> Self {
        Self {
            action: default_action(),
            message: String::new(),
        }
    }
}

/// A complete current-state payload: every agent's status, never a diff
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(pub BTreeMap<AgentId, AgentStatus>);

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a raw payload at the subscription boundary.
    ///
    /// Non-object payloads (including `null`, which the realtime store sends
    /// for a missing record) become an empty snapshot.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };

        Self(
            map.iter()
                .map(|(id, entry)| (id.clone(), AgentStatus::from_value(entry)))
                .collect(),
        )
    }

    pub fn insert(&mut self, agent_id: impl Into<AgentId>, status: AgentStatus) {
        self.0.insert(agent_id.into(), status);
    }

    pub fn get(&self, agent_id: &str) -> Option<&AgentStatus> {
        self.0.get(agent_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AgentId, &AgentStatus)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(AgentId, AgentStatus)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (AgentId, AgentStatus)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A state transition worth surfacing in the chat feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentStatusEvent {
    pub agent_id: AgentId,
    pub action: String,
    pub message: String,
}

impl AgentStatusEvent {
    pub fn new(agent_id: &str, status: &AgentStatus) -> Self {
        Self {
            agent_id: agent_id.to_string(),
            action: status.action.clone(),
            message: status.message.clone(),
        }
    }

    /// Composite key used for suppression, not identity
    pub fn dedup_key(&self) -> String {
        format!("{}{}{}", self.agent_id, self.action, self.message)
    }
}

/// Everything a realtime source can tell the app
#[derive(Debug, Clone, PartialEq)]
pub enum SourceMessage {
    Connected,
    Snapshot(Snapshot),
    Disconnected(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_snapshot() {
        let value = json!({
            "Artist": {"action": "Painting", "message": "Neon koi"},
            "System": {"action": "Running", "message": ""}
        });
        let snapshot = Snapshot::from_value(&value);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("Artist").unwrap().action, "Painting");
        assert_eq!(snapshot.get("Artist").unwrap().message, "Neon koi");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let value = json!({
            "Curator": {},
            "Manager": {"action": 42, "message": null},
            "Analyst": "not an object"
        });
        let snapshot = Snapshot::from_value(&value);
        for id in ["Curator", "Manager", "Analyst"] {
            let status = snapshot.get(id).unwrap();
            assert_eq!(status.action, "Sleeping");
            assert_eq!(status.message, "");
        }
    }

    #[test]
    fn test_null_payload_is_empty_snapshot() {
        assert!(Snapshot::from_value(&Value::Null).is_empty());
        assert!(Snapshot::from_value(&json!([1, 2])).is_empty());
    }

    #[test]
    fn test_serde_defaults_match_lenient_parse() {
        let status: AgentStatus = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert_eq!(status.action, "Sleeping");
        assert_eq!(status.message, "hi");
    }

    #[test]
    fn test_dedup_key_concatenates_fields() {
        let event = AgentStatusEvent::new("Artist", &AgentStatus::new("Painting", "koi"));
        assert_eq!(event.dedup_key(), "ArtistPaintingkoi");
    }
}
