//! Streaming subscription to the realtime database record.
//!
//! The store speaks server-sent events: every `put`/`patch` carries a path
//! relative to the subscribed record plus the new data at that path. We keep a
//! local mirror of the record and hand the app the complete mirrored mapping
//! after every change, so downstream code only ever sees full snapshots.

use std::time::Duration;

use serde_json::{Map, Value};

use super::queue::EventSender;
use super::types::{Snapshot, SourceMessage};
use crate::error::{AtelierError, Result};

/// Record holding every agent's status
pub const OFFICE_STATUS_RECORD: &str = "office_status";

/// Build the REST URL of a record under the database root
pub fn record_url(database_url: &str, record: &str) -> String {
    format!("{}/{}.json", database_url.trim_end_matches('/'), record)
}

/// One decoded server-sent event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
}

/// Incremental decoder for a `text/event-stream` body delivered in chunks
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning every event whose block is now complete
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend(chunk.iter().copied().filter(|&b| b != b'\r'));

        let mut events = Vec::new();
        while let Some(end) = find_block_end(&self.buffer) {
            let block: Vec<u8> = self.buffer.drain(..end + 2).collect();
            if let Some(event) = parse_block(&String::from_utf8_lossy(&block)) {
                events.push(event);
            }
        }
        events
    }
}

fn find_block_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

fn parse_block(block: &str) -> Option<SseEvent> {
    let mut event = String::from("message");
    let mut data: Vec<&str> = Vec::new();

    for line in block.lines() {
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let (field, value) = line.split_once(':').unwrap_or((line, ""));
        let value = value.strip_prefix(' ').unwrap_or(value);
        match field {
            "event" => event = value.to_string(),
            "data" => data.push(value),
            _ => {}
        }
    }

    if data.is_empty() && event == "message" {
        return None;
    }

    Some(SseEvent {
        event,
        data: data.join("\n"),
    })
}

/// Local copy of the subscribed record
#[derive(Debug, Default)]
pub struct RecordMirror {
    root: Value,
}

impl RecordMirror {
    pub fn new() -> Self {
        Self { root: Value::Null }
    }

    /// Apply a `put` or `patch` payload of the form `{"path": ..., "data": ...}`
    pub fn apply(&mut self, kind: &str, payload: &Value) -> Result<()> {
        let path = payload
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| AtelierError::Subscription(format!("{} event without a path", kind)))?;
        let data = payload.get("data").cloned().unwrap_or(Value::Null);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match kind {
            "put" => set_at(&mut self.root, &segments, data),
            "patch" => {
                let Value::Object(children) = data else {
                    return Err(AtelierError::Subscription("patch data is not an object".into()));
                };
                for (key, value) in children {
                    let mut child_path = segments.clone();
                    child_path.push(&key);
                    set_at(&mut self.root, &child_path, value);
                }
            }
            other => {
                return Err(AtelierError::Subscription(format!("unexpected event kind {}", other)));
            }
        }
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_value(&self.root)
    }
}

/// Set `data` at `segments`, creating intermediate objects; `null` deletes
fn set_at(node: &mut Value, segments: &[&str], data: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *node = data;
        return;
    };

    if !node.is_object() {
        if data.is_null() {
            return;
        }
        *node = Value::Object(Map::new());
    }
    let Value::Object(map) = node else {
        return;
    };

    if rest.is_empty() {
        if data.is_null() {
            map.remove(*first);
        } else {
            map.insert(first.to_string(), data);
        }
        return;
    }

    let child = map.entry(first.to_string()).or_insert(Value::Null);
    set_at(child, rest, data);
    if child.is_null() || child.as_object().is_some_and(Map::is_empty) {
        map.remove(*first);
    }
}

/// Reconnect and liveness timing for the subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamTiming {
    /// Pause before re-subscribing after the stream drops
    pub backoff: Duration,
    /// Longest silence tolerated between chunks; the store sends keep-alives every 30s
    pub idle_limit: Duration,
}

impl Default for StreamTiming {
    fn default() -> Self {
        Self {
            backoff: Duration::from_secs(5),
            idle_limit: Duration::from_secs(75),
        }
    }
}

/// Keep a subscription to `url` alive until the app drops its receiver
pub async fn run_stream(client: reqwest::Client, url: String, tx: EventSender, timing: StreamTiming) {
    loop {
        let reason = match stream_once(&client, &url, &tx, timing.idle_limit).await {
            Ok(()) => "stream closed by server".to_string(),
            Err(e) => e.to_string(),
        };

        if tx.is_closed() {
            return;
        }
        tracing::warn!(%url, %reason, "realtime subscription lost");
        if tx.send(SourceMessage::Disconnected(reason)).await.is_err() {
            return;
        }

        tokio::time::sleep(timing.backoff).await;
    }
}

async fn stream_once(client: &reqwest::Client, url: &str, tx: &EventSender, idle_limit: Duration) -> Result<()> {
    let mut response = client
        .get(url)
        .header("Accept", "text/event-stream")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(AtelierError::Subscription(format!(
            "realtime store returned {}",
            response.status()
        )));
    }

    tracing::info!(%url, "realtime subscription established");
    if tx.send(SourceMessage::Connected).await.is_err() {
        return Ok(());
    }

    let mut decoder = SseDecoder::new();
    let mut mirror = RecordMirror::new();

    loop {
        let chunk = match tokio::time::timeout(idle_limit, response.chunk()).await {
            Ok(chunk) => chunk?,
            Err(_) => {
                return Err(AtelierError::Subscription(format!(
                    "stream idle for {}s",
                    idle_limit.as_secs()
                )))
            }
        };
        let Some(chunk) = chunk else {
            break;
        };

        for event in decoder.push(&chunk) {
            match event.event.as_str() {
                "put" | "patch" => {
                    let payload: Value = serde_json::from_str(&event.data)?;
                    mirror.apply(&event.event, &payload)?;
                    if tx.send(SourceMessage::Snapshot(mirror.snapshot())).await.is_err() {
                        return Ok(());
                    }
                }
                "keep-alive" => {}
                "cancel" | "auth_revoked" => {
                    return Err(AtelierError::Subscription(format!(
                        "server sent {}: {}",
                        event.event, event.data
                    )));
                }
                other => tracing::debug!(event = other, "ignoring stream event"),
            }
        }
    }

    Ok(())
}
