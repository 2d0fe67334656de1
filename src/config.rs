use std::path::PathBuf;
use std::time::Duration;

use crate::event::firebase::StreamTiming;
use crate::state::display_log::DEFAULT_CAPACITY;

/// Realtime database backing the office status and commissions
pub const DEFAULT_DATABASE_URL: &str = "https://artoffice-af07c-default-rtdb.firebaseio.com";

/// Static gallery file, append-only history of drops
pub const DEFAULT_GALLERY_URL: &str =
    "https://raw.githubusercontent.com/Itzadityapandey/nft-c/main/database.json";

/// Orchestration service exposing the wake/stop actions
pub const DEFAULT_CONTROL_URL: &str = "https://itzadityapandey-ceo.hf.space";

/// Where office snapshots come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Live stream from the realtime database
    Stream,
    /// JSON-lines file of snapshots
    File(PathBuf),
    /// Simulated studio
    Demo,
}

/// External services the app talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub database_url: String,
    pub gallery_url: String,
    pub control_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            gallery_url: DEFAULT_GALLERY_URL.to_string(),
            control_url: DEFAULT_CONTROL_URL.to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: SourceKind,
    pub endpoints: Endpoints,
    /// Cadence at which queued activity reaches the chat feed
    pub drip_interval: Duration,
    /// Lines kept in the chat feed
    pub log_capacity: usize,
    /// How long a notification stays in the status bar
    pub notice_ttl: Duration,
    /// Reconnect backoff and idle limit of the live stream
    pub stream_timing: StreamTiming,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::Stream,
            endpoints: Endpoints::default(),
            drip_interval: Duration::from_secs(5),
            log_capacity: DEFAULT_CAPACITY,
            notice_ttl: Duration::from_secs(6),
            stream_timing: StreamTiming::default(),
        }
    }
}
