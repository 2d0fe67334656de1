use thiserror::Error;

/// Errors surfaced by the atelier runtime
#[derive(Debug, Error)]
pub enum AtelierError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("file watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("subscription failed: {0}")]
    Subscription(String),

    #[error("control request failed: {0}")]
    Control(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, AtelierError>;
