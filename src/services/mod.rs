pub mod commission;
pub mod control;
pub mod gallery;

pub use control::{ControlAction, ControlClient, NoticeLevel, Notification};
pub use gallery::{fetch_gallery, Artwork};

/// Result of a background service call, delivered back to the app actor
#[derive(Debug)]
pub enum ServiceOutcome {
    Gallery(Vec<Artwork>),
    Notice(Notification),
}

/// Shared HTTP client for every outbound call
pub fn http_client() -> crate::error::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("atelier/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
