use std::fmt;
use std::time::{Duration, Instant};

/// Studio-wide control actions exposed by the orchestration service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Wake,
    Stop,
}

impl ControlAction {
    pub fn path(self) -> &'static str {
        match self {
            ControlAction::Wake => "wakeup",
            ControlAction::Stop => "stop",
        }
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlAction::Wake => write!(f, "wake up"),
            ControlAction::Stop => write!(f, "stop"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient message for the status bar
#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NoticeLevel,
    pub text: String,
    pub created_at: Instant,
}

impl Notification {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
            created_at: Instant::now(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
            created_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}

/// Fire-and-forget client for the control endpoint
#[derive(Debug, Clone)]
pub struct ControlClient {
    client: reqwest::Client,
    base_url: String,
}

impl ControlClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn url_for(&self, action: ControlAction) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), action.path())
    }

    /// Send `action`; the response body comes back verbatim, failures as an error notice
    pub async fn send(&self, action: ControlAction) -> Notification {
        let url = self.url_for(action);
        tracing::info!(%url, %action, "sending control action");

        match self.fetch_body(&url).await {
            Ok(body) => Notification::info(body),
            Err(e) => {
                tracing::warn!(%url, error = %e, "control action failed");
                Notification::error(format!("Could not {} the studio: {}", action, e))
            }
        }
    }

    async fn fetch_body(&self, url: &str) -> crate::error::Result<String> {
        let response = self.client.get(url).send().await?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_urls() {
        let control = ControlClient::new(reqwest::Client::new(), "https://studio.example/");
        assert_eq!(control.url_for(ControlAction::Wake), "https://studio.example/wakeup");
        assert_eq!(control.url_for(ControlAction::Stop), "https://studio.example/stop");
    }

    #[test]
    fn test_notification_expiry() {
        let notice = Notification::info("ok");
        assert!(!notice.is_expired(Duration::from_secs(60)));
        assert!(notice.is_expired(Duration::ZERO));
    }

    #[tokio::test]
    async fn test_network_failure_becomes_error_notice() {
        let control = ControlClient::new(reqwest::Client::new(), "http://127.0.0.1:1");
        let notice = control.send(ControlAction::Stop).await;
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.text.starts_with("Could not stop the studio"));
    }
}
