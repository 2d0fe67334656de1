use serde::{Deserialize, Serialize};

/// One past drop as published in the studio's gallery file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

/// Fetch the gallery, newest first.
///
/// The feed is a display nicety: any failure yields an empty gallery and a
/// log line, never an error.
pub async fn fetch_gallery(client: &reqwest::Client, url: &str) -> Vec<Artwork> {
    match try_fetch(client, url).await {
        Ok(mut artworks) => {
            artworks.reverse();
            tracing::info!(count = artworks.len(), "gallery loaded");
            artworks
        }
        Err(e) => {
            tracing::warn!(%url, error = %e, "gallery unavailable");
            Vec::new()
        }
    }
}

async fn try_fetch(client: &reqwest::Client, url: &str) -> crate::error::Result<Vec<Artwork>> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// Serve a single HTTP response on a local port and return its URL
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await.unwrap();
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}/database.json", addr)
    }

    #[test]
    fn test_parse_gallery_with_optional_price() {
        let json = r#"[
            {"image": "https://img/1.png", "description": "Neon koi", "date": "2025-01-01"},
            {"image": "https://img/2.png", "description": "Sunset", "date": "2025-01-02", "price": "0.01 ETH"}
        ]"#;
        let artworks: Vec<Artwork> = serde_json::from_str(json).unwrap();
        assert_eq!(artworks.len(), 2);
        assert!(artworks[0].price.is_none());
        assert_eq!(artworks[1].price.as_deref(), Some("0.01 ETH"));
    }

    #[tokio::test]
    async fn test_unreachable_gallery_is_empty() {
        let client = reqwest::Client::new();
        let artworks = fetch_gallery(&client, "http://127.0.0.1:1/database.json").await;
        assert!(artworks.is_empty());
    }

    #[tokio::test]
    async fn test_gallery_is_newest_first() {
        let url = serve_once(
            "200 OK",
            r#"[{"image": "a.png", "description": "First"}, {"image": "b.png", "description": "Second"}, {"image": "c.png", "description": "Third"}]"#,
        )
        .await;
        let artworks = fetch_gallery(&reqwest::Client::new(), &url).await;
        let order: Vec<_> = artworks.iter().map(|a| a.description.as_str()).collect();
        assert_eq!(order, ["Third", "Second", "First"]);
    }

    #[tokio::test]
    async fn test_missing_gallery_is_empty() {
        let url = serve_once("404 Not Found", r#"{"error": "not found"}"#).await;
        let artworks = fetch_gallery(&reqwest::Client::new(), &url).await;
        assert!(artworks.is_empty());
    }
}
