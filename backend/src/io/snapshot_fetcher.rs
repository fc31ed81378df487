//! Sources of the published wishlist snapshot read at startup.
//!
//! Every failure (transport, HTTP status, unreadable file, bad JSON) is
//! logged at warn level and reported as "no snapshot". Reconciliation then
//! leaves local data alone.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use shared::SnapshotDocument;
use std::path::{Path, PathBuf};

pub const DEFAULT_USER_AGENT: &str = "wishlist-sync/0.1";

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the current snapshot, or `None` when it is unavailable
    async fn fetch(&self) -> Option<SnapshotDocument>;
}

/// Parse snapshot JSON, returning `None` (and logging) when it is malformed
pub fn parse_snapshot(raw: &str) -> Option<SnapshotDocument> {
    match serde_json::from_str::<SnapshotDocument>(raw) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            warn!("Snapshot is not valid JSON: {}", e);
            None
        }
    }
}

/// Reads the snapshot with a single GET of a fixed URL.
#[derive(Debug, Clone)]
pub struct HttpSnapshotFetcher {
    client: Client,
    url: String,
}

impl HttpSnapshotFetcher {
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_body(&self) -> Result<String, reqwest::Error> {
        self.client
            .get(&self.url)
            .header(USER_AGENT, DEFAULT_USER_AGENT)
            .header(ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotFetcher {
    async fn fetch(&self) -> Option<SnapshotDocument> {
        debug!("Fetching snapshot from {}", self.url);
        match self.fetch_body().await {
            Ok(body) => {
                let snapshot = parse_snapshot(&body)?;
                info!("Fetched snapshot from {}", self.url);
                Some(snapshot)
            }
            Err(e) => {
                match e.status() {
                    Some(status) => warn!("Snapshot request to {} failed with {}", self.url, status),
                    None => warn!("Could not reach snapshot at {}: {}", self.url, e),
                }
                None
            }
        }
    }
}

/// Reads the snapshot from a JSON file on disk
#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    async fn fetch(&self) -> Option<SnapshotDocument> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => parse_snapshot(&raw),
            Err(e) => {
                warn!("Could not read snapshot file {:?}: {}", self.path, e);
                None
            }
        }
    }
}

/// Used when no snapshot location is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSnapshot;

#[async_trait]
impl SnapshotSource for NoSnapshot {
    async fn fetch(&self) -> Option<SnapshotDocument> {
        debug!("No snapshot source configured");
        None
    }
}

/// Serves a snapshot that is already in memory
#[derive(Debug, Clone, Default)]
pub struct StaticSnapshot {
    snapshot: Option<SnapshotDocument>,
}

impl StaticSnapshot {
    pub fn new(snapshot: Option<SnapshotDocument>) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl SnapshotSource for StaticSnapshot {
    async fn fetch(&self) -> Option<SnapshotDocument> {
        self.snapshot.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answers exactly one HTTP request with `status` and `body`
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buffer = [0u8; 4096];
            let _ = socket.read(&mut buffer).await.unwrap();
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/wishlist-data.json", address)
    }

    #[test]
    fn test_parse_snapshot_ignores_unknown_fields() {
        let snapshot =
            parse_snapshot(r#"{"version":"1.0","exportDate":"2024-01-01T00:00:00Z","items":[]}"#)
                .unwrap();
        assert_eq!(snapshot.export_date.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(snapshot.items, Some(vec![]));
    }

    #[test]
    fn test_parse_snapshot_without_fields() {
        assert_eq!(parse_snapshot("{}"), Some(SnapshotDocument::default()));
        assert_eq!(parse_snapshot("not json"), None);
    }

    #[tokio::test]
    async fn test_http_fetch_success() {
        let url = serve_once(
            "200 OK",
            r#"{"exportDate":"2024-02-01T10:00:00Z","items":[{"id":"a","name":"Bike"}]}"#,
        )
        .await;

        let snapshot = HttpSnapshotFetcher::new(url).unwrap().fetch().await.unwrap();
        assert_eq!(snapshot.export_date.as_deref(), Some("2024-02-01T10:00:00Z"));
        assert_eq!(snapshot.items.unwrap()[0].name, "Bike");
    }

    #[tokio::test]
    async fn test_http_error_status_is_none() {
        let url = serve_once("404 Not Found", r#"{"error":"missing"}"#).await;
        assert!(HttpSnapshotFetcher::new(url).unwrap().fetch().await.is_none());
    }

    #[tokio::test]
    async fn test_http_malformed_body_is_none() {
        let url = serve_once("200 OK", "<html>oops</html>").await;
        assert!(HttpSnapshotFetcher::new(url).unwrap().fetch().await.is_none());
    }

    #[tokio::test]
    async fn test_file_source() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.json");
        fs::write(&path, r#"{"exportDate":"2024-03-01T00:00:00Z"}"#).unwrap();

        let snapshot = FileSnapshotSource::new(&path).fetch().await.unwrap();
        assert_eq!(snapshot.export_date.as_deref(), Some("2024-03-01T00:00:00Z"));
        assert_eq!(snapshot.items, None);

        let missing = FileSnapshotSource::new(temp_dir.path().join("missing.json"));
        assert!(missing.fetch().await.is_none());
    }

    #[tokio::test]
    async fn test_no_snapshot() {
        assert!(NoSnapshot.fetch().await.is_none());
    }
}
