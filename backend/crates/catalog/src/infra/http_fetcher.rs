//! HTTP Asset Fetcher
//!
//! Downloads images into `images_dir`, naming the file after the last path
//! segment of the URL. Two downloads with the same file name overwrite each
//! other; the last successful writer wins.

use std::path::PathBuf;

use tempfile::NamedTempFile;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::config::CatalogConfig;
use crate::domain::fetcher::AssetFetcher;
use crate::error::{CatalogError, CatalogResult};

/// `AssetFetcher` backed by a shared `reqwest::Client`
#[derive(Clone)]
pub struct HttpAssetFetcher {
    client: reqwest::Client,
    images_dir: PathBuf,
    public_images_path: String,
    max_image_bytes: u64,
}

impl HttpAssetFetcher {
    pub fn new(config: &CatalogConfig) -> CatalogResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| CatalogError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            images_dir: config.images_dir.clone(),
            public_images_path: config.public_images_path.clone(),
            max_image_bytes: config.max_image_bytes,
        })
    }

    /// Stream the response body into a scratch file in `images_dir`, then
    /// rename it over `images_dir/file_name`
    ///
    /// On any error the scratch file is removed and an existing file of the
    /// same name is left as it was.
    async fn save(&self, mut response: reqwest::Response, file_name: &str) -> Result<(), String> {
        if let Some(len) = response
            .content_length()
            .filter(|len| *len > self.max_image_bytes)
        {
            return Err(format!(
                "body of {len} bytes exceeds the {} byte limit",
                self.max_image_bytes
            ));
        }

        fs::create_dir_all(&self.images_dir)
            .await
            .map_err(|e| format!("create {}: {e}", self.images_dir.display()))?;

        let (file, scratch) = NamedTempFile::new_in(&self.images_dir)
            .map_err(|e| format!("create scratch file in {}: {e}", self.images_dir.display()))?
            .into_parts();
        let mut file = fs::File::from_std(file);

        let mut received: u64 = 0;
        while let Some(chunk) = response.chunk().await.map_err(|e| e.to_string())? {
            received += chunk.len() as u64;
            if received > self.max_image_bytes {
                return Err(format!("body exceeds the {} byte limit", self.max_image_bytes));
            }
            file.write_all(&chunk).await.map_err(|e| e.to_string())?;
        }
        file.flush().await.map_err(|e| e.to_string())?;
        drop(file);

        let target = self.images_dir.join(file_name);
        scratch
            .persist(&target)
            .map_err(|e| format!("persist {}: {e}", target.display()))
    }
}

/// Last path segment of an http(s) URL, if it is a plain file name
pub fn file_name_from_url(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }

    let name = parsed.path_segments()?.next_back()?;
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '~' | '+'));

    valid.then(|| name.to_string())
}

impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        let Some(file_name) = file_name_from_url(url) else {
            tracing::warn!(url = %url, "Image URL has no usable file name");
            return None;
        };

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Image download failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(url = %url, status = %response.status(), "Image download rejected");
            return None;
        }

        if let Err(e) = self.save(response, &file_name).await {
            tracing::warn!(url = %url, error = %e, "Image could not be stored");
            return None;
        }

        tracing::info!(url = %url, file_name = %file_name, "Image downloaded");
        Some(format!("{}/{file_name}", self.public_images_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use std::net::SocketAddr;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn serve() -> SocketAddr {
        let app = Router::new()
            .route("/img/board.jpg", get(|| async { "jpeg bytes" }))
            .route("/img/missing.jpg", get(|| async { StatusCode::NOT_FOUND }))
            .route("/img/big.jpg", get(|| async { vec![7u8; 64] }))
            .route(
                "/img/slow.jpg",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    "late bytes"
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    /// Answers one connection with a canned response, then hangs up
    async fn serve_raw(response: &'static [u8]) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            socket.write_all(response).await.unwrap();
            let _ = socket.shutdown().await;
        });
        addr
    }

    fn config(dir: &std::path::Path) -> CatalogConfig {
        CatalogConfig::default()
            .with_images_dir(dir.join("nested/images"))
            .with_fetch_timeout(Duration::from_secs(5))
    }

    fn fetcher(dir: &std::path::Path) -> HttpAssetFetcher {
        HttpAssetFetcher::new(&config(dir)).unwrap()
    }

    fn stored_files(dir: &std::path::Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir.join("nested/images"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(
            file_name_from_url("http://example.com/a/b/board.jpg?size=2#x").as_deref(),
            Some("board.jpg")
        );
        assert_eq!(file_name_from_url("http://example.com/"), None);
        assert_eq!(file_name_from_url("http://example.com/a/%2e%2e"), None);
        assert_eq!(file_name_from_url("ftp://example.com/a.jpg"), None);
        assert_eq!(file_name_from_url("not a url"), None);
    }

    #[tokio::test]
    async fn test_fetch_writes_file_and_creates_directory() {
        let addr = serve().await;
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher(dir.path());

        let path = fetcher
            .fetch(&format!("http://{addr}/img/board.jpg"))
            .await;

        assert_eq!(path.as_deref(), Some("/static/images/board.jpg"));
        let stored = std::fs::read_to_string(dir.path().join("nested/images/board.jpg")).unwrap();
        assert_eq!(stored, "jpeg bytes");
    }

    #[tokio::test]
    async fn test_same_name_overwrites() {
        let addr = serve().await;
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher(dir.path());
        let target = dir.path().join("nested/images/board.jpg");
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(&target, "old contents that are longer").unwrap();

        fetcher
            .fetch(&format!("http://{addr}/img/board.jpg"))
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(target).unwrap(), "jpeg bytes");
    }

    #[tokio::test]
    async fn test_non_success_status_is_none() {
        let addr = serve().await;
        let dir = tempfile::tempdir().unwrap();

        let path = fetcher(dir.path())
            .fetch(&format!("http://{addr}/img/missing.jpg"))
            .await;

        assert_eq!(path, None);
        assert!(!dir.path().join("nested/images/missing.jpg").exists());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_none() {
        // Bind then drop to get a port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let dir = tempfile::tempdir().unwrap();

        let path = fetcher(dir.path())
            .fetch(&format!("http://{addr}/img/board.jpg"))
            .await;

        assert_eq!(path, None);
    }

    #[tokio::test]
    async fn test_truncated_body_keeps_existing_file() {
        let addr =
            serve_raw(b"HTTP/1.1 200 OK\r\nContent-Length: 1000\r\n\r\nabc").await;
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/images/board.jpg");
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(&target, "existing good image").unwrap();

        let path = fetcher(dir.path())
            .fetch(&format!("http://{addr}/img/board.jpg"))
            .await;

        assert_eq!(path, None);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "existing good image");
        assert_eq!(stored_files(dir.path()), vec!["board.jpg".to_string()]);
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let addr = serve().await;
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path()).with_fetch_timeout(Duration::from_millis(200));

        let path = HttpAssetFetcher::new(&config)
            .unwrap()
            .fetch(&format!("http://{addr}/img/slow.jpg"))
            .await;

        assert_eq!(path, None);
        assert!(!dir.path().join("nested/images/slow.jpg").exists());
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let addr = serve().await;
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path()).with_max_image_bytes(16);

        let path = HttpAssetFetcher::new(&config)
            .unwrap()
            .fetch(&format!("http://{addr}/img/big.jpg"))
            .await;

        assert_eq!(path, None);
        assert!(!dir.path().join("nested/images/big.jpg").exists());
    }

    #[tokio::test]
    async fn test_oversized_chunked_body_is_rejected() {
        let addr = serve_raw(
            b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n\
              10\r\n0123456789abcdef\r\n10\r\n0123456789abcdef\r\n0\r\n\r\n",
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path()).with_max_image_bytes(20);

        let path = HttpAssetFetcher::new(&config)
            .unwrap()
            .fetch(&format!("http://{addr}/img/board.jpg"))
            .await;

        assert_eq!(path, None);
        assert!(stored_files(dir.path()).is_empty());
    }
}
