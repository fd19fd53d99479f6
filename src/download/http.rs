//! Plain HTTP GET downloader

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::StatusCode;
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;

use super::{ByteDownloader, ByteStream};
use crate::config::DownloadConfig;
use crate::error::{DownloadError, Error, Result};
use crate::utils::with_cancel;

/// Streams video bodies over HTTP without buffering them in memory
pub struct HttpDownloader {
    http: reqwest::Client,
}

impl HttpDownloader {
    /// Create a downloader from an existing HTTP client
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Create a downloader with its own client using the configured timeout
    pub fn from_config(config: &DownloadConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::new(http))
    }
}

#[async_trait]
impl ByteDownloader for HttpDownloader {
    async fn open(&self, url: &str, cancel: &CancellationToken) -> Result<ByteStream> {
        let response = with_cancel(cancel, async {
            self.http.get(url).send().await.map_err(|e| {
                Error::from(DownloadError::TransferFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                })
            })
        })
        .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::UnexpectedStatus {
                status,
                url: url.to_string(),
            }
            .into());
        }

        tracing::debug!(url, content_length = ?response.content_length(), "video stream opened");
        let body = response.bytes_stream().map_err(std::io::Error::other);
        Ok(Box::new(StreamReader::new(Box::pin(body))))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tokio::io::AsyncReadExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn streams_body_bytes() {
        let server = MockServer::start().await;
        let payload: Vec<u8> = (0..=255u8).cycle().take(256 * 1024).collect();
        Mock::given(method("GET"))
            .and(path("/v.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
            .mount(&server)
            .await;
        let downloader = HttpDownloader::new(reqwest::Client::new());

        let mut stream = downloader
            .open(&format!("{}/v.mp4", server.uri()), &CancellationToken::new())
            .await
            .unwrap();
        let mut received = Vec::new();
        stream.read_to_end(&mut received).await.unwrap();

        assert_eq!(received, payload);
    }

    #[tokio::test]
    async fn non_ok_status_is_a_download_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone.mp4"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        let downloader = HttpDownloader::new(reqwest::Client::new());

        let result = downloader
            .open(&format!("{}/gone.mp4", server.uri()), &CancellationToken::new())
            .await;

        match result {
            Err(Error::Download(DownloadError::UnexpectedStatus { status, .. })) => {
                assert_eq!(status, StatusCode::FORBIDDEN);
            }
            Err(other) => panic!("expected UnexpectedStatus, got {other:?}"),
            Ok(_) => panic!("expected UnexpectedStatus, got a stream"),
        }
    }

    #[tokio::test]
    async fn partial_content_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(206).set_body_bytes(vec![1, 2, 3]))
            .mount(&server)
            .await;
        let downloader = HttpDownloader::new(reqwest::Client::new());

        let result = downloader
            .open(&format!("{}/v.mp4", server.uri()), &CancellationToken::new())
            .await;

        assert!(matches!(
            result,
            Err(Error::Download(DownloadError::UnexpectedStatus { .. }))
        ));
    }

    #[tokio::test]
    async fn connection_failure_is_a_download_error() {
        let downloader = HttpDownloader::new(reqwest::Client::new());

        // port 9 (discard) on localhost is expected to refuse connections
        let result = downloader
            .open("http://127.0.0.1:9/v.mp4", &CancellationToken::new())
            .await;

        assert!(matches!(
            result,
            Err(Error::Download(DownloadError::TransferFailed { .. }))
        ));
    }

    #[tokio::test]
    async fn cancelled_before_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(30)),
            )
            .mount(&server)
            .await;
        let downloader = HttpDownloader::new(reqwest::Client::new());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = downloader
            .open(&format!("{}/slow.mp4", server.uri()), &cancel)
            .await;

        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
