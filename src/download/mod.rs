//! Video byte-stream downloading
//!
//! [`ByteDownloader`] opens a single-pass byte stream for a resolved video URL.
//! The stream is owned by whoever receives it and is closed when dropped.

mod http;

use async_trait::async_trait;
use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;

pub use http::HttpDownloader;

/// Single-owner, single-pass video byte stream
pub type ByteStream = Box<dyn AsyncRead + Send + Unpin>;

/// Opens byte streams for direct video URLs
#[async_trait]
pub trait ByteDownloader: Send + Sync {
    /// Start fetching `url` and hand back its body as a stream
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Download`] for connection failures or a
    /// non-200 response, and [`crate::Error::Cancelled`] if `cancel` fires
    /// before the response headers arrive.
    async fn open(&self, url: &str, cancel: &CancellationToken) -> crate::Result<ByteStream>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
