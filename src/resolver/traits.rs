//! Trait for external URL-resolution tools

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Turns a video page URL into a directly downloadable media URL
#[async_trait]
pub trait UrlResolverTool: Send + Sync {
    /// Resolve `page_url` to one playable URL
    ///
    /// When the tool reports several URLs (separate video and audio tracks,
    /// for instance) the first one is returned.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Resolution`] if the tool cannot run, fails,
    /// times out, or prints no URL, and [`crate::Error::Cancelled`] if
    /// `cancel` fires first.
    async fn resolve_url(&self, page_url: &str, cancel: &CancellationToken)
    -> crate::Result<String>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
