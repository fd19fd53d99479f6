//! Trait for metadata scrapers

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::types::ScrapeResult;

/// Source of raw video metadata
///
/// Implementations classify the page URL themselves and must agree with
/// [`crate::platform::classify`].
#[async_trait]
pub trait MetadataScraper: Send + Sync {
    /// Scrape metadata for one page URL
    ///
    /// Returns the raw result set untouched, plus a direct video URL when one
    /// could be probed from it. A missing video URL is not an error here.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The URL belongs to no supported platform
    /// - The remote task cannot be started, fails, or its results cannot be fetched
    /// - `cancel` fires before the scrape completes
    async fn scrape(&self, page_url: &str, cancel: &CancellationToken)
    -> crate::Result<ScrapeResult>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
