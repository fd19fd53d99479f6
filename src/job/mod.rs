//! Job execution: one URL in, persisted metadata and video out.
//!
//! Split into focused submodules:
//! - [`orchestration`] - the state machine driving a job through its phases
//!
//! A [`JobRunner`] owns its collaborators as trait objects, so every one of
//! them can be swapped for a test double.

mod orchestration;


use std::sync::Arc;

use crate::config::Config;
use crate::download::{ByteDownloader, HttpDownloader};
use crate::error::Result;
use crate::resolver::{UrlResolverTool, YtDlpResolver};
use crate::scraper::{ApifyClient, MetadataScraper};
use crate::storage::{ArtifactStore, LocalStore};

/// Runs scrape-and-download jobs
///
/// # Examples
///
/// ```no_run
/// use scrape_dl::{Config, JobRunner};
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::from_env()?;
/// let runner = JobRunner::from_config(&config)?;
///
/// match runner.run("https://youtu.be/dQw4w9WgXcQ", &CancellationToken::new()).await {
///     Ok(result) => println!("video at {:?}", result.video_path),
///     Err(failure) => eprintln!("job {} failed: {failure}", failure.result.job.id),
/// }
/// # Ok(())
/// # }
/// ```
pub struct JobRunner {
    scraper: Arc<dyn MetadataScraper>,
    resolver: Arc<dyn UrlResolverTool>,
    downloader: Arc<dyn ByteDownloader>,
    store: Arc<dyn ArtifactStore>,
}

impl JobRunner {
    /// Create a runner from explicit collaborators
    pub fn new(
        scraper: Arc<dyn MetadataScraper>,
        resolver: Arc<dyn UrlResolverTool>,
        downloader: Arc<dyn ByteDownloader>,
        store: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            scraper,
            resolver,
            downloader,
            store,
        }
    }

    /// Create a runner wired to Apify, yt-dlp, HTTP and the local filesystem
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let scraper = ApifyClient::from_config(config.apify.clone())?;
        let resolver = YtDlpResolver::from_config(&config.resolver);
        let downloader = HttpDownloader::from_config(&config.download)?;
        let store = LocalStore::new(config.storage.data_dir.clone());

        tracing::debug!(
            scraper = scraper.name(),
            resolver = resolver.name(),
            binary = %resolver.binary_path().display(),
            data_dir = %store.base_dir().display(),
            "job runner configured"
        );

        Ok(Self::new(
            Arc::new(scraper),
            Arc::new(resolver),
            Arc::new(downloader),
            Arc::new(store),
        ))
    }
}
