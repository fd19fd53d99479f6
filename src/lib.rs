//! # scrape-dl
//!
//! Turns a public video page URL (YouTube or TikTok) into a local job
//! directory holding the scraped metadata and the downloaded video.
//!
//! ## Pipeline
//!
//! Each job runs a fixed sequence of phases: classify the URL, create the job
//! directory, scrape metadata through a remote actor service, resolve a
//! playable video URL, stream the video to disk. Metadata is persisted before
//! resolution is attempted, so a job that fails late still leaves its metadata
//! behind.
//!
//! ## Quick Start
//!
//! ```no_run
//! use scrape_dl::{Config, JobRunner};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let runner = JobRunner::from_config(&config)?;
//!
//!     let cancel = CancellationToken::new();
//!     tokio::spawn(scrape_dl::cancel_on_shutdown(cancel.clone()));
//!
//!     let result = runner
//!         .run("https://www.tiktok.com/@someone/video/7300000000000000000", &cancel)
//!         .await?;
//!     println!("saved {} bytes to {:?}", result.video_bytes, result.video_path);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Video byte-stream downloading
pub mod download;
/// Error types
pub mod error;
/// Job orchestration
pub mod job;
/// URL classification
pub mod platform;
/// Video URL resolution
pub mod resolver;
/// Remote metadata scraping
pub mod scraper;
/// Job artifact persistence
pub mod storage;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;

use tokio_util::sync::CancellationToken;

// Re-export commonly used types
pub use config::{ApifyConfig, Config, DownloadConfig, ResolverConfig, StorageConfig};
pub use download::{ByteDownloader, ByteStream, HttpDownloader};
pub use error::{DownloadError, Error, JobFailure, Result};
pub use job::JobRunner;
pub use platform::classify;
pub use resolver::{ResolverStrategy, UrlResolverTool, YtDlpResolver};
pub use scraper::{ApifyClient, MetadataScraper, extract_video_url};
pub use storage::{ArtifactStore, LocalStore, StoredFile};
pub use types::{Job, JobId, JobResult, JobState, Platform, RemoteTaskRun, RunStatus, ScrapeResult};

/// Cancel `token` when the process receives a termination signal.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// Returns early, without cancelling, if the token is cancelled elsewhere first.
pub async fn cancel_on_shutdown(token: CancellationToken) {
    tokio::select! {
        _ = token.cancelled() => {}
        _ = wait_for_signal() => {
            tracing::info!("cancelling running job");
            token.cancel();
        }
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), Ok(mut sigint)) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            sigint.recv().await;
            tracing::info!("Received SIGINT signal (Ctrl+C)");
        }
        (Ok(mut sigterm), Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            sigterm.recv().await;
            tracing::info!("Received SIGTERM signal");
        }
        (Err(_), Err(e)) => {
            tracing::error!(error = %e, "Could not register any signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
            // A failed listener is not a shutdown request
            std::future::pending::<()>().await;
        }
    }
}
