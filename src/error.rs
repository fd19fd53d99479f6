//! Error types for scrape-dl
//!
//! This module provides the error handling for the library:
//! - [`Error`], the crate-wide error with one variant per failure kind
//! - [`DownloadError`] for byte-transfer failures
//! - [`JobFailure`], which pairs an error with the partially populated job record
//!
//! Every variant carries enough context (remote status codes, response bodies,
//! subprocess stderr) to diagnose a failed job without re-running it.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::{JobResult, JobState, RunStatus};

/// Result type alias for scrape-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for scrape-dl
#[derive(Debug, Error)]
pub enum Error {
    /// The URL does not belong to any supported platform
    #[error("unsupported platform for URL: {url}")]
    UnsupportedPlatform {
        /// The rejected page URL
        url: String,
    },

    /// The remote service did not acknowledge task creation
    #[error("failed to start remote task: status {status}, body: {body}")]
    TaskStart {
        /// HTTP status returned by the task-creation endpoint
        status: StatusCode,
        /// Response body, kept verbatim for diagnostics
        body: String,
    },

    /// The remote task reached a failure terminal state
    #[error("remote task {run_id} finished with status {status}")]
    TaskFailed {
        /// Remote run identifier
        run_id: String,
        /// The terminal status reported by the service
        status: RunStatus,
    },

    /// A remote endpoint answered with a non-success status
    #[error("{endpoint} returned status {status}: {body}")]
    UnexpectedResponse {
        /// Which endpoint was called (e.g. "run status")
        endpoint: &'static str,
        /// HTTP status returned
        status: StatusCode,
        /// Response body, kept verbatim for diagnostics
        body: String,
    },

    /// The scraped result set is empty
    #[error("no results returned from scraper")]
    NoResults,

    /// The first scraped record has no usable video URL
    #[error("could not find video URL in scraped metadata")]
    VideoUrlNotFound,

    /// The external URL-resolution tool failed or printed nothing
    #[error("URL resolution failed: {0}")]
    Resolution(String),

    /// Fetching the video bytes failed
    #[error("download error: {0}")]
    Download(#[from] DownloadError),

    /// Writing a job artifact failed
    #[error("failed to persist {path}: {source}")]
    Persistence {
        /// Artifact path that could not be written
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The caller cancelled the operation
    #[error("operation cancelled")]
    Cancelled,

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "APIFY_API_TOKEN")
        key: Option<String>,
    },

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a configuration error for a named key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Build a persistence error for an artifact path
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }
}

/// Byte-transfer errors
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The video host answered with something other than 200 OK
    #[error("unexpected status code {status} from {url}")]
    UnexpectedStatus {
        /// HTTP status returned by the video host
        status: StatusCode,
        /// The URL that was requested
        url: String,
    },

    /// The connection failed before or during the transfer
    #[error("transfer from {url} failed: {reason}")]
    TransferFailed {
        /// The URL that was requested
        url: String,
        /// Transport-level reason
        reason: String,
    },

    /// The body stream broke off mid-transfer
    #[error("video stream interrupted: {reason}")]
    StreamInterrupted {
        /// Transport-level reason
        reason: String,
    },
}

/// A job that stopped before reaching [`JobState::Persisted`]
///
/// Carries the structured error together with the partially populated
/// [`JobResult`]. The error is authoritative; fields already set on the result
/// (for example the metadata path) remain valid.
#[derive(Debug, Error)]
#[error("{phase}: {source}")]
pub struct JobFailure {
    /// The phase that was being attempted when the job failed
    pub phase: JobState,
    /// The first error encountered
    #[source]
    pub source: Error,
    /// The job record as far as it got
    pub result: Box<JobResult>,
}

impl JobFailure {
    /// Whether the failure was caused by cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self.source, Error::Cancelled)
    }
}
