//! Core types for scrape-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use crate::platform::classify;

/// Unique identifier for a job
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    /// Allocate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID
    pub fn get(&self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for JobId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Video platform a page URL belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// youtube.com / youtu.be
    YouTube,
    /// tiktok.com
    TikTok,
    /// Anything else; never scraped
    Unsupported,
}

impl Platform {
    /// Lowercase tag used in logs and in the persisted job record
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
            Platform::TikTok => "tiktok",
            Platform::Unsupported => "unsupported",
        }
    }

    /// Whether jobs for this platform can run at all
    pub fn is_supported(&self) -> bool {
        !matches!(self, Platform::Unsupported)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request to scrape and download a single URL
///
/// Immutable once created. Serialized as the job's `input.json` record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Job identity
    #[serde(rename = "job_id")]
    pub id: JobId,
    /// Source page URL as submitted
    pub url: String,
    /// Platform classified from the URL
    pub platform: Platform,
    /// Creation time (UTC)
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Create a job for `url` with a fresh identity and the current time
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            id: JobId::new(),
            platform: classify(&url),
            url,
            created_at: Utc::now(),
        }
    }
}

/// Pipeline state of a job
///
/// States are reached in declaration order; `Failed` can follow any of them.
/// `Display` prints the phase that produces the state, which is how failures
/// are labelled in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Identity allocated and platform classified
    Created,
    /// Job directory created and input record written
    Initialized,
    /// Raw metadata scraped and persisted
    MetadataFetched,
    /// Playable video URL obtained
    UrlResolved,
    /// Video byte stream opened
    Downloaded,
    /// Video written to disk; the job succeeded
    Persisted,
    /// A phase failed; no further progress
    Failed,
}

impl JobState {
    /// Name of the phase that leads into this state
    pub fn phase_name(&self) -> &'static str {
        match self {
            JobState::Created => "classify",
            JobState::Initialized => "initialize job",
            JobState::MetadataFetched => "fetch metadata",
            JobState::UrlResolved => "resolve video url",
            JobState::Downloaded => "download video",
            JobState::Persisted => "save video",
            JobState::Failed => "failed",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phase_name())
    }
}

/// Terminal, externally observable record of one job
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobResult {
    /// The job this result belongs to
    pub job: Job,
    /// Last state reached
    pub state: JobState,
    /// Where the raw metadata was written
    pub metadata_path: Option<PathBuf>,
    /// Where the video was written
    pub video_path: Option<PathBuf>,
    /// Number of video bytes written
    pub video_bytes: u64,
    /// True only when both metadata and video were written
    pub success: bool,
    /// `"<phase>: <error>"` for failed jobs
    pub error_message: Option<String>,
    /// When the job reached a terminal state
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobResult {
    /// Fresh record for a job that has not progressed yet
    pub fn new(job: Job) -> Self {
        Self {
            job,
            state: JobState::Created,
            metadata_path: None,
            video_path: None,
            video_bytes: 0,
            success: false,
            error_message: None,
            completed_at: None,
        }
    }
}

/// Lifecycle status of a remote scrape task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunStatus {
    /// Queued, not started yet
    #[serde(rename = "READY")]
    Ready,
    /// Executing
    #[serde(rename = "RUNNING")]
    Running,
    /// Finished successfully; the result set is available
    #[serde(rename = "SUCCEEDED")]
    Succeeded,
    /// Finished with an error
    #[serde(rename = "FAILED")]
    Failed,
    /// Abort requested, still shutting down
    #[serde(rename = "ABORTING")]
    Aborting,
    /// Aborted
    #[serde(rename = "ABORTED")]
    Aborted,
    /// Timeout reached, still shutting down
    #[serde(rename = "TIMING-OUT")]
    TimingOut,
    /// Timed out
    #[serde(rename = "TIMED-OUT")]
    TimedOut,
    /// A status this client does not know; treated as still running
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Whether the run has stopped for good
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Succeeded | RunStatus::Failed | RunStatus::Aborted | RunStatus::TimedOut
        )
    }

    /// Whether the run stopped without a usable result set
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            RunStatus::Failed | RunStatus::Aborted | RunStatus::TimedOut
        )
    }

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Ready => "READY",
            RunStatus::Running => "RUNNING",
            RunStatus::Succeeded => "SUCCEEDED",
            RunStatus::Failed => "FAILED",
            RunStatus::Aborting => "ABORTING",
            RunStatus::Aborted => "ABORTED",
            RunStatus::TimingOut => "TIMING-OUT",
            RunStatus::TimedOut => "TIMED-OUT",
            RunStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One remote scrape task as seen by a single status poll
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RemoteTaskRun {
    /// Remote run identifier
    #[serde(default)]
    pub id: String,
    /// Current lifecycle status
    pub status: RunStatus,
    /// Result-set identifier, present once the run has a dataset
    #[serde(rename = "defaultDatasetId", default)]
    pub dataset_id: Option<String>,
}

/// Output of one metadata scrape
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeResult {
    /// Result-set bytes exactly as the remote service returned them
    pub raw_metadata: Vec<u8>,
    /// Direct video URL, if the metadata carried one
    pub video_url: Option<String>,
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_record_uses_persisted_field_names() {
        let job = Job::new("https://www.youtube.com/watch?v=abc");
        let value = serde_json::to_value(&job).unwrap();

        assert_eq!(value["job_id"], job.id.to_string());
        assert_eq!(value["url"], "https://www.youtube.com/watch?v=abc");
        assert_eq!(value["platform"], "youtube");
        assert!(value["created_at"].is_string());
    }

    #[test]
    fn new_jobs_get_distinct_ids() {
        let a = Job::new("https://tiktok.com/@u/video/1");
        let b = Job::new("https://tiktok.com/@u/video/1");

        assert_ne!(a.id, b.id, "every job must get its own identity");
    }

    #[test]
    fn run_status_parses_wire_names() {
        let run: RemoteTaskRun = serde_json::from_str(
            r#"{"id":"r1","status":"TIMED-OUT","defaultDatasetId":"d1"}"#,
        )
        .unwrap();

        assert_eq!(run.status, RunStatus::TimedOut);
        assert_eq!(run.dataset_id.as_deref(), Some("d1"));
        assert!(run.status.is_terminal());
        assert!(run.status.is_failure());
    }

    #[test]
    fn unknown_run_status_is_not_terminal() {
        let run: RemoteTaskRun = serde_json::from_str(r#"{"status":"PAUSED"}"#).unwrap();

        assert_eq!(run.status, RunStatus::Unknown);
        assert!(!run.status.is_terminal());
    }

    #[test]
    fn transitional_statuses_keep_polling() {
        for status in [RunStatus::Ready, RunStatus::Running, RunStatus::Aborting, RunStatus::TimingOut] {
            assert!(!status.is_terminal(), "{status} should not be terminal");
        }
        assert!(RunStatus::Succeeded.is_terminal());
        assert!(!RunStatus::Succeeded.is_failure());
    }

    #[test]
    fn job_state_displays_phase_name() {
        assert_eq!(JobState::MetadataFetched.to_string(), "fetch metadata");
        assert_eq!(JobState::UrlResolved.to_string(), "resolve video url");
    }
}
