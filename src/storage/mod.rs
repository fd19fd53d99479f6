//! Job artifact persistence
//!
//! Every job owns one directory holding three artifacts:
//!
//! | file | content |
//! |------|---------|
//! | [`INPUT_FILE`] | the job record as pretty JSON |
//! | [`METADATA_FILE`] | the scraped result set, byte for byte |
//! | [`VIDEO_FILE`] | the downloaded video |
//!
//! Paths depend only on the job ID and the store's base directory.

mod local;

use async_trait::async_trait;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::download::ByteStream;
use crate::types::JobId;

pub use local::LocalStore;

/// Job input record file name
pub const INPUT_FILE: &str = "input.json";
/// Raw metadata file name
pub const METADATA_FILE: &str = "metadata_raw.json";
/// Video file name
pub const VIDEO_FILE: &str = "video.mp4";

/// An artifact that has been written
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredFile {
    /// Where it was written
    pub path: PathBuf,
    /// How many bytes were written
    pub bytes: u64,
}

/// Sink for job artifacts
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Create the job's directory
    async fn init_job(&self, id: JobId) -> crate::Result<PathBuf>;

    /// Write the job input record
    async fn save_input(&self, id: JobId, data: &[u8]) -> crate::Result<StoredFile>;

    /// Write the raw metadata exactly as given
    async fn save_metadata(&self, id: JobId, data: &[u8]) -> crate::Result<StoredFile>;

    /// Drain `stream` into the job's video file
    ///
    /// The stream is consumed and dropped on every path. A partially written
    /// file is removed when the write fails or `cancel` fires.
    async fn save_video(
        &self,
        id: JobId,
        stream: ByteStream,
        cancel: &CancellationToken,
    ) -> crate::Result<StoredFile>;

    /// Directory holding the job's artifacts
    fn job_dir(&self, id: JobId) -> PathBuf;
}
