//! Custom assertions on job directories

use std::path::Path;

use scrape_dl::storage::{INPUT_FILE, METADATA_FILE, VIDEO_FILE};
use scrape_dl::{JobResult, JobState};

/// Assert a job finished with all three artifacts in place
pub fn assert_job_persisted(result: &JobResult, job_dir: &Path, metadata: &[u8], video: &[u8]) {
    assert!(result.success, "job should succeed: {:?}", result.error_message);
    assert_eq!(result.state, JobState::Persisted);
    assert!(result.completed_at.is_some());

    assert!(job_dir.join(INPUT_FILE).is_file(), "input record missing");
    assert_eq!(
        std::fs::read(job_dir.join(METADATA_FILE)).expect("metadata should exist"),
        metadata,
        "metadata must be stored verbatim"
    );
    assert_eq!(
        std::fs::read(job_dir.join(VIDEO_FILE)).expect("video should exist"),
        video,
        "video bytes differ"
    );
    assert_eq!(result.video_bytes, video.len() as u64);
}

/// Count the job directories under a data directory
pub fn job_dir_count(data_dir: &Path) -> usize {
    match std::fs::read_dir(data_dir.join("jobs")) {
        Ok(entries) => entries.filter_map(Result::ok).count(),
        Err(_) => 0,
    }
}
