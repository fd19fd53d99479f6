//! Test configuration helpers for building runners against mock services

use std::path::{Path, PathBuf};
use std::time::Duration;

use scrape_dl::{Config, JobRunner};
use tempfile::TempDir;

use super::fixtures::{TEST_TOKEN, TIKTOK_ACTOR, YOUTUBE_ACTOR};

/// Configuration pointing at a mock Apify server and a temporary data directory
pub fn mock_config(apify_uri: &str, data_dir: &Path) -> Config {
    let mut config = Config::default();
    config.apify.base_url = format!("{apify_uri}/v2");
    config.apify.token = TEST_TOKEN.to_string();
    config.apify.youtube_actor_id = YOUTUBE_ACTOR.to_string();
    config.apify.tiktok_actor_id = TIKTOK_ACTOR.to_string();
    config.apify.poll_interval = Duration::from_millis(10);
    config.apify.request_timeout = Duration::from_secs(10);
    config.resolver.timeout = Duration::from_secs(10);
    config.download.timeout = Duration::from_secs(10);
    config.storage.data_dir = data_dir.to_path_buf();
    config
}

/// Create a runner against a mock Apify server plus the temp dir backing it
pub fn mock_runner(apify_uri: &str) -> (JobRunner, TempDir) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let config = mock_config(apify_uri, temp.path());
    let runner = JobRunner::from_config(&config).expect("Failed to build runner");
    (runner, temp)
}

/// Write an executable stand-in for yt-dlp that prints `video_url`
#[cfg(unix)]
pub fn fake_ytdlp(dir: &Path, video_url: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-yt-dlp");
    std::fs::write(&path, format!("#!/bin/sh\necho '{video_url}'\n"))
        .expect("Failed to write fake yt-dlp");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to mark fake yt-dlp executable");
    path
}

/// Check whether live Apify credentials are configured
pub fn has_live_credentials() -> bool {
    dotenvy::dotenv().ok();
    std::env::var("APIFY_API_TOKEN").is_ok_and(|token| !token.trim().is_empty())
}
