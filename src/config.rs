//! Configuration types for scrape-dl

use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

use crate::error::{Error, Result};
use crate::types::Platform;

/// Environment variable holding the Apify API token
pub const TOKEN_ENV: &str = "APIFY_API_TOKEN";
/// Environment variable overriding the Apify base URL
pub const BASE_URL_ENV: &str = "APIFY_BASE_URL";
/// Environment variable pointing at the yt-dlp binary
pub const YTDLP_PATH_ENV: &str = "YTDLP_PATH";
/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "SCRAPE_DL_DATA_DIR";

/// Remote scrape service settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApifyConfig {
    /// API base URL (default: "https://api.apify.com/v2")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API token, sent as the `token` query parameter
    #[serde(default)]
    pub token: String,

    /// Actor scraping YouTube metadata (streamers/youtube-scraper)
    #[serde(default = "default_youtube_actor")]
    pub youtube_actor_id: String,

    /// Actor scraping TikTok posts (clockworks/tiktok-scraper)
    #[serde(default = "default_tiktok_actor")]
    pub tiktok_actor_id: String,

    /// Delay before each run-status query (default: 3 seconds)
    #[serde(default = "default_poll_interval", with = "duration_ms_serde")]
    pub poll_interval: Duration,

    /// Per-request timeout for API calls (default: 5 minutes)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl ApifyConfig {
    /// Actor that scrapes `platform`, if any
    pub fn actor_id(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::YouTube => Some(&self.youtube_actor_id),
            Platform::TikTok => Some(&self.tiktok_actor_id),
            Platform::Unsupported => None,
        }
    }
}

impl Default for ApifyConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: String::new(),
            youtube_actor_id: default_youtube_actor(),
            tiktok_actor_id: default_tiktok_actor(),
            poll_interval: default_poll_interval(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// External URL-resolution tool settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Path to the yt-dlp executable (auto-detected if None)
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,

    /// Whether to search PATH for yt-dlp if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// Hard limit for one resolution (default: 2 minutes)
    #[serde(default = "default_resolve_timeout", with = "duration_serde")]
    pub timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            search_path: true,
            timeout: default_resolve_timeout(),
        }
    }
}

/// Artifact storage settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base directory; jobs live under `<data_dir>/jobs/<job_id>` (default: "./data")
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Video transfer settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Timeout for a whole video transfer (default: 30 minutes)
    #[serde(default = "default_download_timeout", with = "duration_serde")]
    pub timeout: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout: default_download_timeout(),
        }
    }
}

/// Main configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote scrape service
    #[serde(default)]
    pub apify: ApifyConfig,

    /// URL-resolution tool
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Artifact storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Video transfer
    #[serde(default)]
    pub download: DownloadConfig,
}

impl Config {
    /// Build a configuration from process environment variables
    ///
    /// `APIFY_API_TOKEN` is required. `APIFY_BASE_URL`, `YTDLP_PATH` and
    /// `SCRAPE_DL_DATA_DIR` override their defaults when set and non-empty.
    pub fn from_env() -> Result<Self> {
        let token = non_empty_var(TOKEN_ENV).ok_or_else(|| {
            Error::config(format!("{TOKEN_ENV} environment variable not set"), TOKEN_ENV)
        })?;

        let mut config = Config::default();
        config.apify.token = token;
        if let Some(base_url) = non_empty_var(BASE_URL_ENV) {
            config.apify.base_url = base_url;
        }
        if let Some(path) = non_empty_var(YTDLP_PATH_ENV) {
            config.resolver.ytdlp_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = non_empty_var(DATA_DIR_ENV) {
            config.storage.data_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the settings a job cannot run without
    pub fn validate(&self) -> Result<()> {
        if self.apify.token.trim().is_empty() {
            return Err(Error::config("API token is empty", "apify.token"));
        }
        if self.apify.youtube_actor_id.is_empty() {
            return Err(Error::config("actor ID is empty", "apify.youtube_actor_id"));
        }
        if self.apify.tiktok_actor_id.is_empty() {
            return Err(Error::config("actor ID is empty", "apify.tiktok_actor_id"));
        }
        if self.apify.poll_interval.is_zero() {
            return Err(Error::config(
                "poll interval must be greater than zero",
                "apify.poll_interval",
            ));
        }
        url::Url::parse(&self.apify.base_url).map_err(|e| {
            Error::config(format!("invalid base URL: {e}"), "apify.base_url")
        })?;
        Ok(())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.apify.com/v2".to_string()
}

fn default_youtube_actor() -> String {
    "h7sDV53CddomktSi5".to_string()
}

fn default_tiktok_actor() -> String {
    "GdWCkxBtKWOsKjdch".to_string()
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(3)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(5 * 60)
}

fn default_resolve_timeout() -> Duration {
    Duration::from_secs(2 * 60)
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_download_timeout() -> Duration {
    Duration::from_secs(30 * 60)
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Millisecond Duration serialization helper
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
