//! yt-dlp based URL resolution

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use super::traits::UrlResolverTool;
use crate::config::ResolverConfig;
use crate::error::{Error, Result};
use crate::utils::with_cancel;

/// Resolves page URLs with the external `yt-dlp` binary
///
/// Runs `yt-dlp -f b --get-url --no-warnings <url>` and takes the first line
/// of its output. The child process is killed when the call times out or is
/// cancelled.
///
/// # Examples
///
/// ```no_run
/// use scrape_dl::resolver::{UrlResolverTool, YtDlpResolver};
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let resolver = YtDlpResolver::from_path(Duration::from_secs(120))
///     .expect("yt-dlp not found in PATH");
///
/// let url = resolver
///     .resolve_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ", &CancellationToken::new())
///     .await?;
/// println!("{url}");
/// # Ok(())
/// # }
/// ```
pub struct YtDlpResolver {
    binary_path: PathBuf,
    timeout: Duration,
}

impl YtDlpResolver {
    /// Create a resolver with an explicit binary path
    pub fn new(binary_path: PathBuf, timeout: Duration) -> Self {
        Self {
            binary_path,
            timeout,
        }
    }

    /// Attempt to find yt-dlp in PATH
    ///
    /// Uses the `which` crate; returns `None` if the binary is not found.
    pub fn from_path(timeout: Duration) -> Option<Self> {
        which::which("yt-dlp")
            .ok()
            .map(|path| Self::new(path, timeout))
    }

    /// Create a resolver from configuration
    ///
    /// An explicit path wins; otherwise PATH is searched when allowed, and the
    /// bare name `yt-dlp` is used as a last resort so the failure surfaces at
    /// resolution time with the spawn error.
    pub fn from_config(config: &ResolverConfig) -> Self {
        let binary_path = config
            .ytdlp_path
            .clone()
            .or_else(|| {
                config
                    .search_path
                    .then(|| which::which("yt-dlp").ok())
                    .flatten()
            })
            .unwrap_or_else(|| PathBuf::from("yt-dlp"));
        Self::new(binary_path, config.timeout)
    }

    /// Path of the binary this resolver runs
    pub fn binary_path(&self) -> &std::path::Path {
        &self.binary_path
    }

    async fn run(&self, page_url: &str) -> Result<String> {
        let mut command = Command::new(&self.binary_path);
        command
            .args(["-f", "b", "--get-url", "--no-warnings"])
            .arg(page_url)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                Error::Resolution(format!(
                    "yt-dlp timed out after {}s",
                    self.timeout.as_secs_f64()
                ))
            })?
            .map_err(|e| Error::Resolution(format!("failed to execute yt-dlp: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Resolution(format!(
                "yt-dlp exited with {}, stderr: {}",
                output.status,
                stderr.trim()
            )));
        }

        first_url(&String::from_utf8_lossy(&output.stdout))
            .map(str::to_string)
            .ok_or_else(|| Error::Resolution("yt-dlp returned empty URL".to_string()))
    }
}

#[async_trait]
impl UrlResolverTool for YtDlpResolver {
    async fn resolve_url(&self, page_url: &str, cancel: &CancellationToken) -> Result<String> {
        tracing::debug!(binary = %self.binary_path.display(), page_url, "running yt-dlp");
        with_cancel(cancel, self.run(page_url)).await
    }

    fn name(&self) -> &'static str {
        "yt-dlp"
    }
}

/// First non-blank line of newline-delimited tool output
fn first_url(stdout: &str) -> Option<&str> {
    stdout.lines().map(str::trim).find(|line| !line.is_empty())
}
