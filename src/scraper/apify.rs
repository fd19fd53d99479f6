//! Apify REST client: start an actor run, poll it, fetch its dataset

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use url::Url;

use super::extract::extract_video_url;
use super::traits::MetadataScraper;
use crate::config::ApifyConfig;
use crate::error::{Error, Result};
use crate::platform::classify;
use crate::types::{Platform, RemoteTaskRun, RunStatus, ScrapeResult};
use crate::utils::{body_for_diagnostics, cancellable_sleep, with_cancel};

/// Apify wraps every payload in `{"data": ...}`
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct CreatedRun {
    id: String,
}

/// Metadata scraper backed by Apify actors
///
/// The HTTP client is injected so callers control timeouts, proxies and
/// connection pooling.
///
/// # Examples
///
/// ```no_run
/// use scrape_dl::config::ApifyConfig;
/// use scrape_dl::scraper::{ApifyClient, MetadataScraper};
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ApifyConfig {
///     token: "apify_api_xxx".to_string(),
///     ..Default::default()
/// };
/// let client = ApifyClient::from_config(config)?;
///
/// let cancel = CancellationToken::new();
/// let result = client
///     .scrape("https://www.tiktok.com/@user/video/1234567890", &cancel)
///     .await?;
/// println!("{} bytes of metadata", result.raw_metadata.len());
/// # Ok(())
/// # }
/// ```
pub struct ApifyClient {
    http: reqwest::Client,
    config: ApifyConfig,
    base: Url,
}

impl ApifyClient {
    /// Create a client from an existing HTTP client
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the base URL cannot carry path segments.
    pub fn new(http: reqwest::Client, config: ApifyConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| Error::config(format!("invalid base URL: {e}"), "apify.base_url"))?;
        if base.cannot_be_a_base() {
            return Err(Error::config(
                format!("base URL {} cannot hold API paths", config.base_url),
                "apify.base_url",
            ));
        }
        Ok(Self { http, config, base })
    }

    /// Create a client with its own HTTP client using the configured timeout
    pub fn from_config(config: ApifyConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Self::new(http, config)
    }

    /// Build `<base>/<segments...>?token=<token>`
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config("base URL cannot hold API paths", "apify.base_url"))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().append_pair("token", &self.config.token);
        Ok(url)
    }

    /// Actor input for `platform`
    ///
    /// Each actor expects a different shape; both are capped at one result.
    pub fn build_input(platform: Platform, page_url: &str) -> Option<Value> {
        match platform {
            Platform::YouTube => Some(json!({
                "startUrls": [{ "url": page_url }],
                "maxResults": 1,
            })),
            Platform::TikTok => Some(json!({
                "postURLs": [page_url],
                "resultsPerPage": 1,
            })),
            Platform::Unsupported => None,
        }
    }

    /// Start an actor run for `page_url` and return its run ID
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskStart`] with status and body unless the service
    /// answers `201 Created`.
    pub async fn start_run(
        &self,
        platform: Platform,
        page_url: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let unsupported = || Error::UnsupportedPlatform {
            url: page_url.to_string(),
        };
        let actor_id = self.config.actor_id(platform).ok_or_else(unsupported)?;
        let input = Self::build_input(platform, page_url).ok_or_else(unsupported)?;
        let url = self.endpoint(&["acts", actor_id, "runs"])?;

        with_cancel(cancel, async {
            let response = self.http.post(url).json(&input).send().await?;
            let status = response.status();
            if status != StatusCode::CREATED {
                let body = body_for_diagnostics(response).await;
                return Err(Error::TaskStart { status, body });
            }
            let created: Envelope<CreatedRun> = response.json().await?;
            Ok(created.data.id)
        })
        .await
    }

    /// Query the current state of a run
    pub async fn run_status(
        &self,
        run_id: &str,
        cancel: &CancellationToken,
    ) -> Result<RemoteTaskRun> {
        let url = self.endpoint(&["actor-runs", run_id])?;

        with_cancel(cancel, async {
            let response = self.http.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = body_for_diagnostics(response).await;
                return Err(Error::UnexpectedResponse {
                    endpoint: "run status",
                    status,
                    body,
                });
            }
            let run: Envelope<RemoteTaskRun> = response.json().await?;
            Ok(run.data)
        })
        .await
    }

    /// Poll a run until it reaches a terminal state and return its dataset ID
    ///
    /// Waits one poll interval before every status query. There is no poll
    /// limit; the caller bounds the wait through `cancel`, which is observed
    /// during every wait and every request.
    ///
    /// # Errors
    ///
    /// - [`Error::TaskFailed`] for FAILED, ABORTED and TIMED-OUT runs
    /// - [`Error::Cancelled`] if `cancel` fires
    pub async fn wait_for_run(&self, run_id: &str, cancel: &CancellationToken) -> Result<String> {
        let mut polls: u64 = 0;
        loop {
            cancellable_sleep(cancel, self.config.poll_interval).await?;
            polls += 1;

            let run = self.run_status(run_id, cancel).await?;
            match run.status {
                RunStatus::Succeeded => {
                    tracing::debug!(run_id, polls, "actor run succeeded");
                    return run.dataset_id.filter(|id| !id.is_empty()).ok_or_else(|| {
                        Error::UnexpectedResponse {
                            endpoint: "run status",
                            status: StatusCode::OK,
                            body: "SUCCEEDED run has no defaultDatasetId".to_string(),
                        }
                    });
                }
                status if status.is_failure() => {
                    tracing::warn!(run_id, %status, "actor run failed");
                    return Err(Error::TaskFailed {
                        run_id: run_id.to_string(),
                        status,
                    });
                }
                status => {
                    tracing::trace!(run_id, %status, polls, "actor run still in progress");
                }
            }
        }
    }

    /// Fetch a dataset's items as raw bytes, without parsing them
    pub async fn fetch_dataset_items(
        &self,
        dataset_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>> {
        let url = self.endpoint(&["datasets", dataset_id, "items"])?;

        with_cancel(cancel, async {
            let response = self.http.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = body_for_diagnostics(response).await;
                return Err(Error::UnexpectedResponse {
                    endpoint: "dataset items",
                    status,
                    body,
                });
            }
            Ok(response.bytes().await?.to_vec())
        })
        .await
    }
}

#[async_trait]
impl MetadataScraper for ApifyClient {
    async fn scrape(&self, page_url: &str, cancel: &CancellationToken) -> Result<ScrapeResult> {
        let platform = classify(page_url);
        if !platform.is_supported() {
            return Err(Error::UnsupportedPlatform {
                url: page_url.to_string(),
            });
        }

        let run_id = self.start_run(platform, page_url, cancel).await?;
        tracing::info!(%platform, run_id, "actor run started");

        let dataset_id = self.wait_for_run(&run_id, cancel).await?;
        let raw_metadata = self.fetch_dataset_items(&dataset_id, cancel).await?;
        tracing::info!(
            run_id,
            dataset_id,
            bytes = raw_metadata.len(),
            "dataset items fetched"
        );

        let video_url = match extract_video_url(&raw_metadata) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::debug!(%platform, error = %e, "no video URL in scraped metadata");
                None
            }
        };

        Ok(ScrapeResult {
            raw_metadata,
            video_url,
        })
    }

    fn name(&self) -> &'static str {
        "apify"
    }
}
