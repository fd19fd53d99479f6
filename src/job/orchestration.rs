//! Job orchestration -- top-level lifecycle for a single job.

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::JobRunner;
use crate::error::{Error, JobFailure};
use crate::resolver::ResolverStrategy;
use crate::types::{Job, JobResult, JobState};
use crate::utils::with_cancel;

/// A phase failure: the state being entered and the error that stopped it
type PhaseError = (JobState, Error);

fn at(phase: JobState) -> impl FnOnce(Error) -> PhaseError {
    move |error| (phase, error)
}

impl JobRunner {
    /// Run one job for `url` to completion
    ///
    /// Phases, each a precondition for the next:
    /// 1. Classify the URL; unsupported platforms are rejected before any I/O
    /// 2. Create the job directory and write the input record
    /// 3. Scrape metadata and persist it verbatim, before anything else can fail
    /// 4. Resolve a playable video URL with the platform's strategy
    /// 5. Open the video byte stream
    /// 6. Write the video to the job directory
    ///
    /// No phase is retried. Every call allocates a fresh job identity, so
    /// re-running a URL never touches an earlier job's artifacts.
    ///
    /// # Errors
    ///
    /// Returns a [`JobFailure`] naming the failed phase, carrying the error and
    /// the partially populated [`JobResult`].
    pub async fn run(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> std::result::Result<JobResult, JobFailure> {
        let job = Job::new(url);
        let span = tracing::info_span!("job", job_id = %job.id, platform = %job.platform);
        let mut result = JobResult::new(job);

        async {
            tracing::info!(url, "starting job");
            let outcome = self.execute(&mut result, cancel).await;
            finalize(result, outcome)
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        result: &mut JobResult,
        cancel: &CancellationToken,
    ) -> std::result::Result<(), PhaseError> {
        let job = result.job.clone();

        // Created: decide the resolution path up front
        let strategy = ResolverStrategy::for_platform(job.platform).ok_or_else(|| {
            (
                JobState::Created,
                Error::UnsupportedPlatform {
                    url: job.url.clone(),
                },
            )
        })?;

        // Initialized
        let input =
            serde_json::to_vec_pretty(&job).map_err(|e| (JobState::Initialized, Error::from(e)))?;
        let dir = self
            .store
            .init_job(job.id)
            .await
            .map_err(at(JobState::Initialized))?;
        self.store
            .save_input(job.id, &input)
            .await
            .map_err(at(JobState::Initialized))?;
        result.state = JobState::Initialized;
        tracing::debug!(dir = %dir.display(), "job directory ready");

        // MetadataFetched
        tracing::info!(scraper = self.scraper.name(), "scraping metadata");
        let scrape = with_cancel(cancel, self.scraper.scrape(&job.url, cancel))
            .await
            .map_err(at(JobState::MetadataFetched))?;
        let metadata = self
            .store
            .save_metadata(job.id, &scrape.raw_metadata)
            .await
            .map_err(at(JobState::MetadataFetched))?;
        result.metadata_path = Some(metadata.path);
        result.state = JobState::MetadataFetched;
        tracing::info!(bytes = metadata.bytes, "metadata saved");

        if scrape.video_url.is_none() {
            if strategy.relies_on_scraped_url() {
                tracing::warn!(strategy = strategy.name(), "scraped metadata has no video URL");
            } else {
                tracing::debug!(strategy = strategy.name(), "no video URL in metadata, not needed");
            }
        }

        // UrlResolved
        tracing::info!(strategy = strategy.name(), "resolving video URL");
        let video_url = with_cancel(
            cancel,
            strategy.resolve(&job.url, &scrape, self.resolver.as_ref(), cancel),
        )
        .await
        .map_err(at(JobState::UrlResolved))?;
        result.state = JobState::UrlResolved;

        // Downloaded
        tracing::info!(downloader = self.downloader.name(), "downloading video stream");
        let stream = with_cancel(cancel, self.downloader.open(&video_url, cancel))
            .await
            .map_err(at(JobState::Downloaded))?;
        result.state = JobState::Downloaded;

        // Persisted: the store owns and drops the stream on every path
        let video = self
            .store
            .save_video(job.id, stream, cancel)
            .await
            .map_err(at(JobState::Persisted))?;
        result.video_path = Some(video.path);
        result.video_bytes = video.bytes;
        result.state = JobState::Persisted;
        tracing::info!(bytes = video.bytes, "video saved");

        Ok(())
    }
}

/// Stamp the terminal state onto the record
fn finalize(
    mut result: JobResult,
    outcome: std::result::Result<(), PhaseError>,
) -> std::result::Result<JobResult, JobFailure> {
    result.completed_at = Some(Utc::now());
    match outcome {
        Ok(()) => {
            result.success = true;
            tracing::info!(
                video_bytes = result.video_bytes,
                "job completed successfully"
            );
            Ok(result)
        }
        Err((phase, source)) => {
            let message = format!("{phase}: {source}");
            if matches!(source, Error::Cancelled) {
                tracing::warn!(%phase, "job cancelled");
            } else {
                tracing::error!(%phase, error = %source, "job failed");
            }
            result.state = JobState::Failed;
            result.success = false;
            result.error_message = Some(message);
            Err(JobFailure {
                phase,
                source,
                result: Box::new(result),
            })
        }
    }
}
