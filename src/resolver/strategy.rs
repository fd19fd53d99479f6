//! Per-platform choice of how a playable video URL is obtained

use tokio_util::sync::CancellationToken;

use super::traits::UrlResolverTool;
use crate::error::{Error, Result};
use crate::scraper::extract_video_url;
use crate::types::{Platform, ScrapeResult};

/// How a job turns its page URL into a downloadable video URL
///
/// Selected once from the platform tag. Each platform has exactly one path and
/// there is no fallback between them within a job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolverStrategy {
    /// Ask the external tool; the scraped metadata is not consulted
    ExternalTool,
    /// Use the URL found in the scraped metadata
    ScrapedMetadata,
}

impl ResolverStrategy {
    /// Strategy for `platform`, or `None` for unsupported platforms
    pub fn for_platform(platform: Platform) -> Option<Self> {
        match platform {
            // the YouTube actor does not return reliable direct links
            Platform::YouTube => Some(ResolverStrategy::ExternalTool),
            Platform::TikTok => Some(ResolverStrategy::ScrapedMetadata),
            Platform::Unsupported => None,
        }
    }

    /// Whether a missing scraped video URL fails the job
    ///
    /// Platforms resolved through the external tool tolerate metadata without
    /// a video URL.
    pub fn relies_on_scraped_url(&self) -> bool {
        matches!(self, ResolverStrategy::ScrapedMetadata)
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            ResolverStrategy::ExternalTool => "external-tool",
            ResolverStrategy::ScrapedMetadata => "scraped-metadata",
        }
    }

    /// Produce exactly one playable URL
    ///
    /// # Errors
    ///
    /// - `ExternalTool`: whatever the tool reports, or [`Error::Resolution`] for empty output
    /// - `ScrapedMetadata`: [`Error::NoResults`] or [`Error::VideoUrlNotFound`] describing
    ///   why the metadata holds no URL
    pub async fn resolve(
        &self,
        page_url: &str,
        scrape: &ScrapeResult,
        tool: &dyn UrlResolverTool,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let url = match self {
            ResolverStrategy::ExternalTool => tool.resolve_url(page_url, cancel).await?,
            ResolverStrategy::ScrapedMetadata => match scrape.video_url.as_deref() {
                Some(url) if !url.is_empty() => url.to_string(),
                // re-probe so the error names the exact reason
                _ => extract_video_url(&scrape.raw_metadata)?,
            },
        };

        if url.trim().is_empty() {
            return Err(Error::Resolution(format!(
                "{} strategy produced an empty URL",
                self.name()
            )));
        }
        Ok(url)
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubTool {
        answer: &'static str,
        calls: AtomicUsize,
    }

    impl StubTool {
        fn new(answer: &'static str) -> Self {
            Self {
                answer,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl UrlResolverTool for StubTool {
        async fn resolve_url(&self, _page_url: &str, _cancel: &CancellationToken) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer.to_string())
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    fn scrape(raw: &[u8], video_url: Option<&str>) -> ScrapeResult {
        ScrapeResult {
            raw_metadata: raw.to_vec(),
            video_url: video_url.map(str::to_string),
        }
    }

    #[test]
    fn strategy_follows_platform() {
        assert_eq!(
            ResolverStrategy::for_platform(Platform::YouTube),
            Some(ResolverStrategy::ExternalTool)
        );
        assert_eq!(
            ResolverStrategy::for_platform(Platform::TikTok),
            Some(ResolverStrategy::ScrapedMetadata)
        );
        assert_eq!(ResolverStrategy::for_platform(Platform::Unsupported), None);
    }

    #[test]
    fn only_scraped_metadata_relies_on_scraped_url() {
        assert!(ResolverStrategy::ScrapedMetadata.relies_on_scraped_url());
        assert!(!ResolverStrategy::ExternalTool.relies_on_scraped_url());
    }

    #[tokio::test]
    async fn external_tool_ignores_scraped_url() {
        let tool = StubTool::new("https://tool/video.mp4");

        let url = ResolverStrategy::ExternalTool
            .resolve(
                "https://youtu.be/abc",
                &scrape(b"[]", Some("https://scraped/video.mp4")),
                &tool,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(url, "https://tool/video.mp4");
        assert_eq!(tool.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn external_tool_empty_answer_is_resolution_error() {
        let tool = StubTool::new("   ");

        let err = ResolverStrategy::ExternalTool
            .resolve("https://youtu.be/abc", &scrape(b"[]", None), &tool, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Resolution(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn scraped_metadata_never_calls_tool() {
        let tool = StubTool::new("https://tool/video.mp4");

        let url = ResolverStrategy::ScrapedMetadata
            .resolve(
                "https://tiktok.com/@u/video/1",
                &scrape(b"[]", Some("https://scraped/video.mp4")),
                &tool,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(url, "https://scraped/video.mp4");
        assert_eq!(tool.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn scraped_metadata_reports_why_url_is_missing() {
        let tool = StubTool::new("unused");
        let cancel = CancellationToken::new();

        let empty = ResolverStrategy::ScrapedMetadata
            .resolve("https://tiktok.com/@u/video/1", &scrape(b"[]", None), &tool, &cancel)
            .await
            .unwrap_err();
        let no_url = ResolverStrategy::ScrapedMetadata
            .resolve(
                "https://tiktok.com/@u/video/1",
                &scrape(br#"[{"text":"hi"}]"#, None),
                &tool,
                &cancel,
            )
            .await
            .unwrap_err();

        assert!(matches!(empty, Error::NoResults), "got {empty:?}");
        assert!(matches!(no_url, Error::VideoUrlNotFound), "got {no_url:?}");
    }
}
