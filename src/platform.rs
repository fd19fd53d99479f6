//! Platform classification by URL host fragment

use crate::types::Platform;

/// Host fragments per platform, checked in order
const HOST_FRAGMENTS: &[(&str, Platform)] = &[
    ("youtube.com", Platform::YouTube),
    ("youtu.be", Platform::YouTube),
    ("tiktok.com", Platform::TikTok),
];

/// Classify a page URL by case-insensitive substring match on known hosts
///
/// Pure and total: never touches the network, never fails. URLs that match no
/// known fragment are [`Platform::Unsupported`].
///
/// # Examples
///
/// ```
/// use scrape_dl::platform::classify;
/// use scrape_dl::Platform;
///
/// assert_eq!(classify("https://youtu.be/abc"), Platform::YouTube);
/// assert_eq!(classify("https://vimeo.com/1"), Platform::Unsupported);
/// ```
#[must_use]
pub fn classify(url: &str) -> Platform {
    let lower = url.to_lowercase();
    HOST_FRAGMENTS
        .iter()
        .find(|(fragment, _)| lower.contains(fragment))
        .map(|(_, platform)| *platform)
        .unwrap_or(Platform::Unsupported)
}
