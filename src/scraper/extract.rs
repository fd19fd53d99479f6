//! Best-effort video URL probing over raw result sets

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Direct video URL keys, tried in order on the first result record
const VIDEO_URL_FIELDS: &[&str] = &[
    "videoUrl",
    "video_url",
    "downloadUrl",
    "download_url",
    "videoPlayUrl",
];

/// Extract a direct video URL from a raw result set
///
/// The bytes must be a JSON array of objects. Only the first record is probed:
/// the known URL keys are tried in order and the first non-empty string wins.
/// Failing that, the `url` of the last entry of a `formats` array is used.
///
/// # Errors
///
/// - [`Error::Serialization`] if the bytes are not a JSON array of objects
/// - [`Error::NoResults`] if the array is empty
/// - [`Error::VideoUrlNotFound`] if no candidate field holds a URL
///
/// # Examples
///
/// ```
/// use scrape_dl::scraper::extract_video_url;
///
/// let raw = br#"[{"formats":[{"url":"a"},{"url":"b"}]}]"#;
/// assert_eq!(extract_video_url(raw).unwrap(), "b");
/// ```
pub fn extract_video_url(raw: &[u8]) -> Result<String> {
    let items: Vec<Map<String, Value>> = serde_json::from_slice(raw)?;
    let first = items.first().ok_or(Error::NoResults)?;

    if let Some(url) = VIDEO_URL_FIELDS
        .iter()
        .find_map(|field| non_empty_str(first.get(*field)))
    {
        return Ok(url.to_string());
    }

    first
        .get("formats")
        .and_then(Value::as_array)
        .and_then(|formats| formats.last())
        .and_then(Value::as_object)
        .and_then(|format| non_empty_str(format.get("url")))
        .map(str::to_string)
        .ok_or(Error::VideoUrlNotFound)
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
