//! Page URLs, actor payloads and mock remote services

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// TikTok post URL
pub const TIKTOK_URL: &str = "https://www.tiktok.com/@scout2015/video/6718335390845095173";

/// YouTube watch URL
pub const YOUTUBE_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

/// YouTube actor ID used by the test configuration
pub const YOUTUBE_ACTOR: &str = "yt-actor";
/// TikTok actor ID used by the test configuration
pub const TIKTOK_ACTOR: &str = "tt-actor";

/// Token the mock service expects on every call
pub const TEST_TOKEN: &str = "test-token";

/// Dataset items as the TikTok actor returns them
pub fn tiktok_dataset(video_url: &str) -> Vec<u8> {
    serde_json::to_vec(&json!([{
        "id": "6718335390845095173",
        "text": "Scramble up ur name & I'll try to guess it",
        "authorMeta": { "name": "scout2015" },
        "videoMeta": { "duration": 13 },
        "videoUrl": video_url,
    }]))
    .expect("fixture serializes")
}

/// Dataset items as the YouTube actor returns them (no direct media URL)
pub fn youtube_dataset() -> Vec<u8> {
    serde_json::to_vec(&json!([{
        "id": "dQw4w9WgXcQ",
        "title": "Rick Astley - Never Gonna Give You Up",
        "url": YOUTUBE_URL,
        "viewCount": 1_500_000_000u64,
    }]))
    .expect("fixture serializes")
}

/// Deterministic video payload of `len` bytes
pub fn video_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Mount a run of `actor` that is accepted as `run-1`, polled once and finishes
/// with `final_status`, exposing `items` as dataset `ds-1`
pub async fn mount_actor_run(server: &MockServer, actor: &str, final_status: &str, items: Vec<u8>) {
    Mock::given(method("POST"))
        .and(path(format!("/v2/acts/{actor}/runs")))
        .and(query_param("token", TEST_TOKEN))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "data": { "id": "run-1", "status": "READY" } })),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/actor-runs/run-1"))
        .and(query_param("token", TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "run-1",
                "status": final_status,
                "defaultDatasetId": "ds-1",
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/datasets/ds-1/items"))
        .and(query_param("token", TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_raw(items, "application/json"))
        .mount(server)
        .await;
}

/// Mount `body` at `/media/video.mp4` and return its full URL
pub async fn mount_video(server: &MockServer, body: Vec<u8>) -> String {
    Mock::given(method("GET"))
        .and(path("/media/video.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "video/mp4"))
        .mount(server)
        .await;
    format!("{}/media/video.mp4", server.uri())
}
