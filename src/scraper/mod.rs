//! Remote metadata scraping
//!
//! The core abstraction is the [`MetadataScraper`] trait. [`ApifyClient`]
//! implements it as a three-step remote protocol:
//!
//! 1. start an actor run with a platform-specific input payload
//! 2. poll the run on a fixed interval until it reaches a terminal status
//! 3. fetch the run's dataset as raw bytes
//!
//! [`extract_video_url`] then probes the raw result set for a direct video URL.
//! Probing is best-effort: the raw bytes are persisted whether or not it finds
//! anything.

mod apify;
mod extract;
mod traits;

pub use apify::ApifyClient;
pub use extract::extract_video_url;
pub use traits::MetadataScraper;
