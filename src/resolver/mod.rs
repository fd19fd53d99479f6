//! Video URL resolution
//!
//! [`ResolverStrategy`] picks, per platform, how a playable URL is obtained:
//! through an external [`UrlResolverTool`] such as [`YtDlpResolver`], or from
//! the URL already found in the scraped metadata.

mod strategy;
mod traits;
mod ytdlp;

pub use strategy::ResolverStrategy;
pub use traits::UrlResolverTool;
pub use ytdlp::YtDlpResolver;
