//! External video sources
//!
//! The pipeline only sees the [`VideoSource`] trait: a keyword search
//! returning raw listings and a batch enrichment call keyed by listing id.

pub mod offline;
pub mod rate_limit;
pub mod youtube;

pub use offline::OfflineSource;
pub use rate_limit::RateLimiter;
pub use youtube::{YouTubeClient, YouTubeConfig};

use async_trait::async_trait;

use crate::error::SourceError;
use crate::media::{Enrichment, RawListing};

/// A provider of searchable learning videos
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Keyword search returning at most `max_results` listings
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawListing>, SourceError>;

    /// Statistics, duration and full description for a set of ids.
    ///
    /// Ids the provider does not know are simply absent from the result.
    async fn enrich(&self, ids: &[String]) -> Result<Vec<Enrichment>, SourceError>;

    /// Short name used in logs
    fn name(&self) -> &str;
}
