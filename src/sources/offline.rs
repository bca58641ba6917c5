use async_trait::async_trait;

use super::VideoSource;
use crate::error::SourceError;
use crate::media::{Enrichment, RawListing};

/// Source that is never reachable, producing fully synthetic plans
#[derive(Debug, Clone, Default)]
pub struct OfflineSource;

#[async_trait]
impl VideoSource for OfflineSource {
    async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<RawListing>, SourceError> {
        Err(SourceError::Unavailable("offline mode".to_string()))
    }

    async fn enrich(&self, _ids: &[String]) -> Result<Vec<Enrichment>, SourceError> {
        Err(SourceError::Unavailable("offline mode".to_string()))
    }

    fn name(&self) -> &str {
        "offline"
    }
}
