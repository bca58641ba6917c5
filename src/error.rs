//! Error types for the discovery pipeline
//!
//! External collaborators fail with [`SourceError`]; those failures are
//! recovered locally by the pipeline and aggregator. Only quota exhaustion
//! escalates into a [`DiscoveryError`] that reaches the caller.

use thiserror::Error;

/// Failure of a single call to an external source
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SourceError {
    /// Network failure or the source is down
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Non-success HTTP status that is not a quota rejection
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// Every configured credential was rejected by the provider
    #[error("Provider quota exhausted for all configured credentials")]
    QuotaExhausted,

    /// Payload could not be parsed at all
    #[error("Parse error: {0}")]
    Parse(String),
}

impl SourceError {
    /// Whether this failure must abort the whole generation request
    pub fn is_fatal(&self) -> bool {
        matches!(self, SourceError::QuotaExhausted)
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else if err.is_decode() {
            SourceError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            SourceError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            SourceError::Unavailable(err.to_string())
        }
    }
}

/// Invalid configuration values
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Scoring weights must sum to 1.0 (got {0:.4})")]
    WeightsDoNotSumToOne(f64),

    #[error("Scoring weight '{0}' must be within [0, 1]")]
    WeightOutOfRange(&'static str),

    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors surfaced to callers of the top-level operations
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The one user-actionable generation failure
    #[error("Video provider quota exhausted. Please try again later or refresh the API credentials.")]
    QuotaExhausted,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invariant violation: a plan was assembled with no sections
    #[error("Assembled plan for '{0}' has no sections")]
    EmptyPlan(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_quota_is_fatal() {
        assert!(SourceError::QuotaExhausted.is_fatal());
        assert!(!SourceError::Unavailable("down".to_string()).is_fatal());
        assert!(!SourceError::Timeout.is_fatal());
        assert!(!SourceError::Http { status: 500, message: "oops".to_string() }.is_fatal());
    }

    #[test]
    fn test_quota_message_is_actionable() {
        let err = DiscoveryError::QuotaExhausted;
        assert!(err.to_string().contains("try again later"));
    }
}
