use reach_core::Platform;
use thiserror::Error;

/// Errors raised while assembling the scraper. Extraction itself never
/// fails; see [`crate::StrategyOutcome`].
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("identity delay range is inverted: min {min_ms}ms > max {max_ms}ms")]
    InvalidDelayRange { min_ms: u64, max_ms: u64 },

    #[error("identity pool is empty")]
    EmptyIdentityPool,

    #[error("extractor for {actual} passed where {expected} was expected")]
    ExtractorMismatch { expected: Platform, actual: Platform },
}
