//! Trends provider trait and structured error types.
//!
//! The TrendsProvider trait abstracts over search-interest sources (the live
//! Google Trends endpoint, scripted stubs) so the collector can be driven
//! deterministically in tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::TimeWindow;

/// One point of a search-interest series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    /// Relative interest, 0–100 in the provider's convention.
    pub score: f64,
}

/// Structured error types for provider requests.
///
/// Every variant is treated as transient by the collector; the provider
/// itself never retries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrendsError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (HTTP 429)")]
    RateLimited,

    #[error("HTTP {status} from {endpoint}")]
    HttpStatus { status: u16, endpoint: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("trends error: {0}")]
    Other(String),
}

/// Trait for search-interest providers.
pub trait TrendsProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the interest series for `subject` over `window` in `geo`.
    ///
    /// An empty vector means the provider has no data for the window; that is
    /// a valid answer, not an error.
    fn fetch(
        &self,
        subject: &str,
        window: &TimeWindow,
        geo: &str,
    ) -> Result<Vec<Observation>, TrendsError>;
}
