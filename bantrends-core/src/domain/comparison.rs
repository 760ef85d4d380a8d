//! The per-subject result record produced by the collector.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::summary::TrendComparison;

/// Timestamp format for `collected_at` when rendered as text.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Why a collection produced no numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// The event date did not parse; the provider was never called.
    InvalidDateFormat,
    /// Every attempt hit a provider error.
    ProviderExhausted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionFailure {
    pub kind: FailureKind,
    /// Attempts consumed before giving up (0 for a malformed date).
    pub attempts: u32,
    /// Human-readable description; for exhausted retries this is the last
    /// provider error message.
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    Success(TrendComparison),
    Failure(CollectionFailure),
}

/// One record per subject. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub subject: String,
    /// Event date exactly as supplied, even when it failed to parse.
    pub event_date: String,
    pub collected_at: NaiveDateTime,
    pub outcome: Outcome,
}

impl ComparisonResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    pub fn comparison(&self) -> Option<&TrendComparison> {
        match &self.outcome {
            Outcome::Success(c) => Some(c),
            Outcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&CollectionFailure> {
        match &self.outcome {
            Outcome::Success(_) => None,
            Outcome::Failure(f) => Some(f),
        }
    }

    pub fn collected_at_text(&self) -> String {
        self.collected_at.format(TIMESTAMP_FORMAT).to_string()
    }
}
