//! Trend fetch-and-summarize engine.
//!
//! One call to [`TrendCollector::collect`] turns a subject label and an event
//! date into exactly one [`ComparisonResult`]. Each attempt is a full round:
//! fetch the before-window, pause, fetch the after-window, summarize. Provider
//! errors restart the round after a longer pause until the attempt budget is
//! spent. Nothing escapes as an `Err`: malformed dates and exhausted retries
//! both come back as failure records.

use std::time::Duration;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::data::{TrendsError, TrendsProvider};
use crate::domain::{
    compute_windows, parse_event_date, CollectionFailure, ComparisonResult, FailureKind, Outcome,
    TimeWindow, TrendComparison,
};
use crate::timing::{Clock, Sleeper};

/// Default number of full attempt rounds per subject.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Errors the collector absorbs into failure records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollectError {
    #[error("invalid date format for {subject}: {input}")]
    InvalidDateFormat { subject: String, input: String },

    #[error("attempt {attempt} failed: {source}")]
    ProviderTransient {
        attempt: u32,
        #[source]
        source: TrendsError,
    },

    #[error("all {attempts} attempts failed: {last}")]
    ProviderExhausted { attempts: u32, last: TrendsError },
}

/// Retry and pacing policy.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorConfig {
    /// Geographic scope passed to the provider (ISO country code).
    pub geo: String,
    pub max_attempts: u32,
    /// Pause between the before-window and after-window requests.
    pub inter_window_delay: Duration,
    /// Pause before restarting a failed round.
    pub retry_delay: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            geo: "US".into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            inter_window_delay: Duration::from_secs(12),
            retry_delay: Duration::from_secs(20),
        }
    }
}

/// Collects before/after search interest for one subject at a time.
pub struct TrendCollector<'a> {
    provider: &'a dyn TrendsProvider,
    sleeper: &'a dyn Sleeper,
    clock: &'a dyn Clock,
    config: CollectorConfig,
}

impl<'a> TrendCollector<'a> {
    pub fn new(
        provider: &'a dyn TrendsProvider,
        sleeper: &'a dyn Sleeper,
        clock: &'a dyn Clock,
        config: CollectorConfig,
    ) -> Self {
        Self {
            provider,
            sleeper,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Collect using the configured attempt budget.
    pub fn collect_subject(&self, subject: &str, event_date: &str) -> ComparisonResult {
        self.collect(subject, event_date, self.config.max_attempts)
    }

    /// Collect with an explicit attempt budget. A budget of 0 still makes one attempt.
    pub fn collect(&self, subject: &str, event_date: &str, max_attempts: u32) -> ComparisonResult {
        // Windows are fixed for the whole retry loop.
        let windows = parse_event_date(event_date).ok().and_then(compute_windows);
        let Some((before, after)) = windows else {
            let err = CollectError::InvalidDateFormat {
                subject: subject.to_string(),
                input: event_date.to_string(),
            };
            error!(subject, event_date, "{err}");
            return self.failure(
                subject,
                event_date,
                FailureKind::InvalidDateFormat,
                0,
                err.to_string(),
            );
        };
        let max_attempts = max_attempts.max(1);

        let mut attempt = 1;
        loop {
            match self.attempt_round(subject, &before, &after) {
                Ok(comparison) => {
                    info!(subject, attempt, "successfully collected data for {subject}");
                    return ComparisonResult {
                        subject: subject.to_string(),
                        event_date: event_date.to_string(),
                        collected_at: self.clock.now(),
                        outcome: Outcome::Success(comparison),
                    };
                }
                Err(source) if attempt < max_attempts => {
                    let err = CollectError::ProviderTransient { attempt, source };
                    warn!(subject, attempt, "{err} for {subject}; retrying");
                    self.sleeper.sleep(self.config.retry_delay);
                    attempt += 1;
                }
                Err(last) => {
                    let description = last.to_string();
                    let err = CollectError::ProviderExhausted {
                        attempts: attempt,
                        last,
                    };
                    error!(subject, attempts = attempt, "{err} for {subject}");
                    return self.failure(
                        subject,
                        event_date,
                        FailureKind::ProviderExhausted,
                        attempt,
                        description,
                    );
                }
            }
        }
    }

    /// One full round: before-window, pause, after-window, summarize.
    fn attempt_round(
        &self,
        subject: &str,
        before: &TimeWindow,
        after: &TimeWindow,
    ) -> Result<TrendComparison, TrendsError> {
        let before_scores = self.fetch_scores(subject, before)?;
        self.sleeper.sleep(self.config.inter_window_delay);
        let after_scores = self.fetch_scores(subject, after)?;
        Ok(TrendComparison::from_scores(&before_scores, &after_scores))
    }

    fn fetch_scores(&self, subject: &str, window: &TimeWindow) -> Result<Vec<f64>, TrendsError> {
        let observations = self.provider.fetch(subject, window, &self.config.geo)?;
        Ok(observations.into_iter().map(|o| o.score).collect())
    }

    fn failure(
        &self,
        subject: &str,
        event_date: &str,
        kind: FailureKind,
        attempts: u32,
        error: String,
    ) -> ComparisonResult {
        ComparisonResult {
            subject: subject.to_string(),
            event_date: event_date.to_string(),
            collected_at: self.clock.now(),
            outcome: Outcome::Failure(CollectionFailure {
                kind,
                attempts,
                error,
            }),
        }
    }
}
