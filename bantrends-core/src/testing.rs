//! Deterministic doubles for the provider, sleeper, and clock.
//!
//! Used by unit tests here and by the runner's integration tests.

use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::data::{Observation, TrendsError, TrendsProvider};
use crate::domain::TimeWindow;
use crate::timing::{Clock, Sleeper};

/// A recorded provider request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderCall {
    pub subject: String,
    pub window: TimeWindow,
    pub geo: String,
}

/// Provider that replays a fixed script of responses, one per `fetch`.
///
/// Each scripted `Ok` holds raw scores; observations are dated weekly from
/// the window start. Once the script runs out, the fallback answers (an
/// error unless one was set with [`ScriptedProvider::with_fallback`]).
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<Vec<f64>, TrendsError>>>,
    fallback: Result<Vec<f64>, TrendsError>,
    calls: Mutex<Vec<ProviderCall>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<Vec<f64>, TrendsError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: Err(TrendsError::Other("script exhausted".into())),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Same answer for every request.
    pub fn constant(scores: Vec<f64>) -> Self {
        Self::new(Vec::new()).with_fallback(Ok(scores))
    }

    pub fn with_fallback(mut self, fallback: Result<Vec<f64>, TrendsError>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl TrendsProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn fetch(
        &self,
        subject: &str,
        window: &TimeWindow,
        geo: &str,
    ) -> Result<Vec<Observation>, TrendsError> {
        self.calls.lock().unwrap().push(ProviderCall {
            subject: subject.to_string(),
            window: *window,
            geo: geo.to_string(),
        });

        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        next.map(|scores| {
            scores
                .into_iter()
                .enumerate()
                .map(|(i, score)| Observation {
                    date: window.start + ChronoDuration::weeks(i as i64),
                    score,
                })
                .collect()
        })
    }
}

/// Sleeper that records requested durations and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn recorded(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }

    pub fn count_of(&self, duration: Duration) -> usize {
        self.slept
            .lock()
            .unwrap()
            .iter()
            .filter(|d| **d == duration)
            .count()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Default for FixedClock {
    fn default() -> Self {
        let at = NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .unwrap_or_default();
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
