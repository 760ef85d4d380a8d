//! BanTrends Core — comparison windows, trends provider, and the collector.
//!
//! This crate contains everything needed to turn one (book title, ban date)
//! pair into a before/after search-interest comparison:
//! - Window calculation around the ban date
//! - Provider trait and the live Google Trends client
//! - Series summaries and change metrics
//! - The retrying fetch-and-summarize collector
//! - Injectable sleep/clock capabilities
//! - Deterministic test doubles behind the `testing` feature

pub mod collector;
pub mod data;
pub mod domain;
pub mod stats;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod timing;

pub use collector::{CollectError, CollectorConfig, TrendCollector, DEFAULT_MAX_ATTEMPTS};
