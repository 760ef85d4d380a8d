//! Domain types: comparison windows, series summaries, result records.

pub mod comparison;
pub mod summary;
pub mod window;

pub use comparison::{CollectionFailure, ComparisonResult, FailureKind, Outcome, TIMESTAMP_FORMAT};
pub use summary::{PercentChange, SeriesSummary, TrendComparison};
pub use window::{
    compute_windows, parse_event_date, InvalidDate, TimeWindow, DATE_FORMAT, WINDOW_DAYS,
};
