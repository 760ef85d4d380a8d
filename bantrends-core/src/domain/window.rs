//! Before/after comparison windows anchored on an event date.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Textual format every event date must use.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Width of each comparison window in days (inclusive on both ends).
pub const WINDOW_DAYS: i64 = 90;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected a YYYY-MM-DD date, got '{0}'")]
pub struct InvalidDate(pub String);

/// An inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeWindow {
    /// Number of calendar days covered, counting both ends.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Provider timeframe string: `"YYYY-MM-DD YYYY-MM-DD"`.
    pub fn timeframe(&self) -> String {
        format!(
            "{} {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Parse an event date in the fixed `YYYY-MM-DD` form.
///
/// Exactly ten characters with a four-digit year; chrono on its own would
/// also take signed and extended years.
pub fn parse_event_date(text: &str) -> Result<NaiveDate, InvalidDate> {
    let b = text.as_bytes();
    let shaped = b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
    if !shaped {
        return Err(InvalidDate(text.to_string()));
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| InvalidDate(text.to_string()))
}

/// Compute the pre-event and post-event windows.
///
/// `before` ends the day before the event, `after` starts the day after it;
/// the event date itself belongs to neither. `None` when a window would fall
/// outside the representable date range.
pub fn compute_windows(event_date: NaiveDate) -> Option<(TimeWindow, TimeWindow)> {
    let width = Days::new(WINDOW_DAYS as u64);
    let one = Days::new(1);
    let before = TimeWindow {
        start: event_date.checked_sub_days(width)?,
        end: event_date.checked_sub_days(one)?,
    };
    let after = TimeWindow {
        start: event_date.checked_add_days(one)?,
        end: event_date.checked_add_days(width)?,
    };
    Some((before, after))
}
