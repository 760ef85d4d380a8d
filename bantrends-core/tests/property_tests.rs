//! Property tests for collector invariants.
//!
//! Uses proptest to verify:
//! 1. Window geometry — both windows 90 days, 2-day gap around the event
//! 2. Percent change — finite formula, zero-to-zero, and from-zero cases
//! 3. Record shape — numbers all present on success, all absent on failure

use bantrends_core::data::TrendsError;
use bantrends_core::domain::{compute_windows, PercentChange, TrendComparison, WINDOW_DAYS};
use bantrends_core::stats::round2;
use bantrends_core::testing::{FixedClock, RecordingSleeper, ScriptedProvider};
use bantrends_core::{CollectorConfig, TrendCollector};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    // 1990-01-01 .. ~2060
    (0i64..25_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + Duration::days(offset)
    })
}

fn arb_scores() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((0u8..=100).prop_map(f64::from), 0..20)
}

fn arb_positive_scores() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((1u8..=100).prop_map(f64::from), 1..20)
}

// ── 1. Window geometry ───────────────────────────────────────────────

proptest! {
    #[test]
    fn windows_are_ninety_days_with_two_day_gap(event in arb_date()) {
        let (before, after) = compute_windows(event).unwrap();
        prop_assert_eq!((after.start - before.end).num_days(), 2);
        prop_assert_eq!(before.len_days(), WINDOW_DAYS);
        prop_assert_eq!(after.len_days(), WINDOW_DAYS);
        prop_assert_eq!(before.end + Duration::days(1), event);
        prop_assert_eq!(after.start - Duration::days(1), event);
    }
}

// ── 2. Percent change ────────────────────────────────────────────────

proptest! {
    #[test]
    fn finite_change_when_before_has_interest(
        before in arb_positive_scores(),
        after in arb_scores(),
    ) {
        let c = TrendComparison::from_scores(&before, &after);
        let b = before.iter().sum::<f64>() / before.len() as f64;
        let a = if after.is_empty() { 0.0 } else { after.iter().sum::<f64>() / after.len() as f64 };
        prop_assert_eq!(c.percent_change, PercentChange::Finite(round2((a - b) / b * 100.0)));
        prop_assert_eq!(c.absolute_change, round2(a - b));
    }

    #[test]
    fn from_zero_when_only_after_has_interest(after in arb_positive_scores()) {
        let c = TrendComparison::from_scores(&[], &after);
        prop_assert_eq!(c.percent_change, PercentChange::FromZero);
        prop_assert_eq!(c.absolute_change, c.after.average);
    }

    #[test]
    fn volatility_is_never_negative(before in arb_scores(), after in arb_scores()) {
        let c = TrendComparison::from_scores(&before, &after);
        prop_assert!(c.volatility >= 0.0);
        prop_assert!(c.volatility <= 50.0);
    }
}

// ── 3. Record shape ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn outcome_matches_failure_count(failures in 0usize..5, max_attempts in 1u32..5) {
        let mut script: Vec<Result<Vec<f64>, TrendsError>> =
            (0..failures).map(|_| Err(TrendsError::RateLimited)).collect();
        script.push(Ok(vec![10.0]));
        script.push(Ok(vec![20.0]));

        let provider = ScriptedProvider::new(script);
        let sleeper = RecordingSleeper::default();
        let clock = FixedClock::default();
        let collector = TrendCollector::new(&provider, &sleeper, &clock, CollectorConfig::default());
        let result = collector.collect("Book", "2022-09-01", max_attempts);

        let should_succeed = failures < max_attempts as usize;
        prop_assert_eq!(result.is_success(), should_succeed);
        prop_assert_eq!(result.comparison().is_some(), should_succeed);
        prop_assert_eq!(result.failure().is_some(), !should_succeed);
    }
}
