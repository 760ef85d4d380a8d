//! Scenario tests for the collector: retry policy, numeric edge cases, and
//! the all-or-nothing shape of result records.

use std::time::Duration;

use bantrends_core::data::TrendsError;
use bantrends_core::domain::{FailureKind, Outcome, PercentChange, SeriesSummary};
use bantrends_core::testing::{FixedClock, RecordingSleeper, ScriptedProvider};
use bantrends_core::{CollectorConfig, TrendCollector};

const RETRY_DELAY: Duration = Duration::from_secs(20);
const WINDOW_DELAY: Duration = Duration::from_secs(12);

fn run(
    script: Vec<Result<Vec<f64>, TrendsError>>,
    subject: &str,
    date: &str,
    max_attempts: u32,
) -> (
    bantrends_core::domain::ComparisonResult,
    ScriptedProvider,
    RecordingSleeper,
) {
    let provider = ScriptedProvider::new(script);
    let sleeper = RecordingSleeper::default();
    let clock = FixedClock::default();
    let result = {
        let collector =
            TrendCollector::new(&provider, &sleeper, &clock, CollectorConfig::default());
        collector.collect(subject, date, max_attempts)
    };
    (result, provider, sleeper)
}

#[test]
fn example_book_scenario() {
    // GIVEN scores [10,20,30] before and [40,50,60] after a 2022-09-01 ban
    let (result, provider, _) = run(
        vec![Ok(vec![10.0, 20.0, 30.0]), Ok(vec![40.0, 50.0, 60.0])],
        "Example Book",
        "2022-09-01",
        3,
    );

    // THEN averages, changes and volatility match the hand-computed values
    let c = result.comparison().expect("collection should succeed");
    assert_eq!(result.subject, "Example Book");
    assert_eq!(result.event_date, "2022-09-01");
    assert_eq!(c.before.average, 20.0);
    assert_eq!(c.after.average, 50.0);
    assert_eq!(c.before.maximum, 30.0);
    assert_eq!(c.after.minimum, 40.0);
    assert_eq!(c.percent_change, PercentChange::Finite(150.0));
    assert_eq!(c.absolute_change, 30.0);
    assert_eq!(c.volatility, 17.08);
    assert_eq!(provider.call_count(), 2);
}

#[test]
fn two_transient_failures_then_success() {
    // GIVEN a provider that fails the first two rounds outright
    let (result, provider, sleeper) = run(
        vec![
            Err(TrendsError::NetworkUnreachable("timeout".into())),
            Err(TrendsError::RateLimited),
            Ok(vec![10.0]),
            Ok(vec![15.0]),
        ],
        "Gender Queer",
        "2022-09-01",
        3,
    );

    // THEN the third round succeeds after exactly two long pauses
    assert!(result.is_success());
    assert_eq!(sleeper.count_of(RETRY_DELAY), 2);
    assert_eq!(sleeper.count_of(WINDOW_DELAY), 1);

    // AND three rounds started, each with a before-window request
    let calls = provider.calls();
    let before_requests = calls
        .iter()
        .filter(|c| c.window.timeframe() == "2022-06-03 2022-08-31")
        .count();
    assert_eq!(before_requests, 3);
    assert_eq!(calls.len(), 4);
}

#[test]
fn after_window_failures_are_full_rounds_too() {
    let (result, provider, sleeper) = run(
        vec![
            Ok(vec![1.0]),
            Err(TrendsError::RateLimited),
            Ok(vec![1.0]),
            Err(TrendsError::RateLimited),
            Ok(vec![1.0]),
            Ok(vec![2.0]),
        ],
        "Book",
        "2022-09-01",
        3,
    );

    assert!(result.is_success());
    assert_eq!(provider.call_count(), 6);
    assert_eq!(sleeper.count_of(RETRY_DELAY), 2);
    assert_eq!(sleeper.count_of(WINDOW_DELAY), 3);
}

#[test]
fn all_attempts_fail_keeps_last_error() {
    let (result, _, sleeper) = run(
        vec![
            Err(TrendsError::NetworkUnreachable("first".into())),
            Err(TrendsError::NetworkUnreachable("second".into())),
            Err(TrendsError::HttpStatus {
                status: 500,
                endpoint: "explore".into(),
            }),
        ],
        "The Bluest Eye",
        "2022-08-20",
        3,
    );

    match &result.outcome {
        Outcome::Failure(f) => {
            assert_eq!(f.kind, FailureKind::ProviderExhausted);
            assert_eq!(f.attempts, 3);
            assert_eq!(f.error, "HTTP 500 from explore");
        }
        Outcome::Success(_) => panic!("expected failure"),
    }
    assert!(result.comparison().is_none());
    // No pause after the final failure
    assert_eq!(sleeper.count_of(RETRY_DELAY), 2);
}

#[test]
fn malformed_date_makes_no_provider_calls() {
    let (result, provider, sleeper) = run(vec![], "Book", "2022-13-40", 3);

    let f = result.failure().expect("malformed date should fail");
    assert_eq!(f.kind, FailureKind::InvalidDateFormat);
    assert_eq!(provider.call_count(), 0);
    assert!(sleeper.recorded().is_empty());
}

#[test]
fn extreme_or_signed_years_fail_without_panicking() {
    for input in ["+262142-12-31", "-262143-01-01", "+2022-09-01", " 2022-09-01"] {
        // GIVEN a date chrono alone would accept but that is not YYYY-MM-DD
        let (result, provider, sleeper) = run(vec![], "Book", input, 3);

        // THEN the record is a zero-attempt date failure and nothing was fetched
        let f = result.failure().expect("non-canonical date should fail");
        assert_eq!(f.kind, FailureKind::InvalidDateFormat, "input {input:?}");
        assert_eq!(f.attempts, 0);
        assert_eq!(result.event_date, input);
        assert_eq!(provider.call_count(), 0);
        assert!(sleeper.recorded().is_empty());
    }
}

#[test]
fn last_representable_year_still_collects() {
    let (result, provider, _) = run(
        vec![Ok(vec![1.0]), Ok(vec![2.0])],
        "Far Future Book",
        "9999-09-01",
        1,
    );

    assert!(result.is_success());
    assert_eq!(provider.call_count(), 2);
}

#[test]
fn empty_window_counts_as_zero_interest_without_retry() {
    let (result, provider, sleeper) = run(
        vec![Ok(vec![]), Ok(vec![8.0, 12.0])],
        "Obscure Book",
        "2023-03-10",
        3,
    );

    let c = result.comparison().expect("empty window must not fail");
    assert_eq!(c.before, SeriesSummary::default());
    assert_eq!(c.percent_change, PercentChange::FromZero);
    assert_eq!(c.absolute_change, 10.0);
    assert_eq!(c.volatility, 2.0);
    assert_eq!(provider.call_count(), 2);
    assert_eq!(sleeper.count_of(RETRY_DELAY), 0);
}

#[test]
fn both_windows_empty_is_zero_change() {
    let (result, _, _) = run(vec![Ok(vec![]), Ok(vec![])], "Book", "2023-03-10", 3);
    let c = result.comparison().unwrap();
    assert_eq!(c.percent_change, PercentChange::Finite(0.0));
    assert_eq!(c.absolute_change, 0.0);
    assert_eq!(c.volatility, 0.0);
}

#[test]
fn geography_comes_from_config() {
    let provider = ScriptedProvider::constant(vec![1.0]);
    let sleeper = RecordingSleeper::default();
    let clock = FixedClock::default();
    let config = CollectorConfig {
        geo: "US-TX".into(),
        ..CollectorConfig::default()
    };
    let collector = TrendCollector::new(&provider, &sleeper, &clock, config);

    let result = collector.collect_subject("Book", "2022-01-10");
    assert!(result.is_success());
    assert!(provider.calls().iter().all(|c| c.geo == "US-TX"));
}

#[test]
fn timestamp_comes_from_injected_clock() {
    let (ok, _, _) = run(vec![Ok(vec![1.0]), Ok(vec![1.0])], "Book", "2022-01-10", 1);
    let (bad, _, _) = run(vec![], "Book", "not a date", 1);
    assert_eq!(ok.collected_at_text(), "2024-01-15 09:30:00");
    assert_eq!(bad.collected_at_text(), "2024-01-15 09:30:00");
}
