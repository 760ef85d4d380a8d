//! Per-window summaries and cross-window change metrics.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::stats::{mean, population_std_dev, round2};

/// Average, maximum, and minimum of one window's interest scores.
///
/// An empty series summarizes to all zeros: no observations means zero
/// interest, not unknown interest.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub average: f64,
    pub maximum: f64,
    pub minimum: f64,
}

impl SeriesSummary {
    pub fn from_scores(scores: &[f64]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }
        let maximum = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let minimum = scores.iter().copied().fold(f64::INFINITY, f64::min);
        Self {
            average: mean(scores),
            maximum,
            minimum,
        }
    }

    pub fn rounded(&self) -> Self {
        Self {
            average: round2(self.average),
            maximum: round2(self.maximum),
            minimum: round2(self.minimum),
        }
    }
}

/// Relative change of the after-window average against the before-window average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PercentChange {
    /// Ordinary percent change. Zero when both averages are zero.
    Finite(f64),
    /// Interest appeared where the before-window had none; no finite ratio exists.
    FromZero,
}

impl PercentChange {
    pub fn as_finite(&self) -> Option<f64> {
        match self {
            PercentChange::Finite(v) => Some(*v),
            PercentChange::FromZero => None,
        }
    }

    pub fn is_from_zero(&self) -> bool {
        matches!(self, PercentChange::FromZero)
    }
}

impl fmt::Display for PercentChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentChange::Finite(v) => write!(f, "{v:.2}%"),
            PercentChange::FromZero => f.write_str("new interest (from zero)"),
        }
    }
}

/// Everything a successful collection produces, rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendComparison {
    pub before: SeriesSummary,
    pub after: SeriesSummary,
    pub percent_change: PercentChange,
    pub absolute_change: f64,
    /// Population standard deviation of the pooled before and after scores.
    pub volatility: f64,
}

impl TrendComparison {
    /// Compare two raw score series.
    ///
    /// Changes are computed on the unrounded averages and rounded last.
    pub fn from_scores(before_scores: &[f64], after_scores: &[f64]) -> Self {
        let before = SeriesSummary::from_scores(before_scores);
        let after = SeriesSummary::from_scores(after_scores);

        let (percent_change, absolute_change) = if before.average > 0.0 {
            let delta = after.average - before.average;
            (
                PercentChange::Finite(round2(delta / before.average * 100.0)),
                delta,
            )
        } else if after.average == 0.0 {
            (PercentChange::Finite(0.0), after.average)
        } else {
            (PercentChange::FromZero, after.average)
        };

        let pooled: Vec<f64> = before_scores
            .iter()
            .chain(after_scores.iter())
            .copied()
            .collect();
        let volatility = population_std_dev(&pooled);

        Self {
            before: before.rounded(),
            after: after.rounded(),
            percent_change,
            absolute_change: round2(absolute_change),
            volatility: round2(volatility),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_is_zero_interest() {
        let s = SeriesSummary::from_scores(&[]);
        assert_eq!(s, SeriesSummary { average: 0.0, maximum: 0.0, minimum: 0.0 });
    }

    #[test]
    fn summary_of_weekly_scores() {
        let s = SeriesSummary::from_scores(&[12.0, 100.0, 0.0, 41.0]);
        assert_eq!(s.maximum, 100.0);
        assert_eq!(s.minimum, 0.0);
        assert!((s.average - 38.25).abs() < 1e-9);
    }

    #[test]
    fn rising_interest() {
        let c = TrendComparison::from_scores(&[10.0, 20.0, 30.0], &[40.0, 50.0, 60.0]);
        assert_eq!(c.before.average, 20.0);
        assert_eq!(c.after.average, 50.0);
        assert_eq!(c.percent_change, PercentChange::Finite(150.0));
        assert_eq!(c.absolute_change, 30.0);
        assert_eq!(c.volatility, 17.08);
    }

    #[test]
    fn nothing_to_nothing_is_zero_change() {
        let c = TrendComparison::from_scores(&[], &[]);
        assert_eq!(c.percent_change, PercentChange::Finite(0.0));
        assert_eq!(c.absolute_change, 0.0);
        assert_eq!(c.volatility, 0.0);
    }

    #[test]
    fn all_zero_scores_are_not_from_zero() {
        let c = TrendComparison::from_scores(&[0.0, 0.0], &[0.0]);
        assert_eq!(c.percent_change, PercentChange::Finite(0.0));
    }

    #[test]
    fn new_interest_is_tagged_from_zero() {
        let c = TrendComparison::from_scores(&[], &[3.0, 5.0]);
        assert!(c.percent_change.is_from_zero());
        assert_eq!(c.absolute_change, 4.0);
        assert_eq!(c.volatility, 1.0);
    }

    #[test]
    fn falling_interest_rounds_to_cents() {
        let c = TrendComparison::from_scores(&[30.0, 30.0, 30.0], &[10.0, 10.0, 0.0]);
        // after avg = 6.666..., change = -77.777...%
        assert_eq!(c.after.average, 6.67);
        assert_eq!(c.percent_change, PercentChange::Finite(-77.78));
        assert_eq!(c.absolute_change, -23.33);
    }
}
