//! End-of-run counts and the mean percent change.

use serde::Serialize;
use std::fmt;

use crate::pipeline::CollectedRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectionSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Successful records whose percent change is from zero interest.
    pub from_zero: usize,
    /// Mean over successful, finite percent changes. From-zero records are
    /// counted separately rather than averaged in.
    pub mean_percent_change: Option<f64>,
}

impl CollectionSummary {
    pub fn from_records(records: &[CollectedRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };
        let mut finite = Vec::new();

        for record in records {
            match record.result.comparison() {
                Some(c) => {
                    summary.succeeded += 1;
                    match c.percent_change.as_finite() {
                        Some(v) => finite.push(v),
                        None => summary.from_zero += 1,
                    }
                }
                None => summary.failed += 1,
            }
        }

        if !finite.is_empty() {
            summary.mean_percent_change = Some(finite.iter().sum::<f64>() / finite.len() as f64);
        }
        summary
    }
}

impl fmt::Display for CollectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total books processed:   {}", self.total)?;
        writeln!(f, "Successful collections:  {}", self.succeeded)?;
        writeln!(f, "Failed collections:      {}", self.failed)?;
        match self.mean_percent_change {
            Some(mean) => writeln!(f, "Average percent change:  {mean:.2}%")?,
            None => writeln!(f, "Average percent change:  n/a")?,
        }
        if self.from_zero > 0 {
            writeln!(
                f,
                "New interest (from zero): {} (excluded from the average)",
                self.from_zero
            )?;
        }
        Ok(())
    }
}
