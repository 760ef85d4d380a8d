//! Output table export (CSV).
//!
//! One row per collected subject. Failure rows leave every numeric cell
//! empty. A percent change from zero interest is written as `inf`, the
//! spelling pandas and most CSV readers parse back as positive infinity.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use bantrends_core::domain::{Outcome, PercentChange};

use crate::pipeline::CollectedRecord;

/// Cell text for a from-zero percent change.
pub const FROM_ZERO_MARKER: &str = "inf";

/// State label written when the input had none.
pub const UNKNOWN_STATE: &str = "Unknown";

/// One output table row, in column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    pub book_title: String,
    pub ban_date: String,
    pub avg_search_before: Option<f64>,
    pub avg_search_after: Option<f64>,
    pub max_search_before: Option<f64>,
    pub max_search_after: Option<f64>,
    pub min_search_before: Option<f64>,
    pub min_search_after: Option<f64>,
    pub percent_change: Option<String>,
    pub absolute_change: Option<f64>,
    pub volatility: Option<f64>,
    pub data_collected: String,
    pub collection_successful: bool,
    pub error: Option<String>,
    pub state: String,
}

impl OutputRow {
    pub fn from_record(record: &CollectedRecord) -> Self {
        let result = &record.result;
        let mut row = Self {
            book_title: result.subject.clone(),
            ban_date: result.event_date.clone(),
            avg_search_before: None,
            avg_search_after: None,
            max_search_before: None,
            max_search_after: None,
            min_search_before: None,
            min_search_after: None,
            percent_change: None,
            absolute_change: None,
            volatility: None,
            data_collected: result.collected_at_text(),
            collection_successful: result.is_success(),
            error: None,
            state: record
                .state
                .clone()
                .unwrap_or_else(|| UNKNOWN_STATE.to_string()),
        };

        match &result.outcome {
            Outcome::Success(c) => {
                row.avg_search_before = Some(c.before.average);
                row.avg_search_after = Some(c.after.average);
                row.max_search_before = Some(c.before.maximum);
                row.max_search_after = Some(c.after.maximum);
                row.min_search_before = Some(c.before.minimum);
                row.min_search_after = Some(c.after.minimum);
                row.percent_change = Some(format_percent(&c.percent_change));
                row.absolute_change = Some(c.absolute_change);
                row.volatility = Some(c.volatility);
            }
            Outcome::Failure(f) => {
                row.error = Some(f.error.clone());
            }
        }
        row
    }
}

fn format_percent(change: &PercentChange) -> String {
    match change {
        // Debug keeps the trailing ".0", matching how the other float cells serialize.
        PercentChange::Finite(v) => format!("{v:?}"),
        PercentChange::FromZero => FROM_ZERO_MARKER.to_string(),
    }
}

/// Render records as CSV text with a header row.
pub fn export_results_csv(records: &[CollectedRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(OutputRow::from_record(record))?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    let text = String::from_utf8(data).context("CSV output is not valid UTF-8")?;
    if text.is_empty() {
        return Ok(header_line());
    }
    Ok(text)
}

/// Write records to `path`, creating parent directories.
pub fn write_results_csv(path: &Path, records: &[CollectedRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output dir: {}", parent.display()))?;
    }
    let csv = export_results_csv(records)?;
    std::fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Partial-snapshot path next to the final output: `results.csv` → `results_temp.csv`.
pub fn checkpoint_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "results".to_string());
    let name = match output.extension() {
        Some(ext) => format!("{stem}_temp.{}", ext.to_string_lossy()),
        None => format!("{stem}_temp"),
    };
    output.with_file_name(name)
}

/// Header row for an empty table (serde only emits headers alongside a record).
fn header_line() -> String {
    [
        "book_title",
        "ban_date",
        "avg_search_before",
        "avg_search_after",
        "max_search_before",
        "max_search_after",
        "min_search_before",
        "min_search_after",
        "percent_change",
        "absolute_change",
        "volatility",
        "data_collected",
        "collection_successful",
        "error",
        "state",
    ]
    .join(",")
        + "\n"
}
