//! Sequential collection loop over an input table.
//!
//! Subjects are processed strictly one after another, in input order. Every
//! subject yields exactly one record (the collector never fails outright).
//! Every `checkpoint_every` subjects, everything collected so far is written
//! to the checkpoint path; the final table goes to the output path. The
//! checkpoint is a snapshot for inspection only and is never read back.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use bantrends_core::domain::ComparisonResult;
use bantrends_core::TrendCollector;

use crate::export::{checkpoint_path, write_results_csv};
use crate::subjects::Subject;
use crate::summary::CollectionSummary;

/// A collector result plus the pass-through state label from the input row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectedRecord {
    pub result: ComparisonResult,
    pub state: Option<String>,
}

/// Progress callback for multi-subject runs.
pub trait CollectionProgress {
    /// Called before a subject is collected.
    fn on_start(&self, subject: &Subject, index: usize, total: usize);

    /// Called once the subject's record exists.
    fn on_complete(&self, record: &CollectedRecord, index: usize, total: usize);

    /// Called after a checkpoint snapshot is written.
    fn on_checkpoint(&self, processed: usize, total: usize, path: &Path);

    /// Called when the whole table is done.
    fn on_finish(&self, summary: &CollectionSummary);
}

/// Progress reporter that does nothing.
pub struct SilentProgress;

impl CollectionProgress for SilentProgress {
    fn on_start(&self, _subject: &Subject, _index: usize, _total: usize) {}
    fn on_complete(&self, _record: &CollectedRecord, _index: usize, _total: usize) {}
    fn on_checkpoint(&self, _processed: usize, _total: usize, _path: &Path) {}
    fn on_finish(&self, _summary: &CollectionSummary) {}
}

/// Where a run writes its table and how often it snapshots.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub path: PathBuf,
    pub checkpoint_every: usize,
}

impl RunOutput {
    pub fn new(path: impl Into<PathBuf>, checkpoint_every: usize) -> Self {
        Self {
            path: path.into(),
            checkpoint_every,
        }
    }

    pub fn checkpoint_path(&self) -> PathBuf {
        checkpoint_path(&self.path)
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct CollectionReport {
    pub records: Vec<CollectedRecord>,
    pub summary: CollectionSummary,
    pub output_path: PathBuf,
}

/// Collect every subject and write the output table.
///
/// Only file I/O can fail here; provider trouble ends up inside the records.
pub fn run_collection(
    subjects: &[Subject],
    collector: &TrendCollector<'_>,
    output: &RunOutput,
    progress: &dyn CollectionProgress,
) -> Result<CollectionReport> {
    let total = subjects.len();
    let every = output.checkpoint_every.max(1);
    let mut records = Vec::with_capacity(total);

    let settings = collector.config();
    info!(
        total,
        provider = collector.provider_name(),
        geo = %settings.geo,
        max_attempts = settings.max_attempts,
        output = %output.path.display(),
        "starting collection"
    );

    for (i, subject) in subjects.iter().enumerate() {
        progress.on_start(subject, i, total);

        let result = collector.collect_subject(&subject.title, &subject.event_date);
        let record = CollectedRecord {
            result,
            state: subject.state.clone(),
        };
        progress.on_complete(&record, i, total);
        records.push(record);

        let processed = i + 1;
        if processed % every == 0 {
            let snapshot = output.checkpoint_path();
            write_results_csv(&snapshot, &records)?;
            info!(processed, total, path = %snapshot.display(), "progress saved");
            progress.on_checkpoint(processed, total, &snapshot);
        }
    }

    write_results_csv(&output.path, &records)?;

    let summary = CollectionSummary::from_records(&records);
    info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "collection complete"
    );
    progress.on_finish(&summary);

    Ok(CollectionReport {
        records,
        summary,
        output_path: output.path.clone(),
    })
}
