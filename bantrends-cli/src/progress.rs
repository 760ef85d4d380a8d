//! Console progress reporters for the collection loop.

use std::path::Path;

use anyhow::Result;
use bantrends_core::domain::Outcome;
use bantrends_runner::{CollectedRecord, CollectionProgress, CollectionSummary, Subject};
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over subjects for full runs.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new(total: usize) -> Result<Self> {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} Collecting data [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
                .progress_chars("#>-"),
        );
        Ok(Self { bar })
    }
}

impl CollectionProgress for BarProgress {
    fn on_start(&self, subject: &Subject, _index: usize, _total: usize) {
        self.bar.set_message(subject.title.clone());
    }

    fn on_complete(&self, _record: &CollectedRecord, _index: usize, _total: usize) {
        self.bar.inc(1);
    }

    fn on_checkpoint(&self, processed: usize, total: usize, path: &Path) {
        self.bar.println(format!(
            "Progress saved: {processed}/{total} books completed ({})",
            path.display()
        ));
    }

    fn on_finish(&self, _summary: &CollectionSummary) {
        self.bar.finish_with_message("done");
    }
}

/// Line-per-subject reporter for the trial command.
pub struct TrialProgress;

impl CollectionProgress for TrialProgress {
    fn on_start(&self, subject: &Subject, _index: usize, _total: usize) {
        println!("Testing: {}", subject.title);
    }

    fn on_complete(&self, record: &CollectedRecord, _index: usize, _total: usize) {
        match &record.result.outcome {
            Outcome::Success(c) => println!(
                "Result: before avg {:.2}, after avg {:.2}, change {}, volatility {:.2}\n",
                c.before.average, c.after.average, c.percent_change, c.volatility
            ),
            Outcome::Failure(f) => println!("Result: FAILED ({:?}): {}\n", f.kind, f.error),
        }
    }

    fn on_checkpoint(&self, _processed: usize, _total: usize, _path: &Path) {}

    fn on_finish(&self, _summary: &CollectionSummary) {}
}
