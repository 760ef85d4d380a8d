//! BanTrends Runner — collection orchestration on top of `bantrends-core`.
//!
//! This crate provides:
//! - TOML configuration with defaults for every field
//! - Input table loading (book title, ban date, optional state)
//! - The sequential collection loop with periodic checkpoint snapshots
//! - CSV export of the output table
//! - End-of-run summary

pub mod config;
pub mod export;
pub mod pipeline;
pub mod subjects;
pub mod summary;

pub use config::{CollectionConfig, ConfigError, InputConfig};
pub use export::{checkpoint_path, export_results_csv, write_results_csv, OutputRow};
pub use pipeline::{
    run_collection, CollectedRecord, CollectionProgress, CollectionReport, RunOutput,
    SilentProgress,
};
pub use subjects::{load_subjects, read_subjects, sample_subjects, LoadError, Subject};
pub use summary::CollectionSummary;
