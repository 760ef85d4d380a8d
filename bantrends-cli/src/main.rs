//! BanTrends CLI — collect search interest around book bans.
//!
//! Commands:
//! - `collect` — run the full input table against Google Trends and write the output CSV
//! - `trial` — collect three well-known bans as a quick end-to-end check
//! - `windows` — print the before/after windows for a ban date

mod logging;
mod progress;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use bantrends_core::data::GoogleTrendsClient;
use bantrends_core::domain::{compute_windows, parse_event_date};
use bantrends_core::timing::{SystemClock, ThreadSleeper};
use bantrends_core::TrendCollector;
use bantrends_runner::{
    load_subjects, run_collection, sample_subjects, CollectionConfig, CollectionReport,
    CollectionProgress, RunOutput, Subject,
};

use progress::{BarProgress, TrialProgress};

#[derive(Parser)]
#[command(
    name = "bantrends",
    about = "BanTrends CLI — Google Trends interest before and after book bans"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect every book in the input table and write the output CSV.
    Collect {
        /// Path to a TOML config file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Input CSV (overrides config).
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output CSV (overrides config).
        #[arg(long)]
        output: Option<PathBuf>,

        /// Attempts per book before giving up (overrides config).
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Geographic scope, e.g. US or US-TX (overrides config).
        #[arg(long)]
        geo: Option<String>,

        /// Log file (overrides config).
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Collect three sample bans and save them as a test table.
    Trial {
        /// Output CSV.
        #[arg(long, default_value = "data/raw/test_results.csv")]
        output: PathBuf,

        /// Path to a TOML config file for provider and retry settings.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the comparison windows for a ban date (YYYY-MM-DD).
    Windows {
        /// Ban date.
        date: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Collect {
            config,
            input,
            output,
            max_attempts,
            geo,
            log_file,
        } => {
            let mut config = load_config(config)?;
            if let Some(input) = input {
                config.input.path = input;
            }
            if let Some(output) = output {
                config.output.path = output;
            }
            if let Some(n) = max_attempts {
                config.retry.max_attempts = n;
            }
            if let Some(geo) = geo {
                config.provider.geo = geo;
            }
            if let Some(log_file) = log_file {
                config.logging.file = log_file;
            }
            config.validate()?;
            run_collect(&config)
        }
        Commands::Trial { output, config } => {
            let mut config = load_config(config)?;
            config.output.path = output;
            run_trial(&config)
        }
        Commands::Windows { date } => run_windows(&date),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<CollectionConfig> {
    match path {
        Some(path) => Ok(CollectionConfig::from_file(&path)?),
        None => Ok(CollectionConfig::default()),
    }
}

fn run_collect(config: &CollectionConfig) -> Result<()> {
    let _guard = logging::init(&config.logging.file)?;

    let subjects = load_subjects(&config.input.path, &config.input)?;
    info!(
        input = %config.input.path.display(),
        subjects = subjects.len(),
        "loaded input table"
    );
    println!("Found {} books to process", subjects.len());

    let progress = BarProgress::new(subjects.len())?;
    let report = collect_with_live_provider(config, &subjects, &progress)?;

    print_summary(&report);
    Ok(())
}

fn run_trial(config: &CollectionConfig) -> Result<()> {
    let _guard = logging::init(&config.logging.file)?;

    println!("Running test collection...");
    let report = collect_with_live_provider(config, &sample_subjects(), &TrialProgress)?;
    println!("Test results saved to {}", report.output_path.display());
    Ok(())
}

fn collect_with_live_provider(
    config: &CollectionConfig,
    subjects: &[Subject],
    progress: &dyn CollectionProgress,
) -> Result<CollectionReport> {
    let provider = GoogleTrendsClient::new(config.trends_config())
        .context("failed to set up Google Trends client")?;
    let sleeper = ThreadSleeper;
    let clock = SystemClock;
    let collector = TrendCollector::new(&provider, &sleeper, &clock, config.collector_config());

    let output = RunOutput::new(config.output.path.clone(), config.output.checkpoint_every);
    run_collection(subjects, &collector, &output, progress)
}

fn run_windows(date: &str) -> Result<()> {
    let event = parse_event_date(date)
        .with_context(|| format!("invalid ban date '{date}' (expected YYYY-MM-DD)"))?;
    let (before, after) =
        compute_windows(event).context("ban date is too close to the edge of the calendar")?;
    println!("Ban date: {event}");
    println!("Before:   {before} ({} days)", before.len_days());
    println!("After:    {after} ({} days)", after.len_days());
    Ok(())
}

fn print_summary(report: &CollectionReport) {
    println!();
    println!("=== COLLECTION COMPLETE ===");
    print!("{}", report.summary);
    println!("Results saved to: {}", report.output_path.display());
}
