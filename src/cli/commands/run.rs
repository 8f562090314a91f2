//! Run command - Train an agent, evaluate it and write the result files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::{Experiment, RunConfig},
    cli::output,
    export::save_json_summary,
    pipeline::{MetricsObserver, Observer, ProgressObserver, SharedObserver, TracingObserver},
};

#[derive(Parser, Debug)]
#[command(about = "Train an agent and evaluate the learned policy")]
pub struct RunArgs {
    /// KEY=VALUE configuration file
    pub config: PathBuf,

    /// Random seed (overrides RL_SEED)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,

    /// Log a training summary every N episodes
    #[arg(long, value_name = "N")]
    pub log_every: Option<usize>,

    /// Write a JSON run summary
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,

    /// Returns file (overrides RL_RETURNS_PATH)
    #[arg(long, value_name = "PATH")]
    pub returns: Option<PathBuf>,

    /// Evaluation trajectory file (overrides RL_TEST_HISTORY_PATH)
    #[arg(long, value_name = "PATH")]
    pub history: Option<PathBuf>,

    /// Do not print the results table
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

pub fn execute(args: RunArgs) -> Result<()> {
    let config = load_config(&args)?;
    let mut experiment =
        Experiment::from_config(config).context("Failed to build experiment components")?;

    let metrics = SharedObserver::new(MetricsObserver::new());
    let mut observers: Vec<Box<dyn Observer>> = vec![Box::new(metrics.clone())];
    if args.progress {
        observers.push(Box::new(ProgressObserver::new()));
    }
    if let Some(every) = args.log_every {
        observers.push(Box::new(TracingObserver::new(every)));
    }

    let report = experiment.run(observers).context("Experiment failed")?;
    experiment
        .save_outputs(&report)
        .context("Failed to write result files")?;

    let summary = experiment.summary(&report, Some(metrics.lock().summary()));
    if let Some(path) = &args.summary {
        let path = sanitize_summary_path(path);
        save_json_summary(&summary, &path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
    }
    if !args.quiet {
        output::print_run_summary(&summary);
    }
    Ok(())
}

fn load_config(args: &RunArgs) -> Result<RunConfig> {
    let mut config = RunConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load configuration {}", args.config.display()))?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(path) = &args.returns {
        config = config.with_returns_path(path);
    }
    if let Some(path) = &args.history {
        config = config.with_history_path(path);
    }
    Ok(config)
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no file name: treat as a directory.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("run_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}
