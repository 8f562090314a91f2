//! Inspect command - Validate a configuration without training

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::Experiment,
    cli::output::{format_number, print_section, print_stats_table},
    environment::EnvironmentConfig,
};

#[derive(Parser, Debug)]
#[command(about = "Load and validate a configuration file")]
pub struct InspectArgs {
    /// KEY=VALUE configuration file
    pub config: PathBuf,
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let experiment = Experiment::from_file(&args.config)
        .with_context(|| format!("Invalid configuration {}", args.config.display()))?;
    let config = experiment.config();
    let table = experiment.q_table();

    print_section(&format!("Configuration {}", args.config.display()));
    print_stats_table(&[
        ("Agent", experiment.agent().name().to_string()),
        ("Alpha", config.params.alpha.to_string()),
        ("Gamma", config.params.gamma.to_string()),
        ("Epsilon", config.params.epsilon.to_string()),
        ("Environment", experiment.environment().name().to_string()),
        ("States", format_number(table.state_size())),
        ("Actions", format_number(table.action_size())),
        ("Table entries", format_number(table.size())),
        ("Initial Q-value", table.init_value().to_string()),
        ("Episodes", format_number(config.training.max_episode)),
        ("Steps/episode", format_number(config.training.max_step)),
        (
            "Early stop",
            config
                .training
                .max_succeeded_episode
                .map_or_else(|| "off".to_string(), |n| format!("after {n} successes")),
        ),
        (
            "Seed",
            config
                .seed
                .map_or_else(|| "entropy".to_string(), |s| s.to_string()),
        ),
        ("Returns file", config.returns_path.display().to_string()),
        ("History file", config.history_path.display().to_string()),
    ]);

    if let EnvironmentConfig::Maze { grid, .. } = &config.environment {
        print_stats_table(&[("Maze size", format!("{}x{}", grid.height(), grid.width()))]);
    }
    Ok(())
}
