//! tabular-rl CLI - Tabular Q-learning and SARSA experiments
//!
//! This CLI provides:
//! - Training an agent on a maze or cartpole described by a config file
//! - Evaluating the learned policy and writing returns and trajectories
//! - Inspecting a configuration without training

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tabular-rl")]
#[command(version, about = "Tabular reinforcement learning experiments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train, evaluate and write result files
    Run(tabular_rl::cli::commands::run::RunArgs),

    /// Validate a configuration and print its sizes
    Inspect(tabular_rl::cli::commands::inspect::InspectArgs),
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => tabular_rl::cli::commands::run::execute(args),
        Commands::Inspect(args) => tabular_rl::cli::commands::inspect::execute(args),
    }
}
