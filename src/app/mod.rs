//! Application layer: assembling and running one experiment.
//!
//! An [`Experiment`] owns everything a run needs: the agent, the environment
//! and the Q-table sized to that environment. It is built from a validated
//! [`RunConfig`], trains, evaluates once with a frozen agent and writes the
//! result files.
//!
//! # Usage
//!
//! ```no_run
//! use tabular_rl::{app::Experiment, pipeline::MetricsObserver};
//!
//! let mut experiment = Experiment::from_file("maze.conf")?;
//! let report = experiment.run(vec![Box::new(MetricsObserver::new())])?;
//! experiment.save_outputs(&report)?;
//! # Ok::<(), tabular_rl::Error>(())
//! ```

pub mod config;
pub mod key_value;

use std::path::Path;

use serde::Serialize;
use tracing::info;

pub use config::{RunConfig, keys};
pub use key_value::KeyValueConfig;

use crate::{
    Result,
    export::{save_returns, save_trajectory},
    pipeline::{History, MetricsSummary, TrainingConfig, TrainingPipeline, TrainingResult},
    ports::{Agent, Environment, Observer, TdParams},
    q_learning::QTable,
};

/// Outcome of [`Experiment::run`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentReport {
    pub training: TrainingResult,
    /// Full trajectory of the frozen evaluation episode
    pub evaluation: History,
    /// Whether the evaluation episode ended in success
    pub evaluation_success: bool,
}

/// JSON-friendly description of a finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub agent: String,
    pub environment: String,
    pub state_size: usize,
    pub action_size: usize,
    pub table_size: usize,
    pub params: TdParams,
    pub training: TrainingConfig,
    pub seed: Option<u64>,
    pub episodes_run: usize,
    pub successes: usize,
    pub stopped_early: bool,
    pub mean_return: f64,
    pub final_return: Option<f64>,
    pub evaluation_return: f64,
    pub evaluation_steps: usize,
    pub evaluation_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsSummary>,
}

/// One agent, one environment, one Q-table
pub struct Experiment {
    config: RunConfig,
    agent: Box<dyn Agent>,
    environment: Box<dyn Environment>,
    q_table: QTable,
}

impl Experiment {
    /// Build every component described by `config`.
    pub fn from_config(config: RunConfig) -> Result<Self> {
        let environment = config.environment.build()?;
        let agent = config.agent.build(config.params, config.seed);
        let q_table = QTable::new(
            environment.state_size(),
            environment.action_size(),
            config.q_init,
        )?;
        Ok(Self {
            config,
            agent,
            environment,
            q_table,
        })
    }

    /// Load a configuration file and build the experiment.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_config(RunConfig::from_file(path)?)
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn agent(&self) -> &dyn Agent {
        self.agent.as_ref()
    }

    pub fn environment(&self) -> &dyn Environment {
        self.environment.as_ref()
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Train for the configured number of episodes, then evaluate once.
    pub fn run(&mut self, observers: Vec<Box<dyn Observer>>) -> Result<ExperimentReport> {
        info!(
            agent = self.agent.name(),
            environment = self.environment.name(),
            states = self.q_table.state_size(),
            actions = self.q_table.action_size(),
            episodes = self.config.training.max_episode,
            seed = ?self.config.seed,
            "experiment started"
        );

        let mut pipeline = observers
            .into_iter()
            .fold(TrainingPipeline::new(self.config.training), |pipeline, observer| {
                pipeline.with_observer(observer)
            });

        let training = pipeline.run(
            self.agent.as_mut(),
            self.environment.as_mut(),
            &mut self.q_table,
        )?;
        let evaluation = pipeline.evaluate(
            self.agent.as_mut(),
            self.environment.as_mut(),
            &mut self.q_table,
        )?;
        let evaluation_success = self.environment.is_finish() && self.environment.is_success();

        info!(
            evaluation_return = evaluation.total_return(),
            evaluation_success, "experiment finished"
        );
        Ok(ExperimentReport {
            training,
            evaluation,
            evaluation_success,
        })
    }

    /// Write the returns file and the evaluation trajectory.
    pub fn save_outputs(&self, report: &ExperimentReport) -> Result<()> {
        save_returns(&report.training.returns, &self.config.returns_path)?;
        save_trajectory(&report.evaluation, &self.config.history_path)?;
        info!(
            returns = %self.config.returns_path.display(),
            history = %self.config.history_path.display(),
            "outputs written"
        );
        Ok(())
    }

    /// Describe a finished run.
    pub fn summary(&self, report: &ExperimentReport, metrics: Option<MetricsSummary>) -> RunSummary {
        RunSummary {
            agent: self.agent.name().to_string(),
            environment: self.environment.name().to_string(),
            state_size: self.q_table.state_size(),
            action_size: self.q_table.action_size(),
            table_size: self.q_table.size(),
            params: self.config.params,
            training: self.config.training,
            seed: self.config.seed,
            episodes_run: report.training.episodes_run,
            successes: report.training.successes,
            stopped_early: report.training.stopped_early,
            mean_return: report.training.mean_return(),
            final_return: report.training.final_return(),
            evaluation_return: report.evaluation.total_return(),
            evaluation_steps: report.evaluation.len().saturating_sub(1),
            evaluation_success: report.evaluation_success,
            metrics,
        }
    }
}
