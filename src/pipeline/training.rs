//! Training pipeline: episodes of agent/environment interaction

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::history::{History, StepRecord};
use crate::{
    Error, Result,
    ports::{Agent, Environment, EpisodeSummary, Observer, Transition},
    q_learning::QTable,
};

/// Training configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub max_episode: usize,

    /// Step limit per episode
    pub max_step: usize,

    /// Stop once this many consecutive episodes end in success
    pub max_succeeded_episode: Option<usize>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            max_episode: 1000,
            max_step: 100,
            max_succeeded_episode: None,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Return of every episode, in order
    pub returns: Vec<f64>,

    /// Episodes actually played
    pub episodes_run: usize,

    /// Episodes that ended in success
    pub successes: usize,

    /// Whether the consecutive-success limit cut training short
    pub stopped_early: bool,
}

impl TrainingResult {
    /// Mean return over all episodes
    pub fn mean_return(&self) -> f64 {
        if self.returns.is_empty() {
            0.0
        } else {
            self.returns.iter().sum::<f64>() / self.returns.len() as f64
        }
    }

    /// Return of the last training episode
    pub fn final_return(&self) -> Option<f64> {
        self.returns.last().copied()
    }
}

/// Drives episodes of one agent in one environment over a shared Q-table
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run `max_episode` training episodes and collect their returns.
    ///
    /// # Errors
    ///
    /// Fails if the table shape does not match the environment, or if any
    /// environment step or observer fails. Any error abandons the run.
    pub fn run(
        &mut self,
        agent: &mut dyn Agent,
        env: &mut dyn Environment,
        table: &mut QTable,
    ) -> Result<TrainingResult> {
        check_shape(env, table)?;

        for observer in &mut self.observers {
            observer.on_training_start(self.config.max_episode)?;
        }

        let mut returns = Vec::with_capacity(self.config.max_episode);
        let mut successes = 0;
        let mut success_streak = 0;
        let mut stopped_early = false;

        for episode in 0..self.config.max_episode {
            let (history, summary) = self.play_episode(episode, agent, env, table)?;
            debug!(
                episode,
                total_return = summary.total_return,
                steps = summary.steps,
                success = summary.success,
                "episode finished"
            );
            returns.push(history.total_return());

            if summary.success {
                successes += 1;
                success_streak += 1;
            } else {
                success_streak = 0;
            }

            if self
                .config
                .max_succeeded_episode
                .is_some_and(|limit| success_streak >= limit)
            {
                warn!(
                    episode,
                    streak = success_streak,
                    "stopping training early after consecutive successes"
                );
                stopped_early = true;
                break;
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result = TrainingResult {
            episodes_run: returns.len(),
            returns,
            successes,
            stopped_early,
        };
        info!(
            agent = agent.name(),
            environment = env.name(),
            episodes = result.episodes_run,
            successes = result.successes,
            mean_return = result.mean_return(),
            "training finished"
        );
        Ok(result)
    }

    /// Freeze the agent and play one evaluation episode.
    ///
    /// The returned history keeps every step of the episode. Observers see
    /// the episode only through `on_evaluation_end`; the per-episode hooks
    /// stay reserved for training.
    pub fn evaluate(
        &mut self,
        agent: &mut dyn Agent,
        env: &mut dyn Environment,
        table: &mut QTable,
    ) -> Result<History> {
        check_shape(env, table)?;
        agent.fix();

        let episode = self.config.max_episode;
        let observers = std::mem::take(&mut self.observers);
        let played = self.play_episode(episode, agent, env, table);
        self.observers = observers;
        let (history, summary) = played?;
        info!(
            total_return = summary.total_return,
            steps = summary.steps,
            success = summary.success,
            "evaluation episode finished"
        );

        for observer in &mut self.observers {
            observer.on_evaluation_end(&history)?;
        }
        Ok(history)
    }

    /// Play one episode and return its full history.
    pub fn run_episode(
        &mut self,
        episode: usize,
        agent: &mut dyn Agent,
        env: &mut dyn Environment,
        table: &mut QTable,
    ) -> Result<History> {
        check_shape(env, table)?;
        self.play_episode(episode, agent, env, table)
            .map(|(history, _)| history)
    }

    fn play_episode(
        &mut self,
        episode: usize,
        agent: &mut dyn Agent,
        env: &mut dyn Environment,
        table: &mut QTable,
    ) -> Result<(History, EpisodeSummary)> {
        for observer in &mut self.observers {
            observer.on_episode_start(episode)?;
        }

        let mut history = History::new();
        env.reset();

        let mut state = env.state();
        let mut action = agent.select_action(table, state);
        self.record(
            episode,
            &mut history,
            StepRecord {
                action,
                reward: env.reward(),
                state,
                info: env.info(),
            },
        )?;

        let mut steps = 0;
        let mut finished = false;
        for _ in 0..self.config.max_step {
            env.run_step(action)?;
            steps += 1;

            let next_state = env.state();
            let reward = env.reward();
            let next_action = agent.select_action(table, next_state);
            self.record(
                episode,
                &mut history,
                StepRecord {
                    action,
                    reward,
                    state: next_state,
                    info: env.info(),
                },
            )?;

            finished = env.is_finish();
            if finished {
                // Terminal absorption: no future value beyond a terminal state.
                table.clear_row(next_state);
            }
            agent.learn(
                table,
                &Transition {
                    state,
                    action,
                    reward,
                    next_state,
                    next_action,
                },
            );

            if finished {
                break;
            }
            state = next_state;
            action = next_action;
        }

        let summary = EpisodeSummary {
            total_return: history.total_return(),
            steps,
            finished,
            success: finished && env.is_success(),
        };
        for observer in &mut self.observers {
            observer.on_episode_end(episode, &summary)?;
        }
        Ok((history, summary))
    }

    fn record(&mut self, episode: usize, history: &mut History, record: StepRecord) -> Result<()> {
        let step = history.len();
        for observer in &mut self.observers {
            observer.on_step(episode, step, &record)?;
        }
        history.push(record);
        Ok(())
    }
}

fn check_shape(env: &dyn Environment, table: &QTable) -> Result<()> {
    if table.state_size() != env.state_size() || table.action_size() != env.action_size() {
        return Err(Error::TableShapeMismatch {
            table_states: table.state_size(),
            table_actions: table.action_size(),
            env_states: env.state_size(),
            env_actions: env.action_size(),
        });
    }
    Ok(())
}
