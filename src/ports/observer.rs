//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling the training loop
//! to progress bars, logging, or metrics.

use serde::{Deserialize, Serialize};

use crate::{Result, pipeline::History, pipeline::StepRecord};

/// Outcome of one finished episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Sum of recorded rewards
    pub total_return: f64,
    /// Number of environment steps taken (excludes the initial record)
    pub steps: usize,
    /// Whether the environment reported a terminal state
    pub finished: bool,
    /// Whether the terminal state was a success
    pub success: bool,
}

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(...)` - For each recorded step
///    - `on_episode_end(episode, summary)`
/// 3. `on_training_end()` - Once at the end
/// 4. `on_evaluation_end(history)` - After the frozen evaluation episode,
///    which does not fire the per-episode hooks
///
/// # Examples
///
/// ```no_run
/// use tabular_rl::ports::{EpisodeSummary, Observer};
///
/// struct ReturnLog {
///     returns: Vec<f64>,
/// }
///
/// impl Observer for ReturnLog {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         summary: &EpisodeSummary,
///     ) -> tabular_rl::Result<()> {
///         self.returns.push(summary.total_return);
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts with the configured episode budget.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts (0-based).
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called for each record appended to the episode history.
    ///
    /// Step 0 is the initial bookkeeping record taken before any action.
    fn on_step(&mut self, _episode: usize, _step: usize, _record: &StepRecord) -> Result<()> {
        Ok(())
    }

    /// Called when an episode ends.
    fn on_episode_end(&mut self, _episode: usize, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called when training ends.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called after the evaluation episode with its full trajectory.
    fn on_evaluation_end(&mut self, _history: &History) -> Result<()> {
        Ok(())
    }
}
