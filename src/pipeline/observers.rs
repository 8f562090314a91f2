//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! the training loop to specific output formats.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::info;

use crate::{
    Result,
    pipeline::{History, StepRecord},
    ports::{EpisodeSummary, Observer},
};

/// Shared handle to an observer
///
/// The pipeline takes ownership of its observers. Wrapping one in a
/// `SharedObserver` keeps a second handle so its data can be read after the
/// run.
pub struct SharedObserver<O> {
    inner: Arc<Mutex<O>>,
}

impl<O: Observer> SharedObserver<O> {
    pub fn new(observer: O) -> Self {
        Self {
            inner: Arc::new(Mutex::new(observer)),
        }
    }

    /// Lock the wrapped observer
    pub fn lock(&self) -> MutexGuard<'_, O> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<O> Clone for SharedObserver<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O: Observer> Observer for SharedObserver<O> {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.lock().on_training_start(total_episodes)
    }

    fn on_episode_start(&mut self, episode: usize) -> Result<()> {
        self.lock().on_episode_start(episode)
    }

    fn on_step(&mut self, episode: usize, step: usize, record: &StepRecord) -> Result<()> {
        self.lock().on_step(episode, step, record)
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        self.lock().on_episode_end(episode, summary)
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.lock().on_training_end()
    }

    fn on_evaluation_end(&mut self, history: &History) -> Result<()> {
        self.lock().on_evaluation_end(history)
    }
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    successes: usize,
    last_return: f64,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            successes: 0,
            last_return: 0.0,
        }
    }

    fn message(&self) -> String {
        format!("return {:.3}, successes {}", self.last_return, self.successes)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        self.last_return = summary.total_return;
        if summary.success {
            self.successes += 1;
        }
        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks per-episode returns and lengths
pub struct MetricsObserver {
    window: usize,
    returns: Vec<f64>,
    step_counts: Vec<usize>,
    successes: usize,
    evaluation_return: Option<f64>,
}

impl MetricsObserver {
    /// Create a metrics observer that averages the last 100 returns
    pub fn new() -> Self {
        Self::with_window(100)
    }

    /// Create a metrics observer with a custom trailing window
    pub fn with_window(window: usize) -> Self {
        Self {
            window: window.max(1),
            returns: Vec::new(),
            step_counts: Vec::new(),
            successes: 0,
            evaluation_return: None,
        }
    }

    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    /// Mean of the most recent `window` returns
    pub fn recent_mean_return(&self) -> f64 {
        let start = self.returns.len().saturating_sub(self.window);
        let recent = &self.returns[start..];
        if recent.is_empty() {
            0.0
        } else {
            recent.iter().mean()
        }
    }

    /// Get average episode length in steps
    pub fn avg_episode_length(&self) -> f64 {
        if self.step_counts.is_empty() {
            0.0
        } else {
            self.step_counts.iter().sum::<usize>() as f64 / self.step_counts.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        let episodes = self.returns.len();
        let (mean, min, max) = if episodes == 0 {
            (0.0, 0.0, 0.0)
        } else {
            (
                self.returns.iter().mean(),
                Statistics::min(self.returns.iter()),
                Statistics::max(self.returns.iter()),
            )
        };
        let std_dev = if episodes < 2 {
            0.0
        } else {
            self.returns.iter().std_dev()
        };

        MetricsSummary {
            episodes,
            successes: self.successes,
            success_rate: if episodes == 0 {
                0.0
            } else {
                self.successes as f64 / episodes as f64
            },
            mean_return: mean,
            std_dev_return: std_dev,
            min_return: min,
            max_return: max,
            recent_mean_return: self.recent_mean_return(),
            avg_episode_length: self.avg_episode_length(),
            evaluation_return: self.evaluation_return,
        }
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub successes: usize,
    pub success_rate: f64,
    pub mean_return: f64,
    pub std_dev_return: f64,
    pub min_return: f64,
    pub max_return: f64,
    pub recent_mean_return: f64,
    pub avg_episode_length: f64,
    pub evaluation_return: Option<f64>,
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, _episode: usize, summary: &EpisodeSummary) -> Result<()> {
        self.returns.push(summary.total_return);
        self.step_counts.push(summary.steps);
        if summary.success {
            self.successes += 1;
        }
        Ok(())
    }

    fn on_evaluation_end(&mut self, history: &History) -> Result<()> {
        self.evaluation_return = Some(history.total_return());
        Ok(())
    }
}

/// Logging observer - Emits `tracing` events at a fixed episode interval
pub struct TracingObserver {
    log_every: usize,
    total_episodes: usize,
    interval_returns: Vec<f64>,
}

impl TracingObserver {
    /// Log a summary every `log_every` episodes
    pub fn new(log_every: usize) -> Self {
        Self {
            log_every: log_every.max(1),
            total_episodes: 0,
            interval_returns: Vec::new(),
        }
    }
}

impl Observer for TracingObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.total_episodes = total_episodes;
        self.interval_returns.clear();
        info!(total_episodes, "training started");
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        self.interval_returns.push(summary.total_return);
        if (episode + 1) % self.log_every == 0 {
            let mean_return = self.interval_returns.iter().mean();
            info!(
                episode = episode + 1,
                total = self.total_episodes,
                mean_return,
                last_return = summary.total_return,
                "training progress"
            );
            self.interval_returns.clear();
        }
        Ok(())
    }

    fn on_evaluation_end(&mut self, history: &History) -> Result<()> {
        info!(
            steps = history.len(),
            total_return = history.total_return(),
            "evaluation trajectory recorded"
        );
        Ok(())
    }
}
