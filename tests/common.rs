//! Common test utilities for the tabular-rl test suite.
//!
//! Fixtures write maze maps and `KEY=VALUE` configuration files into a
//! temporary directory, plus small deterministic environments for driving
//! the training pipeline directly.

#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use tabular_rl::{
    Error, Result,
    pipeline::{History, StepRecord},
    ports::{Environment, EpisodeSummary, Observer},
};

/// One-row corridor: start (1,1), goal (1,3)
pub const CORRIDOR: &str = "#####\n#...#\n#####\n";

/// Open 3x3 interior: start (1,1), goal (3,3)
pub const OPEN_5X5: &str = "#####\n#...#\n#...#\n#...#\n#####\n";

/// Write `maze` and a maze configuration next to it; returns the config path.
///
/// `extra` is appended verbatim and may override earlier keys.
pub fn write_maze_fixture(dir: &Path, agent: &str, maze: &str, extra: &str) -> PathBuf {
    fs::write(dir.join("maze.txt"), maze).unwrap();
    let config = format!(
        "\
# maze experiment
AGENT_NAME={agent}
AGENT_ALPHA=0.5
AGENT_GAMMA=0.9
AGENT_EPSILON=0.1
ENV_NAME=Maze
QTABLE_INITIAL_QVALUE=0.0
RL_MAX_EPISODE=200
RL_MAX_STEP=100
RL_SEED=7
RL_RETURNS_PATH={returns}
RL_TEST_HISTORY_PATH={history}
ENV_MAZE_PATH=maze.txt
ENV_DEFAULT_REWARD=-1.0
ENV_GOAL_REWARD=10.0
ENV_WALL_REWARD=-10.0
{extra}
",
        returns = dir.join("returns.txt").display(),
        history = dir.join("history.tsv").display(),
    );
    let path = dir.join("maze.conf");
    fs::write(&path, config).unwrap();
    path
}

/// Write a cartpole configuration; returns the config path.
pub fn write_cartpole_fixture(dir: &Path, extra: &str) -> PathBuf {
    let config = format!(
        "\
AGENT_NAME=Sarsa
AGENT_ALPHA=0.5
AGENT_GAMMA=0.99
AGENT_EPSILON=0.1
ENV_NAME=Cartpole
QTABLE_INITIAL_QVALUE=0.0
RL_MAX_EPISODE=5
RL_MAX_STEP=50
RL_SEED=11
RL_RETURNS_PATH={returns}
RL_TEST_HISTORY_PATH={history}
ENV_ACTION_LEFT=-10.0
ENV_ACTION_RIGHT=10.0
ENV_X_LEFT=-2.4
ENV_X_RIGHT=2.4
ENV_X_SIZE=6
ENV_THETA_LEFT=-3.14
ENV_THETA_RIGHT=3.14
ENV_THETA_SIZE=8
ENV_XDOT_LEFT=-2.0
ENV_XDOT_RIGHT=2.0
ENV_XDOT_SIZE=4
ENV_THETADOT_LEFT=-3.0
ENV_THETADOT_RIGHT=3.0
ENV_THETADOT_SIZE=4
ENV_GRAVITY=9.8
ENV_CART_MASS=1.0
ENV_POLE_MASS=0.1
ENV_POLE_LENGTH=0.5
ENV_FRAME_PER_SECOND=50
{extra}
",
        returns = dir.join("returns.txt").display(),
        history = dir.join("history.tsv").display(),
    );
    let path = dir.join("cartpole.conf");
    fs::write(&path, config).unwrap();
    path
}

/// Two states; any action moves from state 0 to the terminal state 1 and
/// earns `1.0`. Counts resets so rewards can differ per episode.
#[derive(Debug, Default)]
pub struct OneStep {
    pub state: usize,
    pub resets: usize,
    /// When set, the reward equals the number of resets so far
    pub reward_per_episode: bool,
}

impl Environment for OneStep {
    fn name(&self) -> &str {
        "OneStep"
    }

    fn state_size(&self) -> usize {
        2
    }

    fn action_size(&self) -> usize {
        2
    }

    fn state(&self) -> usize {
        self.state
    }

    fn reward(&self) -> f64 {
        match (self.state, self.reward_per_episode) {
            (0, _) => 0.0,
            (_, true) => self.resets as f64,
            (_, false) => 1.0,
        }
    }

    fn info(&self) -> String {
        self.state.to_string()
    }

    fn reset(&mut self) {
        self.state = 0;
        self.resets += 1;
    }

    fn run_step(&mut self, action: usize) -> Result<()> {
        if action >= 2 {
            return Err(Error::ActionOutOfRange {
                action,
                action_size: 2,
            });
        }
        self.state = 1;
        Ok(())
    }

    fn is_finish(&self) -> bool {
        self.state == 1
    }

    fn is_success(&self) -> bool {
        self.state == 1
    }
}

/// Never terminates; every step earns `-1.0`
#[derive(Debug, Default)]
pub struct Treadmill;

impl Environment for Treadmill {
    fn name(&self) -> &str {
        "Treadmill"
    }

    fn state_size(&self) -> usize {
        1
    }

    fn action_size(&self) -> usize {
        2
    }

    fn state(&self) -> usize {
        0
    }

    fn reward(&self) -> f64 {
        -1.0
    }

    fn info(&self) -> String {
        String::new()
    }

    fn reset(&mut self) {}

    fn run_step(&mut self, _action: usize) -> Result<()> {
        Ok(())
    }

    fn is_finish(&self) -> bool {
        false
    }
}

/// Fails on the first step
#[derive(Debug, Default)]
pub struct Broken;

impl Environment for Broken {
    fn name(&self) -> &str {
        "Broken"
    }

    fn state_size(&self) -> usize {
        1
    }

    fn action_size(&self) -> usize {
        1
    }

    fn state(&self) -> usize {
        0
    }

    fn reward(&self) -> f64 {
        0.0
    }

    fn info(&self) -> String {
        String::new()
    }

    fn reset(&mut self) {}

    fn run_step(&mut self, action: usize) -> Result<()> {
        Err(Error::ActionOutOfRange {
            action,
            action_size: 0,
        })
    }

    fn is_finish(&self) -> bool {
        false
    }
}

/// Records every observer event as a short string
#[derive(Debug, Default)]
pub struct EventLog {
    pub events: Vec<String>,
    pub summaries: Vec<EpisodeSummary>,
    pub evaluation: Option<History>,
}

impl Observer for EventLog {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.events.push(format!("training_start {total_episodes}"));
        Ok(())
    }

    fn on_episode_start(&mut self, episode: usize) -> Result<()> {
        self.events.push(format!("episode_start {episode}"));
        Ok(())
    }

    fn on_step(&mut self, episode: usize, step: usize, _record: &StepRecord) -> Result<()> {
        self.events.push(format!("step {episode} {step}"));
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        self.events.push(format!("episode_end {episode}"));
        self.summaries.push(*summary);
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.events.push("training_end".to_string());
        Ok(())
    }

    fn on_evaluation_end(&mut self, history: &History) -> Result<()> {
        self.events.push("evaluation_end".to_string());
        self.evaluation = Some(history.clone());
        Ok(())
    }
}
