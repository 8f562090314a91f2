//! Typed run configuration
//!
//! Builds a [`RunConfig`] out of a [`KeyValueConfig`], validating every value
//! up front so that a run never starts from a half-valid configuration.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{
    Error, Result,
    app::key_value::KeyValueConfig,
    environment::{
        Bins, CartpoleBins, CartpoleConfig, CartpolePhysics, EnvironmentConfig, EnvironmentKind,
        MazeGrid, MazeRewards,
    },
    pipeline::TrainingConfig,
    ports::TdParams,
    q_learning::AgentKind,
};

/// Configuration key names
pub mod keys {
    pub const AGENT_NAME: &str = "AGENT_NAME";
    pub const AGENT_ALPHA: &str = "AGENT_ALPHA";
    pub const AGENT_GAMMA: &str = "AGENT_GAMMA";
    pub const AGENT_EPSILON: &str = "AGENT_EPSILON";

    pub const ENV_NAME: &str = "ENV_NAME";
    pub const QTABLE_INITIAL_QVALUE: &str = "QTABLE_INITIAL_QVALUE";

    pub const RL_MAX_EPISODE: &str = "RL_MAX_EPISODE";
    pub const RL_MAX_STEP: &str = "RL_MAX_STEP";
    pub const RL_MAX_SUCCEEDED_EPISODE: &str = "RL_MAX_SUCCEEDED_EPISODE";
    pub const RL_SEED: &str = "RL_SEED";
    pub const RL_RETURNS_PATH: &str = "RL_RETURNS_PATH";
    pub const RL_TEST_HISTORY_PATH: &str = "RL_TEST_HISTORY_PATH";

    pub const ENV_MAZE_PATH: &str = "ENV_MAZE_PATH";
    pub const ENV_DEFAULT_REWARD: &str = "ENV_DEFAULT_REWARD";
    pub const ENV_GOAL_REWARD: &str = "ENV_GOAL_REWARD";
    pub const ENV_WALL_REWARD: &str = "ENV_WALL_REWARD";

    pub const ENV_ACTION_LEFT: &str = "ENV_ACTION_LEFT";
    pub const ENV_ACTION_RIGHT: &str = "ENV_ACTION_RIGHT";
    pub const ENV_GRAVITY: &str = "ENV_GRAVITY";
    pub const ENV_CART_MASS: &str = "ENV_CART_MASS";
    pub const ENV_POLE_MASS: &str = "ENV_POLE_MASS";
    pub const ENV_POLE_LENGTH: &str = "ENV_POLE_LENGTH";
    pub const ENV_FRAME_PER_SECOND: &str = "ENV_FRAME_PER_SECOND";

    /// Prefixes of the four binned cartpole variables
    pub const CARTPOLE_VARIABLES: [&str; 4] = ["ENV_X", "ENV_THETA", "ENV_XDOT", "ENV_THETADOT"];
}

/// Fully validated settings for one experiment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    pub agent: AgentKind,
    pub params: TdParams,
    pub environment: EnvironmentConfig,
    /// Initial value of every Q-table entry
    pub q_init: f64,
    pub training: TrainingConfig,
    pub returns_path: PathBuf,
    pub history_path: PathBuf,
    /// Seed for the agent's random stream; entropy when unset
    pub seed: Option<u64>,
}

impl RunConfig {
    /// Load and validate a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let kv = KeyValueConfig::from_file(path)?;
        Self::from_key_values(&kv)
    }

    /// Validate raw key/value pairs.
    ///
    /// Every required key must be present and parse. Environment keys are
    /// only required for the selected environment.
    pub fn from_key_values(kv: &KeyValueConfig) -> Result<Self> {
        let agent: AgentKind = kv.get_str(keys::AGENT_NAME)?.parse()?;
        let params = TdParams::new(
            unit_interval(kv, keys::AGENT_ALPHA)?,
            unit_interval(kv, keys::AGENT_GAMMA)?,
            unit_interval(kv, keys::AGENT_EPSILON)?,
        );

        let kind: EnvironmentKind = kv.get_str(keys::ENV_NAME)?.parse()?;
        let environment = match kind {
            EnvironmentKind::Maze => maze_config(kv)?,
            EnvironmentKind::Cartpole => EnvironmentConfig::Cartpole(cartpole_config(kv)?),
        };

        let max_succeeded_episode = kv.get_opt::<usize>(keys::RL_MAX_SUCCEEDED_EPISODE)?;
        if max_succeeded_episode == Some(0) {
            return Err(Error::InvalidConfigValue {
                key: keys::RL_MAX_SUCCEEDED_EPISODE.to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            agent,
            params,
            environment,
            q_init: kv.get_f64(keys::QTABLE_INITIAL_QVALUE)?,
            training: TrainingConfig {
                max_episode: kv.get_usize(keys::RL_MAX_EPISODE)?,
                max_step: kv.get_usize(keys::RL_MAX_STEP)?,
                max_succeeded_episode,
            },
            returns_path: PathBuf::from(kv.get_str(keys::RL_RETURNS_PATH)?),
            history_path: PathBuf::from(kv.get_str(keys::RL_TEST_HISTORY_PATH)?),
            seed: kv.get_opt(keys::RL_SEED)?,
        })
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_returns_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.returns_path = path.into();
        self
    }

    pub fn with_history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = path.into();
        self
    }
}

fn unit_interval(kv: &KeyValueConfig, key: &str) -> Result<f64> {
    let value = kv.get_f64(key)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be within [0, 1]".to_string(),
        });
    }
    Ok(value)
}

fn maze_config(kv: &KeyValueConfig) -> Result<EnvironmentConfig> {
    let grid = MazeGrid::from_file(kv.get_path(keys::ENV_MAZE_PATH)?)?;
    let rewards = MazeRewards {
        default_reward: kv.get_f64(keys::ENV_DEFAULT_REWARD)?,
        goal_reward: kv.get_f64(keys::ENV_GOAL_REWARD)?,
        wall_reward: kv.get_f64(keys::ENV_WALL_REWARD)?,
    };
    Ok(EnvironmentConfig::Maze { grid, rewards })
}

fn cartpole_config(kv: &KeyValueConfig) -> Result<CartpoleConfig> {
    let physics = CartpolePhysics {
        gravity: kv.get_f64(keys::ENV_GRAVITY)?,
        cart_mass: kv.get_f64(keys::ENV_CART_MASS)?,
        pole_mass: kv.get_f64(keys::ENV_POLE_MASS)?,
        pole_length: kv.get_f64(keys::ENV_POLE_LENGTH)?,
        frames_per_second: kv.get_f64(keys::ENV_FRAME_PER_SECOND)?,
    };
    if physics.frames_per_second.is_nan() || physics.frames_per_second <= 0.0 {
        return Err(Error::InvalidConfigValue {
            key: keys::ENV_FRAME_PER_SECOND.to_string(),
            value: physics.frames_per_second.to_string(),
            reason: "must be positive".to_string(),
        });
    }

    let [x, theta, x_dot, theta_dot] = keys::CARTPOLE_VARIABLES;
    let bins = CartpoleBins {
        x: bins(kv, x)?,
        theta: bins(kv, theta)?,
        x_dot: bins(kv, x_dot)?,
        theta_dot: bins(kv, theta_dot)?,
    };
    bins.state_size()?;
    Ok(CartpoleConfig {
        physics,
        actions: [
            kv.get_f64(keys::ENV_ACTION_LEFT)?,
            kv.get_f64(keys::ENV_ACTION_RIGHT)?,
        ],
        bins,
    })
}

/// Read `<PREFIX>_LEFT`, `<PREFIX>_RIGHT` and `<PREFIX>_SIZE`
fn bins(kv: &KeyValueConfig, prefix: &str) -> Result<Bins> {
    let size_key = format!("{prefix}_SIZE");
    let left = kv.get_f64(&format!("{prefix}_LEFT"))?;
    let right = kv.get_f64(&format!("{prefix}_RIGHT"))?;
    let bin_count = kv.get_usize(&size_key)?;
    Bins::new(left, right, bin_count).map_err(|e| Error::InvalidConfigValue {
        key: size_key,
        value: bin_count.to_string(),
        reason: e.to_string(),
    })
}
