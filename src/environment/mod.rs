//! Environments the agents train in
//!
//! - **Maze**: discrete grid world with walls and a goal cell
//! - **Cartpole**: continuous cart and pole, integrated with RK4 and binned
//!
//! Both implement the [`Environment`](crate::ports::Environment) port and are
//! selected at runtime by [`EnvironmentKind`].

pub mod cartpole;
pub mod discretize;
pub mod maze;
pub mod ode;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub use cartpole::{
    Cartpole, CartpoleBins, CartpoleConfig, CartpolePhysics, CartpoleState, normalize_angle,
};
pub use discretize::{Bins, compose_index};
pub use maze::{Maze, MazeGrid, MazeRewards, Move, Position};

use crate::{Error, Result, ports::Environment};

/// Which environment to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvironmentKind {
    Maze,
    Cartpole,
}

impl fmt::Display for EnvironmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EnvironmentKind::Maze => "Maze",
            EnvironmentKind::Cartpole => "Cartpole",
        };
        f.write_str(label)
    }
}

impl FromStr for EnvironmentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "maze" => Ok(EnvironmentKind::Maze),
            "cartpole" | "cart-pole" => Ok(EnvironmentKind::Cartpole),
            _ => Err(Error::ParseEnvironmentKind {
                input: s.to_string(),
                expected: "Maze, Cartpole".to_string(),
            }),
        }
    }
}

/// Fully resolved environment settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EnvironmentConfig {
    Maze {
        #[serde(skip)]
        grid: MazeGrid,
        rewards: MazeRewards,
    },
    Cartpole(CartpoleConfig),
}

impl EnvironmentConfig {
    pub fn kind(&self) -> EnvironmentKind {
        match self {
            EnvironmentConfig::Maze { .. } => EnvironmentKind::Maze,
            EnvironmentConfig::Cartpole(_) => EnvironmentKind::Cartpole,
        }
    }

    /// Instantiate the environment behind the port.
    pub fn build(&self) -> Result<Box<dyn Environment>> {
        let env: Box<dyn Environment> = match self {
            EnvironmentConfig::Maze { grid, rewards } => Box::new(Maze::new(grid.clone(), *rewards)),
            EnvironmentConfig::Cartpole(config) => Box::new(Cartpole::new(config.clone())?),
        };
        Ok(env)
    }
}
