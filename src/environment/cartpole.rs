//! Cartpole swing-up environment
//!
//! A pole hinged on a cart that moves along a rail. The pole starts hanging
//! straight down (`theta = pi`) and the agent pushes the cart left or right.
//! The continuous state is integrated with RK4 once per control period and
//! binned into a discrete state index for the Q-table.

use std::{
    f64::consts::PI,
    ops::{Add, Mul},
};

use serde::{Deserialize, Serialize};

use super::{
    discretize::{Bins, compose_index},
    ode::runge_kutta4,
};
use crate::{Error, Result, ports::Environment};

/// Reward when the cart leaves the `|x| <= 2` track
pub const OUT_OF_TRACK_PENALTY: f64 = -2.0;

const TRACK_LIMIT: f64 = 2.0;

/// Continuous cartpole state `(x, theta, x_dot, theta_dot)`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CartpoleState {
    pub x: f64,
    pub theta: f64,
    pub x_dot: f64,
    pub theta_dot: f64,
}

impl CartpoleState {
    pub const fn new(x: f64, theta: f64, x_dot: f64, theta_dot: f64) -> Self {
        Self {
            x,
            theta,
            x_dot,
            theta_dot,
        }
    }

    /// Pole hanging down, cart at rest in the middle of the track
    pub const fn hanging() -> Self {
        Self::new(0.0, PI, 0.0, 0.0)
    }
}

impl Add for CartpoleState {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.x + rhs.x,
            self.theta + rhs.theta,
            self.x_dot + rhs.x_dot,
            self.theta_dot + rhs.theta_dot,
        )
    }
}

impl Mul<f64> for CartpoleState {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(
            self.x * rhs,
            self.theta * rhs,
            self.x_dot * rhs,
            self.theta_dot * rhs,
        )
    }
}

/// Physical constants of the cart and pole
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartpolePhysics {
    pub gravity: f64,
    pub cart_mass: f64,
    pub pole_mass: f64,
    /// Half length of the pole
    pub pole_length: f64,
    pub frames_per_second: f64,
}

impl CartpolePhysics {
    /// `pole_mass * pole_length`
    pub fn ml(&self) -> f64 {
        self.pole_mass * self.pole_length
    }

    /// Total mass of cart and pole
    pub fn mass(&self) -> f64 {
        self.cart_mass + self.pole_mass
    }

    /// Control period in seconds
    pub fn tau(&self) -> f64 {
        1.0 / self.frames_per_second
    }

    /// Time derivative of `state` under control force `force`.
    pub fn derivative(&self, state: CartpoleState, force: f64) -> CartpoleState {
        let CartpoleState {
            theta,
            x_dot,
            theta_dot,
            ..
        } = state;

        let g = self.gravity;
        let m = self.pole_mass;
        let l = self.pole_length;
        let ml = self.ml();
        let mass = self.mass();

        let sin_theta = theta.sin();
        let cos_theta = theta.cos();
        let cos_sq = cos_theta * cos_theta;
        let theta_dot_sq = theta_dot * theta_dot;

        let x_ddot = (4.0 * force / 3.0 + 4.0 * ml * theta_dot_sq * sin_theta / 3.0
            - m * g * (2.0 * theta).sin() / 2.0)
            / (4.0 * mass - m * cos_sq);
        let theta_ddot = (mass * g * sin_theta
            - ml * theta_dot_sq * sin_theta * cos_theta
            - force * cos_theta)
            / (4.0 * mass * l / 3.0 - ml * cos_sq);

        CartpoleState::new(x_dot, theta_dot, x_ddot, theta_ddot)
    }

    /// Integrate one control period and normalize the pole angle.
    pub fn step(&self, state: CartpoleState, force: f64) -> CartpoleState {
        let mut next = runge_kutta4(state, self.tau(), |s| self.derivative(s, force));
        next.theta = normalize_angle(next.theta);
        next
    }
}

/// Wrap an angle into `(-pi, pi]`.
///
/// Angles already in range are returned untouched so that `pi` stays `pi`.
pub fn normalize_angle(theta: f64) -> f64 {
    if theta > -PI && theta <= PI {
        return theta;
    }
    let wrapped = (theta + 3.0 * PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI { wrapped + 2.0 * PI } else { wrapped }
}

/// Discretization of the four state variables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartpoleBins {
    pub x: Bins,
    pub theta: Bins,
    pub x_dot: Bins,
    pub theta_dot: Bins,
}

impl CartpoleBins {
    fn sizes(&self) -> [usize; 4] {
        [
            self.x.bin_count,
            self.theta.bin_count,
            self.x_dot.bin_count,
            self.theta_dot.bin_count,
        ]
    }

    /// Number of discrete states.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when the product of the bin
    /// counts does not fit in `usize`.
    pub fn state_size(&self) -> Result<usize> {
        self.sizes()
            .iter()
            .try_fold(1usize, |acc, &size| acc.checked_mul(size))
            .ok_or_else(|| Error::InvalidConfiguration {
                message: format!("cartpole bin counts {:?} overflow the state space", self.sizes()),
            })
    }

    /// Discrete index of a continuous state
    pub fn index(&self, state: &CartpoleState) -> usize {
        let indices = [
            self.x.digitize(state.x),
            self.theta.digitize(state.theta),
            self.x_dot.digitize(state.x_dot),
            self.theta_dot.digitize(state.theta_dot),
        ];
        compose_index(&indices, &self.sizes())
    }
}

/// Settings for building a [`Cartpole`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartpoleConfig {
    pub physics: CartpolePhysics,
    /// Force applied by action 0 (left) and action 1 (right)
    pub actions: [f64; 2],
    pub bins: CartpoleBins,
}

/// Cartpole environment
#[derive(Debug, Clone)]
pub struct Cartpole {
    physics: CartpolePhysics,
    actions: [f64; 2],
    bins: CartpoleBins,
    state_size: usize,
    initial: CartpoleState,
    state: CartpoleState,
}

impl Cartpole {
    /// Create a cartpole in the hanging start position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when the frame rate is not
    /// positive or the binned state space does not fit in `usize`.
    pub fn new(config: CartpoleConfig) -> Result<Self> {
        let fps = config.physics.frames_per_second;
        if fps.is_nan() || fps <= 0.0 {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "frames per second must be positive, got {}",
                    config.physics.frames_per_second
                ),
            });
        }
        let state_size = config.bins.state_size()?;
        let initial = CartpoleState::hanging();
        Ok(Self {
            physics: config.physics,
            actions: config.actions,
            bins: config.bins,
            state_size,
            initial,
            state: initial,
        })
    }

    /// Current continuous state
    pub fn continuous_state(&self) -> CartpoleState {
        self.state
    }

    /// Overwrite the continuous state
    pub fn set_continuous_state(&mut self, state: CartpoleState) {
        self.state = state;
    }

    pub fn physics(&self) -> &CartpolePhysics {
        &self.physics
    }
}

impl Environment for Cartpole {
    fn name(&self) -> &str {
        "Cartpole"
    }

    fn state_size(&self) -> usize {
        self.state_size
    }

    fn action_size(&self) -> usize {
        self.actions.len()
    }

    fn state(&self) -> usize {
        self.bins.index(&self.state)
    }

    fn reward(&self) -> f64 {
        let CartpoleState { x, theta, .. } = self.state;
        if x.abs() > TRACK_LIMIT {
            OUT_OF_TRACK_PENALTY
        } else {
            -theta.abs() + PI / 2.0 - 0.01 * x.abs()
        }
    }

    fn info(&self) -> String {
        let CartpoleState {
            x,
            theta,
            x_dot,
            theta_dot,
        } = self.state;
        format!("{x:.15},{theta:.15},{x_dot:.15},{theta_dot:.15}")
    }

    fn reset(&mut self) {
        self.state = self.initial;
    }

    fn run_step(&mut self, action: usize) -> Result<()> {
        let force = *self.actions.get(action).ok_or(Error::ActionOutOfRange {
            action,
            action_size: self.actions.len(),
        })?;
        self.state = self.physics.step(self.state, force);
        Ok(())
    }

    // Episodes only end on the step limit.
    fn is_finish(&self) -> bool {
        false
    }
}
