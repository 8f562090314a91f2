//! Q-learning and SARSA agents
//!
//! Both agents share ε-greedy action selection and the blended update
//! `Q[s1,a1] <- (1 - α) Q[s1,a1] + α (r + γ target)`. They differ only in
//! the bootstrap target. Each agent owns its random stream; the stream type
//! is a generic parameter so tests and callers can inject their own.

use std::{fmt, str::FromStr};

use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{Agent, TdParams, Transition},
    q_learning::q_table::QTable,
};

fn build_rng<R: SeedableRng>(seed: Option<u64>) -> R {
    match seed {
        Some(seed) => R::seed_from_u64(seed),
        None => R::from_rng(&mut rand::rng()),
    }
}

/// ε-greedy selection over one table row
fn epsilon_greedy<R: RngCore>(rng: &mut R, epsilon: f64, table: &QTable, state: usize) -> usize {
    if rng.random::<f64>() < epsilon {
        rng.random_range(0..table.action_size())
    } else {
        table.greedy_action(state)
    }
}

/// Blend the old value with the bootstrapped target
fn blended_update(table: &mut QTable, params: &TdParams, transition: &Transition, target: f64) {
    let Transition {
        state,
        action,
        reward,
        ..
    } = *transition;
    let current = table.get(state, action);
    let updated = (1.0 - params.alpha) * current + params.alpha * (reward + params.gamma * target);
    table.set(state, action, updated);
}

/// Q-learning agent (off-policy TD control)
///
/// Bootstraps from the best next action, regardless of the action the
/// policy actually takes next.
#[derive(Debug, Clone)]
pub struct QLearningAgent<R = StdRng> {
    params: TdParams,
    rng: R,
}

impl QLearningAgent<StdRng> {
    /// Create a Q-learning agent with an entropy-seeded RNG
    pub fn new(params: TdParams) -> Self {
        Self::with_rng(params, build_rng(None))
    }

    /// Create a Q-learning agent with a deterministic RNG
    pub fn with_seed(params: TdParams, seed: u64) -> Self {
        Self::with_rng(params, build_rng(Some(seed)))
    }
}

impl<R: RngCore> QLearningAgent<R> {
    /// Create a Q-learning agent drawing from `rng`
    pub fn with_rng(params: TdParams, rng: R) -> Self {
        Self { params, rng }
    }
}

impl<R> Agent for QLearningAgent<R>
where
    R: RngCore + Send,
{
    fn select_action(&mut self, table: &QTable, state: usize) -> usize {
        epsilon_greedy(&mut self.rng, self.params.epsilon, table, state)
    }

    fn learn(&self, table: &mut QTable, transition: &Transition) {
        let target = table.max_value(transition.next_state);
        blended_update(table, &self.params, transition, target);
    }

    fn fix(&mut self) {
        self.params.alpha = 0.0;
        self.params.epsilon = 0.0;
    }

    fn params(&self) -> TdParams {
        self.params
    }

    fn name(&self) -> &str {
        "Q-learning"
    }
}

/// SARSA agent (on-policy TD control)
///
/// Bootstraps from the value of the action the policy actually chose in the
/// next state, exploration included.
#[derive(Debug, Clone)]
pub struct SarsaAgent<R = StdRng> {
    params: TdParams,
    rng: R,
}

impl SarsaAgent<StdRng> {
    /// Create a SARSA agent with an entropy-seeded RNG
    pub fn new(params: TdParams) -> Self {
        Self::with_rng(params, build_rng(None))
    }

    /// Create a SARSA agent with a deterministic RNG
    pub fn with_seed(params: TdParams, seed: u64) -> Self {
        Self::with_rng(params, build_rng(Some(seed)))
    }
}

impl<R: RngCore> SarsaAgent<R> {
    /// Create a SARSA agent drawing from `rng`
    pub fn with_rng(params: TdParams, rng: R) -> Self {
        Self { params, rng }
    }
}

impl<R> Agent for SarsaAgent<R>
where
    R: RngCore + Send,
{
    fn select_action(&mut self, table: &QTable, state: usize) -> usize {
        epsilon_greedy(&mut self.rng, self.params.epsilon, table, state)
    }

    fn learn(&self, table: &mut QTable, transition: &Transition) {
        let target = table.get(transition.next_state, transition.next_action);
        blended_update(table, &self.params, transition, target);
    }

    fn fix(&mut self) {
        self.params.alpha = 0.0;
        self.params.epsilon = 0.0;
    }

    fn params(&self) -> TdParams {
        self.params
    }

    fn name(&self) -> &str {
        "Sarsa"
    }
}

/// Which learning rule to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentKind {
    QLearning,
    Sarsa,
}

impl AgentKind {
    /// Build a boxed agent, seeded when `seed` is given
    pub fn build(self, params: TdParams, seed: Option<u64>) -> Box<dyn Agent> {
        match self {
            AgentKind::QLearning => Box::new(QLearningAgent::<StdRng>::with_rng(
                params,
                build_rng(seed),
            )),
            AgentKind::Sarsa => Box::new(SarsaAgent::<StdRng>::with_rng(params, build_rng(seed))),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AgentKind::QLearning => "Q-learning",
            AgentKind::Sarsa => "Sarsa",
        };
        f.write_str(label)
    }
}

impl FromStr for AgentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "q-learning" | "q_learning" | "qlearning" => Ok(AgentKind::QLearning),
            "sarsa" => Ok(AgentKind::Sarsa),
            _ => Err(Error::ParseAgentKind {
                input: s.to_string(),
                expected: "Q-learning, Sarsa".to_string(),
            }),
        }
    }
}
