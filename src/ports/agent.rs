//! Agent port - abstraction for tabular learning rules
//!
//! Agents never own the Q-table. The training pipeline owns it and lends it
//! to the agent for action selection and updates, which keeps terminal
//! absorption (a pipeline concern) and learning on the same single table.

use serde::{Deserialize, Serialize};

use crate::q_learning::QTable;

/// Learning rate, discount factor and exploration rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TdParams {
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
    /// Exploration probability ε
    pub epsilon: f64,
}

impl TdParams {
    pub fn new(alpha: f64, gamma: f64, epsilon: f64) -> Self {
        Self {
            alpha,
            gamma,
            epsilon,
        }
    }
}

/// One `(s1, a1, r, s2, a2)` experience tuple
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: usize,
    pub action: usize,
    pub reward: f64,
    pub next_state: usize,
    /// Action the policy chose in `next_state`
    pub next_action: usize,
}

/// Agent trait - ε-greedy tabular learners
pub trait Agent: Send {
    /// Choose an action for `state`.
    ///
    /// With probability ε a uniformly random action, otherwise the greedy
    /// action of the table row (lowest index on ties).
    fn select_action(&mut self, table: &QTable, state: usize) -> usize;

    /// Update `table` from one transition.
    ///
    /// `Q[s1,a1] <- (1 - α) Q[s1,a1] + α (r + γ target)`, where the target is
    /// rule specific.
    fn learn(&self, table: &mut QTable, transition: &Transition);

    /// Freeze the policy: α = 0 and ε = 0.
    fn fix(&mut self);

    /// Current hyperparameters.
    fn params(&self) -> TdParams;

    /// Get the agent's name.
    fn name(&self) -> &str;
}
