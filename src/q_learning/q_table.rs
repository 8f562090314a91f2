//! Dense Q-table for temporal difference learning

use crate::{Error, Result};

/// Largest table [`QTable::new`] will allocate (1 GiB of `f64`)
pub const MAX_ENTRIES: usize = 1 << 27;

/// Index of the largest value; ties resolve to the lowest index.
///
/// Returns 0 for an empty slice.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (index, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = index;
        }
    }
    best
}

/// Q-table mapping (state index, action index) pairs to Q-values
///
/// Stored row-major: one contiguous row of `action_size` values per state.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    q_values: Vec<f64>,
    state_size: usize,
    action_size: usize,
    init_value: f64,
}

impl QTable {
    /// Create a table with every entry set to `init_value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when `state_size * action_size`
    /// overflows, exceeds [`MAX_ENTRIES`], or cannot be allocated.
    pub fn new(state_size: usize, action_size: usize, init_value: f64) -> Result<Self> {
        let too_large = |reason: &str| Error::InvalidConfiguration {
            message: format!("Q-table of {state_size} x {action_size} entries {reason}"),
        };
        let len = state_size
            .checked_mul(action_size)
            .ok_or_else(|| too_large("overflows the address space"))?;
        if len > MAX_ENTRIES {
            return Err(too_large(&format!("exceeds the limit of {MAX_ENTRIES}")));
        }

        let mut q_values = Vec::new();
        q_values
            .try_reserve_exact(len)
            .map_err(|_| too_large("cannot be allocated"))?;
        q_values.resize(len, init_value);
        Ok(Self {
            q_values,
            state_size,
            action_size,
            init_value,
        })
    }

    pub fn state_size(&self) -> usize {
        self.state_size
    }

    pub fn action_size(&self) -> usize {
        self.action_size
    }

    /// Value every entry started from
    pub fn init_value(&self) -> f64 {
        self.init_value
    }

    /// Q-values for every action in `state`
    pub fn row(&self, state: usize) -> &[f64] {
        let start = state * self.action_size;
        &self.q_values[start..start + self.action_size]
    }

    pub fn row_mut(&mut self, state: usize) -> &mut [f64] {
        let start = state * self.action_size;
        &mut self.q_values[start..start + self.action_size]
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: usize, action: usize) -> f64 {
        self.row(state)[action]
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: usize, action: usize, value: f64) {
        self.row_mut(state)[action] = value;
    }

    /// Maximum Q-value over all actions in `state`
    pub fn max_value(&self, state: usize) -> f64 {
        self.row(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Greedy action (highest Q-value, lowest index on ties)
    pub fn greedy_action(&self, state: usize) -> usize {
        argmax(self.row(state))
    }

    /// Zero every action value of `state`.
    ///
    /// Applied to terminal states so that bootstrapped targets see no
    /// future reward.
    pub fn clear_row(&mut self, state: usize) {
        self.row_mut(state).fill(0.0);
    }

    /// Total number of Q-values stored
    pub fn size(&self) -> usize {
        self.q_values.len()
    }
}
