//! Environment port - abstraction over the worlds an agent can act in

use crate::Result;

/// Environment trait - shared capability set of every environment variant
///
/// An environment owns its state and exposes it to the agent only through a
/// discrete state index in `0..state_size()`. The training pipeline drives it
/// through `reset`, `run_step`, and the read-only queries.
///
/// # Examples
///
/// ```no_run
/// use tabular_rl::ports::Environment;
///
/// fn rollout(env: &mut dyn Environment, actions: &[usize]) -> tabular_rl::Result<f64> {
///     env.reset();
///     let mut total = 0.0;
///     for &action in actions {
///         env.run_step(action)?;
///         total += env.reward();
///         if env.is_finish() {
///             break;
///         }
///     }
///     Ok(total)
/// }
/// ```
pub trait Environment: Send {
    /// Name used in logs and summaries.
    fn name(&self) -> &str;

    /// Number of discrete states (rows of the Q-table).
    fn state_size(&self) -> usize;

    /// Number of discrete actions (columns of the Q-table).
    fn action_size(&self) -> usize;

    /// Discrete index of the current state.
    fn state(&self) -> usize;

    /// Reward for being in the current state.
    fn reward(&self) -> f64;

    /// Free-form description of the raw state, recorded in trajectories.
    fn info(&self) -> String;

    /// Return to the start state.
    fn reset(&mut self);

    /// Apply one action.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionOutOfRange`](crate::Error::ActionOutOfRange)
    /// if `action >= action_size()`.
    fn run_step(&mut self, action: usize) -> Result<()>;

    /// Whether the current state is terminal.
    fn is_finish(&self) -> bool;

    /// Whether the current state counts as a successful episode end.
    ///
    /// # Default Implementation
    ///
    /// Returns `false`, for environments without a success condition.
    fn is_success(&self) -> bool {
        false
    }
}
