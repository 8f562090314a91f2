//! Q-learning and SARSA temporal difference learning
//!
//! This module implements the two tabular TD control rules over a dense
//! Q-table indexed by discrete state and action.
//!
//! ## Key Differences
//!
//! | Aspect | Q-learning | SARSA |
//! |--------|------------|-------|
//! | Policy | Off-policy (learns Q*) | On-policy (learns Q^π) |
//! | Target | max_a Q(s',a) | Q(s',a') for the chosen a' |
//!
//! ## Usage Example
//!
//! ```no_run
//! use tabular_rl::{
//!     ports::{Agent, TdParams},
//!     q_learning::{QLearningAgent, QTable},
//! };
//!
//! let table = QTable::new(25, 4, 0.0)?;
//! let mut agent = QLearningAgent::with_seed(TdParams::new(0.1, 0.9, 0.1), 42);
//! let action = agent.select_action(&table, 6);
//! # Ok::<(), tabular_rl::Error>(())
//! ```

pub mod agent;
pub mod q_table;

pub use agent::{AgentKind, QLearningAgent, SarsaAgent};
pub use q_table::{QTable, argmax};
