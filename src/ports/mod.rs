//! Ports (trait boundaries) between the training loop and its collaborators.
//!
//! The pipeline depends only on these traits; environments, agents and
//! observers are adapters that implement them.

pub mod agent;
pub mod environment;
pub mod observer;

pub use agent::{Agent, TdParams, Transition};
pub use environment::Environment;
pub use observer::{EpisodeSummary, Observer};
