//! Tabular reinforcement learning experiments
//!
//! This crate provides:
//! - Q-learning and SARSA agents over a dense Q-table
//! - A grid maze and an RK4-integrated cartpole environment
//! - A training pipeline with terminal absorption, early stopping and observers
//! - `KEY=VALUE` configuration loading and result-file export

pub mod app;
pub mod cli;
pub mod environment;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod ports;
pub mod q_learning;

pub use error::{Error, Result};
