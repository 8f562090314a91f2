//! CLI infrastructure for the tabular RL runner
//!
//! This module provides the command-line interface for running experiments
//! from a configuration file and inspecting configurations without training.

pub mod commands;
pub mod output;
