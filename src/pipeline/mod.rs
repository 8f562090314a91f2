//! Training and evaluation pipeline
//!
//! This module provides:
//! - The episode loop shared by training and evaluation
//! - The per-episode trajectory log
//! - Observers for progress bars, metrics and logging

pub mod history;
pub mod observers;
pub mod training;

pub use history::{History, StepRecord};
pub use observers::{
    MetricsObserver, MetricsSummary, ProgressObserver, SharedObserver, TracingObserver,
};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::{Agent, Environment, Observer};
