//! Error types for the tabular RL crate

use thiserror::Error;

/// Main error type for the tabular RL crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid config line {line_number}: '{line}' (expected KEY=VALUE)")]
    ConfigSyntax { line_number: usize, line: String },

    #[error("missing required config key '{key}'")]
    MissingConfigKey { key: String },

    #[error("invalid value '{value}' for config key '{key}': {reason}")]
    InvalidConfigValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid agent name '{input}'. Expected one of: {expected}")]
    ParseAgentKind { input: String, expected: String },

    #[error("invalid environment name '{input}'. Expected one of: {expected}")]
    ParseEnvironmentKind { input: String, expected: String },

    #[error("invalid maze: {reason}")]
    InvalidMaze { reason: String },

    #[error("action {action} is out of range (action space has {action_size} actions)")]
    ActionOutOfRange { action: usize, action_size: usize },

    #[error("position ({row}, {col}) is outside the {height}x{width} maze")]
    PositionOutOfBounds {
        row: i64,
        col: i64,
        height: usize,
        width: usize,
    },

    #[error(
        "q-table shape {table_states}x{table_actions} does not match environment {env_states}x{env_actions}"
    )]
    TableShapeMismatch {
        table_states: usize,
        table_actions: usize,
        env_states: usize,
        env_actions: usize,
    },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    /// Wrap an IO error with the operation that produced it.
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            operation: operation.into(),
            source,
        }
    }
}
