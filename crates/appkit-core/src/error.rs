//! Error types module
//!
//! Two families of errors exist. `ConfigError` is fatal and stops the runner
//! before anything is printed. `ActionError` is raised by an action and is
//! always turned into a failure record by the runner.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like parameter mismatches
    Debug,
    /// Warning level - for failures reported by an upstream service
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Errors raised while reading the runner configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No ACTION specified")]
    MissingAction,
}

/// Errors raised while executing an action.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The parameters do not match what the action accepts.
    #[error("{0}")]
    InvalidParams(String),

    /// The action ran and reports a domain failure.
    #[error("{0}")]
    Failed(String),

    /// The storage capability reported an error.
    #[error("{0}")]
    Storage(String),

    #[error("{message}: {source}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ActionError {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        ActionError::InvalidParams(message.into())
    }

    pub fn failed(message: impl Into<String>) -> Self {
        ActionError::Failed(message.into())
    }

    pub fn internal(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        ActionError::Internal {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Level the runner logs this error at.
    pub fn log_level(&self) -> LogLevel {
        match self {
            ActionError::InvalidParams(_) => LogLevel::Debug,
            ActionError::Failed(_) | ActionError::Storage(_) => LogLevel::Warn,
            ActionError::Internal { .. } => LogLevel::Error,
        }
    }
}

/// Result type returned by every action.
pub type ActionResult<T> = Result<T, ActionError>;
