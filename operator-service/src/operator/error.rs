// Task Execution Errors

use crate::config::{Config, ConfigError, DecodeError};
use crate::expansion::ExpansionError;

use std::fmt;

/// Failure of a task, reported to the host as a structured `{message}`
/// payload. No partial result accompanies it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskExecutionError {
    pub message: String,
    /// Structured error payload, always carrying `message`
    pub error: Config,
}

impl TaskExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        let mut error = Config::new();
        error.set("message", message.as_str());
        Self { message, error }
    }
}

impl fmt::Display for TaskExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TaskExecutionError {}

impl From<ExpansionError> for TaskExecutionError {
    fn from(err: ExpansionError) -> Self {
        TaskExecutionError::new(err.to_string())
    }
}

impl From<ConfigError> for TaskExecutionError {
    fn from(err: ConfigError) -> Self {
        TaskExecutionError::new(err.to_string())
    }
}

impl From<DecodeError> for TaskExecutionError {
    fn from(err: DecodeError) -> Self {
        TaskExecutionError::new(err.to_string())
    }
}
