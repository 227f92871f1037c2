// Expansion Errors

use crate::config::{ConfigError, DecodeError};

use std::fmt;

/// Error raised while collecting axes or materializing subtasks.
///
/// Every expansion error aborts the whole expansion; nothing partial is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionError {
    pub message: String,
    pub kind: ExpansionErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionErrorKind {
    /// Axis section or template is malformed, or a value is undecodable
    InvalidSpec,
    /// Two combinations rendered to the same subtask name
    DuplicateName,
}

impl fmt::Display for ExpansionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ExpansionErrorKind::InvalidSpec => write!(f, "invalid for_each spec: {}", self.message),
            ExpansionErrorKind::DuplicateName => {
                write!(f, "duplicate subtask name: {}", self.message)
            }
        }
    }
}

impl std::error::Error for ExpansionError {}

impl ExpansionError {
    pub fn invalid_spec(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ExpansionErrorKind::InvalidSpec,
        }
    }

    pub fn duplicate_name(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ExpansionErrorKind::DuplicateName,
        }
    }
}

impl From<ConfigError> for ExpansionError {
    fn from(err: ConfigError) -> Self {
        ExpansionError::invalid_spec(err.to_string())
    }
}

impl From<DecodeError> for ExpansionError {
    fn from(err: DecodeError) -> Self {
        ExpansionError::invalid_spec(err.to_string())
    }
}
