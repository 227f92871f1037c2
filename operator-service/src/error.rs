// Service Errors
// Top-level error type for file loading, parsing and settings

use crate::parser::ParseError;

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
