// Parser module for task definition files
// Provides YAML parsing of `+task` blocks into operator requests

pub mod error;
pub mod task;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use task::TaskParser;
