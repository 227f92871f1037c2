// Operator Service Library
// Task operators for taskfan: for_each combinatorial expansion and fail

pub mod config;
pub mod error;
pub mod expansion;
pub mod operator;
pub mod parser;

// Re-export commonly used types
pub use error::{ServiceError, ServiceResult};

// Re-export config types
pub use config::{Config, ConfigError, ExpansionSettings, NameEncoding, Value};

// Re-export expansion types
pub use expansion::{
    AxisSet, AxisSpec, Combination, CombinationExpander, ExpansionError, ExpansionErrorKind,
    ExpansionResult, Subtask, SubtaskMaterializer,
};

// Re-export operator types
pub use operator::{
    FailOperatorFactory, ForEachOperatorFactory, Operator, OperatorFactory, OperatorRegistry,
    TaskExecutionError, TaskRequest, TaskResult,
};

// Re-export parser types
pub use parser::{ParseError, ParseErrorKind, ParseResult, TaskParser};
