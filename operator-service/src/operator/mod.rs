// Operator Module
// Operator traits, built-in operators and the registry that dispatches to them

pub mod error;
pub mod fail;
pub mod for_each;
pub mod request;

// Re-export key types
pub use error::TaskExecutionError;
pub use fail::FailOperatorFactory;
pub use for_each::ForEachOperatorFactory;
pub use request::{TaskRequest, TaskResult};

use crate::config::ExpansionSettings;

use std::collections::BTreeMap;

/// A single execution of a task
pub trait Operator {
    /// Run the task. Either the full result or an error is returned.
    fn run(&self) -> Result<TaskResult, TaskExecutionError>;
}

/// Creates operators of one type
pub trait OperatorFactory: Send + Sync {
    /// Operator type, as written before `>` in task files
    fn operator_type(&self) -> &str;

    fn new_operator(&self, request: TaskRequest) -> Box<dyn Operator>;
}

/// Registry of operator factories keyed by operator type
#[derive(Default)]
pub struct OperatorRegistry {
    factories: BTreeMap<String, Box<dyn OperatorFactory>>,
}

impl OperatorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `for_each` and `fail` operators
    pub fn with_defaults(settings: ExpansionSettings) -> Self {
        Self::new()
            .with_factory(ForEachOperatorFactory::new(settings))
            .with_factory(FailOperatorFactory)
    }

    /// Register a factory, replacing any factory of the same type
    pub fn with_factory(mut self, factory: impl OperatorFactory + 'static) -> Self {
        self.register(Box::new(factory));
        self
    }

    pub fn register(&mut self, factory: Box<dyn OperatorFactory>) {
        self.factories
            .insert(factory.operator_type().to_string(), factory);
    }

    pub fn get(&self, operator_type: &str) -> Option<&dyn OperatorFactory> {
        self.factories.get(operator_type).map(|f| f.as_ref())
    }

    /// Registered operator types, sorted
    pub fn operator_types(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Run a request with the operator registered for its type
    pub fn run(&self, request: TaskRequest) -> Result<TaskResult, TaskExecutionError> {
        let task_name = request.task_name.clone();
        let factory = self.get(&request.operator_type).ok_or_else(|| {
            TaskExecutionError::new(format!(
                "unknown operator type '{}' in task '{}'",
                request.operator_type, task_name
            ))
        })?;

        tracing::info!(
            task = %task_name,
            operator = %request.operator_type,
            "running task"
        );

        let result = factory.new_operator(request).run();
        if let Err(err) = &result {
            tracing::error!(task = %task_name, error = %err, "task failed");
        }
        result
    }
}
