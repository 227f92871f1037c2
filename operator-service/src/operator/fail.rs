// fail Operator
// Aborts the task with the message given as its command

use super::error::TaskExecutionError;
use super::request::{TaskRequest, TaskResult, COMMAND_KEY};
use super::{Operator, OperatorFactory};

#[derive(Debug, Default)]
pub struct FailOperatorFactory;

impl OperatorFactory for FailOperatorFactory {
    fn operator_type(&self) -> &str {
        "fail"
    }

    fn new_operator(&self, request: TaskRequest) -> Box<dyn Operator> {
        Box::new(FailOperator { request })
    }
}

struct FailOperator {
    request: TaskRequest,
}

impl Operator for FailOperator {
    fn run(&self) -> Result<TaskResult, TaskExecutionError> {
        let message = self
            .request
            .decoded_config()?
            .get_string_or(COMMAND_KEY, "")?;
        Err(TaskExecutionError::new(message))
    }
}
