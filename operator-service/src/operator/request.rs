// Task Requests and Results

use crate::config::{Config, DecodeError};

pub use crate::expansion::PARALLEL_KEY;

/// Operator argument, written in task files as `<type>>: <command>`
pub const COMMAND_KEY: &str = "_command";
/// Operator type of the task
pub const TYPE_KEY: &str = "_type";
/// Template block repeated by for_each
pub const DO_KEY: &str = "_do";

/// A unit of work handed to an operator
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRequest {
    /// Full task name, e.g. `+loop`
    pub task_name: String,
    pub operator_type: String,
    pub config: Config,
    /// First value of the definition that could not be decoded. The
    /// offending entry is left out of `config`.
    pub decode_error: Option<DecodeError>,
}

impl TaskRequest {
    pub fn new(
        task_name: impl Into<String>,
        operator_type: impl Into<String>,
        config: Config,
    ) -> Self {
        Self {
            task_name: task_name.into(),
            operator_type: operator_type.into(),
            config,
            decode_error: None,
        }
    }

    pub fn with_decode_error(mut self, err: DecodeError) -> Self {
        self.decode_error = Some(err);
        self
    }

    /// The task config, or the decode failure if the definition held an
    /// undecodable value
    pub fn decoded_config(&self) -> Result<&Config, DecodeError> {
        match &self.decode_error {
            Some(err) => Err(err.clone()),
            None => Ok(&self.config),
        }
    }
}

/// What an operator returns to the host on success
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskResult {
    /// Subtasks the host should expand under the current task
    pub subtask_config: Option<Config>,
}

impl TaskResult {
    pub fn with_subtasks(subtask_config: Config) -> Self {
        Self {
            subtask_config: Some(subtask_config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoded_config() {
        let mut config = Config::new();
        config.set(COMMAND_KEY, "x");
        let request = TaskRequest::new("+t", "fail", config.clone());
        assert_eq!(request.decoded_config(), Ok(&config));

        let err = DecodeError {
            path: "_command".to_string(),
            reason: "tagged value '!x' is not supported".to_string(),
        };
        let request = request.with_decode_error(err.clone());
        assert_eq!(request.decoded_config(), Err(err));
    }
}
