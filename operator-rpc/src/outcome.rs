use operator_service::expansion::PARALLEL_KEY;
use operator_service::{Config, TaskExecutionError, TaskResult};

use serde::Serialize;

/// What the host records for one task
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskOutcome {
    pub task: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success {
        #[serde(skip_serializing_if = "Option::is_none")]
        subtasks: Option<Config>,
    },
    Failed {
        /// Structured `{message}` payload
        error: Config,
    },
}

impl TaskOutcome {
    pub fn from_result(task: impl Into<String>, result: Result<TaskResult, TaskExecutionError>) -> Self {
        let status = match result {
            Ok(result) => OutcomeStatus::Success {
                subtasks: result.subtask_config,
            },
            Err(err) => OutcomeStatus::Failed { error: err.error },
        };
        Self {
            task: task.into(),
            status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Success { .. })
    }

    /// Number of generated subtasks, ignoring the parallel marker
    pub fn subtask_count(&self) -> usize {
        match &self.status {
            OutcomeStatus::Success {
                subtasks: Some(subtasks),
            } => subtasks.keys().filter(|key| *key != PARALLEL_KEY).count(),
            _ => 0,
        }
    }
}
