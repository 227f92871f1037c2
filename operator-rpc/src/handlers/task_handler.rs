use crate::error::{RpcError, RpcResult};
use crate::outcome::TaskOutcome;

use operator_service::{ExpansionSettings, OperatorRegistry, TaskParser, TaskRequest};
use std::path::Path;

pub struct TaskHandler {
    registry: OperatorRegistry,
}

impl TaskHandler {
    pub fn new(registry: OperatorRegistry) -> Self {
        Self { registry }
    }

    /// Handler with the built-in operators
    pub fn with_settings(settings: ExpansionSettings) -> Self {
        Self::new(OperatorRegistry::with_defaults(settings))
    }

    pub fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    pub fn parse_from_file<P: AsRef<Path>>(&self, path: P) -> RpcResult<Vec<TaskRequest>> {
        Ok(TaskParser::parse_file(path)?)
    }

    pub fn parse_from_str(&self, content: &str) -> RpcResult<Vec<TaskRequest>> {
        Ok(TaskParser::parse(content)?)
    }

    /// Keep only the task called `name` (the leading `+` is optional)
    pub fn select(&self, requests: Vec<TaskRequest>, name: &str) -> RpcResult<Vec<TaskRequest>> {
        let wanted = if name.starts_with('+') {
            name.to_string()
        } else {
            format!("+{}", name)
        };

        let selected: Vec<_> = requests
            .into_iter()
            .filter(|request| request.task_name == wanted)
            .collect();

        if selected.is_empty() {
            return Err(RpcError::InvalidRequest(format!("no task named '{}'", wanted)));
        }
        Ok(selected)
    }

    pub fn run_task(&self, request: TaskRequest) -> TaskOutcome {
        let task = request.task_name.clone();
        TaskOutcome::from_result(task, self.registry.run(request))
    }

    /// Run tasks in order. Stops after the first failure unless
    /// `keep_going` is set.
    pub fn run_all(&self, requests: Vec<TaskRequest>, keep_going: bool) -> Vec<TaskOutcome> {
        let mut outcomes = Vec::with_capacity(requests.len());
        for request in requests {
            let outcome = self.run_task(request);
            let failed = !outcome.is_success();
            outcomes.push(outcome);

            if failed && !keep_going {
                tracing::debug!("stopping after first failed task");
                break;
            }
        }
        outcomes
    }
}

impl Default for TaskHandler {
    fn default() -> Self {
        Self::with_settings(ExpansionSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::OutcomeStatus;

    const TASKS: &str = r#"
+first:
  for_each>:
    n: [1, 2]
  _do:
    run: x
+stop:
  fail>: boom
+last:
  for_each>:
    m: [a]
  _do: {}
"#;

    #[test]
    fn test_run_all_stops_at_first_failure() {
        let handler = TaskHandler::default();
        let requests = handler.parse_from_str(TASKS).unwrap();

        let outcomes = handler.run_all(requests, false);

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].is_success());
        assert_eq!(outcomes[0].subtask_count(), 2);
        assert!(!outcomes[1].is_success());
    }

    #[test]
    fn test_run_all_keep_going() {
        let handler = TaskHandler::default();
        let requests = handler.parse_from_str(TASKS).unwrap();

        let outcomes = handler.run_all(requests, true);

        let tasks: Vec<_> = outcomes.iter().map(|o| o.task.as_str()).collect();
        assert_eq!(tasks, vec!["+first", "+stop", "+last"]);
        assert!(outcomes[2].is_success());
    }

    #[test]
    fn test_undecodable_task_is_recorded_as_failure() {
        let handler = TaskHandler::default();
        let requests = handler
            .parse_from_str(
                "+bad:\n  for_each>:\n    size: [a, !secret b]\n  _do: {}\n\
                 +ok:\n  for_each>:\n    n: [1]\n  _do: {}\n",
            )
            .unwrap();

        let outcomes = handler.run_all(requests, true);

        assert_eq!(outcomes.len(), 2);
        match &outcomes[0].status {
            OutcomeStatus::Failed { error } => {
                let message = error.get_string_or("message", "").unwrap();
                assert!(message.starts_with("invalid for_each spec: "));
                assert!(message.contains("for_each>.size[1]"));
                assert_eq!(error.len(), 1);
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(outcomes[1].is_success());
        assert_eq!(outcomes[1].subtask_count(), 1);
    }

    #[test]
    fn test_select_task() {
        let handler = TaskHandler::default();
        let requests = handler.parse_from_str(TASKS).unwrap();

        let selected = handler.select(requests.clone(), "last").unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].task_name, "+last");

        let err = handler.select(requests, "+missing").unwrap_err();
        assert_eq!(err.to_string(), "Invalid request: no task named '+missing'");
    }

    #[test]
    fn test_parse_error_is_service_error() {
        let handler = TaskHandler::default();
        let err = handler.parse_from_str("+x:\n  _do: {}\n").unwrap_err();
        assert!(matches!(err, RpcError::ServiceError(_)));
    }

    #[test]
    fn test_registry_exposes_operator_types() {
        let handler = TaskHandler::default();
        let types: Vec<_> = handler.registry().operator_types().collect();
        assert_eq!(types, vec!["fail", "for_each"]);
    }
}
