// for_each Operator
// Repeats the `_do` block once per combination of the axis values

use super::error::TaskExecutionError;
use super::request::{TaskRequest, TaskResult, COMMAND_KEY, DO_KEY, PARALLEL_KEY};
use super::{Operator, OperatorFactory};
use crate::config::ExpansionSettings;
use crate::expansion::{self, ExpansionError, ExpansionResult};

use std::sync::Arc;

pub struct ForEachOperatorFactory {
    settings: Arc<ExpansionSettings>,
}

impl ForEachOperatorFactory {
    pub fn new(settings: ExpansionSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }
}

impl Default for ForEachOperatorFactory {
    fn default() -> Self {
        Self::new(ExpansionSettings::default())
    }
}

impl OperatorFactory for ForEachOperatorFactory {
    fn operator_type(&self) -> &str {
        "for_each"
    }

    fn new_operator(&self, request: TaskRequest) -> Box<dyn Operator> {
        Box::new(ForEachOperator {
            request,
            settings: Arc::clone(&self.settings),
        })
    }
}

struct ForEachOperator {
    request: TaskRequest,
    settings: Arc<ExpansionSettings>,
}

impl ForEachOperator {
    fn expansion(&self) -> Result<ExpansionResult, ExpansionError> {
        let params = self.request.decoded_config()?;

        let template = params.get_nested(DO_KEY)?;
        let axes = params.get_nested(COMMAND_KEY)?;
        let parallel = params.get_bool_or(PARALLEL_KEY, false)?;

        expansion::expand(axes, template, parallel, &self.settings)
    }
}

impl Operator for ForEachOperator {
    fn run(&self) -> Result<TaskResult, TaskExecutionError> {
        let generated = self.expansion()?;
        tracing::info!(
            task = %self.request.task_name,
            subtasks = generated.len(),
            parallel = generated.is_parallel(),
            "generated for_each subtasks"
        );
        Ok(TaskResult::with_subtasks(generated.to_config()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, DecodeError, Value};
    use crate::expansion::ExpansionErrorKind;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn config(json: serde_json::Value) -> Config {
        match json {
            serde_json::Value::Object(map) => map.into(),
            other => panic!("expected object, got {}", other),
        }
    }

    fn run(params: serde_json::Value) -> Result<TaskResult, TaskExecutionError> {
        let factory = ForEachOperatorFactory::default();
        factory
            .new_operator(TaskRequest::new("+loop", "for_each", config(params)))
            .run()
    }

    #[test]
    fn test_end_to_end_parallel_expansion() {
        let result = run(json!({
            "_command": {"size": ["a", "b"], "region": ["us", "eu"]},
            "_do": {"run": "build"},
            "_parallel": true
        }))
        .unwrap();

        let generated = result.subtask_config.unwrap();
        let keys: Vec<_> = generated.keys().collect();
        assert_eq!(
            keys,
            vec![
                "+for-size=a&region=us",
                "+for-size=a&region=eu",
                "+for-size=b&region=us",
                "+for-size=b&region=eu",
                "_parallel",
            ]
        );
        assert_eq!(
            generated.get("+for-size=b&region=us"),
            Some(&Value::from(json!({
                "run": "build",
                "_export": {"size": "b", "region": "us"}
            })))
        );
        assert_eq!(generated.get("_parallel"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_sequential_by_default() {
        let result = run(json!({
            "_command": {"n": [1]},
            "_do": {"run": "x"}
        }))
        .unwrap();

        let generated = result.subtask_config.unwrap();
        assert!(!generated.contains_key("_parallel"));
        assert_eq!(generated.len(), 1);
    }

    #[test]
    fn test_empty_axis_generates_nothing() {
        let result = run(json!({
            "_command": {"a": [], "b": [1, 2]},
            "_do": {"run": "x"},
            "_parallel": true
        }))
        .unwrap();

        assert_eq!(
            result.subtask_config.unwrap(),
            config(json!({"_parallel": true}))
        );
    }

    #[test]
    fn test_missing_do_block_fails() {
        let err = run(json!({"_command": {"n": [1]}})).unwrap_err();
        assert!(err.message.contains("'_do'"));
        assert_eq!(err.error.get("message"), Some(&Value::from(err.message.as_str())));
    }

    #[test]
    fn test_non_list_axis_fails() {
        let err = run(json!({
            "_command": {"n": {"x": 1}},
            "_do": {}
        }))
        .unwrap_err();
        assert!(err.message.starts_with("invalid for_each spec"));
        assert!(err.message.contains("axis 'n'"));
    }

    #[test]
    fn test_undecodable_value_is_invalid_spec() {
        let request = TaskRequest::new(
            "+loop",
            "for_each",
            config(json!({"_do": {"run": "x"}})),
        )
        .with_decode_error(DecodeError {
            path: "for_each>.size[1]".to_string(),
            reason: "tagged value '!secret' is not supported".to_string(),
        });
        let operator = ForEachOperator {
            request,
            settings: Arc::new(ExpansionSettings::default()),
        };

        let err = operator.expansion().unwrap_err();
        assert_eq!(err.kind, ExpansionErrorKind::InvalidSpec);
        assert!(err.message.contains("for_each>.size[1]"));

        let failure = operator.run().unwrap_err();
        assert_eq!(
            failure.error,
            config(json!({"message": err.to_string()}))
        );
    }

    #[test]
    fn test_non_boolean_parallel_fails() {
        let err = run(json!({
            "_command": {"n": [1]},
            "_do": {},
            "_parallel": "sometimes"
        }))
        .unwrap_err();
        assert!(err.message.contains("'_parallel'"));
    }
}
