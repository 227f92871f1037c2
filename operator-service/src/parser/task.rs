// Task Definition Parser
// Reads `+task` definitions with `<operator>>` keys into task requests

use super::error::{suggest_operator_key, ParseError, ParseErrorKind, ParseResult};
use crate::config::value::yaml_type_name;
use crate::config::{Config, DecodeError, Value};
use crate::operator::request::{TaskRequest, COMMAND_KEY, TYPE_KEY};
use crate::ServiceResult;

use std::fs;
use std::path::Path;

/// Parser for task definition files.
///
/// ```yaml
/// +repeat:
///   for_each>:
///     size: [a, b]
///   _parallel: true
///   _do:
///     echo>: ${size}
/// ```
pub struct TaskParser;

impl TaskParser {
    /// Parse task definitions from a file path
    pub fn parse_file<P: AsRef<Path>>(path: P) -> ServiceResult<Vec<TaskRequest>> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content)?)
    }

    /// Parse task definitions from YAML (or JSON) content.
    ///
    /// Top-level keys starting with `+` are tasks, returned in declaration
    /// order; other top-level keys are ignored. Each task is decoded on its
    /// own: an undecodable value is recorded on that task's request
    /// instead of failing the whole file.
    pub fn parse(content: &str) -> ParseResult<Vec<TaskRequest>> {
        let yaml: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| ParseError::from_yaml_error(&e, content))?;

        let root = match &yaml {
            serde_yaml::Value::Mapping(root) => root,
            serde_yaml::Value::Null => return Ok(Vec::new()),
            _ => {
                return Err(ParseError::new(
                    "task file must be a mapping of task names to definitions",
                    1,
                    1,
                )
                .with_source_context(content, 2))
            }
        };

        let mut requests = Vec::new();
        for (key, definition) in root {
            let name = Value::key_from_yaml(key).map_err(|e| {
                ParseError::new(e.to_string(), 0, 0).with_kind(ParseErrorKind::InvalidValue)
            })?;
            if !name.starts_with('+') {
                tracing::debug!(key = %name, "ignoring top-level key that is not a task");
                continue;
            }
            requests.push(Self::parse_task(&name, definition, content)?);
        }

        Ok(requests)
    }

    fn parse_task(
        name: &str,
        definition: &serde_yaml::Value,
        source: &str,
    ) -> ParseResult<TaskRequest> {
        let (line, column) = locate_key(source, name);
        let schema_error = |message: String| {
            ParseError::new(message, line, column).with_source_context(source, 2)
        };

        let task = match definition {
            serde_yaml::Value::Mapping(task) => task,
            other => {
                return Err(schema_error(format!(
                    "task '{}' must be a mapping, but found {}",
                    name,
                    yaml_type_name(other)
                )))
            }
        };

        let mut decode_error: Option<DecodeError> = None;
        let mut entries: Vec<(String, &serde_yaml::Value)> = Vec::with_capacity(task.len());
        for (key, value) in task {
            match Value::key_from_yaml(key) {
                Ok(key) if entries.iter().any(|(seen, _)| *seen == key) => {
                    decode_error.get_or_insert(DecodeError {
                        path: key.clone(),
                        reason: format!("key '{}' appears more than once", key),
                    });
                }
                Ok(key) => entries.push((key, value)),
                Err(err) => {
                    decode_error.get_or_insert(err);
                }
            }
        }

        let operator_keys: Vec<&str> = entries
            .iter()
            .map(|(key, _)| key.as_str())
            .filter(|key| key.ends_with('>'))
            .collect();
        let operator_key = match operator_keys.as_slice() {
            [key] => key.to_string(),
            [] => {
                let keys: Vec<&str> = entries.iter().map(|(key, _)| key.as_str()).collect();
                let mut err = schema_error(format!("task '{}' has no operator", name));
                err.suggestion = suggest_operator_key(&keys);
                return Err(err);
            }
            _ => {
                return Err(schema_error(format!(
                    "task '{}' declares more than one operator: {}",
                    name,
                    operator_keys.join(", ")
                )))
            }
        };

        let operator_type = operator_key.trim_end_matches('>');
        if operator_type.is_empty() {
            return Err(schema_error(format!("task '{}' has an empty operator name", name)));
        }

        let mut config = Config::new();
        for (key, value) in entries {
            let value = match Value::from_yaml(value) {
                Ok(value) => value,
                Err(err) => {
                    decode_error.get_or_insert(err.within(&key));
                    continue;
                }
            };
            if key == operator_key {
                config.set(TYPE_KEY, operator_type);
                config.set(COMMAND_KEY, value);
            } else {
                config.set(key, value);
            }
        }

        let request = TaskRequest::new(name, operator_type, config);
        match decode_error {
            Some(err) => {
                tracing::debug!(task = %name, error = %err, "task holds an undecodable value");
                Ok(request.with_decode_error(err))
            }
            None => Ok(request),
        }
    }
}

/// Position of a top-level key in the source, or (0, 0) when not found
fn locate_key(source: &str, key: &str) -> (usize, usize) {
    source
        .lines()
        .enumerate()
        .find(|(_, line)| {
            line.trim_start_matches(['"', '\''])
                .strip_prefix(key)
                .map(|rest| rest.trim_start_matches(['"', '\'']).trim_start().starts_with(':'))
                .unwrap_or(false)
        })
        .map(|(i, _)| (i + 1, 1))
        .unwrap_or((0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;

    fn config(json: serde_json::Value) -> Config {
        match json {
            serde_json::Value::Object(map) => map.into(),
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_parse_for_each_task() {
        let source = r#"
timezone: UTC

+repeat:
  for_each>:
    size: [a, b]
    region: [us, eu]
  _parallel: true
  _do:
    echo>: ${size}
"#;

        let requests = TaskParser::parse(source).unwrap();
        assert_eq!(requests.len(), 1);

        let request = &requests[0];
        assert_eq!(request.task_name, "+repeat");
        assert_eq!(request.operator_type, "for_each");
        assert_eq!(
            request.config,
            config(json!({
                "_type": "for_each",
                "_command": {"size": ["a", "b"], "region": ["us", "eu"]},
                "_parallel": true,
                "_do": {"echo>": "${size}"}
            }))
        );

        let keys: Vec<_> = request.config.keys().collect();
        assert_eq!(keys, vec!["_type", "_command", "_parallel", "_do"]);
    }

    #[test]
    fn test_parse_preserves_task_order() {
        let source = "+b:\n  fail>: one\n+a:\n  fail>: two\n";
        let names: Vec<_> = TaskParser::parse(source)
            .unwrap()
            .into_iter()
            .map(|r| r.task_name)
            .collect();
        assert_eq!(names, vec!["+b", "+a"]);
    }

    #[test]
    fn test_parse_json_content() {
        let source = r#"{"+loop": {"for_each>": {"n": [1, 2]}, "_do": {"echo>": "x"}}}"#;
        let requests = TaskParser::parse(source).unwrap();
        assert_eq!(requests[0].operator_type, "for_each");
    }

    #[test]
    fn test_parse_empty_file() {
        assert!(TaskParser::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_missing_operator_suggests_fix() {
        let source = "+ok:\n  fail>: x\n+loop:\n  for_each:\n    n: [1]\n";
        let err = TaskParser::parse(source).unwrap_err();

        assert_eq!(err.kind, ParseErrorKind::InvalidSchema);
        assert_eq!(err.message, "task '+loop' has no operator");
        assert_eq!(err.line, 3);
        assert_eq!(
            err.suggestion.as_deref(),
            Some("did you mean 'for_each>'? operator keys end with '>'")
        );
    }

    #[test]
    fn test_multiple_operators_rejected() {
        let source = "+x:\n  fail>: a\n  for_each>: {}\n";
        let err = TaskParser::parse(source).unwrap_err();
        assert!(err.message.contains("more than one operator"));
    }

    #[test]
    fn test_task_must_be_mapping() {
        let err = TaskParser::parse("+x: [1, 2]\n").unwrap_err();
        assert!(err.message.contains("must be a mapping, but found sequence"));
    }

    #[test]
    fn test_root_must_be_mapping() {
        let err = TaskParser::parse("- a\n- b\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidSchema);
    }

    #[test]
    fn test_undecodable_value_is_kept_on_its_task() {
        let source = "+loop:\n  for_each>:\n    n: [1, !odd 2]\n  _do: {}\n+ok:\n  fail>: x\n";
        let requests = TaskParser::parse(source).unwrap();
        assert_eq!(requests.len(), 2);

        let err = requests[0].decode_error.as_ref().unwrap();
        assert_eq!(err.path, "for_each>.n[1]");
        assert!(err.reason.contains("!odd"));
        assert_eq!(requests[0].operator_type, "for_each");
        assert!(!requests[0].config.contains_key("_command"));
        assert_eq!(requests[0].config.get("_do"), Some(&Value::Object(Config::new())));

        assert_eq!(requests[1].decode_error, None);
    }

    #[test]
    fn test_colliding_task_keys_are_kept_on_its_task() {
        let source = "+loop:\n  for_each>:\n    1: [a, b]\n    \"1\": [c]\n  _do: {}\n";
        let requests = TaskParser::parse(source).unwrap();

        let err = requests[0].decode_error.as_ref().unwrap();
        assert_eq!(err.path, "for_each>");
        assert_eq!(err.reason, "key '1' appears more than once");
    }

    #[test]
    fn test_non_scalar_top_level_key() {
        let err = TaskParser::parse("? [a, b]\n: 1\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidValue);
    }

    #[test]
    fn test_ignored_keys_are_not_decoded() {
        let source = "secret: !vault abc\n+stop:\n  fail>: halt\n";
        let requests = TaskParser::parse(source).unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].decode_error, None);
    }

    #[test]
    fn test_yaml_syntax_error() {
        let err = TaskParser::parse("+loop:\n  for_each>: [a, b\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::YamlSyntax);
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "+stop:\n  fail>: halt\n").unwrap();

        let requests = TaskParser::parse_file(file.path()).unwrap();
        assert_eq!(requests[0].config.get("_command"), Some(&Value::from("halt")));
    }
}
