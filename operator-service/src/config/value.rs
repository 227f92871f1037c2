// Configuration Values
// Dynamically typed, insertion-ordered values carried by task configs

use super::params::Config;

use serde::Serialize;
use serde_json::Number;
use thiserror::Error;

/// A value that could not be decoded from YAML/JSON source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode value at '{path}': {reason}")]
pub struct DecodeError {
    /// Location of the value, e.g. `size[2]` or `_do.env`
    pub path: String,
    pub reason: String,
}

const ROOT_PATH: &str = "<root>";

impl DecodeError {
    fn new(path: &str, reason: impl Into<String>) -> Self {
        Self {
            path: if path.is_empty() {
                ROOT_PATH.to_string()
            } else {
                path.to_string()
            },
            reason: reason.into(),
        }
    }

    /// Re-root the error path under `parent`, e.g. `size[1]` under
    /// `for_each>` becomes `for_each>.size[1]`
    pub fn within(mut self, parent: &str) -> Self {
        self.path = if self.path == ROOT_PATH {
            parent.to_string()
        } else if self.path.starts_with('[') {
            format!("{}{}", parent, self.path)
        } else {
            format!("{}.{}", parent, self.path)
        };
        self
    }
}

/// Runtime value type of task configs.
///
/// Objects keep insertion order, and numbers keep the integer/float
/// distinction they were written with. `Clone` produces a fully
/// independent value tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(Config),
}

impl Value {
    /// Decode a YAML node into a `Value`.
    ///
    /// Tagged nodes, non-finite floats and non-scalar mapping keys are
    /// rejected.
    pub fn from_yaml(yaml: &serde_yaml::Value) -> Result<Value, DecodeError> {
        Self::decode_yaml(yaml, "")
    }

    fn decode_yaml(yaml: &serde_yaml::Value, path: &str) -> Result<Value, DecodeError> {
        match yaml {
            serde_yaml::Value::Null => Ok(Value::Null),
            serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_yaml::Value::Number(n) => Self::decode_yaml_number(n, path),
            serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
            serde_yaml::Value::Sequence(seq) => seq
                .iter()
                .enumerate()
                .map(|(i, item)| Self::decode_yaml(item, &format!("{}[{}]", path, i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            serde_yaml::Value::Mapping(map) => {
                let mut config = Config::new();
                for (k, v) in map {
                    let key = Self::decode_yaml_key(k, path)?;
                    if config.contains_key(&key) {
                        return Err(DecodeError::new(
                            path,
                            format!("key '{}' appears more than once", key),
                        ));
                    }
                    let child_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", path, key)
                    };
                    let value = Self::decode_yaml(v, &child_path)?;
                    config.set(key, value);
                }
                Ok(Value::Object(config))
            }
            serde_yaml::Value::Tagged(tagged) => Err(DecodeError::new(
                path,
                format!("tagged value '{}' is not supported", tagged.tag),
            )),
        }
    }

    fn decode_yaml_number(n: &serde_yaml::Number, path: &str) -> Result<Value, DecodeError> {
        if let Some(i) = n.as_i64() {
            return Ok(Value::Number(Number::from(i)));
        }
        if let Some(u) = n.as_u64() {
            return Ok(Value::Number(Number::from(u)));
        }
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| DecodeError::new(path, format!("number '{}' is not finite", n)))
    }

    /// Decode a mapping key. Scalar keys are converted to strings.
    pub fn key_from_yaml(key: &serde_yaml::Value) -> Result<String, DecodeError> {
        Self::decode_yaml_key(key, "")
    }

    fn decode_yaml_key(key: &serde_yaml::Value, path: &str) -> Result<String, DecodeError> {
        match key {
            serde_yaml::Value::String(s) => Ok(s.clone()),
            serde_yaml::Value::Bool(b) => Ok(b.to_string()),
            serde_yaml::Value::Number(n) => Ok(n.to_string()),
            other => Err(DecodeError::new(
                path,
                format!("mapping key must be a scalar, but found {}", yaml_type_name(other)),
            )),
        }
    }

    /// Human readable type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Config> {
        match self {
            Value::Object(config) => Some(config),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Canonical string form used when rendering subtask names.
    ///
    /// Strings render without quotes, numbers as written, and arrays or
    /// objects as compact JSON.
    pub fn as_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Array(_) | Value::Object(_) => self.to_json(),
        }
    }

    /// Compact JSON rendering
    pub fn to_json(&self) -> String {
        serde_json::Value::from(self).to_string()
    }
}

pub(crate) fn yaml_type_name(yaml: &serde_yaml::Value) -> &'static str {
    match yaml {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "boolean",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(config) => serde_json::Value::Object(
                config
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(map.into()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(Number::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::from(n))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Config> for Value {
    fn from(config: Config) -> Self {
        Value::Object(config)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}
