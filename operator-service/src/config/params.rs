// Task Config
// Insertion-ordered parameter maps with typed accessors

use super::value::Value;

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

/// Errors raised by typed config accessors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("parameter '{0}' is required but not set")]
    Missing(String),

    #[error("parameter '{key}' must be {expected}, but found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl ConfigError {
    fn mismatch(key: &str, expected: &'static str, found: &Value) -> Self {
        ConfigError::TypeMismatch {
            key: key.to_string(),
            expected,
            found: found.type_name(),
        }
    }
}

/// An ordered mapping of parameter names to values.
///
/// Iteration order is insertion order; re-setting an existing key keeps
/// its original position. `Clone` yields a deep, independent copy.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Config {
    entries: IndexMap<String, Value>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Set a value, replacing any previous value under the same key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Copy every entry of `other` into this config, overwriting
    /// identically named keys
    pub fn set_all(&mut self, other: &Config) -> &mut Self {
        for (key, value) in other.iter() {
            self.entries.insert(key.clone(), value.clone());
        }
        self
    }

    /// Get a nested object that must be present
    pub fn get_nested(&self, key: &str) -> Result<&Config, ConfigError> {
        match self.entries.get(key) {
            None => Err(ConfigError::Missing(key.to_string())),
            Some(Value::Object(config)) => Ok(config),
            Some(other) => Err(ConfigError::mismatch(key, "an object", other)),
        }
    }

    /// Get a nested object for modification, inserting an empty one if
    /// the key is absent or null
    pub fn get_nested_or_set_empty(&mut self, key: &str) -> Result<&mut Config, ConfigError> {
        let slot = match self.entries.entry(key.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(Value::Object(Config::new())),
        };
        if slot.is_null() {
            *slot = Value::Object(Config::new());
        }
        match slot {
            Value::Object(config) => Ok(config),
            other => Err(ConfigError::mismatch(key, "an object", other)),
        }
    }

    /// Get a list that must be present
    pub fn get_list(&self, key: &str) -> Result<&[Value], ConfigError> {
        match self.entries.get(key) {
            None => Err(ConfigError::Missing(key.to_string())),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(ConfigError::mismatch(key, "a list", other)),
        }
    }

    /// Get a boolean, falling back to `default` when absent or null.
    /// The strings "true" and "false" are accepted.
    pub fn get_bool_or(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.entries.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) if s == "true" => Ok(true),
            Some(Value::String(s)) if s == "false" => Ok(false),
            Some(other) => Err(ConfigError::mismatch(key, "a boolean", other)),
        }
    }

    /// Get a string, falling back to `default` when absent or null.
    /// Scalars are rendered to their string form.
    pub fn get_string_or(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        match self.entries.get(key) {
            None | Some(Value::Null) => Ok(default.to_string()),
            Some(value @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => {
                Ok(value.as_string())
            }
            Some(other) => Err(ConfigError::mismatch(key, "a string", other)),
        }
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Config {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            entries: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
        }
    }
}

impl FromIterator<(String, Value)> for Config {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Config {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
