// Axis Collection
// Reads the axis section of a for_each task into an ordered axis set

use super::error::ExpansionError;
use crate::config::{Config, ConfigError, Value};

use std::collections::HashSet;

/// A named parameter dimension and its candidate values
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub name: String,
    pub values: Vec<Value>,
}

impl AxisSpec {
    pub fn new<V: Into<Value>>(name: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Axes in declaration order. Immutable once collected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisSet {
    axes: Vec<AxisSpec>,
}

impl AxisSet {
    /// Build an axis set, rejecting duplicate axis names
    pub fn new(axes: Vec<AxisSpec>) -> Result<Self, ExpansionError> {
        let mut seen = HashSet::new();
        for axis in &axes {
            if !seen.insert(axis.name.as_str()) {
                return Err(ExpansionError::invalid_spec(format!(
                    "axis '{}' is declared more than once",
                    axis.name
                )));
            }
        }
        Ok(Self { axes })
    }

    /// Collect axes from a config section mapping axis names to lists
    pub fn collect(section: &Config) -> Result<Self, ExpansionError> {
        let axes = section
            .keys()
            .map(|name| match section.get_list(name) {
                Ok(values) => Ok(AxisSpec::new(name, values.iter().cloned())),
                Err(ConfigError::TypeMismatch { found, .. }) => {
                    Err(ExpansionError::invalid_spec(format!(
                        "axis '{}' must be a list of values, but found {}",
                        name, found
                    )))
                }
                Err(err) => Err(err.into()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { axes })
    }

    pub fn iter(&self) -> impl Iterator<Item = &AxisSpec> {
        self.axes.iter()
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.axes.iter().map(|axis| axis.name.as_str())
    }

    /// Axes that declare no values at all
    pub fn empty_axes(&self) -> impl Iterator<Item = &AxisSpec> {
        self.axes.iter().filter(|axis| axis.is_empty())
    }

    /// Number of combinations the axes produce, `None` on overflow
    pub fn cardinality(&self) -> Option<usize> {
        self.axes
            .iter()
            .try_fold(1usize, |acc, axis| acc.checked_mul(axis.values.len()))
    }
}
