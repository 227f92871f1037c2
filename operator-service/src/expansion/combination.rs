// Combination Expansion
// Folds an axis set into the ordered cartesian product of its values

use super::axis::AxisSet;
use crate::config::{Config, Value};

/// One selection of exactly one value per axis, in axis order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Combination {
    bindings: Config,
}

impl Combination {
    /// The combination with no bindings
    pub fn identity() -> Self {
        Self::default()
    }

    fn with_binding(&self, name: &str, value: &Value) -> Self {
        let mut bindings = self.bindings.clone();
        bindings.set(name, value.clone());
        Self { bindings }
    }

    pub fn bindings(&self) -> &Config {
        &self.bindings
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl FromIterator<(String, Value)> for Combination {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

/// Cartesian product expander
pub struct CombinationExpander;

impl CombinationExpander {
    /// Expand axes into combinations, last-declared axis varying fastest.
    ///
    /// An empty axis set yields the single identity combination. Any axis
    /// without values yields no combinations at all, whatever the other
    /// axes contain.
    pub fn expand(axes: &AxisSet) -> Vec<Combination> {
        axes.iter()
            .fold(vec![Combination::identity()], |seeds, axis| {
                let mut next = Vec::with_capacity(seeds.len() * axis.values.len());
                for seed in &seeds {
                    for value in &axis.values {
                        next.push(seed.with_binding(&axis.name, value));
                    }
                }
                next
            })
    }
}
