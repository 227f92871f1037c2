// Subtask Materialization
// Turns combinations into named subtask configs derived from a template

use super::combination::Combination;
use super::error::ExpansionError;
use super::naming::build_task_name;
use crate::config::{Config, ExpansionSettings};

use indexmap::map::Entry;
use indexmap::IndexMap;

/// Advisory flag in task configs and rendered subtask configs: generated
/// subtasks may run concurrently
pub const PARALLEL_KEY: &str = "_parallel";

/// A generated unit of work
#[derive(Debug, Clone, PartialEq)]
pub struct Subtask {
    pub name: String,
    pub config: Config,
}

/// Named subtasks in combination order, plus the parallel marker
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpansionResult {
    subtasks: IndexMap<String, Config>,
    parallel: bool,
}

impl ExpansionResult {
    pub fn len(&self) -> usize {
        self.subtasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subtasks.is_empty()
    }

    /// Whether the subtasks may run concurrently
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.subtasks.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Config> {
        self.subtasks.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Config> {
        self.subtasks.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Config)> {
        self.subtasks.iter()
    }

    pub fn into_subtasks(self) -> Vec<Subtask> {
        self.subtasks
            .into_iter()
            .map(|(name, config)| Subtask { name, config })
            .collect()
    }

    /// Render as the subtask config handed to the host: one entry per
    /// subtask, followed by `_parallel: true` when the marker is set
    pub fn to_config(&self) -> Config {
        let mut generated: Config = self
            .subtasks
            .iter()
            .map(|(name, config)| (name.clone(), config.clone().into()))
            .collect();
        if self.parallel {
            generated.set(PARALLEL_KEY, true);
        }
        generated
    }
}

/// Clones the template once per combination and binds the combination
/// into the copy's export section
pub struct SubtaskMaterializer<'a> {
    settings: &'a ExpansionSettings,
}

impl<'a> SubtaskMaterializer<'a> {
    pub fn new(settings: &'a ExpansionSettings) -> Self {
        Self { settings }
    }

    pub fn materialize(
        &self,
        template: &Config,
        combinations: &[Combination],
        parallel: bool,
    ) -> Result<ExpansionResult, ExpansionError> {
        let mut subtasks = IndexMap::with_capacity(combinations.len());

        for combination in combinations {
            let subtask = self.materialize_one(template, combination)?;
            if subtask.name == PARALLEL_KEY {
                return Err(ExpansionError::invalid_spec(format!(
                    "subtask name '{}' is reserved for the parallel marker",
                    PARALLEL_KEY
                )));
            }
            match subtasks.entry(subtask.name) {
                Entry::Occupied(entry) => {
                    return Err(ExpansionError::duplicate_name(format!(
                        "'{}' is generated by more than one combination; \
                         values must not contain the name separators",
                        entry.key()
                    )));
                }
                Entry::Vacant(entry) => {
                    entry.insert(subtask.config);
                }
            }
        }

        Ok(ExpansionResult { subtasks, parallel })
    }

    fn materialize_one(
        &self,
        template: &Config,
        combination: &Combination,
    ) -> Result<Subtask, ExpansionError> {
        let mut config = template.clone();
        config
            .get_nested_or_set_empty(&self.settings.export_key)?
            .set_all(combination.bindings());

        Ok(Subtask {
            name: build_task_name(combination, self.settings),
            config,
        })
    }
}
