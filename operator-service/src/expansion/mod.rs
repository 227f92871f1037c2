// Expansion Module
// Axis collection, cartesian expansion and subtask materialization for for_each

pub mod axis;
pub mod combination;
pub mod error;
pub mod materialize;
pub mod naming;

// Re-export key types
pub use axis::{AxisSet, AxisSpec};
pub use combination::{Combination, CombinationExpander};
pub use error::{ExpansionError, ExpansionErrorKind};
pub use materialize::{ExpansionResult, Subtask, SubtaskMaterializer, PARALLEL_KEY};
pub use naming::build_task_name;

use crate::config::{Config, ExpansionSettings};

/// Run the full expansion: collect axes from `axes_section`, expand them,
/// and materialize one subtask per combination from `template`.
pub fn expand(
    axes_section: &Config,
    template: &Config,
    parallel: bool,
    settings: &ExpansionSettings,
) -> Result<ExpansionResult, ExpansionError> {
    let axes = AxisSet::collect(axes_section)?;

    for axis in axes.empty_axes() {
        tracing::warn!(
            axis = %axis.name,
            "axis has no values; for_each generates no subtasks"
        );
    }

    let combinations = CombinationExpander::expand(&axes);
    tracing::debug!(
        axes = axes.len(),
        combinations = combinations.len(),
        parallel,
        "expanded for_each axes"
    );

    SubtaskMaterializer::new(settings).materialize(template, &combinations, parallel)
}
