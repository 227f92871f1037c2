use crate::output;

use std::path::{Path, PathBuf};

use clap::Args;
use color_eyre::Result;

use operator_rpc::{OutcomeStatus, TaskHandler};

/// Validate a task definition file
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the task definition file
    pub file: PathBuf,
}

pub fn execute(args: ValidateArgs, config: Option<&Path>) -> Result<()> {
    let path = &args.file;

    if !path.exists() {
        color_eyre::eyre::bail!("Task file not found: {}", path.display());
    }

    let handler = TaskHandler::with_settings(super::load_settings(config, false)?);

    // Step 1: Parse task definitions
    output::status("Validating", &format!("{}", path.display()));

    let requests = match handler.parse_from_file(path) {
        Ok(requests) => requests,
        Err(e) => {
            output::error(&format!("Parse error: {}", e));
            std::process::exit(1);
        }
    };

    output::check(&format!("Parsed {} task(s)", requests.len()));

    // Step 2: Expand every task
    let mut failed = 0;
    for outcome in handler.run_all(requests, true) {
        match &outcome.status {
            OutcomeStatus::Success { .. } => {
                output::check(&format!(
                    "{}: {} subtask(s)",
                    outcome.task,
                    outcome.subtask_count()
                ));
            }
            OutcomeStatus::Failed { error } => {
                failed += 1;
                let message = error.get_string_or("message", "").unwrap_or_default();
                output::failure(&format!("{}: {}", outcome.task, message));
            }
        }
    }

    if failed > 0 {
        output::error(&format!("{} task(s) failed to expand", failed));
        std::process::exit(1);
    }

    println!();
    output::success("Task file is valid");

    Ok(())
}
