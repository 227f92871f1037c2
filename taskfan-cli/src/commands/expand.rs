use crate::output;

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use color_eyre::Result;

use operator_rpc::{TaskHandler, TaskOutcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Run the tasks in a file and print the generated subtasks
#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// Path to the task definition file
    pub file: PathBuf,

    /// Only run this task (the leading '+' is optional)
    #[arg(short, long, value_name = "NAME")]
    pub task: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Percent-encode axis names and values in subtask names
    #[arg(long)]
    pub percent_encode: bool,

    /// Keep running tasks after one fails
    #[arg(short, long)]
    pub keep_going: bool,
}

pub fn execute(args: ExpandArgs, config: Option<&Path>) -> Result<()> {
    if !args.file.exists() {
        color_eyre::eyre::bail!("Task file not found: {}", args.file.display());
    }

    let settings = super::load_settings(config, args.percent_encode)?;
    let handler = TaskHandler::with_settings(settings);

    output::status("Expanding", &format!("{}", args.file.display()));

    let mut requests = match handler.parse_from_file(&args.file) {
        Ok(requests) => requests,
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(1);
        }
    };

    if let Some(name) = &args.task {
        requests = handler.select(requests, name)?;
    }

    if requests.is_empty() {
        output::dim("  No tasks defined");
        return Ok(());
    }

    let outcomes = handler.run_all(requests, args.keep_going);
    println!("{}", render(&outcomes, args.format)?);

    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    if failed > 0 {
        output::error(&format!("{} task(s) failed", failed));
        std::process::exit(1);
    }

    output::success(&format!("{} task(s) expanded", outcomes.len()));
    Ok(())
}

fn render(outcomes: &[TaskOutcome], format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(outcomes)?,
        OutputFormat::Json => serde_json::to_string_pretty(outcomes)?,
    };
    Ok(rendered.trim_end().to_string())
}
