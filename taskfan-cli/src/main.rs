mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use commands::expand::ExpandArgs;
use commands::validate::ValidateArgs;

#[derive(Parser, Debug)]
#[command(name = "taskfan")]
#[command(about = "Expand for_each task definitions into named subtasks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to an expansion settings file (default: ~/.taskfan/settings.yaml)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every task in a file and print the generated subtasks
    Expand(ExpandArgs),

    /// Check that every task in a file parses and expands
    Validate(ValidateArgs),

    /// List the registered operator types
    Operators,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Expand(args) => commands::expand::execute(args, cli.config.as_deref()),
        Command::Validate(args) => commands::validate::execute(args, cli.config.as_deref()),
        Command::Operators => commands::operators::execute(cli.config.as_deref()),
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let filter = if verbose || quiet {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_expand_flags() {
        let cli = Cli::parse_from([
            "taskfan",
            "-v",
            "expand",
            "tasks.yaml",
            "--task",
            "loop",
            "--format",
            "json",
            "--percent-encode",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Command::Expand(args) => {
                assert_eq!(args.file, PathBuf::from("tasks.yaml"));
                assert_eq!(args.task.as_deref(), Some("loop"));
                assert_eq!(args.format, commands::expand::OutputFormat::Json);
                assert!(args.percent_encode);
                assert!(!args.keep_going);
            }
            other => panic!("expected expand, got {:?}", other),
        }
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["taskfan", "-v", "-q", "operators"]).is_err());
    }
}
