//! Flags available on every subcommand.

use std::path::PathBuf;

use clap::{ArgAction, Args, ValueEnum};

/// How to render command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human when stdout is a terminal, plain otherwise.
    Auto,
    Human,
    Plain,
    Json,
}

/// Global arguments, flattened into the top-level parser.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output.
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output.
    #[arg(long = "no-color", global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Path to a configuration file (defaults to ./crudforge.toml).
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "auto", global = true)]
    pub output_format: OutputFormat,
}
