//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "crudforge",
    bin_name = "crudforge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Database-driven CRUD scaffolding for admin panels",
    long_about = "Crudforge turns a table definition (columns, UI hints, option \
                  sources) into the correlated source artifacts of an admin \
                  application: model, migration, admin/API/web controllers, \
                  views and tests — and wires the routes up idempotently.",
    after_help = "EXAMPLES:\n\
        \x20 crudforge generate posts.toml\n\
        \x20 crudforge generate posts.toml --apply model,migration --dry-run\n\
        \x20 crudforge list --search post\n\
        \x20 crudforge seed --dialect mysql --database shop --remove-prefix app_\n\
        \x20 crudforge completions bash > /usr/share/bash-completion/completions/crudforge",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Save a scaffold definition and generate its artifacts.
    #[command(
        visible_alias = "g",
        about = "Generate artifacts from a scaffold definition",
        after_help = "EXAMPLES:\n\
            \x20 crudforge generate posts.toml\n\
            \x20 crudforge generate posts.json --id 3\n\
            \x20 crudforge generate posts.toml --apply model,migration,api --dry-run"
    )]
    Generate(GenerateArgs),

    /// List stored scaffolds.
    #[command(
        visible_alias = "ls",
        about = "List stored scaffolds",
        after_help = "EXAMPLES:\n\
            \x20 crudforge list\n\
            \x20 crudforge list --search post --sort table --desc\n\
            \x20 crudforge list --format json"
    )]
    List(ListArgs),

    /// Delete a scaffold, backing up its generated files.
    #[command(
        visible_alias = "rm",
        about = "Delete a stored scaffold",
        after_help = "EXAMPLES:\n\
            \x20 crudforge delete 3\n\
            \x20 crudforge delete 3 --yes"
    )]
    Delete(DeleteArgs),

    /// Re-run generation for every stored scaffold.
    #[command(
        about = "Regenerate artifacts for all stored scaffolds",
        after_help = "EXAMPLES:\n\
            \x20 crudforge regenerate"
    )]
    Regenerate(RegenerateArgs),

    /// Seed scaffold definitions from a live database schema.
    #[command(
        about = "Seed scaffolds from a live database",
        after_help = "EXAMPLES:\n\
            \x20 crudforge seed --dialect mysql --database shop --user root\n\
            \x20 crudforge seed --dialect postgres --database shop --schema public"
    )]
    Seed(SeedArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 crudforge completions bash > ~/.local/share/bash-completion/completions/crudforge\n\
            \x20 crudforge completions zsh  > ~/.zfunc/_crudforge"
    )]
    Completions(CompletionsArgs),

    /// Inspect or initialise the configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 crudforge config show\n\
            \x20 crudforge config init"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `crudforge generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Scaffold definition file (TOML or JSON).
    #[arg(value_name = "DEFINITION")]
    pub definition: PathBuf,

    /// Update this stored scaffold id instead of matching by table name.
    #[arg(long, value_name = "ID")]
    pub id: Option<u64>,

    /// Override the definition's creation options (comma-separated).
    #[arg(long = "apply", value_delimiter = ',', value_name = "OPTIONS")]
    pub apply: Vec<String>,

    /// Render everything but write nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Host application root (overrides the configured path).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Sortable listing columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortArg {
    #[default]
    Id,
    Table,
    Model,
    Controller,
}

/// Arguments for `crudforge list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Filter by table, model or controller name.
    #[arg(long, value_name = "TERM")]
    pub search: Option<String>,

    /// Sort column.
    #[arg(long, value_enum, default_value = "id")]
    pub sort: SortArg,

    /// Sort descending.
    #[arg(long)]
    pub desc: bool,
}

// ── delete ────────────────────────────────────────────────────────────────────

/// Arguments for `crudforge delete`.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Id of the scaffold to delete.
    pub id: u64,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Host application root (overrides the configured path).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

// ── regenerate ────────────────────────────────────────────────────────────────

/// Arguments for `crudforge regenerate`.
#[derive(Debug, Args)]
pub struct RegenerateArgs {
    /// Host application root (overrides the configured path).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

// ── seed ──────────────────────────────────────────────────────────────────────

/// Database dialect for seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    Mysql,
    Postgres,
}

/// Arguments for `crudforge seed`.
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Database dialect.
    #[arg(long, value_enum)]
    pub dialect: DialectArg,

    /// Database name.
    #[arg(long, value_name = "NAME")]
    pub database: String,

    /// Database host.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Database port (dialect default when omitted).
    #[arg(long)]
    pub port: Option<u16>,

    /// Database user.
    #[arg(long, default_value = "root")]
    pub user: String,

    /// Database password (falls back to DB_PASSWORD).
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// PostgreSQL schema.
    #[arg(long, default_value = "public")]
    pub schema: String,

    /// Strip this prefix from table names before deriving model names.
    #[arg(long, value_name = "PREFIX")]
    pub remove_prefix: Option<String>,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `crudforge completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

// ── config ────────────────────────────────────────────────────────────────────

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the resolved configuration.
    Show,
    /// Write a default crudforge.toml in the current directory.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}
