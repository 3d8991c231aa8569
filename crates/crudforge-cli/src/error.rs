//! Structured CLI errors with user-friendly messages, actionable
//! suggestions and exit-code mapping.

use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;
use tracing::error;

use crudforge_adapters::IntrospectError;
use crudforge_core::domain::ErrorCategory;
use crudforge_core::error::CrudforgeError;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input (validation failed before reaching the core).
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// A scaffold definition file could not be read or parsed.
    #[error("Cannot load definition {path}: {reason}")]
    DefinitionParse { path: PathBuf, reason: String },

    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// An error propagated from the core.
    #[error("Scaffolding failed: {0}")]
    Core(#[from] CrudforgeError),

    /// Schema introspection failed (database client, parsing).
    #[error("Introspection failed: {0}")]
    Introspection(#[from] IntrospectError),

    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Operation cancelled by user.
    #[error("Operation cancelled")]
    Cancelled,

    /// Feature not compiled in (e.g. interactive prompts).
    #[error("Feature not available: {feature}")]
    FeatureNotAvailable { feature: &'static str },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Map to the documented exit codes:
    /// 1 internal, 2 user input, 3 not found, 4 configuration.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidInput { .. } | Self::DefinitionParse { .. } => 2,
            Self::ConfigError { .. } => 4,
            Self::Core(e) => match e.category() {
                ErrorCategory::Validation => 2,
                ErrorCategory::NotFound => 3,
                ErrorCategory::Internal => 1,
            },
            Self::Cancelled => 1,
            _ => 1,
        }
    }

    /// User-actionable suggestions, rendered under the error message.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Core(e) => e.suggestions(),
            Self::DefinitionParse { .. } => vec![
                "Definitions are TOML or JSON files deserializing into a scaffold payload".into(),
                "See `crudforge generate --help` for an example".into(),
            ],
            Self::ConfigError { .. } => vec![
                "Run `crudforge config init` to write a default crudforge.toml".into(),
            ],
            Self::Introspection(_) => vec![
                "Check that the database client (mysql/psql) is installed and reachable".into(),
                "Credentials can be passed via --user/--password".into(),
            ],
            Self::FeatureNotAvailable { feature } => vec![
                format!("Rebuild with the '{feature}' feature enabled, or pass --yes"),
            ],
            _ => Vec::new(),
        }
    }

    /// Emit a structured log event at the right severity.
    pub fn log(&self) {
        error!(error = %self, exit_code = self.exit_code(), "command failed");
    }

    /// Render the error (and its suggestions) for stderr.
    pub fn render(&self, use_color: bool) -> String {
        let mut out = if use_color {
            format!("{} {}", "error:".red().bold(), self)
        } else {
            format!("error: {self}")
        };
        for suggestion in self.suggestions() {
            if use_color {
                out.push_str(&format!("\n  {} {}", "hint:".yellow(), suggestion));
            } else {
                out.push_str(&format!("\n  hint: {suggestion}"));
            }
        }
        out
    }
}
