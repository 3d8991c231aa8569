//! Domain-level errors: violations of the scaffold/field invariants.
//!
//! All variants are validation failures that must be raised **before** any
//! side effect happens — the orchestrator refuses to touch the store or the
//! filesystem once one of these is returned.

use thiserror::Error;

/// Root domain error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("table name cannot be empty")]
    MissingTableName,

    #[error("scaffold for table '{table}' has no fields")]
    EmptyFieldList { table: String },

    #[error("field #{index} has an empty name")]
    EmptyFieldName { index: usize },

    #[error("duplicate field name '{name}'")]
    DuplicateFieldName { name: String },

    #[error("field '{field}': unknown column type '{raw}'")]
    UnknownSqlType { field: String, raw: String },

    #[error("field '{field}': unknown input type '{raw}'")]
    UnknownInputType { field: String, raw: String },

    #[error("unknown creation option '{raw}'")]
    UnknownCreationOption { raw: String },

    #[error("field '{field}': invalid options source: {reason}")]
    InvalidOptionsSource { field: String, reason: String },
}

impl DomainError {
    /// Error category for CLI display.
    pub fn category(&self) -> ErrorCategory {
        // Every domain error is a rejected input today; the enum exists so
        // future variants (e.g. inference failures) can map differently.
        ErrorCategory::Validation
    }

    /// User-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingTableName => vec![
                "Set `table_name` in the scaffold definition".into(),
            ],
            Self::EmptyFieldList { .. } => vec![
                "Add at least one entry to `fields`".into(),
                "The primary key and timestamp columns are implicit and must not be listed".into(),
            ],
            Self::UnknownSqlType { raw, .. } => vec![
                format!("'{raw}' is not a portable column type"),
                "Use one of the migration method names, e.g. string, text, bigInteger, dateTime".into(),
            ],
            Self::UnknownInputType { raw, .. } => vec![
                format!("'{raw}' is not a form widget"),
                "Use one of: text, textarea, number, email, date, file, image, password, hidden, switch, checkbox, radio, select".into(),
            ],
            Self::InvalidOptionsSource { .. } => vec![
                "Use the literal \"static\" with comma-separated value/label lists,".into(),
                "or a fully-qualified model name such as App\\Models\\Status".into(),
            ],
            _ => vec!["Check the scaffold definition file".into()],
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
