//! Unified error handling for the crudforge core.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DomainError, ErrorCategory};
use crate::generators::GeneratorError;

/// Root error type for core operations.
#[derive(Debug, Error)]
pub enum CrudforgeError {
    /// Scaffold/field invariant violations (rejected input).
    #[error("validation: {0}")]
    Domain(#[from] DomainError),

    /// Orchestration failures (store, filesystem).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Artifact rendering failures.
    #[error("generator: {0}")]
    Generator(#[from] GeneratorError),
}

impl CrudforgeError {
    /// Error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category(),
            Self::Application(e) => e.category(),
            Self::Generator(_) => ErrorCategory::Internal,
        }
    }

    /// User-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Generator(_) => vec![
                "A stub hole was left unresolved; this is a bug, please report it".into(),
            ],
        }
    }
}

/// Convenient result alias.
pub type CrudforgeResult<T> = Result<T, CrudforgeError>;
