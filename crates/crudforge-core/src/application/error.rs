//! Application layer errors: orchestration failures, not business logic.

use thiserror::Error;

use crate::application::ports::{FsError, StoreError};
use crate::domain::ErrorCategory;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("scaffold store: {0}")]
    Store(#[from] StoreError),

    #[error("filesystem: {0}")]
    Filesystem(#[from] FsError),
}

impl ApplicationError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Store(StoreError::NotFound { .. }) => ErrorCategory::NotFound,
            Self::Store(_) | Self::Filesystem(_) => ErrorCategory::Internal,
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Store(StoreError::NotFound { id }) => vec![
                format!("No scaffold with id {id}"),
                "Run `crudforge list` to see stored scaffolds".into(),
            ],
            Self::Store(_) => vec![
                "The scaffold store could not be read or written".into(),
                "Check the store file and its permissions".into(),
            ],
            Self::Filesystem(FsError::AlreadyExists { path }) => vec![
                format!("A file already exists at {}", path.display()),
            ],
            Self::Filesystem(_) => vec![
                "Check that the host application root is correct".into(),
                "Ensure you have write permissions".into(),
            ],
        }
    }
}
