//! Driven ports: what the application layer needs from the outside world.
//!
//! Implemented by `crudforge-adapters` (local filesystem, JSON store,
//! artisan-backed collaborators) and by in-memory doubles in tests.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ScaffoldPayload;

/// Filesystem failures. `AlreadyExists` is its own variant because the
/// orchestrator branches on it (backup-before-overwrite, write-once files).
#[derive(Debug, Error)]
pub enum FsError {
    #[error("path already exists: {path}")]
    AlreadyExists { path: PathBuf },

    #[error("not found: {path}")]
    NotFound { path: PathBuf },

    #[error("{op} failed at {path}: {reason}")]
    Io {
        op: &'static str,
        path: PathBuf,
        reason: String,
    },
}

impl FsError {
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}

/// Synchronous file store.
///
/// Paths are absolute (the orchestrator joins them against the host
/// application root before calling in).
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn read(&self, path: &Path) -> Result<String, FsError>;

    /// Write, overwriting any existing file.
    fn write(&self, path: &Path, content: &str) -> Result<(), FsError>;

    /// Write, failing with [`FsError::AlreadyExists`] instead of overwriting.
    fn write_new(&self, path: &Path, content: &str) -> Result<(), FsError>;

    fn append(&self, path: &Path, content: &str) -> Result<(), FsError>;

    fn move_file(&self, from: &Path, to: &Path) -> Result<(), FsError>;

    fn remove_file(&self, path: &Path) -> Result<(), FsError>;

    /// Create a directory and all parents.
    fn make_dir(&self, path: &Path) -> Result<(), FsError>;

    /// List the files directly inside `path`.
    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>, FsError>;
}

pub type ScaffoldId = u64;

/// A stored scaffold definition: the raw payload plus its assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldRecord {
    pub id: ScaffoldId,
    pub payload: ScaffoldPayload,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("scaffold {id} not found")]
    NotFound { id: ScaffoldId },

    #[error("scaffold store failure: {reason}")]
    Backend { reason: String },
}

/// Sortable listing columns (mirrors the admin listing's allow-list).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Id,
    TableName,
    ModelName,
    ControllerName,
}

/// Search/sort parameters for listing scaffolds. The search term matches
/// the table, model and controller names.
#[derive(Debug, Clone, Default)]
pub struct ScaffoldFilter {
    pub search: Option<String>,
    pub sort: SortColumn,
    pub descending: bool,
}

/// Scaffold persistence. `save` must replace the record's entire field list
/// atomically — there is no partial field diffing.
#[cfg_attr(test, mockall::automock)]
pub trait ScaffoldStore: Send + Sync {
    fn save(
        &self,
        payload: ScaffoldPayload,
        existing: Option<ScaffoldId>,
    ) -> Result<ScaffoldId, StoreError>;

    fn load(&self, id: ScaffoldId) -> Result<ScaffoldRecord, StoreError>;

    fn list(&self, filter: &ScaffoldFilter) -> Result<Vec<ScaffoldRecord>, StoreError>;

    fn delete(&self, id: ScaffoldId) -> Result<(), StoreError>;
}

/// Failure of an external collaborator (migration runner, route cache,
/// menu registry). Always recoverable at the step boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CollaboratorError(pub String);

#[cfg_attr(test, mockall::automock)]
pub trait MigrationRunner: Send + Sync {
    /// Apply pending migrations and return the runner's output text.
    fn apply_pending(&self) -> Result<String, CollaboratorError>;

    fn table_exists(&self, table: &str) -> Result<bool, CollaboratorError>;

    fn drop_table(&self, table: &str) -> Result<(), CollaboratorError>;
}

/// Best-effort route cache invalidation; failures are logged, never fatal.
#[cfg_attr(test, mockall::automock)]
pub trait RouteCacheInvalidator: Send + Sync {
    fn clear(&self) -> Result<(), CollaboratorError>;
}

/// Admin menu registration, idempotent by uri.
#[cfg_attr(test, mockall::automock)]
pub trait MenuRegistry: Send + Sync {
    /// Returns true when a new entry was created, false when one already
    /// existed for the uri.
    fn ensure_entry(&self, title: &str, uri: &str) -> Result<bool, CollaboratorError>;
}
