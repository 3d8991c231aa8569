//! External-collaborator adapters: the artisan-backed migration runner and
//! route cache, plus the in-memory doubles used in tests and offline runs.

use std::{
    collections::BTreeSet,
    path::PathBuf,
    process::Command,
    sync::{Arc, RwLock},
};

use tracing::{debug, info};

use crudforge_core::application::ports::{
    CollaboratorError, MenuRegistry, MigrationRunner, RouteCacheInvalidator,
};

fn run_artisan(root: &PathBuf, args: &[&str]) -> Result<String, CollaboratorError> {
    debug!(?args, "php artisan");
    let output = Command::new("php")
        .arg("artisan")
        .args(args)
        .current_dir(root)
        .output()
        .map_err(|e| CollaboratorError(format!("spawning php artisan: {e}")))?;

    if !output.status.success() {
        return Err(CollaboratorError(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Migration runner driving the host application's own artisan binary.
#[derive(Debug, Clone)]
pub struct ArtisanMigrationRunner {
    root: PathBuf,
}

impl ArtisanMigrationRunner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl MigrationRunner for ArtisanMigrationRunner {
    fn apply_pending(&self) -> Result<String, CollaboratorError> {
        run_artisan(&self.root, &["migrate", "--force"])
    }

    fn table_exists(&self, table: &str) -> Result<bool, CollaboratorError> {
        let code = format!("echo Schema::hasTable('{table}') ? 1 : 0;");
        let out = run_artisan(&self.root, &["tinker", "--execute", &code])?;
        Ok(out.trim().ends_with('1'))
    }

    fn drop_table(&self, table: &str) -> Result<(), CollaboratorError> {
        let code = format!("Schema::dropIfExists('{table}');");
        run_artisan(&self.root, &["tinker", "--execute", &code]).map(|_| ())
    }
}

/// Route cache invalidation via `php artisan route:clear`.
#[derive(Debug, Clone)]
pub struct ArtisanRouteCache {
    root: PathBuf,
}

impl ArtisanRouteCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl RouteCacheInvalidator for ArtisanRouteCache {
    fn clear(&self) -> Result<(), CollaboratorError> {
        run_artisan(&self.root, &["route:clear"]).map(|_| ())
    }
}

/// No-op invalidator for environments without a running host application.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRouteCache;

impl RouteCacheInvalidator for NullRouteCache {
    fn clear(&self) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

/// Menu registration that only records the intent in the log; real menu
/// rows live in the host admin database, which this tool does not own.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMenuRegistry;

impl MenuRegistry for LoggingMenuRegistry {
    fn ensure_entry(&self, title: &str, uri: &str) -> Result<bool, CollaboratorError> {
        info!(title, uri, "menu entry requested (register it in the admin panel)");
        Ok(true)
    }
}

/// In-memory menu registry double, idempotent by uri.
#[derive(Debug, Clone, Default)]
pub struct MemoryMenuRegistry {
    entries: Arc<RwLock<Vec<(String, String)>>>,
}

impl MemoryMenuRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries.read().expect("menu lock").clone()
    }
}

impl MenuRegistry for MemoryMenuRegistry {
    fn ensure_entry(&self, title: &str, uri: &str) -> Result<bool, CollaboratorError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CollaboratorError("menu lock poisoned".into()))?;
        if entries.iter().any(|(_, u)| u == uri) {
            return Ok(false);
        }
        entries.push((title.to_string(), uri.to_string()));
        Ok(true)
    }
}

/// Migration-runner double that records calls and simulates table state.
#[derive(Debug, Clone, Default)]
pub struct RecordingMigrationRunner {
    state: Arc<RwLock<RecordingState>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    existing_tables: BTreeSet<String>,
    dropped: Vec<String>,
    applied_runs: usize,
}

impl RecordingMigrationRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend `table` already exists in the database.
    pub fn with_table(self, table: &str) -> Self {
        self.state
            .write()
            .expect("runner lock")
            .existing_tables
            .insert(table.to_string());
        self
    }

    pub fn applied_runs(&self) -> usize {
        self.state.read().expect("runner lock").applied_runs
    }

    pub fn dropped(&self) -> Vec<String> {
        self.state.read().expect("runner lock").dropped.clone()
    }
}

impl MigrationRunner for RecordingMigrationRunner {
    fn apply_pending(&self) -> Result<String, CollaboratorError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| CollaboratorError("runner lock poisoned".into()))?;
        state.applied_runs += 1;
        Ok("Migrated: pending migrations".into())
    }

    fn table_exists(&self, table: &str) -> Result<bool, CollaboratorError> {
        Ok(self
            .state
            .read()
            .map_err(|_| CollaboratorError("runner lock poisoned".into()))?
            .existing_tables
            .contains(table))
    }

    fn drop_table(&self, table: &str) -> Result<(), CollaboratorError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| CollaboratorError("runner lock poisoned".into()))?;
        state.existing_tables.remove(table);
        state.dropped.push(table.to_string());
        Ok(())
    }
}
