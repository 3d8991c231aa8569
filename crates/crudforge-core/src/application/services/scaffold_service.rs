//! Scaffold orchestrator: the save/apply workflow.
//!
//! One invocation handles one scaffold end-to-end, sequentially:
//!
//! 1. resolve + validate the payload (rejects before any side effect);
//! 2. persist the scaffold and its full field list — the only fatal step;
//! 3. run every enabled creation option in a fixed order, each inside an
//!    isolated failure boundary that logs and moves on;
//! 4. back up any file about to be overwritten into a timestamped directory;
//! 5. return the produced paths together with a human-readable log.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::application::error::ApplicationError;
use crate::application::ports::{
    CollaboratorError, Filesystem, FsError, MenuRegistry, MigrationRunner, RouteCacheInvalidator,
    ScaffoldFilter, ScaffoldId, ScaffoldStore,
};
use crate::domain::{
    CreationOption, NamingResolver, Scaffold, ScaffoldPayload, ucfirst,
};
use crate::error::CrudforgeResult;
use crate::generators::{
    GeneratedArtifact, GeneratorError, WritePolicy, admin_controller, api_controller, migration,
    model, test_suite, web_crud,
};
use crate::routes::{MergeStrategy, RouteEntry, RouteStyle, merge_route};

/// Host-application settings for one service instance.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Root of the host application all artifact paths are joined against.
    pub root: PathBuf,
    /// Admin panel route prefix (for generated admin tests).
    pub admin_prefix: String,
    /// Whether the test-suite step also emits a data factory stub.
    pub with_factory: bool,
}

impl ServiceConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            admin_prefix: "admin".into(),
            with_factory: true,
        }
    }
}

/// One produced artifact path, tagged with the step that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPath {
    pub step: CreationOption,
    pub path: PathBuf,
}

/// Result of a save/apply run: which steps produced what, and the log of
/// everything that happened — including per-step failures.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub id: ScaffoldId,
    pub scaffold: Scaffold,
    pub generated: Vec<GeneratedPath>,
    pub log: Vec<String>,
}

/// Result of a destroy run.
#[derive(Debug, Clone)]
pub struct DeletionOutcome {
    pub id: ScaffoldId,
    pub log: Vec<String>,
}

/// Per-scaffold result of the batch regenerate command.
#[derive(Debug)]
pub struct RegenerationReport {
    pub id: ScaffoldId,
    pub table_name: String,
    pub outcome: Result<GenerationOutcome, String>,
}

/// Failure inside one generation step; caught at the step boundary.
#[derive(Debug, Error)]
enum StepError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error(transparent)]
    Fs(#[from] FsError),
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// Mutable state of one orchestrator invocation.
#[derive(Debug, Default)]
struct Run {
    generated: Vec<GeneratedPath>,
    log: Vec<String>,
    backup_dir: Option<PathBuf>,
}

pub struct ScaffoldService {
    store: Box<dyn ScaffoldStore>,
    fs: Box<dyn Filesystem>,
    migrations: Box<dyn MigrationRunner>,
    route_cache: Box<dyn RouteCacheInvalidator>,
    menus: Box<dyn MenuRegistry>,
    naming: NamingResolver,
    config: ServiceConfig,
}

impl ScaffoldService {
    pub fn new(
        store: Box<dyn ScaffoldStore>,
        fs: Box<dyn Filesystem>,
        migrations: Box<dyn MigrationRunner>,
        route_cache: Box<dyn RouteCacheInvalidator>,
        menus: Box<dyn MenuRegistry>,
        naming: NamingResolver,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            fs,
            migrations,
            route_cache,
            menus,
            naming,
            config,
        }
    }

    pub fn naming(&self) -> &NamingResolver {
        &self.naming
    }

    /// Save (or update) a scaffold and run its enabled generation steps.
    #[instrument(skip_all, fields(table = %payload.table_name))]
    pub fn create_or_update(
        &self,
        payload: &ScaffoldPayload,
        existing: Option<ScaffoldId>,
    ) -> CrudforgeResult<GenerationOutcome> {
        // Validation rejects before any side effect.
        let scaffold = Scaffold::resolve(payload, &self.naming)?;

        // Persisting the scaffold + field list is the only fatal step.
        let id = self
            .store
            .save(payload.clone(), existing)
            .map_err(ApplicationError::from)?;
        info!(id, "scaffold persisted");

        let mut run = Run::default();
        for step in scaffold.options.steps() {
            let result = match step {
                CreationOption::Model => self.step_model(&scaffold, &mut run),
                CreationOption::Migration => self.step_migration(&scaffold, &mut run),
                CreationOption::Controller => self.step_controller(&scaffold, &mut run),
                CreationOption::Migrate => self.step_migrate(&scaffold, &mut run),
                CreationOption::MenuItem => self.step_menu(&scaffold, &mut run),
                CreationOption::Api => self.step_api(&scaffold, &mut run),
                CreationOption::BladeCrud => self.step_blade_crud(&scaffold, &mut run),
                CreationOption::TestCase => self.step_test_case(&scaffold, &mut run),
                CreationOption::RecreateTable => continue,
            };

            // No option's failure blocks another option's attempt.
            if let Err(e) = result {
                error!(step = %step, scaffold = id, error = %e, "generation step failed");
                run.log.push(format!("{step} failed: {e}"));
            }
        }

        Ok(GenerationOutcome {
            id,
            scaffold,
            generated: run.generated,
            log: run.log,
        })
    }

    /// Render every artifact the payload's options would produce, without
    /// touching the store or the filesystem.
    pub fn preview(
        &self,
        payload: &ScaffoldPayload,
    ) -> CrudforgeResult<Vec<(CreationOption, GeneratedArtifact)>> {
        let scaffold = Scaffold::resolve(payload, &self.naming)?;
        let mut artifacts = Vec::new();

        for step in scaffold.options.steps() {
            match step {
                CreationOption::Model => {
                    artifacts.push((step, model::generate(&scaffold, &self.naming)?));
                }
                CreationOption::Migration => {
                    artifacts.push((
                        step,
                        migration::generate(&scaffold, &self.naming, &migration_prefix())?,
                    ));
                }
                CreationOption::Controller => {
                    artifacts.push((step, admin_controller::generate(&scaffold, &self.naming)?));
                }
                CreationOption::Api => {
                    for a in api_controller::generate(&scaffold, &self.naming)? {
                        artifacts.push((step, a));
                    }
                }
                CreationOption::BladeCrud => {
                    for a in web_crud::generate(&scaffold, &self.naming)? {
                        artifacts.push((step, a));
                    }
                }
                CreationOption::TestCase => {
                    for a in test_suite::generate(
                        &scaffold,
                        &self.naming,
                        &self.config.admin_prefix,
                        self.config.with_factory,
                    )? {
                        artifacts.push((step, a));
                    }
                }
                _ => {}
            }
        }

        Ok(artifacts)
    }

    /// Destroy a scaffold: back up (never silently delete) its model,
    /// controller and migration files, then remove the stored record.
    #[instrument(skip(self))]
    pub fn delete(&self, id: ScaffoldId) -> CrudforgeResult<DeletionOutcome> {
        let record = self.store.load(id).map_err(ApplicationError::from)?;
        let payload = &record.payload;
        let mut run = Run::default();

        let model_name = match payload.model_name.as_deref() {
            Some(raw) if !raw.trim().is_empty() => crate::domain::Fqcn::normalize(raw),
            _ => self.naming.derive_model_name(&payload.table_name),
        };
        let controller_name = match payload.controller_name.as_deref() {
            Some(raw) if !raw.trim().is_empty() => crate::domain::Fqcn::normalize(raw),
            _ => self.naming.derive_controller_name(&model_name),
        };

        let mut targets = vec![
            self.config.root.join(crate::generators::php_class_path(&model_name)),
            self.config.root.join(crate::generators::php_class_path(&controller_name)),
        ];
        targets.extend(self.matching_migrations(&payload.table_name));

        for path in targets {
            if !self.fs.exists(&path) {
                continue;
            }
            if let Err(e) = self.backup(&mut run, &path) {
                warn!(path = %path.display(), error = %e, "backup failed during delete");
                run.log.push(format!("backup failed for {}: {e}", path.display()));
            }
        }

        self.store.delete(id).map_err(ApplicationError::from)?;
        run.log.push(format!("scaffold {id} deleted"));

        Ok(DeletionOutcome { id, log: run.log })
    }

    /// Re-run generation for every stored scaffold. One scaffold's failure
    /// never stops the batch.
    pub fn regenerate_all(&self) -> CrudforgeResult<Vec<RegenerationReport>> {
        let records = self
            .store
            .list(&ScaffoldFilter::default())
            .map_err(ApplicationError::from)?;

        Ok(records
            .into_iter()
            .map(|record| {
                let outcome = self
                    .create_or_update(&record.payload, Some(record.id))
                    .map_err(|e| e.to_string());
                RegenerationReport {
                    id: record.id,
                    table_name: record.payload.table_name.clone(),
                    outcome,
                }
            })
            .collect())
    }

    // ── Steps ────────────────────────────────────────────────────────────

    fn step_model(&self, scaffold: &Scaffold, run: &mut Run) -> Result<(), StepError> {
        let artifact = model::generate(scaffold, &self.naming)?;
        self.write_artifacts(CreationOption::Model, vec![artifact], run)
    }

    fn step_migration(&self, scaffold: &Scaffold, run: &mut Run) -> Result<(), StepError> {
        // A regenerated migration gets a fresh timestamp and thus a fresh
        // filename; prior migrations for the table are backed up first.
        for old in self.matching_migrations(&scaffold.table_name) {
            self.backup(run, &old)?;
        }
        let artifact = migration::generate(scaffold, &self.naming, &migration_prefix())?;
        self.write_artifacts(CreationOption::Migration, vec![artifact], run)
    }

    fn step_controller(&self, scaffold: &Scaffold, run: &mut Run) -> Result<(), StepError> {
        let artifact = admin_controller::generate(scaffold, &self.naming)?;
        self.write_artifacts(CreationOption::Controller, vec![artifact], run)?;

        let slug = self.naming.route_slug(&scaffold.model_name);
        self.ensure_route(run, RouteStyle::Admin, &slug, scaffold.controller_name.clone())
    }

    fn step_migrate(&self, scaffold: &Scaffold, run: &mut Run) -> Result<(), StepError> {
        let table = &scaffold.table_name;
        let mut should_migrate = true;

        if self.migrations.table_exists(table)? {
            if scaffold.options.contains(CreationOption::RecreateTable) {
                self.migrations.drop_table(table)?;
                run.log.push(format!("table '{table}' dropped"));
            } else {
                should_migrate = false;
                run.log
                    .push(format!("migration skipped: table '{table}' already exists"));
            }
        }

        if should_migrate {
            let output = self.migrations.apply_pending()?;
            run.log.extend(
                output
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from),
            );
        }
        Ok(())
    }

    fn step_menu(&self, scaffold: &Scaffold, run: &mut Run) -> Result<(), StepError> {
        let slug = self.naming.route_slug(&scaffold.model_name);
        let created = self.menus.ensure_entry(&ucfirst(&slug), &slug)?;
        run.log.push(if created {
            format!("menu item created at: {slug}")
        } else {
            format!("menu item already exists: {slug}")
        });
        Ok(())
    }

    fn step_api(&self, scaffold: &Scaffold, run: &mut Run) -> Result<(), StepError> {
        let artifacts = api_controller::generate(scaffold, &self.naming)?;
        self.write_artifacts(CreationOption::Api, artifacts, run)?;

        let slug = self.naming.route_slug(&scaffold.model_name);
        let api_controller = self.naming.api_controller_name(&scaffold.model_name);
        self.ensure_route(run, RouteStyle::Api, &slug, api_controller)
    }

    fn step_blade_crud(&self, scaffold: &Scaffold, run: &mut Run) -> Result<(), StepError> {
        let artifacts = web_crud::generate(scaffold, &self.naming)?;
        self.write_artifacts(CreationOption::BladeCrud, artifacts, run)?;

        let slug = self.naming.route_slug(&scaffold.model_name);
        let web_controller = self.naming.web_controller_name(&scaffold.model_name);
        self.ensure_route(run, RouteStyle::Web, &slug, web_controller)
    }

    fn step_test_case(&self, scaffold: &Scaffold, run: &mut Run) -> Result<(), StepError> {
        let artifacts = test_suite::generate(
            scaffold,
            &self.naming,
            &self.config.admin_prefix,
            self.config.with_factory,
        )?;
        self.write_artifacts(CreationOption::TestCase, artifacts, run)
    }

    // ── Writing ──────────────────────────────────────────────────────────

    /// Write a step's artifacts: backup-before-overwrite, write-once policy
    /// support, and step-local cleanup — a step that fails partway removes
    /// exactly the files it wrote in this invocation, never anything else.
    fn write_artifacts(
        &self,
        step: CreationOption,
        artifacts: Vec<GeneratedArtifact>,
        run: &mut Run,
    ) -> Result<(), StepError> {
        let mut step_written = Vec::new();
        let result = self.write_all(step, &artifacts, run, &mut step_written);

        if result.is_err() {
            for path in &step_written {
                if let Err(e) = self.fs.remove_file(path) {
                    warn!(path = %path.display(), error = %e, "step cleanup failed");
                }
            }
        }
        result
    }

    fn write_all(
        &self,
        step: CreationOption,
        artifacts: &[GeneratedArtifact],
        run: &mut Run,
        step_written: &mut Vec<PathBuf>,
    ) -> Result<(), StepError> {
        for artifact in artifacts {
            let abs = self.config.root.join(&artifact.path);

            if self.fs.exists(&abs) {
                match artifact.policy {
                    WritePolicy::SkipIfExists => {
                        run.log
                            .push(format!("{} already present, left untouched", artifact.path.display()));
                        continue;
                    }
                    WritePolicy::BackupThenWrite => self.backup(run, &abs)?,
                }
            }

            if let Some(parent) = abs.parent() {
                self.fs.make_dir(parent)?;
            }
            self.fs.write(&abs, &artifact.content)?;
            step_written.push(abs);

            run.generated.push(GeneratedPath {
                step,
                path: artifact.path.clone(),
            });
            run.log.push(format!("{step}: {}", artifact.path.display()));
        }
        Ok(())
    }

    /// Move an existing file into this run's timestamped backup directory,
    /// preserving its filename.
    fn backup(&self, run: &mut Run, path: &Path) -> Result<(), StepError> {
        let dir = match &run.backup_dir {
            Some(dir) => dir.clone(),
            None => {
                let stamp = chrono::Local::now().format("%Y%b%d_%H%M%S").to_string();
                let dir = self.config.root.join("storage/scaffold_backups").join(stamp);
                self.fs.make_dir(&dir)?;
                run.backup_dir = Some(dir.clone());
                dir
            }
        };

        let file_name = path.file_name().unwrap_or_default();
        let dest = dir.join(file_name);
        self.fs.move_file(path, &dest)?;
        info!(from = %path.display(), to = %dest.display(), "backed up existing file");
        run.log
            .push(format!("backed up {} to {}", path.display(), dest.display()));
        Ok(())
    }

    /// Thin I/O wrapper around the route merge engine, plus the best-effort
    /// cache invalidation signal.
    fn ensure_route(
        &self,
        run: &mut Run,
        style: RouteStyle,
        slug: &str,
        controller: crate::domain::Fqcn,
    ) -> Result<(), StepError> {
        let path = self.config.root.join(style.file());
        let existing = if self.fs.exists(&path) {
            Some(self.fs.read(&path)?)
        } else {
            None
        };

        let entry = RouteEntry::new(slug, controller, style);
        let outcome = merge_route(existing.as_deref(), &entry);

        if outcome.changed() {
            if let Some(parent) = path.parent() {
                self.fs.make_dir(parent)?;
            }
            self.fs.write(&path, &outcome.content)?;
            run.log
                .push(format!("route '{slug}' merged into {} ({})", style.file(), outcome.strategy));
        } else {
            run.log
                .push(format!("route '{slug}' already declared in {}", style.file()));
        }

        debug_assert!(matches!(
            merge_route(Some(&outcome.content), &entry).strategy,
            MergeStrategy::AlreadyPresent
        ));

        if let Err(e) = self.route_cache.clear() {
            warn!(error = %e, "route cache invalidation failed");
            run.log.push(format!("route cache clear failed: {e}"));
        }
        Ok(())
    }

    /// Existing migration files for a table (absolute paths).
    fn matching_migrations(&self, table: &str) -> Vec<PathBuf> {
        if table.trim().is_empty() {
            return Vec::new();
        }
        let dir = self.config.root.join("database/migrations");
        if !self.fs.exists(&dir) {
            return Vec::new();
        }
        let suffix = format!("_create_{table}_table.php");
        match self.fs.list_dir(&dir) {
            Ok(entries) => entries
                .into_iter()
                .filter(|p| {
                    p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.ends_with(&suffix))
                })
                .collect(),
            Err(e) => {
                warn!(error = %e, "listing migrations failed");
                Vec::new()
            }
        }
    }
}

fn migration_prefix() -> String {
    chrono::Local::now().format("%Y_%m_%d_%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        MockFilesystem, MockMenuRegistry, MockMigrationRunner, MockRouteCacheInvalidator,
        MockScaffoldStore, StoreError,
    };
    use crate::domain::FieldSpec;
    use crate::error::CrudforgeError;

    fn payload(options: &[&str]) -> ScaffoldPayload {
        ScaffoldPayload {
            table_name: "posts".into(),
            create_options: options.iter().map(|s| s.to_string()).collect(),
            fields: vec![
                FieldSpec {
                    name: "title".into(),
                    ..FieldSpec::default()
                },
                FieldSpec {
                    name: "body".into(),
                    sql_type: Some("text".into()),
                    nullable: true,
                    ..FieldSpec::default()
                },
            ],
            timestamps: true,
            ..ScaffoldPayload::default()
        }
    }

    fn service_with(store: MockScaffoldStore, fs: MockFilesystem) -> ScaffoldService {
        ScaffoldService::new(
            Box::new(store),
            Box::new(fs),
            Box::new(MockMigrationRunner::new()),
            Box::new(MockRouteCacheInvalidator::new()),
            Box::new(MockMenuRegistry::new()),
            NamingResolver::default(),
            ServiceConfig::new("/host"),
        )
    }

    #[test]
    fn validation_rejects_before_any_side_effect() {
        let store = MockScaffoldStore::new(); // would panic on unexpected save
        let fs = MockFilesystem::new();
        let service = service_with(store, fs);

        let mut bad = payload(&["model"]);
        bad.fields.clear();
        let err = service.create_or_update(&bad, None).unwrap_err();
        assert!(matches!(err, CrudforgeError::Domain(_)));
    }

    #[test]
    fn store_failure_is_fatal() {
        let mut store = MockScaffoldStore::new();
        store.expect_save().returning(|_, _| {
            Err(StoreError::Backend {
                reason: "disk full".into(),
            })
        });
        let service = service_with(store, MockFilesystem::new());

        let err = service.create_or_update(&payload(&["model"]), None).unwrap_err();
        assert!(matches!(err, CrudforgeError::Application(_)));
    }

    #[test]
    fn a_failing_step_does_not_block_later_steps() {
        let mut store = MockScaffoldStore::new();
        store.expect_save().returning(|_, _| Ok(7));

        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_make_dir().returning(|_| Ok(()));
        // The model write fails; the migration write succeeds.
        fs.expect_write().returning(|path, _| {
            if path.ends_with("Post.php") {
                Err(FsError::Io {
                    op: "write",
                    path: path.to_path_buf(),
                    reason: "denied".into(),
                })
            } else {
                Ok(())
            }
        });

        let service = service_with(store, fs);
        let outcome = service
            .create_or_update(&payload(&["model", "migration"]), None)
            .unwrap();

        assert_eq!(outcome.id, 7);
        let steps: Vec<_> = outcome.generated.iter().map(|g| g.step).collect();
        assert_eq!(steps, vec![CreationOption::Migration]);
        assert!(outcome.log.iter().any(|l| l.starts_with("model failed:")));
    }

    #[test]
    fn preview_renders_without_touching_store_or_filesystem() {
        let service = service_with(MockScaffoldStore::new(), MockFilesystem::new());
        let artifacts = service.preview(&payload(&["model", "migration", "api"])).unwrap();

        let steps: Vec<_> = artifacts.iter().map(|(s, _)| *s).collect();
        assert_eq!(
            steps,
            vec![
                CreationOption::Model,
                CreationOption::Migration,
                CreationOption::Api,
                CreationOption::Api,
            ]
        );
    }
}
