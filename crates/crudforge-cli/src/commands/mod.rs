//! Command handlers. Each submodule translates CLI arguments into calls on
//! the core service and renders the results; no business logic lives here.

pub mod completions;
pub mod config;
pub mod delete;
pub mod generate;
pub mod list;
pub mod regenerate;
pub mod seed;

use std::path::{Path, PathBuf};

use crudforge_adapters::{
    ArtisanMigrationRunner, ArtisanRouteCache, JsonFileStore, LocalFilesystem, LoggingMenuRegistry,
};
use crudforge_core::application::ports::StoreError;
use crudforge_core::domain::NamingResolver;
use crudforge_core::error::CrudforgeError;
use crudforge_core::prelude::{ScaffoldService, ServiceConfig};

use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

/// Resolve the host root: explicit flag beats the configured path.
pub(crate) fn resolve_root(config: &AppConfig, root_override: Option<&PathBuf>) -> PathBuf {
    root_override
        .cloned()
        .unwrap_or_else(|| config.paths.root.clone())
}

/// Build the scaffold service wired with the production adapters.
pub(crate) fn build_service(config: &AppConfig, root: &Path) -> ScaffoldService {
    let mut service_config = ServiceConfig::new(root);
    service_config.admin_prefix = config.paths.admin_prefix.clone();
    service_config.with_factory = config.defaults.with_factory;

    ScaffoldService::new(
        Box::new(JsonFileStore::new(config.store_path(root))),
        Box::new(LocalFilesystem::new()),
        Box::new(ArtisanMigrationRunner::new(root)),
        Box::new(ArtisanRouteCache::new(root)),
        Box::new(LoggingMenuRegistry),
        NamingResolver::new(config.naming.clone()),
        service_config,
    )
}

/// A second handle onto the same store file, for lookups the service API
/// does not cover (listing, id resolution).
pub(crate) fn open_store(config: &AppConfig, root: &Path) -> JsonFileStore {
    JsonFileStore::new(config.store_path(root))
}

pub(crate) fn store_err(e: StoreError) -> CliError {
    CliError::Core(CrudforgeError::Application(e.into()))
}

/// Ask the user for confirmation. Without the `interactive` feature the
/// caller must pass `--yes`.
pub(crate) fn confirm(prompt: &str) -> CliResult<bool> {
    #[cfg(feature = "interactive")]
    {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| CliError::InvalidInput {
                message: format!("confirmation failed: {e}"),
            })
    }
    #[cfg(not(feature = "interactive"))]
    {
        let _ = prompt;
        Err(CliError::FeatureNotAvailable {
            feature: "interactive",
        })
    }
}
