//! Configuration loading: file + environment + defaults.
//!
//! Resolution order (later wins): built-in defaults, `crudforge.toml` (or
//! the `--config` file), `CRUDFORGE_*` environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crudforge_core::domain::NamingConfig;

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub naming: NamingConfig,
    pub defaults: DefaultsConfig,
    pub output: OutputConfig,
}

/// Where the host application lives and where crudforge keeps its state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Host application root all artifact paths are joined against.
    pub root: PathBuf,
    /// Scaffold store location, relative to `root` unless absolute.
    pub store: PathBuf,
    /// Admin panel route prefix (used by generated admin tests).
    pub admin_prefix: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            store: PathBuf::from(".crudforge/scaffolds.json"),
            admin_prefix: "admin".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Creation options applied when a definition names none.
    pub create: Vec<String>,
    /// Whether the test-case step also writes a data factory.
    pub with_factory: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            create: vec!["model".into(), "migration".into(), "controller".into()],
            with_factory: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration, optionally from an explicit file.
    pub fn load(explicit: Option<&PathBuf>) -> CliResult<Self> {
        let mut builder = config::Config::builder();

        match explicit {
            Some(path) => {
                builder = builder.add_source(config::File::from(path.as_path()).required(true));
            }
            None => {
                // User-level config first, then the project-local file.
                if let Some(dirs) = directories::ProjectDirs::from("dev", "crudforge", "crudforge")
                {
                    builder = builder.add_source(
                        config::File::from(dirs.config_dir().join("config.toml")).required(false),
                    );
                }
                builder =
                    builder.add_source(config::File::with_name("crudforge").required(false));
            }
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CRUDFORGE")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| CliError::ConfigError {
                message: e.to_string(),
            })
    }

    /// Store path resolved against the host root.
    pub fn store_path(&self, root: &Path) -> PathBuf {
        if self.paths.store.is_absolute() {
            self.paths.store.clone()
        } else {
            root.join(&self.paths.store)
        }
    }
}

/// Template written by `crudforge config init`.
pub const CONFIG_TEMPLATE: &str = r#"# crudforge configuration

[paths]
# Host application root; artifact paths are joined against it.
root = "."
# Scaffold store, relative to root unless absolute.
store = ".crudforge/scaffolds.json"
# Admin panel route prefix (used by generated admin tests).
admin_prefix = "admin"

[naming]
model_namespace = "App\\Models"
admin_controller_namespace = "App\\Admin\\Controllers"
api_controller_namespace = "App\\Http\\Controllers\\Api"
web_controller_namespace = "App\\Http\\Controllers"

[defaults]
# Creation options applied when a definition names none.
create = ["model", "migration", "controller"]
with_factory = true

[output]
no_color = false
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = AppConfig::default();
        assert_eq!(config.paths.root, PathBuf::from("."));
        assert_eq!(config.paths.admin_prefix, "admin");
        assert_eq!(config.naming.model_namespace, "App\\Models");
        assert!(config.defaults.with_factory);
    }

    #[test]
    fn template_parses_back_into_the_defaults() {
        let parsed: AppConfig = toml::from_str(CONFIG_TEMPLATE).unwrap();
        let defaults = AppConfig::default();
        assert_eq!(parsed.paths.store, defaults.paths.store);
        assert_eq!(parsed.naming, defaults.naming);
        assert_eq!(parsed.defaults.create, defaults.defaults.create);
    }

    #[test]
    fn relative_store_resolves_against_root() {
        let config = AppConfig::default();
        assert_eq!(
            config.store_path(Path::new("/srv/app")),
            PathBuf::from("/srv/app/.crudforge/scaffolds.json")
        );
    }
}
