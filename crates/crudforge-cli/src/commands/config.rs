//! Implementation of the `crudforge config` subcommands.

use std::path::Path;

use crate::cli::ConfigCommands;
use crate::config::{AppConfig, CONFIG_TEMPLATE};
use crate::error::{CliError, CliResult};
use crate::output::OutputManager;

pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Show => {
            let rendered = toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                message: format!("rendering configuration: {e}"),
            })?;
            output.print(&rendered)?;
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let path = Path::new("crudforge.toml");
            if path.exists() && !force {
                return Err(CliError::ConfigError {
                    message: "crudforge.toml already exists (use --force to overwrite)".into(),
                });
            }
            std::fs::write(path, CONFIG_TEMPLATE)?;
            output.success("wrote crudforge.toml")?;
            Ok(())
        }
    }
}
