//! Implementation of the `crudforge delete` command.

use tracing::instrument;

use crate::cli::{DeleteArgs, GlobalArgs};
use crate::commands::{build_service, confirm, resolve_root};
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};
use crate::output::OutputManager;

#[instrument(skip_all, fields(id = args.id))]
pub fn execute(
    args: DeleteArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    if !args.yes && !global.quiet {
        output.warning(&format!(
            "Deleting scaffold #{} backs up and removes its generated files.",
            args.id
        ))?;
        if !confirm("Delete?")? {
            return Err(CliError::Cancelled);
        }
    }

    let root = resolve_root(&config, args.root.as_ref());
    let service = build_service(&config, &root);
    let outcome = service.delete(args.id)?;

    for line in &outcome.log {
        output.info(line)?;
    }
    output.success(&format!("Scaffold #{} deleted", outcome.id))?;

    Ok(())
}
