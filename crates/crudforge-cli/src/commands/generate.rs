//! Implementation of the `crudforge generate` command.

use std::path::Path;

use tracing::{debug, info, instrument};

use crudforge_core::domain::ScaffoldPayload;

use crate::cli::{GenerateArgs, GlobalArgs};
use crate::commands::{build_service, confirm, open_store, resolve_root, store_err};
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};
use crate::output::OutputManager;

/// Execute the `crudforge generate` command.
///
/// Dispatch sequence:
/// 1. Load and normalize the definition file
/// 2. Resolve the target scaffold id (explicit flag or table-name match)
/// 3. Confirm with the user unless `--yes` or `--quiet`
/// 4. Early-exit if `--dry-run`
/// 5. Execute generation via `ScaffoldService`
/// 6. Render produced paths and the step log
#[instrument(skip_all, fields(definition = %args.definition.display()))]
pub fn execute(
    args: GenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Load the definition.
    let mut payload = load_definition(&args.definition)?;
    if payload.create_options.is_empty() {
        payload.create_options = config.defaults.create.clone();
    }
    if !args.apply.is_empty() {
        payload.create_options = args.apply.clone();
    }

    let root = resolve_root(&config, args.root.as_ref());
    let service = build_service(&config, &root);

    debug!(
        table = %payload.table_name,
        options = ?payload.create_options,
        root = %root.display(),
        "definition loaded"
    );

    // 2. Dry run: describe but do not write.
    if args.dry_run {
        output.header(&format!(
            "Dry run: artifacts for '{}' (nothing written)",
            payload.table_name
        ))?;
        for (step, artifact) in service.preview(&payload)? {
            output.info(&format!("{step}: {}", artifact.path.display()))?;
        }
        return Ok(());
    }

    // 3. Resolve the stored scaffold this definition updates, if any.
    let existing = match args.id {
        Some(id) => Some(id),
        None => find_by_table(&config, &root, &payload.table_name)?,
    };

    // 4. Confirm.
    if !args.yes && !global.quiet {
        output.header(&format!("Scaffold '{}'", payload.table_name))?;
        output.print(&format!("  Options: {}", payload.create_options.join(", ")))?;
        output.print(&format!("  Root:    {}", root.display()))?;
        if let Some(id) = existing {
            output.print(&format!("  Updates stored scaffold #{id}"))?;
        }
        if !confirm("Generate?")? {
            return Err(CliError::Cancelled);
        }
    }

    // 5. Generate.
    info!(table = %payload.table_name, "generation started");
    let outcome = service.create_or_update(&payload, existing)?;

    // 6. Report: the scaffold is saved even when single steps failed.
    output.success(&format!(
        "Scaffold '{}' saved as #{}",
        outcome.scaffold.table_name, outcome.id
    ))?;
    for generated in &outcome.generated {
        output.info(&format!("{}: {}", generated.step, generated.path.display()))?;
    }
    for line in &outcome.log {
        if line.contains("failed") {
            output.warning(line)?;
        } else if global.verbose > 0 {
            output.print(&format!("  {line}"))?;
        }
    }

    Ok(())
}

fn load_definition(path: &Path) -> CliResult<ScaffoldPayload> {
    let raw = std::fs::read_to_string(path).map_err(|e| CliError::DefinitionParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let parsed = if is_json {
        serde_json::from_str(&raw).map_err(|e| e.to_string())
    } else {
        toml::from_str(&raw).map_err(|e| e.to_string())
    };

    parsed.map_err(|reason| CliError::DefinitionParse {
        path: path.to_path_buf(),
        reason,
    })
}

/// Upsert semantics: a stored scaffold with the same table name is updated
/// rather than duplicated.
fn find_by_table(config: &AppConfig, root: &Path, table: &str) -> CliResult<Option<u64>> {
    let store = open_store(config, root);
    use crudforge_core::application::ports::{ScaffoldFilter, ScaffoldStore};
    let records = store.list(&ScaffoldFilter::default()).map_err(store_err)?;
    Ok(records
        .into_iter()
        .find(|r| r.payload.table_name == table)
        .map(|r| r.id))
}
