//! Implementation of the `crudforge list` command.

use crudforge_core::application::ports::{ScaffoldFilter, ScaffoldStore, SortColumn};

use crate::cli::{GlobalArgs, ListArgs, OutputFormat, SortArg};
use crate::commands::{open_store, resolve_root, store_err};
use crate::config::AppConfig;
use crate::error::CliResult;
use crate::output::OutputManager;

pub fn execute(
    args: ListArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let root = resolve_root(&config, None);
    let store = open_store(&config, &root);

    let filter = ScaffoldFilter {
        search: args.search.clone(),
        sort: match args.sort {
            SortArg::Id => SortColumn::Id,
            SortArg::Table => SortColumn::TableName,
            SortArg::Model => SortColumn::ModelName,
            SortArg::Controller => SortColumn::ControllerName,
        },
        descending: args.desc,
    };

    let records = store.list(&filter).map_err(store_err)?;

    if output.format() == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&records)
            .unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"));
        output.print(&json)?;
        return Ok(());
    }

    if records.is_empty() {
        output.print("No scaffolds stored yet. Create one with `crudforge generate`.")?;
        return Ok(());
    }

    output.header(&format!(
        "{:>4}  {:<24} {:<32} {:<40} {:>6}",
        "id", "table", "model", "controller", "fields"
    ))?;
    for record in &records {
        let p = &record.payload;
        output.print(&format!(
            "{:>4}  {:<24} {:<32} {:<40} {:>6}",
            record.id,
            p.table_name,
            p.model_name.as_deref().unwrap_or("(derived)"),
            p.controller_name.as_deref().unwrap_or("(derived)"),
            p.fields.len(),
        ))?;
    }

    Ok(())
}
