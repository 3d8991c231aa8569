//! Scaffold store adapters.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crudforge_core::application::ports::{ScaffoldFilter, ScaffoldRecord, SortColumn};

/// Shared listing behavior: search across table/model/controller names,
/// then sort by one of the allowed columns.
pub(crate) fn filter_and_sort(mut records: Vec<ScaffoldRecord>, filter: &ScaffoldFilter) -> Vec<ScaffoldRecord> {
    if let Some(search) = filter.search.as_deref().map(str::to_lowercase) {
        records.retain(|r| {
            let p = &r.payload;
            p.table_name.to_lowercase().contains(&search)
                || p.model_name
                    .as_deref()
                    .is_some_and(|m| m.to_lowercase().contains(&search))
                || p.controller_name
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase().contains(&search))
        });
    }

    match filter.sort {
        SortColumn::Id => records.sort_by_key(|r| r.id),
        SortColumn::TableName => records.sort_by(|a, b| a.payload.table_name.cmp(&b.payload.table_name)),
        SortColumn::ModelName => {
            records.sort_by(|a, b| a.payload.model_name.cmp(&b.payload.model_name));
        }
        SortColumn::ControllerName => {
            records.sort_by(|a, b| a.payload.controller_name.cmp(&b.payload.controller_name));
        }
    }
    if filter.descending {
        records.reverse();
    }
    records
}
