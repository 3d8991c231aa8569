//! Schema introspection: seed scaffold definitions from a live database.
//!
//! A [`SchemaSource`] enumerates tables/columns/keys; [`seed_payloads`]
//! turns them into [`ScaffoldPayload`]s using the per-dialect portable-type
//! mapping tables. The CLI sources shell out to the `mysql`/`psql` clients,
//! so tests can drive the mapping through a plain in-memory source.

pub mod mysql;
pub mod postgres;

use thiserror::Error;
use tracing::info;

use crudforge_core::domain::{FieldSpec, NamingResolver, ScaffoldPayload};

#[derive(Debug, Error)]
pub enum IntrospectError {
    #[error("database client failed: {0}")]
    Command(String),

    #[error("unexpected client output: {0}")]
    Parse(String),
}

/// One introspected column.
#[derive(Debug, Clone, Default)]
pub struct ColumnInfo {
    pub name: String,
    /// Raw database type, e.g. `varchar(255)` or `timestamp with time zone`.
    pub data_type: String,
    pub nullable: bool,
    /// Raw key marker (`PRI`, `UNI`, `MUL` on MySQL; empty elsewhere).
    pub key: Option<String>,
    pub default: Option<String>,
    pub comment: Option<String>,
}

/// One introspected table with its primary key and ordered columns.
#[derive(Debug, Clone)]
pub struct TableInfo {
    pub name: String,
    pub primary_key: String,
    pub columns: Vec<ColumnInfo>,
}

/// Live-schema enumeration, abstract over the concrete client.
pub trait SchemaSource {
    fn tables(&self) -> Result<Vec<TableInfo>, IntrospectError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Mysql,
    Postgres,
}

/// System tables never turned into scaffolds.
const EXCLUDED_TABLES: &[&str] = &["migrations"];

/// Creation options every seeded scaffold starts with.
const SEED_OPTIONS: &[&str] = &[
    "migration",
    "model",
    "controller",
    "migrate",
    "menu_item",
    "recreate_table",
];

/// Build scaffold payloads for every user table of the source.
///
/// `remove_prefix` strips a table-name prefix before deriving the logical
/// table (and from it the model/controller names); the physical prefix is
/// dropped entirely, matching re-homing a legacy schema.
pub fn seed_payloads(
    source: &dyn SchemaSource,
    dialect: Dialect,
    naming: &NamingResolver,
    remove_prefix: Option<&str>,
) -> Result<Vec<ScaffoldPayload>, IntrospectError> {
    let mut payloads = Vec::new();

    for table in source.tables()? {
        if EXCLUDED_TABLES.contains(&table.name.as_str()) {
            continue;
        }

        let logical = match remove_prefix {
            Some(prefix) if !prefix.is_empty() => table
                .name
                .strip_prefix(prefix)
                .unwrap_or(&table.name)
                .to_string(),
            _ => table.name.clone(),
        };

        let column_names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        let timestamps =
            column_names.contains(&"created_at") && column_names.contains(&"updated_at");
        let soft_deletes = column_names.contains(&"deleted_at");

        let model_name = naming.derive_model_name(&logical);
        let controller_name = naming.derive_controller_name(&model_name);

        let mut fields = Vec::new();
        for column in &table.columns {
            if column.name == table.primary_key
                || ["created_at", "updated_at", "deleted_at"].contains(&column.name.as_str())
            {
                continue;
            }
            fields.push(field_spec(column, dialect, fields.len()));
        }

        info!(table = %table.name, fields = fields.len(), "scaffold seeded");
        payloads.push(ScaffoldPayload {
            table_name: logical,
            model_name: Some(model_name.to_string()),
            controller_name: Some(controller_name.to_string()),
            primary_key: Some(table.primary_key.clone()),
            timestamps,
            soft_deletes,
            create_options: SEED_OPTIONS.iter().map(|s| s.to_string()).collect(),
            fields,
        });
    }

    Ok(payloads)
}

fn field_spec(column: &ColumnInfo, dialect: Dialect, order: usize) -> FieldSpec {
    let (sql_type, input_type) = match dialect {
        Dialect::Mysql => (
            mysql::portable_type(&column.data_type),
            Some(mysql::input_type(&column.data_type).to_string()),
        ),
        Dialect::Postgres => (postgres::portable_type(&column.data_type), None),
    };

    FieldSpec {
        name: column.name.clone(),
        sql_type: Some(sql_type.to_string()),
        nullable: column.nullable,
        key: column.key.as_deref().and_then(normalize_key),
        default: column.default.clone(),
        comment: column.comment.clone(),
        order: Some(order as i64),
        input_type,
        ..FieldSpec::default()
    }
}

/// Map raw key markers onto the portable unique/index modifiers; the
/// primary key is handled separately.
fn normalize_key(raw: &str) -> Option<String> {
    match raw.trim().to_uppercase().as_str() {
        "UNI" | "UNIQUE" => Some("unique".into()),
        "MUL" | "INDEX" => Some("index".into()),
        _ => None,
    }
}
