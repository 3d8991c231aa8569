//! Implementation of the `crudforge seed` command: introspect a live
//! database and store one scaffold definition per user table.

use tracing::instrument;

use crudforge_adapters::introspect::mysql::{MysqlCliSource, MysqlConnection};
use crudforge_adapters::introspect::postgres::{PostgresCliSource, PostgresConnection};
use crudforge_adapters::{Dialect, SchemaSource, seed_payloads};
use crudforge_core::application::ports::{ScaffoldFilter, ScaffoldStore};
use crudforge_core::domain::NamingResolver;

use crate::cli::{DialectArg, GlobalArgs, SeedArgs};
use crate::commands::{open_store, resolve_root, store_err};
use crate::config::AppConfig;
use crate::error::CliResult;
use crate::output::OutputManager;

#[instrument(skip_all, fields(database = %args.database))]
pub fn execute(
    args: SeedArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let (source, dialect): (Box<dyn SchemaSource>, Dialect) = match args.dialect {
        DialectArg::Mysql => (
            Box::new(MysqlCliSource::new(MysqlConnection {
                host: args.host.clone(),
                port: args.port.unwrap_or(3306),
                user: args.user.clone(),
                password: args.password.clone(),
                database: args.database.clone(),
            })),
            Dialect::Mysql,
        ),
        DialectArg::Postgres => (
            Box::new(PostgresCliSource::new(PostgresConnection {
                host: args.host.clone(),
                port: args.port.unwrap_or(5432),
                user: args.user.clone(),
                password: args.password.clone(),
                database: args.database.clone(),
                schema: args.schema.clone(),
            })),
            Dialect::Postgres,
        ),
    };

    let naming = NamingResolver::new(config.naming.clone());
    let payloads = seed_payloads(
        source.as_ref(),
        dialect,
        &naming,
        args.remove_prefix.as_deref(),
    )?;

    let root = resolve_root(&config, None);
    let store = open_store(&config, &root);
    let existing = store.list(&ScaffoldFilter::default()).map_err(store_err)?;

    let mut created = 0usize;
    let mut updated = 0usize;
    for payload in payloads {
        let match_id = existing
            .iter()
            .find(|r| r.payload.table_name == payload.table_name)
            .map(|r| r.id);
        let table = payload.table_name.clone();
        let id = store.save(payload, match_id).map_err(store_err)?;
        if match_id.is_some() {
            updated += 1;
            output.info(&format!("updated scaffold #{id} for table '{table}'"))?;
        } else {
            created += 1;
            output.info(&format!("seeded scaffold #{id} for table '{table}'"))?;
        }
    }

    output.success(&format!(
        "{created} scaffold(s) seeded, {updated} updated — run `crudforge regenerate` to emit code"
    ))?;

    Ok(())
}
