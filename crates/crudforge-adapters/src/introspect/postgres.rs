//! PostgreSQL introspection via information_schema through the `psql`
//! client, plus the PostgreSQL→portable type table.

use std::process::Command;

use tracing::debug;

use super::{ColumnInfo, IntrospectError, SchemaSource, TableInfo};

/// PostgreSQL data type → portable column type.
pub(crate) fn portable_type(raw: &str) -> &'static str {
    match raw.trim().to_lowercase().as_str() {
        "character varying" | "varchar" => "string",
        "character" => "char",
        "text" => "text",
        "boolean" => "boolean",
        "integer" => "integer",
        "bigint" => "bigInteger",
        "smallint" => "smallInteger",
        "timestamp without time zone" => "timestamp",
        "timestamp with time zone" => "timestampTz",
        "date" => "date",
        "time without time zone" => "time",
        "time with time zone" => "timeTz",
        "json" => "json",
        "jsonb" => "jsonb",
        "numeric" => "decimal",
        "double precision" => "double",
        "real" => "float",
        "bytea" => "binary",
        "inet" => "ipAddress",
        "macaddr" => "macAddress",
        "uuid" => "uuid",
        _ => "string",
    }
}

/// Connection settings for the `psql` client.
#[derive(Debug, Clone)]
pub struct PostgresConnection {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
    /// Schema to introspect; `public` unless the host app says otherwise.
    pub schema: String,
}

/// Schema source shelling out to `psql` in tuples-only mode.
#[derive(Debug)]
pub struct PostgresCliSource {
    connection: PostgresConnection,
}

impl PostgresCliSource {
    pub fn new(connection: PostgresConnection) -> Self {
        Self { connection }
    }

    fn query(&self, sql: &str) -> Result<Vec<Vec<String>>, IntrospectError> {
        let c = &self.connection;
        let mut cmd = Command::new("psql");
        cmd.arg("--host").arg(&c.host);
        cmd.arg("--port").arg(c.port.to_string());
        cmd.arg("--username").arg(&c.user);
        cmd.arg("--dbname").arg(&c.database);
        if let Some(password) = &c.password {
            cmd.env("PGPASSWORD", password);
        }
        cmd.arg("--no-align").arg("--tuples-only");
        cmd.arg("--field-separator").arg("\t");
        cmd.arg("--command").arg(sql);

        debug!(sql, "psql query");
        let output = cmd
            .output()
            .map_err(|e| IntrospectError::Command(format!("spawning psql: {e}")))?;
        if !output.status.success() {
            return Err(IntrospectError::Command(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| l.split('\t').map(str::to_string).collect())
            .collect())
    }
}

impl SchemaSource for PostgresCliSource {
    fn tables(&self) -> Result<Vec<TableInfo>, IntrospectError> {
        let schema = &self.connection.schema;
        let mut tables = Vec::new();

        let table_rows = self.query(&format!(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = '{schema}' AND table_type = 'BASE TABLE' \
             ORDER BY table_name"
        ))?;

        for row in table_rows {
            let name = row
                .first()
                .cloned()
                .ok_or_else(|| IntrospectError::Parse("empty table row".into()))?;

            let primary_key = self
                .query(&format!(
                    "SELECT a.attname FROM pg_index i \
                     JOIN pg_attribute a ON a.attrelid = i.indrelid AND a.attnum = ANY(i.indkey) \
                     WHERE i.indrelid = '{name}'::regclass AND i.indisprimary"
                ))?
                .first()
                .and_then(|r| r.first().cloned())
                .unwrap_or_else(|| "id".to_string());

            let mut columns = Vec::new();
            for row in self.query(&format!(
                "SELECT column_name, is_nullable, data_type, column_default \
                 FROM information_schema.columns \
                 WHERE table_name = '{name}' AND table_schema = '{schema}' \
                 ORDER BY ordinal_position"
            ))? {
                let get = |i: usize| row.get(i).cloned().unwrap_or_default();
                columns.push(ColumnInfo {
                    name: get(0),
                    nullable: get(1) == "YES",
                    data_type: get(2),
                    default: Some(get(3)).filter(|d| !d.is_empty()),
                    key: None,
                    comment: None,
                });
            }

            tables.push(TableInfo {
                name,
                primary_key,
                columns,
            });
        }

        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaced_type_names_map() {
        assert_eq!(portable_type("character varying"), "string");
        assert_eq!(portable_type("timestamp with time zone"), "timestampTz");
        assert_eq!(portable_type("double precision"), "double");
        assert_eq!(portable_type("uuid"), "uuid");
        assert_eq!(portable_type("money"), "string");
    }
}
