//! MySQL introspection: native information-schema queries through the
//! `mysql` client, plus the MySQL→portable type tables.

use std::process::Command;

use tracing::debug;

use super::{ColumnInfo, IntrospectError, SchemaSource, TableInfo};

/// MySQL type (length suffix stripped) → portable column type.
pub(crate) fn portable_type(raw: &str) -> &'static str {
    match base_type(raw).as_str() {
        "int" => "integer",
        "tinyint" => "tinyInteger",
        "smallint" => "smallInteger",
        "mediumint" => "mediumInteger",
        "bigint" => "bigInteger",
        "varchar" => "string",
        "char" => "char",
        "text" => "text",
        "mediumtext" => "mediumText",
        "longtext" => "longText",
        "timestamp" => "timestamp",
        "datetime" => "dateTime",
        "date" => "date",
        "time" => "time",
        "float" => "float",
        "double" => "double",
        "decimal" => "decimal",
        "json" => "json",
        "enum" => "enum",
        "binary" | "blob" => "binary",
        "boolean" | "bool" => "boolean",
        _ => "string",
    }
}

/// MySQL type → default admin form widget.
pub(crate) fn input_type(raw: &str) -> &'static str {
    match base_type(raw).as_str() {
        // tinyint is conventionally a boolean flag
        "tinyint" => "switch",
        "int" | "smallint" | "mediumint" | "bigint" => "number",
        "float" | "double" | "decimal" => "number",
        "text" | "mediumtext" | "longtext" | "json" => "textarea",
        "timestamp" | "datetime" => "datetime",
        "date" => "date",
        "time" => "time",
        "enum" => "select",
        "binary" | "blob" => "file",
        "boolean" | "bool" => "switch",
        _ => "text",
    }
}

fn base_type(raw: &str) -> String {
    raw.split('(').next().unwrap_or("").trim().to_lowercase()
}

/// Connection settings for the `mysql` client.
#[derive(Debug, Clone)]
pub struct MysqlConnection {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
}

/// Schema source shelling out to the `mysql` client in batch mode.
#[derive(Debug)]
pub struct MysqlCliSource {
    connection: MysqlConnection,
}

impl MysqlCliSource {
    pub fn new(connection: MysqlConnection) -> Self {
        Self { connection }
    }

    fn query(&self, sql: &str) -> Result<Vec<Vec<String>>, IntrospectError> {
        let c = &self.connection;
        let mut cmd = Command::new("mysql");
        cmd.arg("--host").arg(&c.host);
        cmd.arg("--port").arg(c.port.to_string());
        cmd.arg("--user").arg(&c.user);
        if let Some(password) = &c.password {
            // Passed via the environment so it never shows up in `ps`.
            cmd.env("MYSQL_PWD", password);
        }
        cmd.arg("--batch").arg("--skip-column-names");
        cmd.arg("--execute").arg(sql);
        cmd.arg(&c.database);

        debug!(sql, "mysql query");
        let output = cmd
            .output()
            .map_err(|e| IntrospectError::Command(format!("spawning mysql: {e}")))?;
        if !output.status.success() {
            return Err(IntrospectError::Command(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(parse_tsv(&String::from_utf8_lossy(&output.stdout)))
    }
}

impl SchemaSource for MysqlCliSource {
    fn tables(&self) -> Result<Vec<TableInfo>, IntrospectError> {
        let mut tables = Vec::new();

        for row in self.query("SHOW TABLES")? {
            let name = row
                .first()
                .cloned()
                .ok_or_else(|| IntrospectError::Parse("empty SHOW TABLES row".into()))?;

            let primary_key = self
                .query(&format!(
                    "SHOW KEYS FROM `{name}` WHERE Key_name = 'PRIMARY'"
                ))?
                .first()
                // Column_name is the fifth column of SHOW KEYS output.
                .and_then(|row| row.get(4).cloned())
                .unwrap_or_else(|| "id".to_string());

            let mut columns = Vec::new();
            for row in self.query(&format!("SHOW FULL COLUMNS FROM `{name}`"))? {
                // Field, Type, Collation, Null, Key, Default, Extra,
                // Privileges, Comment
                let get = |i: usize| row.get(i).cloned().unwrap_or_default();
                columns.push(ColumnInfo {
                    name: get(0),
                    data_type: get(1),
                    nullable: get(3) == "YES",
                    key: Some(get(4)).filter(|k| !k.is_empty()),
                    default: Some(get(5)).filter(|d| !d.is_empty() && d != "NULL"),
                    comment: Some(get(8)).filter(|c| !c.is_empty()),
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

fn parse_tsv(raw: &str) -> Vec<Vec<String>> {
    raw.lines()
        .filter(|l| !l.is_empty())
        .map(|l| l.split('\t').map(str::to_string).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_suffixes_are_stripped() {
        assert_eq!(portable_type("varchar(255)"), "string");
        assert_eq!(portable_type("int(11)"), "integer");
        assert_eq!(portable_type("decimal(8,2)"), "decimal");
        assert_eq!(portable_type("somethingelse"), "string");
    }

    #[test]
    fn widget_mapping_follows_column_families() {
        assert_eq!(input_type("tinyint(1)"), "switch");
        assert_eq!(input_type("bigint(20)"), "number");
        assert_eq!(input_type("longtext"), "textarea");
        assert_eq!(input_type("enum('a','b')"), "select");
        assert_eq!(input_type("varchar(64)"), "text");
    }

    #[test]
    fn tsv_parsing_splits_rows_and_fields() {
        let parsed = parse_tsv("a\tb\nc\td\n");
        assert_eq!(parsed, vec![vec!["a", "b"], vec!["c", "d"]]);
    }
}
