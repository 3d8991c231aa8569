//! Migration generator: forward create-table and reverse drop-table.

use crate::domain::{Field, FieldKey, NamingResolver, Scaffold};
use crate::generators::stubs;
use crate::generators::template::TemplateVars;
use crate::generators::{GeneratedArtifact, GeneratorError, splice_lines};

/// Render the migration for a scaffold. The caller supplies the datetime
/// `prefix` (e.g. `2026_08_07_120000`) so the generator stays pure.
pub fn generate(
    scaffold: &Scaffold,
    naming: &NamingResolver,
    prefix: &str,
) -> Result<GeneratedArtifact, GeneratorError> {
    let mut columns = vec![format!("$table->bigIncrements('{}');", scaffold.primary_key)];
    for field in &scaffold.fields {
        if field.name == scaffold.primary_key {
            continue;
        }
        columns.push(column_line(field));
    }
    if scaffold.timestamps {
        columns.push("$table->timestamps();".into());
    }
    if scaffold.soft_deletes {
        columns.push("$table->softDeletes();".into());
    }

    let rendered = stubs::MIGRATION.render(
        TemplateVars::new()
            .set("TABLE", scaffold.table_name.clone())
            .set("COLUMNS", splice_lines(&columns, "            ")),
    )?;

    let filename = format!("{prefix}_{}.php", naming.migration_name(&scaffold.table_name));
    Ok(GeneratedArtifact::new(
        format!("database/migrations/{filename}"),
        rendered,
    ))
}

/// One column declaration: the 1:1 type mapping plus the per-field
/// nullable/default/comment/key modifiers.
fn column_line(field: &Field) -> String {
    let mut line = format!(
        "$table->{}('{}')",
        field.sql_type.migration_method(),
        field.name
    );
    if field.nullable {
        line.push_str("->nullable()");
    }
    if let Some(default) = &field.default_value {
        line.push_str(&format!("->default({})", php_literal(default)));
    }
    if let Some(comment) = &field.comment {
        line.push_str(&format!("->comment({})", php_literal(comment)));
    }
    match field.key {
        Some(FieldKey::Unique) => line.push_str("->unique()"),
        Some(FieldKey::Index) => line.push_str("->index()"),
        None => {}
    }
    line.push(';');
    line
}

/// Render a raw default/comment literal: numbers and booleans stay bare,
/// everything else becomes a single-quoted string.
pub(crate) fn php_literal(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.parse::<i64>().is_ok() || trimmed.parse::<f64>().is_ok() {
        return trimmed.to_string();
    }
    if matches!(trimmed, "true" | "false" | "null") {
        return trimmed.to_string();
    }
    format!("'{}'", trimmed.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldSpec, ScaffoldPayload};
    use std::path::PathBuf;

    #[test]
    fn scenario_posts_column_list() {
        let payload = ScaffoldPayload {
            table_name: "posts".into(),
            timestamps: true,
            fields: vec![
                FieldSpec {
                    name: "title".into(),
                    sql_type: Some("string".into()),
                    ..FieldSpec::default()
                },
                FieldSpec {
                    name: "body".into(),
                    sql_type: Some("text".into()),
                    nullable: true,
                    ..FieldSpec::default()
                },
            ],
            ..ScaffoldPayload::default()
        };
        let naming = NamingResolver::default();
        let scaffold = Scaffold::resolve(&payload, &naming).unwrap();
        let artifact = generate(&scaffold, &naming, "2026_08_07_000000").unwrap();

        assert_eq!(
            artifact.path,
            PathBuf::from("database/migrations/2026_08_07_000000_create_posts_table.php")
        );
        let content = &artifact.content;
        assert!(content.contains("Schema::create('posts'"));

        // Column order: primary key, fields in order, then timestamps.
        let pk = content.find("$table->bigIncrements('id');").unwrap();
        let title = content.find("$table->string('title');").unwrap();
        let body = content.find("$table->text('body')->nullable();").unwrap();
        let stamps = content.find("$table->timestamps();").unwrap();
        assert!(pk < title && title < body && body < stamps);

        assert!(content.contains("Schema::dropIfExists('posts');"));
    }

    #[test]
    fn modifiers_apply_per_field() {
        let payload = ScaffoldPayload {
            table_name: "accounts".into(),
            soft_deletes: true,
            fields: vec![FieldSpec {
                name: "email".into(),
                sql_type: Some("string".into()),
                key: Some("unique".into()),
                default: Some("none@example.com".into()),
                comment: Some("login email".into()),
                ..FieldSpec::default()
            }],
            ..ScaffoldPayload::default()
        };
        let naming = NamingResolver::default();
        let scaffold = Scaffold::resolve(&payload, &naming).unwrap();
        let artifact = generate(&scaffold, &naming, "2026_01_01_000000").unwrap();

        assert!(artifact.content.contains(
            "$table->string('email')->default('none@example.com')->comment('login email')->unique();"
        ));
        assert!(artifact.content.contains("$table->softDeletes();"));
    }

    #[test]
    fn numeric_defaults_stay_bare() {
        assert_eq!(php_literal("0"), "0");
        assert_eq!(php_literal("2.5"), "2.5");
        assert_eq!(php_literal("true"), "true");
        assert_eq!(php_literal("it's"), "'it\\'s'");
    }
}
