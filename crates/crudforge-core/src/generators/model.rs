//! Model generator: ORM model class with documentation block, mass-assignment
//! list and relation accessors.

use crate::domain::{
    NamingResolver, Relation, RelationKind, Scaffold, infer_relations,
};
use crate::generators::stubs;
use crate::generators::template::{TemplateVars, tidy_blank_lines};
use crate::generators::{GeneratedArtifact, GeneratorError, php_class_path};

pub fn generate(
    scaffold: &Scaffold,
    naming: &NamingResolver,
) -> Result<GeneratedArtifact, GeneratorError> {
    let relations = infer_relations(scaffold, naming);

    let needs_carbon = scaffold.timestamps
        || scaffold.soft_deletes
        || scaffold
            .fields
            .iter()
            .any(|f| f.name != scaffold.primary_key && f.sql_type.is_date_time());
    let needs_collection = relations
        .iter()
        .any(|r| !r.implicit && r.kind == RelationKind::BelongsToMany);

    let mut imports = vec!["use Illuminate\\Database\\Eloquent\\Model;".to_string()];
    if needs_collection {
        imports.push("use Illuminate\\Database\\Eloquent\\Collection;".into());
    }
    if scaffold.soft_deletes {
        imports.push("use Illuminate\\Database\\Eloquent\\SoftDeletes;".into());
    }
    if needs_carbon {
        imports.push("use Illuminate\\Support\\Carbon;".into());
    }
    imports.sort();

    let class = scaffold.model_name.short().to_string();
    let table_property = table_property(scaffold, &class);

    let rendered = stubs::MODEL.render(
        TemplateVars::new()
            .set("NAMESPACE", scaffold.model_name.namespace())
            .set("IMPORTS", imports.join("\n"))
            .set("PHP_DOC", doc_block(scaffold, &relations))
            .set("CLASS", class)
            .set(
                "USE_SOFT_DELETES",
                if scaffold.soft_deletes { "use SoftDeletes;" } else { "" },
            )
            .set("TABLE_PROPERTY", table_property)
            .set(
                "PRIMARY_KEY_PROPERTY",
                if scaffold.primary_key == "id" {
                    String::new()
                } else {
                    format!("protected $primaryKey = '{}';", scaffold.primary_key)
                },
            )
            .set(
                "TIMESTAMPS_PROPERTY",
                if scaffold.timestamps { "" } else { "public $timestamps = false;" },
            )
            .set("FILLABLE", fillable_block(scaffold))
            .set("RELATIONS", relation_methods(&relations)),
    )?;

    Ok(GeneratedArtifact::new(
        php_class_path(&scaffold.model_name),
        tidy_blank_lines(&rendered),
    ))
}

/// The `$table` property is only emitted when the conventional table name
/// (pluralized lowercase class) differs from the scaffold's table.
fn table_property(scaffold: &Scaffold, class: &str) -> String {
    use inflector::Inflector as _;

    if class.to_lowercase().to_plural() == scaffold.table_name {
        String::new()
    } else {
        format!("protected $table = '{}';", scaffold.table_name)
    }
}

fn doc_block(scaffold: &Scaffold, relations: &[Relation]) -> String {
    let mut lines = vec!["/**".to_string()];
    lines.push(format!(" * @property int ${}", scaffold.primary_key));

    for field in &scaffold.fields {
        if field.name == scaffold.primary_key {
            continue;
        }
        let base = field.sql_type.doc_type();
        // Date/time columns are documented nullable regardless of the
        // column's own nullability; scalars get the union only when nullable.
        let doc_type = if field.sql_type.is_date_time() || field.nullable {
            format!("{base}|null")
        } else {
            base.to_string()
        };
        lines.push(format!(" * @property {doc_type} ${}", field.name));
    }

    if scaffold.timestamps {
        lines.push(" * @property Carbon|null $created_at".into());
        lines.push(" * @property Carbon|null $updated_at".into());
    }
    if scaffold.soft_deletes {
        lines.push(" * @property Carbon|null $deleted_at".into());
    }

    for rel in relations {
        match rel.kind {
            RelationKind::BelongsTo => {
                let target = if rel.implicit {
                    rel.target.to_string()
                } else {
                    format!("\\{}", rel.target)
                };
                lines.push(format!(" * @property-read {target} ${}", rel.name));
            }
            RelationKind::BelongsToMany => {
                lines.push(format!(
                    " * @property-read Collection<int, \\{}> ${}",
                    rel.target, rel.name
                ));
                lines.push(format!(" * @property-read int|null ${}_count", rel.name));
            }
        }
    }

    lines.push(" *".into());
    lines.push(" * @mixin Model".into());
    lines.push(" */".into());
    lines.join("\n")
}

fn fillable_block(scaffold: &Scaffold) -> String {
    let fields = scaffold.mass_assignable();
    if fields.is_empty() {
        return String::new();
    }

    let mut lines = vec!["protected $fillable = [".to_string()];
    for name in fields {
        lines.push(format!("        '{name}',"));
    }
    lines.push("    ];".into());
    lines.join("\n")
}

fn relation_methods(relations: &[Relation]) -> String {
    let methods: Vec<String> = relations
        .iter()
        .filter(|r| !r.implicit)
        .map(|rel| match rel.kind {
            RelationKind::BelongsTo => format!(
                "    public function {}()\n    {{\n        return $this->belongsTo(\\{}::class, '{}', '{}');\n    }}",
                rel.name, rel.target, rel.field_name, rel.value_column
            ),
            RelationKind::BelongsToMany => format!(
                "    public function {}()\n    {{\n        return $this->belongsToMany(\\{}::class);\n    }}",
                rel.name, rel.target
            ),
        })
        .collect();

    if methods.is_empty() {
        String::new()
    } else {
        format!("\n{}", methods.join("\n\n"))
    }
}
