//! Web CRUD generator: a plain resource controller plus the five
//! server-rendered views (layout, index, form partial, create, edit, show).

use inflector::Inflector as _;

use crate::domain::{
    InputType, NamingResolver, OptionsSource, Relation, RelationKind, Scaffold, infer_relations,
};
use crate::generators::rules::{php_string_map, rule_lines, rules_body};
use crate::generators::stubs;
use crate::generators::template::TemplateVars;
use crate::generators::{GeneratedArtifact, GeneratorError, php_class_path, splice_lines};

/// Render the web controller and views. Artifact order: controller first,
/// then the views in include order.
pub fn generate(
    scaffold: &Scaffold,
    naming: &NamingResolver,
) -> Result<Vec<GeneratedArtifact>, GeneratorError> {
    let web_name = naming.web_controller_name(&scaffold.model_name);
    let slug = naming.route_slug(&scaffold.model_name);
    let view_dir = naming.view_dir(&slug);
    let title = naming.view_title(&view_dir);

    let relations = infer_relations(scaffold, naming);
    let many: Vec<&Relation> = relations
        .iter()
        .filter(|r| !r.implicit && r.kind == RelationKind::BelongsToMany)
        .collect();
    let rules = rule_lines(scaffold, naming);

    let controller = stubs::WEB_CONTROLLER.render(
        TemplateVars::new()
            .set("NAMESPACE", web_name.namespace())
            .set("CLASS", web_name.short())
            .set("MODEL_FQCN", scaffold.model_name.to_string())
            .set("MODEL", scaffold.model_name.short())
            .set("PRIMARY_KEY", scaffold.primary_key.clone())
            .set("VIEW_DIR", view_dir.clone())
            .set("ROUTE_NAME", slug.clone())
            .set("RULES_STORE", rules_body(&rules))
            .set("RULES_UPDATE", rules_body(&rules))
            .set("OPTIONS_BAG", options_bag(scaffold, naming))
            .set("MANY_TO_MANY_KEYS", many_to_many_keys(&many))
            .set("SYNC_MANY_TO_MANY", splice_lines(&sync_blocks(&many), "        ")),
    )?;

    let layout = stubs::BLADE_LAYOUT.render(TemplateVars::new().set("TITLE", title.clone()))?;

    let index = stubs::BLADE_INDEX.render(
        TemplateVars::new()
            .set("VIEW_DIR", view_dir.clone())
            .set("ROUTE_NAME", slug.clone())
            .set("TITLE", title)
            .set("INDEX_HEAD", splice_lines(&index_head(scaffold), "            "))
            .set("INDEX_COLS", splice_lines(&index_cols(scaffold, &relations), "                ")),
    )?;

    let form = stubs::BLADE_FORM.render(
        TemplateVars::new().set("FORM_FIELDS", form_fields(scaffold, &relations)),
    )?;

    let create = stubs::BLADE_CREATE.render(
        TemplateVars::new()
            .set("VIEW_DIR", view_dir.clone())
            .set("ROUTE_NAME", slug.clone()),
    )?;

    let edit = stubs::BLADE_EDIT.render(
        TemplateVars::new()
            .set("VIEW_DIR", view_dir.clone())
            .set("ROUTE_NAME", slug.clone()),
    )?;

    let show = stubs::BLADE_SHOW.render(
        TemplateVars::new()
            .set("VIEW_DIR", view_dir.clone())
            .set("ROUTE_NAME", slug.clone())
            .set("SHOW_ROWS", splice_lines(&show_rows(scaffold, &relations), "        ")),
    )?;

    let views = format!("resources/views/{view_dir}");
    Ok(vec![
        GeneratedArtifact::new(php_class_path(&web_name), controller),
        GeneratedArtifact::new(format!("{views}/_layout.blade.php"), layout),
        GeneratedArtifact::new(format!("{views}/index.blade.php"), index),
        GeneratedArtifact::new(format!("{views}/_form.blade.php"), form),
        GeneratedArtifact::new(format!("{views}/create.blade.php"), create),
        GeneratedArtifact::new(format!("{views}/edit.blade.php"), edit),
        GeneratedArtifact::new(format!("{views}/show.blade.php"), show),
    ])
}

fn field_label(name: &str) -> String {
    name.replace('_', " ").to_title_case()
}

fn relation_for<'a>(relations: &'a [Relation], field: &str) -> Option<&'a Relation> {
    relations
        .iter()
        .find(|r| !r.implicit && r.field_name == field)
}

/// Option maps the form partial reads: literal maps for static sources,
/// pluck queries for entity sources (checkbox relations additionally exposed
/// under their relation name).
fn options_bag(scaffold: &Scaffold, naming: &NamingResolver) -> String {
    let mut rows: Vec<String> = Vec::new();

    for field in &scaffold.fields {
        if !field.input_type.is_option_driven() {
            continue;
        }
        match &field.options {
            OptionsSource::None => {}
            OptionsSource::Static { .. } => {
                rows.push(format!(
                    "            '{}' => {},",
                    field.name,
                    php_string_map(&field.options.static_pairs())
                ));
            }
            OptionsSource::Entity {
                target,
                value_column,
                label_column,
            } => {
                let pluck = format!(
                    "\\{target}::query()->pluck('{label_column}', '{value_column}')->toArray()"
                );
                rows.push(format!("            '{}' => {pluck},", field.name));
                if field.input_type == InputType::Checkbox {
                    let rel = naming.relation_name(target, true);
                    rows.push(format!("            '{rel}' => {pluck},"));
                }
            }
        }
    }

    rows.dedup();
    if rows.is_empty() {
        "            // no dynamic options".to_string()
    } else {
        rows.join("\n")
    }
}

fn many_to_many_keys(many: &[&Relation]) -> String {
    let mut keys = Vec::new();
    for rel in many {
        keys.push(format!("'{}'", rel.name));
        if rel.name != rel.field_name {
            keys.push(format!("'{}'", rel.field_name));
        }
    }
    keys.join(", ")
}

/// One pivot-replacement block per belongsToMany relation: read the
/// submitted id list (relation key wins over the raw field key) and sync it.
fn sync_blocks(many: &[&Relation]) -> Vec<String> {
    if many.is_empty() {
        return vec!["// no many-to-many fields".to_string()];
    }

    let mut lines = Vec::new();
    for (i, rel) in many.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("// {} many-to-many sync", rel.name));
        lines.push(format!(
            "if ($request->has('{0}') || $request->has('{1}')) {{",
            rel.name, rel.field_name
        ));
        lines.push(format!(
            "    $ids = $request->input('{0}', $request->input('{1}', []));",
            rel.name, rel.field_name
        ));
        lines.push(format!("    $model->{}()->sync((array) $ids);", rel.name));
        lines.push("}".to_string());
    }
    lines
}

fn index_head(scaffold: &Scaffold) -> Vec<String> {
    scaffold
        .fields
        .iter()
        .map(|f| format!("<th>{}</th>", f.name))
        .collect()
}

fn index_cols(scaffold: &Scaffold, relations: &[Relation]) -> Vec<String> {
    scaffold
        .fields
        .iter()
        .map(|field| match relation_for(relations, &field.name) {
            Some(rel) if rel.kind == RelationKind::BelongsTo => format!(
                "<td>{{{{ $row->{}->{} ?? '' }}}}</td>",
                rel.name, rel.label_column
            ),
            Some(rel) => format!(
                "<td>{{{{ $row->{}->pluck('{}')->implode(', ') }}}}</td>",
                rel.name, rel.label_column
            ),
            None => format!("<td>{{{{ $row->{} }}}}</td>", field.name),
        })
        .collect()
}

fn show_rows(scaffold: &Scaffold, relations: &[Relation]) -> Vec<String> {
    scaffold
        .fields
        .iter()
        .map(|field| {
            let label = field_label(&field.name);
            let value = match relation_for(relations, &field.name) {
                Some(rel) if rel.kind == RelationKind::BelongsTo => {
                    format!("$model->{}->{} ?? ''", rel.name, rel.label_column)
                }
                Some(rel) => format!(
                    "$model->{}->pluck('{}')->implode(', ')",
                    rel.name, rel.label_column
                ),
                None => format!("$model->{}", field.name),
            };
            format!(
                "<tr><th style=\"width:200px\">{label}</th><td>{{{{ {value} }}}}</td></tr>"
            )
        })
        .collect()
}

fn form_fields(scaffold: &Scaffold, relations: &[Relation]) -> String {
    let mut blocks = Vec::new();

    for field in &scaffold.fields {
        let name = &field.name;
        let label = field_label(name);
        let value = format!("{{{{ old('{name}', $model->{name} ?? '') }}}}");

        let block = match (&field.input_type, &field.options) {
            (InputType::Select, options) if *options != OptionsSource::None => format!(
                r#"<div class="mb-3">
    <label class="form-label">{label}</label>
    <select name="{name}" class="form-select">
        <option value="">-- Select --</option>
        @foreach($options['{name}'] ?? [] as $v => $t)
            <option value="{{{{ $v }}}}" @selected(old('{name}', $model->{name} ?? null) == $v)>{{{{ $t }}}}</option>
        @endforeach
    </select>
</div>"#
            ),
            (InputType::Radio, _) => format!(
                r#"<div class="mb-3">
    <label class="form-label d-block">{label}</label>
    @foreach($options['{name}'] ?? [] as $v => $t)
        <label class="me-3"><input type="radio" name="{name}" value="{{{{ $v }}}}" @checked(old('{name}', $model->{name} ?? null) == $v)> {{{{ $t }}}}</label>
    @endforeach
</div>"#
            ),
            (InputType::Checkbox, OptionsSource::Entity { .. }) => {
                let rel = relation_for(relations, name)
                    .map(|r| r.name.clone())
                    .unwrap_or_else(|| name.clone());
                format!(
                    r#"<div class="mb-3">
    <label class="form-label d-block">{label}</label>
    @php $selected = old('{rel}', isset($model) ? $model->{rel}->pluck('id')->all() : []); @endphp
    @foreach($options['{rel}'] ?? [] as $v => $t)
        <label class="me-3"><input type="checkbox" name="{rel}[]" value="{{{{ $v }}}}" @checked(in_array($v, (array) $selected))> {{{{ $t }}}}</label>
    @endforeach
</div>"#
                )
            }
            (InputType::Checkbox | InputType::Switch, _) => format!(
                r#"<div class="mb-3">
    <label class="form-label d-block">{label}</label>
    @php $selected = (array) old('{name}', $model->{name} ?? []); @endphp
    @foreach($options['{name}'] ?? [] as $v => $t)
        <label class="me-3"><input type="checkbox" name="{name}[]" value="{{{{ $v }}}}" @checked(in_array($v, $selected))> {{{{ $t }}}}</label>
    @endforeach
</div>"#
            ),
            (InputType::Textarea, _) => format!(
                r#"<div class="mb-3">
    <label class="form-label">{label}</label>
    <textarea name="{name}" class="form-control">{{{{ old('{name}', $model->{name} ?? '') }}}}</textarea>
</div>"#
            ),
            (InputType::Hidden, _) => {
                format!(r#"<input type="hidden" name="{name}" value="{value}">"#)
            }
            (input, _) => {
                let html_type = match input {
                    InputType::Number => "number",
                    InputType::Email => "email",
                    InputType::Date => "date",
                    InputType::File | InputType::Image => "file",
                    InputType::Password => "password",
                    _ => "text",
                };
                if *input == InputType::File || *input == InputType::Image {
                    format!(
                        r#"<div class="mb-3">
    <label class="form-label">{label}</label>
    <input type="{html_type}" name="{name}" class="form-control">
</div>"#
                    )
                } else {
                    format!(
                        r#"<div class="mb-3">
    <label class="form-label">{label}</label>
    <input type="{html_type}" name="{name}" class="form-control" value="{value}">
</div>"#
                    )
                }
            }
        };
        blocks.push(block);
    }

    blocks.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldSpec, ScaffoldPayload};
    use std::path::PathBuf;

    fn scaffold(fields: Vec<FieldSpec>) -> Scaffold {
        let payload = ScaffoldPayload {
            table_name: "student_infos".into(),
            fields,
            ..ScaffoldPayload::default()
        };
        Scaffold::resolve(&payload, &NamingResolver::default()).unwrap()
    }

    #[test]
    fn emits_controller_and_five_views() {
        let s = scaffold(vec![FieldSpec {
            name: "name".into(),
            ..FieldSpec::default()
        }]);
        let artifacts = generate(&s, &NamingResolver::default()).unwrap();

        let paths: Vec<_> = artifacts.iter().map(|a| a.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("app/Http/Controllers/StudentInfoWebController.php"),
                PathBuf::from("resources/views/student_infos/_layout.blade.php"),
                PathBuf::from("resources/views/student_infos/index.blade.php"),
                PathBuf::from("resources/views/student_infos/_form.blade.php"),
                PathBuf::from("resources/views/student_infos/create.blade.php"),
                PathBuf::from("resources/views/student_infos/edit.blade.php"),
                PathBuf::from("resources/views/student_infos/show.blade.php"),
            ]
        );

        let controller = &artifacts[0].content;
        assert!(controller.contains("class StudentInfoWebController extends Controller"));
        assert!(controller.contains("view('student_infos.index'"));
        assert!(controller.contains("route('student-infos.index')"));
        assert!(controller.contains("// no many-to-many fields"));

        let index = &artifacts[2].content;
        assert!(index.contains("route('student-infos.create')"));
        assert!(index.contains("<td>{{ $row->name }}</td>"));
    }

    #[test]
    fn many_to_many_sync_replaces_the_pivot_set() {
        let s = scaffold(vec![FieldSpec {
            name: "blood_group_ids".into(),
            input_type: Some("checkbox".into()),
            options_source: Some("App\\Models\\BloodGroup".into()),
            ..FieldSpec::default()
        }]);
        let artifacts = generate(&s, &NamingResolver::default()).unwrap();
        let controller = &artifacts[0].content;

        assert!(controller.contains("// bloodGroups many-to-many sync"));
        assert!(controller.contains(
            "$ids = $request->input('bloodGroups', $request->input('blood_group_ids', []));"
        ));
        assert!(controller.contains("$model->bloodGroups()->sync((array) $ids);"));
        assert!(controller.contains("'bloodGroups', 'blood_group_ids'"));
        assert!(controller.contains(
            "'bloodGroups' => \\App\\Models\\BloodGroup::query()->pluck('name', 'id')->toArray(),"
        ));

        let form = &artifacts[3].content;
        assert!(form.contains("name=\"bloodGroups[]\""));
    }

    #[test]
    fn select_fields_render_options_and_relation_labels() {
        let s = scaffold(vec![FieldSpec {
            name: "status_id".into(),
            input_type: Some("select".into()),
            options_source: Some("App\\Models\\Status".into()),
            options_label_col: Some("label".into()),
            ..FieldSpec::default()
        }]);
        let artifacts = generate(&s, &NamingResolver::default()).unwrap();

        let index = &artifacts[2].content;
        assert!(index.contains("<td>{{ $row->status->label ?? '' }}</td>"));

        let show = &artifacts[6].content;
        assert!(show.contains("$model->status->label ?? ''"));

        let form = &artifacts[3].content;
        assert!(form.contains("<select name=\"status_id\" class=\"form-select\">"));
    }

    #[test]
    fn static_select_is_rendered_from_the_options_bag() {
        let s = scaffold(vec![FieldSpec {
            name: "gender".into(),
            input_type: Some("select".into()),
            options_source: Some("static".into()),
            options_value_col: Some("male,female".into()),
            options_label_col: Some("Male,Female".into()),
            ..FieldSpec::default()
        }]);
        let artifacts = generate(&s, &NamingResolver::default()).unwrap();
        let controller = &artifacts[0].content;

        assert!(controller.contains("'gender' => ['male' => 'Male', 'female' => 'Female'],"));
    }
}
