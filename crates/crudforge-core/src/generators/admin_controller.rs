//! Admin controller generator: grid, detail and form blocks for the admin
//! panel, with relation-aware rendering.

use std::collections::HashMap;

use crate::domain::{
    InputType, NamingResolver, OptionsSource, Relation, RelationKind, Scaffold, infer_relations,
    ucfirst,
};
use crate::generators::rules::php_string_map;
use crate::generators::stubs;
use crate::generators::template::TemplateVars;
use crate::generators::{GeneratedArtifact, GeneratorError, php_class_path, splice_lines};

pub fn generate(
    scaffold: &Scaffold,
    naming: &NamingResolver,
) -> Result<GeneratedArtifact, GeneratorError> {
    let relations = infer_relations(scaffold, naming);
    // Explicit relations only; implicit *_id relations render as raw columns.
    let by_field: HashMap<&str, &Relation> = relations
        .iter()
        .filter(|r| !r.implicit)
        .map(|r| (r.field_name.as_str(), r))
        .collect();

    let rendered = stubs::ADMIN_CONTROLLER.render(
        TemplateVars::new()
            .set("NAMESPACE", scaffold.controller_name.namespace())
            .set("CLASS", scaffold.controller_name.short())
            .set("MODEL_FQCN", scaffold.model_name.to_string())
            .set("MODEL", scaffold.model_name.short())
            .set("TITLE", ucfirst(scaffold.model_name.short()))
            .set("PRIMARY_KEY", scaffold.primary_key.clone())
            .set("GRID_FIELDS", splice_lines(&grid_lines(scaffold, &by_field), "        "))
            .set("SHOW_FIELDS", splice_lines(&show_lines(scaffold, &by_field), "        "))
            .set("FORM_FIELDS", splice_lines(&form_lines(scaffold, &by_field), "        ")),
    )?;

    Ok(GeneratedArtifact::new(
        php_class_path(&scaffold.controller_name),
        rendered,
    ))
}

fn grid_lines(scaffold: &Scaffold, by_field: &HashMap<&str, &Relation>) -> Vec<String> {
    scaffold
        .fields
        .iter()
        .filter(|f| f.name != scaffold.primary_key)
        .map(|field| match by_field.get(field.name.as_str()) {
            Some(rel) if rel.kind == RelationKind::BelongsTo => format!(
                "$grid->column('{}.{}', '{}');",
                rel.name, rel.label_column, field.name
            ),
            Some(rel) => format!(
                "$grid->column('{}', '{}')->display(fn ($values) => collect($values)->pluck('{}')->implode(', '));",
                rel.name, field.name, rel.label_column
            ),
            None => format!("$grid->column('{0}', '{0}')->sortable();", field.name),
        })
        .collect()
}

fn show_lines(scaffold: &Scaffold, by_field: &HashMap<&str, &Relation>) -> Vec<String> {
    scaffold
        .fields
        .iter()
        .filter(|f| f.name != scaffold.primary_key)
        .map(|field| match by_field.get(field.name.as_str()) {
            Some(rel) if rel.kind == RelationKind::BelongsTo => format!(
                "$show->field('{}.{}', '{}');",
                rel.name, rel.label_column, field.name
            ),
            Some(rel) => format!(
                "$show->field('{}', '{}')->as(fn ($values) => collect($values)->pluck('{}')->implode(', '));",
                rel.name, field.name, rel.label_column
            ),
            None => format!("$show->field('{0}', '{0}');", field.name),
        })
        .collect()
}

fn form_lines(scaffold: &Scaffold, by_field: &HashMap<&str, &Relation>) -> Vec<String> {
    scaffold
        .fields
        .iter()
        .filter(|f| f.name != scaffold.primary_key)
        .map(|field| {
            let widget = widget_method(field.input_type);
            match (&field.input_type, &field.options) {
                (InputType::Select | InputType::Radio | InputType::Checkbox, OptionsSource::Static { .. }) => {
                    format!(
                        "$form->{widget}('{0}', '{0}')->options({1});",
                        field.name,
                        php_string_map(&field.options.static_pairs())
                    )
                }
                (InputType::Select | InputType::Radio, OptionsSource::Entity { target, value_column, label_column }) => {
                    format!(
                        "$form->{widget}('{0}', '{0}')->options(\\{target}::query()->pluck('{label_column}', '{value_column}'));",
                        field.name
                    )
                }
                (InputType::Checkbox, OptionsSource::Entity { target, value_column, label_column }) => {
                    let rel = by_field
                        .get(field.name.as_str())
                        .map(|r| r.name.clone())
                        .unwrap_or_else(|| field.name.clone());
                    format!(
                        "$form->checkbox('{rel}', '{0}')->options(\\{target}::query()->pluck('{label_column}', '{value_column}'));",
                        field.name
                    )
                }
                _ => format!("$form->{widget}('{0}', '{0}');", field.name),
            }
        })
        .collect()
}

fn widget_method(input: InputType) -> &'static str {
    match input {
        InputType::Text => "text",
        InputType::Textarea => "textarea",
        InputType::Number => "number",
        InputType::Email => "email",
        InputType::Date => "date",
        InputType::File => "file",
        InputType::Image => "image",
        InputType::Password => "password",
        InputType::Hidden => "hidden",
        InputType::Switch => "switch",
        InputType::Checkbox => "checkbox",
        InputType::Radio => "radio",
        InputType::Select => "select",
    }
}
