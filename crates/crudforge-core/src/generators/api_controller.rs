//! REST controller generator: validation rule sets plus an option-driven
//! field-metadata map for API clients.

use crate::domain::{InputType, NamingResolver, OptionsSource, Scaffold};
use crate::generators::rules::{php_string_array, rule_lines, rules_body};
use crate::generators::stubs;
use crate::generators::template::TemplateVars;
use crate::generators::{GeneratedArtifact, GeneratorError, php_class_path};

/// Render the API controller plus the shared response-mapper trait the stub
/// relies on. The trait is written once and never overwritten.
pub fn generate(
    scaffold: &Scaffold,
    naming: &NamingResolver,
) -> Result<Vec<GeneratedArtifact>, GeneratorError> {
    let api_name = naming.api_controller_name(&scaffold.model_name);
    let rules = rule_lines(scaffold, naming);

    let rendered = stubs::API_CONTROLLER.render(
        TemplateVars::new()
            .set("NAMESPACE", api_name.namespace())
            .set("CLASS", api_name.short())
            .set("MODEL_FQCN", scaffold.model_name.to_string())
            .set("MODEL", scaffold.model_name.short())
            .set("RULES_STORE", rules_body(&rules))
            .set("RULES_UPDATE", rules_body(&rules))
            .set("FIELD_META", field_meta(scaffold, naming)),
    )?;

    Ok(vec![
        GeneratedArtifact::write_once(
            "app/Traits/ResponseMapper.php",
            stubs::RESPONSE_MAPPER.to_string(),
        ),
        GeneratedArtifact::new(php_class_path(&api_name), rendered),
    ])
}

/// One metadata row per option-driven field, describing where its choices
/// come from so clients can render the widget.
fn field_meta(scaffold: &Scaffold, naming: &NamingResolver) -> String {
    let mut rows = Vec::new();

    for field in &scaffold.fields {
        if !field.input_type.is_option_driven() {
            continue;
        }
        match &field.options {
            OptionsSource::None => {}
            OptionsSource::Static { values, labels } => {
                rows.push(format!(
                    "            '{}' => ['type' => '{}', 'source' => 'static', 'values' => {}, 'labels' => {}],",
                    field.name,
                    field.input_type.as_str(),
                    php_string_array(values),
                    php_string_array(labels),
                ));
            }
            OptionsSource::Entity {
                target,
                value_column,
                label_column,
            } => {
                let relation =
                    naming.relation_name(target, field.input_type == InputType::Checkbox);
                rows.push(format!(
                    "            '{}' => ['type' => '{}', 'source' => 'model', 'fqcn' => \\{}::class, 'value' => '{}', 'label' => '{}', 'relation' => '{}'],",
                    field.name,
                    field.input_type.as_str(),
                    target,
                    value_column,
                    label_column,
                    relation,
                ));
            }
        }
    }

    if rows.is_empty() {
        "            // no option-driven fields".to_string()
    } else {
        rows.join("\n")
    }
}
