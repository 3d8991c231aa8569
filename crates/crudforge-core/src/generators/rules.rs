//! Validation-rule builders shared by the API and web controller generators.

use crate::domain::{InputType, NamingResolver, OptionsSource, Scaffold};

/// Build the indented rule lines for a scaffold's fields.
///
/// - required unless nullable, base type rule from the column type;
/// - static select/radio add an `in:` rule over the literal values;
/// - entity select/radio add an existence check against the source table;
/// - entity checkboxes validate as arrays with a per-element existence
///   check, accepted under both the relation name and the raw field name.
pub(crate) fn rule_lines(scaffold: &Scaffold, naming: &NamingResolver) -> Vec<String> {
    let mut lines = Vec::new();

    for field in &scaffold.fields {
        if field.name == scaffold.primary_key {
            continue;
        }

        let presence = if field.nullable { "nullable" } else { "required" };
        let base = field.sql_type.validation_rule();

        match (&field.input_type, &field.options) {
            (InputType::Select | InputType::Radio, OptionsSource::Static { values, .. }) => {
                let mut rules = vec![format!("'{presence}'"), format!("'{base}'")];
                if !values.is_empty() {
                    rules.push(format!("'in:{}'", values.join(",")));
                }
                lines.push(format!(
                    "            '{}' => [{}],",
                    field.name,
                    rules.join(", ")
                ));
            }
            (
                InputType::Select | InputType::Radio,
                OptionsSource::Entity {
                    target,
                    value_column,
                    ..
                },
            ) => {
                lines.push(format!(
                    "            '{}' => array_filter(['{presence}', '{base}', 'exists:' . (new \\{target}())->getTable() . ',{value_column}']),",
                    field.name
                ));
            }
            (
                InputType::Checkbox,
                OptionsSource::Entity {
                    target,
                    value_column,
                    ..
                },
            ) => {
                let relation = naming.relation_name(target, true);
                let exists = format!(
                    "'exists:' . (new \\{target}())->getTable() . ',{value_column}'"
                );
                lines.push(format!("            '{relation}' => ['sometimes', 'array'],"));
                lines.push(format!(
                    "            '{relation}.*' => ['integer', {exists}],"
                ));
                if relation != field.name {
                    lines.push(format!(
                        "            '{}' => ['sometimes', 'array'],",
                        field.name
                    ));
                    lines.push(format!(
                        "            '{}.*' => ['integer', {exists}],",
                        field.name
                    ));
                }
            }
            _ => {
                lines.push(format!(
                    "            '{}' => ['{presence}', '{base}'],",
                    field.name
                ));
            }
        }
    }

    lines
}

/// Wrap rule lines into a `return [...]` method body.
pub(crate) fn rules_body(lines: &[String]) -> String {
    if lines.is_empty() {
        return "        return [];".to_string();
    }
    format!("        return [\n{}\n        ];", lines.join("\n"))
}

/// `['male', 'female']`-style PHP array of quoted strings.
pub(crate) fn php_string_array(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("'{v}'")).collect();
    format!("[{}]", quoted.join(", "))
}

/// `['male' => 'Male', ...]`-style PHP map literal.
pub(crate) fn php_string_map(pairs: &[(String, String)]) -> String {
    let quoted: Vec<String> = pairs
        .iter()
        .map(|(k, v)| format!("'{k}' => '{v}'"))
        .collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldSpec, ScaffoldPayload};

    fn scaffold(fields: Vec<FieldSpec>) -> Scaffold {
        let payload = ScaffoldPayload {
            table_name: "patients".into(),
            fields,
            ..ScaffoldPayload::default()
        };
        Scaffold::resolve(&payload, &NamingResolver::default()).unwrap()
    }

    #[test]
    fn static_select_gets_an_in_rule() {
        let s = scaffold(vec![FieldSpec {
            name: "gender".into(),
            input_type: Some("select".into()),
            options_source: Some("static".into()),
            options_value_col: Some("male,female".into()),
            ..FieldSpec::default()
        }]);
        let lines = rule_lines(&s, &NamingResolver::default());
        assert_eq!(
            lines,
            vec!["            'gender' => ['required', 'string', 'in:male,female'],"]
        );
    }

    #[test]
    fn entity_select_gets_an_exists_rule() {
        let s = scaffold(vec![FieldSpec {
            name: "status_id".into(),
            sql_type: Some("unsignedBigInteger".into()),
            input_type: Some("select".into()),
            options_source: Some("App\\Models\\Status".into()),
            ..FieldSpec::default()
        }]);
        let lines = rule_lines(&s, &NamingResolver::default());
        assert_eq!(
            lines,
            vec![
                "            'status_id' => array_filter(['required', 'integer', 'exists:' . (new \\App\\Models\\Status())->getTable() . ',id']),"
            ]
        );
    }

    #[test]
    fn entity_checkbox_validates_as_array_under_both_keys() {
        let s = scaffold(vec![FieldSpec {
            name: "blood_group_ids".into(),
            input_type: Some("checkbox".into()),
            options_source: Some("App\\Models\\BloodGroup".into()),
            ..FieldSpec::default()
        }]);
        let lines = rule_lines(&s, &NamingResolver::default());
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("'bloodGroups' => ['sometimes', 'array'],"));
        assert!(lines[1].contains("'bloodGroups.*' => ['integer', 'exists:'"));
        assert!(lines[2].contains("'blood_group_ids' => ['sometimes', 'array'],"));
    }

    #[test]
    fn nullable_fields_validate_as_nullable() {
        let s = scaffold(vec![FieldSpec {
            name: "born_on".into(),
            sql_type: Some("date".into()),
            nullable: true,
            ..FieldSpec::default()
        }]);
        let lines = rule_lines(&s, &NamingResolver::default());
        assert_eq!(lines, vec!["            'born_on' => ['nullable', 'date'],"]);
    }

    #[test]
    fn empty_rule_set_returns_bare_array() {
        assert_eq!(rules_body(&[]), "        return [];");
    }
}
