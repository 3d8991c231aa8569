//! Relation inference from field definitions.
//!
//! Relations are transient: recomputed from the current field list on every
//! generation run and never persisted, so they cannot drift out of sync with
//! field edits.

use inflector::Inflector as _;

use crate::domain::field::{InputType, OptionsSource};
use crate::domain::naming::{Fqcn, NamingResolver};
use crate::domain::scaffold::Scaffold;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    BelongsTo,
    BelongsToMany,
}

/// A derived association descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    /// The field this relation was inferred from.
    pub field_name: String,
    pub kind: RelationKind,
    pub target: Fqcn,
    pub value_column: String,
    pub label_column: String,
    /// Accessor/relation identifier (camel case, pluralized for many-sides).
    pub name: String,
    /// Implicit `*_id` relations are documentation-only: they get a property
    /// line in the model doc block but no accessor method.
    pub implicit: bool,
}

/// Infer the ordered relation list for a scaffold.
///
/// Rules, in field order:
/// 1. `*_id` fields (other than the primary key) yield an implicit belongsTo
///    whose target is the capitalized base name.
/// 2. select/radio fields with an entity option source yield an explicit
///    belongsTo keyed by the field's own column against the source's value
///    column.
/// 3. checkbox fields with an entity option source yield a belongsToMany with
///    a pluralized accessor name.
/// 4. `static` sources never produce a relation.
///
/// A field matching both 1 and 2 yields only the explicit relation — the
/// implicit one is suppressed to avoid duplicate accessor names.
pub fn infer_relations(scaffold: &Scaffold, naming: &NamingResolver) -> Vec<Relation> {
    let mut relations = Vec::new();

    for field in &scaffold.fields {
        if let OptionsSource::Entity {
            target,
            value_column,
            label_column,
        } = &field.options
        {
            match field.input_type {
                InputType::Select | InputType::Radio => {
                    relations.push(Relation {
                        field_name: field.name.clone(),
                        kind: RelationKind::BelongsTo,
                        target: target.clone(),
                        value_column: value_column.clone(),
                        label_column: label_column.clone(),
                        name: naming.relation_name(target, false),
                        implicit: false,
                    });
                    continue;
                }
                InputType::Checkbox => {
                    relations.push(Relation {
                        field_name: field.name.clone(),
                        kind: RelationKind::BelongsToMany,
                        target: target.clone(),
                        value_column: value_column.clone(),
                        label_column: label_column.clone(),
                        name: naming.relation_name(target, true),
                        implicit: false,
                    });
                    continue;
                }
                _ => {}
            }
        }

        if let Some(base) = field.name.strip_suffix("_id") {
            if base.is_empty() || field.name == scaffold.primary_key {
                continue;
            }
            let target = Fqcn::parse(&base.to_pascal_case());
            relations.push(Relation {
                field_name: field.name.clone(),
                kind: RelationKind::BelongsTo,
                target: target.clone(),
                value_column: "id".into(),
                label_column: "name".into(),
                name: naming.relation_name(&target, false),
                implicit: true,
            });
        }
    }

    relations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::FieldSpec;
    use crate::domain::scaffold::ScaffoldPayload;

    fn scaffold_with(fields: Vec<FieldSpec>) -> Scaffold {
        let payload = ScaffoldPayload {
            table_name: "patients".into(),
            fields,
            ..ScaffoldPayload::default()
        };
        Scaffold::resolve(&payload, &NamingResolver::default()).unwrap()
    }

    fn select_field(name: &str, source: &str) -> FieldSpec {
        FieldSpec {
            name: name.into(),
            input_type: Some("select".into()),
            options_source: Some(source.into()),
            ..FieldSpec::default()
        }
    }

    #[test]
    fn id_suffix_yields_implicit_belongs_to() {
        let s = scaffold_with(vec![FieldSpec {
            name: "user_id".into(),
            ..FieldSpec::default()
        }]);
        let rels = infer_relations(&s, &NamingResolver::default());
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].kind, RelationKind::BelongsTo);
        assert_eq!(rels[0].target.to_string(), "User");
        assert_eq!(rels[0].name, "user");
        assert!(rels[0].implicit);
    }

    #[test]
    fn explicit_select_relation_suppresses_the_implicit_one() {
        // An `*_id` field that is also a model-backed select yields exactly
        // one relation, the explicit one.
        let mut spec = select_field("status_id", "App\\Models\\Status");
        spec.options_label_col = Some("label".into());
        let s = scaffold_with(vec![spec]);
        let rels = infer_relations(&s, &NamingResolver::default());
        assert_eq!(rels.len(), 1);
        let rel = &rels[0];
        assert_eq!(rel.kind, RelationKind::BelongsTo);
        assert_eq!(rel.target.to_string(), "App\\Models\\Status");
        assert_eq!(rel.name, "status");
        assert_eq!(rel.value_column, "id");
        assert_eq!(rel.label_column, "label");
        assert!(!rel.implicit);
    }

    #[test]
    fn checkbox_yields_belongs_to_many_with_plural_name() {
        let mut spec = select_field("blood_groups", "App\\Models\\BloodGroup");
        spec.input_type = Some("checkbox".into());
        let s = scaffold_with(vec![spec]);
        let rels = infer_relations(&s, &NamingResolver::default());
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].kind, RelationKind::BelongsToMany);
        assert_eq!(rels[0].name, "bloodGroups");
    }

    #[test]
    fn static_sources_never_relate() {
        let mut spec = select_field("gender", "static");
        spec.options_value_col = Some("male,female".into());
        let s = scaffold_with(vec![spec]);
        assert!(infer_relations(&s, &NamingResolver::default()).is_empty());
    }

    #[test]
    fn inference_is_deterministic_and_order_preserving() {
        let s = scaffold_with(vec![
            select_field("ward_id", "App\\Models\\Ward"),
            FieldSpec {
                name: "doctor_id".into(),
                ..FieldSpec::default()
            },
        ]);
        let naming = NamingResolver::default();
        let a = infer_relations(&s, &naming);
        let b = infer_relations(&s, &naming);
        assert_eq!(a, b);
        assert_eq!(a[0].name, "ward");
        assert_eq!(a[1].name, "doctor");
    }

    #[test]
    fn primary_key_never_relates() {
        let mut s = scaffold_with(vec![FieldSpec {
            name: "code_id".into(),
            ..FieldSpec::default()
        }]);
        s.primary_key = "code_id".into();
        assert!(infer_relations(&s, &NamingResolver::default()).is_empty());
    }
}
