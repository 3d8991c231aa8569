//! Scaffold model: one generation unit, mapping 1:1 onto a destination table.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::field::{Field, FieldSpec};
use crate::domain::naming::{Fqcn, NamingResolver};

/// One enabled generation step.
///
/// Variant order IS the execution order the orchestrator uses; the set below
/// iterates in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CreationOption {
    Model,
    Migration,
    Controller,
    Migrate,
    MenuItem,
    Api,
    BladeCrud,
    TestCase,
    /// Modifier for `Migrate`: drop an existing table before migrating.
    RecreateTable,
}

impl CreationOption {
    pub fn parse(raw: &str) -> Option<Self> {
        let opt = match raw.trim().to_lowercase().as_str() {
            "model" => Self::Model,
            "migration" => Self::Migration,
            "controller" => Self::Controller,
            "migrate" => Self::Migrate,
            "menu_item" => Self::MenuItem,
            "api" => Self::Api,
            "blade_crud" => Self::BladeCrud,
            "test_case" => Self::TestCase,
            "recreate_table" => Self::RecreateTable,
            _ => return None,
        };
        Some(opt)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Migration => "migration",
            Self::Controller => "controller",
            Self::Migrate => "migrate",
            Self::MenuItem => "menu_item",
            Self::Api => "api",
            Self::BladeCrud => "blade_crud",
            Self::TestCase => "test_case",
            Self::RecreateTable => "recreate_table",
        }
    }

    /// True for options the orchestrator runs as their own step.
    /// `RecreateTable` only modifies the `Migrate` step.
    pub fn is_step(self) -> bool {
        !matches!(self, Self::RecreateTable)
    }
}

impl fmt::Display for CreationOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered set of enabled generation steps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreationOptions(BTreeSet<CreationOption>);

impl CreationOptions {
    pub fn parse(raw: &[String]) -> Result<Self, DomainError> {
        let mut set = BTreeSet::new();
        for entry in raw {
            let opt = CreationOption::parse(entry).ok_or_else(|| {
                DomainError::UnknownCreationOption { raw: entry.clone() }
            })?;
            set.insert(opt);
        }
        Ok(Self(set))
    }

    pub fn contains(&self, opt: CreationOption) -> bool {
        self.0.contains(&opt)
    }

    pub fn insert(&mut self, opt: CreationOption) {
        self.0.insert(opt);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Enabled steps in execution order (`recreate_table` excluded).
    pub fn steps(&self) -> impl Iterator<Item = CreationOption> + '_ {
        self.0.iter().copied().filter(|o| o.is_step())
    }
}

impl FromIterator<CreationOption> for CreationOptions {
    fn from_iter<T: IntoIterator<Item = CreationOption>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Raw scaffold definition as submitted by the caller or read from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScaffoldPayload {
    pub table_name: String,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub controller_name: Option<String>,
    #[serde(default)]
    pub primary_key: Option<String>,
    #[serde(default)]
    pub timestamps: bool,
    #[serde(default)]
    pub soft_deletes: bool,
    #[serde(default, rename = "create")]
    pub create_options: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

/// Validated generation unit.
///
/// The `id`/timestamp/soft-delete columns are implicit and never appear in
/// `fields`; fields are sorted by `order` ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct Scaffold {
    pub table_name: String,
    pub model_name: Fqcn,
    pub controller_name: Fqcn,
    pub primary_key: String,
    pub timestamps: bool,
    pub soft_deletes: bool,
    pub options: CreationOptions,
    pub fields: Vec<Field>,
}

impl Scaffold {
    /// Resolve and validate a raw payload. Missing model/controller names
    /// are derived from the table name; explicit names are normalized.
    pub fn resolve(payload: &ScaffoldPayload, naming: &NamingResolver) -> Result<Self, DomainError> {
        let table_name = payload.table_name.trim().to_string();
        if table_name.is_empty() {
            return Err(DomainError::MissingTableName);
        }
        if payload.fields.is_empty() {
            return Err(DomainError::EmptyFieldList { table: table_name });
        }

        let model_name = match payload.model_name.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Fqcn::normalize(raw),
            _ => naming.derive_model_name(&table_name),
        };
        let controller_name = match payload.controller_name.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Fqcn::normalize(raw),
            _ => naming.derive_controller_name(&model_name),
        };

        let mut fields = Vec::with_capacity(payload.fields.len());
        let mut seen = BTreeSet::new();
        for (index, spec) in payload.fields.iter().enumerate() {
            let field = Field::resolve(spec, index)?;
            if !seen.insert(field.name.clone()) {
                return Err(DomainError::DuplicateFieldName { name: field.name });
            }
            fields.push(field);
        }
        // Stable sort: equal orders keep submission order.
        fields.sort_by_key(|f| f.order);

        Ok(Self {
            table_name,
            model_name,
            controller_name,
            primary_key: payload
                .primary_key
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or("id")
                .to_string(),
            timestamps: payload.timestamps,
            soft_deletes: payload.soft_deletes,
            options: CreationOptions::parse(&payload.create_options)?,
            fields,
        })
    }

    /// Names of every mass-assignable column: all fields except the primary
    /// key (system columns are implicit and never listed as fields).
    pub fn mass_assignable(&self) -> Vec<&str> {
        let skip = [
            self.primary_key.as_str(),
            "created_at",
            "updated_at",
            "deleted_at",
        ];
        self.fields
            .iter()
            .map(|f| f.name.as_str())
            .filter(|n| !skip.contains(n))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(table: &str, field_names: &[&str]) -> ScaffoldPayload {
        ScaffoldPayload {
            table_name: table.into(),
            fields: field_names
                .iter()
                .map(|n| FieldSpec {
                    name: (*n).into(),
                    ..FieldSpec::default()
                })
                .collect(),
            ..ScaffoldPayload::default()
        }
    }

    #[test]
    fn empty_field_list_is_rejected() {
        let err = Scaffold::resolve(&payload("posts", &[]), &NamingResolver::default()).unwrap_err();
        assert_eq!(err, DomainError::EmptyFieldList { table: "posts".into() });
    }

    #[test]
    fn missing_table_name_is_rejected() {
        let err = Scaffold::resolve(&payload("  ", &["a"]), &NamingResolver::default()).unwrap_err();
        assert_eq!(err, DomainError::MissingTableName);
    }

    #[test]
    fn duplicate_field_names_are_rejected() {
        let err =
            Scaffold::resolve(&payload("posts", &["title", "title"]), &NamingResolver::default())
                .unwrap_err();
        assert_eq!(err, DomainError::DuplicateFieldName { name: "title".into() });
    }

    #[test]
    fn names_are_derived_when_absent() {
        let s = Scaffold::resolve(&payload("posts", &["title"]), &NamingResolver::default()).unwrap();
        assert_eq!(s.model_name.to_string(), "App\\Models\\Post");
        assert_eq!(
            s.controller_name.to_string(),
            "App\\Admin\\Controllers\\PostController"
        );
        assert_eq!(s.primary_key, "id");
    }

    #[test]
    fn explicit_names_are_normalized() {
        let mut p = payload("posts", &["title"]);
        p.model_name = Some("AppModelsArticle".into());
        let s = Scaffold::resolve(&p, &NamingResolver::default()).unwrap();
        assert_eq!(s.model_name.to_string(), "App\\Models\\Article");
        // Controller derives from the explicit model.
        assert_eq!(
            s.controller_name.to_string(),
            "App\\Admin\\Controllers\\ArticleController"
        );
    }

    #[test]
    fn fields_sort_by_order() {
        let mut p = payload("posts", &["b", "a"]);
        p.fields[0].order = Some(5);
        p.fields[1].order = Some(1);
        let s = Scaffold::resolve(&p, &NamingResolver::default()).unwrap();
        let names: Vec<_> = s.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn creation_options_iterate_in_execution_order() {
        let opts = CreationOptions::parse(&[
            "test_case".into(),
            "model".into(),
            "api".into(),
            "migration".into(),
            "recreate_table".into(),
        ])
        .unwrap();
        let order: Vec<_> = opts.steps().collect();
        assert_eq!(
            order,
            vec![
                CreationOption::Model,
                CreationOption::Migration,
                CreationOption::Api,
                CreationOption::TestCase,
            ]
        );
        assert!(opts.contains(CreationOption::RecreateTable));
    }

    #[test]
    fn unknown_creation_option_is_rejected() {
        let err = CreationOptions::parse(&["frobnicate".into()]).unwrap_err();
        assert_eq!(err, DomainError::UnknownCreationOption { raw: "frobnicate".into() });
    }

    #[test]
    fn payload_deserializes_from_the_json_wire_shape() {
        let payload: ScaffoldPayload = serde_json::from_str(
            r#"{
                "table_name": "patients",
                "primary_key": "id",
                "timestamps": true,
                "create": ["model", "api"],
                "fields": [
                    {
                        "name": "status_id",
                        "type": "unsignedBigInteger",
                        "input_type": "select",
                        "options_source": "App\\Models\\Status",
                        "options_value_col": "id",
                        "options_label_col": "label"
                    }
                ]
            }"#,
        )
        .unwrap();

        let s = Scaffold::resolve(&payload, &NamingResolver::default()).unwrap();
        assert!(s.options.contains(CreationOption::Api));
        assert_eq!(s.fields[0].name, "status_id");
        assert!(s.fields[0].options.is_entity());
    }

    #[test]
    fn mass_assignable_excludes_primary_key() {
        let s = Scaffold::resolve(&payload("posts", &["title", "body"]), &NamingResolver::default())
            .unwrap();
        assert_eq!(s.mass_assignable(), vec!["title", "body"]);
    }
}
