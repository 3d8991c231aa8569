//! Field model: one column/UI-input definition inside a scaffold.
//!
//! A [`FieldSpec`] is the raw, serde-friendly shape that travels through the
//! store and the CLI definition file. [`Field::resolve`] turns it into the
//! validated domain model, parsing the column type, the widget type and the
//! option source exactly once — generators never re-parse strings.

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::naming::Fqcn;

/// Portable column types, named after their migration methods.
///
/// The set mirrors the scaffold creation form: every value the form offers
/// maps 1:1 onto a variant, so migrations never coerce lossily.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    String,
    Char,
    Text,
    MediumText,
    LongText,
    Integer,
    TinyInteger,
    SmallInteger,
    MediumInteger,
    BigInteger,
    UnsignedTinyInteger,
    UnsignedSmallInteger,
    UnsignedMediumInteger,
    UnsignedInteger,
    UnsignedBigInteger,
    Float,
    Double,
    Decimal,
    Boolean,
    Date,
    Time,
    DateTime,
    Timestamp,
    DateTimeTz,
    TimeTz,
    TimestampTz,
    NullableTimestamps,
    Enum,
    Json,
    Jsonb,
    Binary,
    IpAddress,
    MacAddress,
    Uuid,
}

impl SqlType {
    /// Parse a raw type string. Case-insensitive: `bigInteger`, `biginteger`
    /// and `BIGINTEGER` all resolve to [`SqlType::BigInteger`].
    pub fn parse(raw: &str) -> Option<Self> {
        let t = match raw.trim().to_lowercase().as_str() {
            "string" | "varchar" => Self::String,
            "char" => Self::Char,
            "text" => Self::Text,
            "mediumtext" => Self::MediumText,
            "longtext" => Self::LongText,
            "integer" | "int" => Self::Integer,
            "tinyinteger" => Self::TinyInteger,
            "smallinteger" => Self::SmallInteger,
            "mediuminteger" => Self::MediumInteger,
            "biginteger" | "bigint" => Self::BigInteger,
            "unsignedtinyinteger" => Self::UnsignedTinyInteger,
            "unsignedsmallinteger" => Self::UnsignedSmallInteger,
            "unsignedmediuminteger" => Self::UnsignedMediumInteger,
            "unsignedinteger" => Self::UnsignedInteger,
            "unsignedbiginteger" => Self::UnsignedBigInteger,
            "float" => Self::Float,
            "double" => Self::Double,
            "decimal" => Self::Decimal,
            "boolean" | "bool" => Self::Boolean,
            "date" => Self::Date,
            "time" => Self::Time,
            "datetime" => Self::DateTime,
            "timestamp" => Self::Timestamp,
            "datetimetz" => Self::DateTimeTz,
            "timetz" => Self::TimeTz,
            "timestamptz" => Self::TimestampTz,
            "nullabletimestamps" => Self::NullableTimestamps,
            "enum" => Self::Enum,
            "json" => Self::Json,
            "jsonb" => Self::Jsonb,
            "binary" => Self::Binary,
            "ipaddress" => Self::IpAddress,
            "macaddress" => Self::MacAddress,
            "uuid" => Self::Uuid,
            _ => return None,
        };
        Some(t)
    }

    /// The schema-builder method used in generated migrations.
    pub fn migration_method(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Char => "char",
            Self::Text => "text",
            Self::MediumText => "mediumText",
            Self::LongText => "longText",
            Self::Integer => "integer",
            Self::TinyInteger => "tinyInteger",
            Self::SmallInteger => "smallInteger",
            Self::MediumInteger => "mediumInteger",
            Self::BigInteger => "bigInteger",
            Self::UnsignedTinyInteger => "unsignedTinyInteger",
            Self::UnsignedSmallInteger => "unsignedSmallInteger",
            Self::UnsignedMediumInteger => "unsignedMediumInteger",
            Self::UnsignedInteger => "unsignedInteger",
            Self::UnsignedBigInteger => "unsignedBigInteger",
            Self::Float => "float",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "dateTime",
            Self::Timestamp => "timestamp",
            Self::DateTimeTz => "dateTimeTz",
            Self::TimeTz => "timeTz",
            Self::TimestampTz => "timestampTz",
            Self::NullableTimestamps => "nullableTimestamps",
            Self::Enum => "enum",
            Self::Json => "json",
            Self::Jsonb => "jsonb",
            Self::Binary => "binary",
            Self::IpAddress => "ipAddress",
            Self::MacAddress => "macAddress",
            Self::Uuid => "uuid",
        }
    }

    /// Documentation type for the generated model's property block.
    pub fn doc_type(self) -> &'static str {
        match self {
            Self::Integer
            | Self::TinyInteger
            | Self::SmallInteger
            | Self::MediumInteger
            | Self::BigInteger
            | Self::UnsignedTinyInteger
            | Self::UnsignedSmallInteger
            | Self::UnsignedMediumInteger
            | Self::UnsignedInteger
            | Self::UnsignedBigInteger => "int",
            Self::Float | Self::Double | Self::Decimal => "float",
            Self::Boolean => "bool",
            Self::Json | Self::Jsonb => "array",
            Self::Date
            | Self::DateTime
            | Self::Timestamp
            | Self::DateTimeTz
            | Self::TimestampTz
            | Self::NullableTimestamps => "Carbon",
            // Time-of-day columns are documented as plain strings.
            _ => "string",
        }
    }

    pub fn is_integer(self) -> bool {
        self.doc_type() == "int"
    }

    /// True for the columns documented as Carbon instances; these are always
    /// documented nullable regardless of the column's own nullability.
    pub fn is_date_time(self) -> bool {
        self.doc_type() == "Carbon"
    }

    /// Base validation rule for generated request validators.
    pub fn validation_rule(self) -> &'static str {
        if self.is_integer() {
            "integer"
        } else if self == Self::Date {
            "date"
        } else {
            "string"
        }
    }
}

/// UI widget used to edit a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    #[default]
    Text,
    Textarea,
    Number,
    Email,
    Date,
    File,
    Image,
    Password,
    Hidden,
    Switch,
    Checkbox,
    Radio,
    Select,
}

impl InputType {
    pub fn parse(raw: &str) -> Option<Self> {
        let t = match raw.trim().to_lowercase().as_str() {
            "" | "text" => Self::Text,
            "textarea" => Self::Textarea,
            "number" => Self::Number,
            "email" => Self::Email,
            "date" | "datetime" | "time" => Self::Date,
            "file" => Self::File,
            "image" => Self::Image,
            "password" => Self::Password,
            "hidden" => Self::Hidden,
            "switch" => Self::Switch,
            "checkbox" => Self::Checkbox,
            "radio" => Self::Radio,
            "select" => Self::Select,
            _ => return None,
        };
        Some(t)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Email => "email",
            Self::Date => "date",
            Self::File => "file",
            Self::Image => "image",
            Self::Password => "password",
            Self::Hidden => "hidden",
            Self::Switch => "switch",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Select => "select",
        }
    }

    /// Widgets whose choices come from an option source.
    pub fn is_option_driven(self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::Checkbox)
    }
}

/// Column key modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    Unique,
    Index,
}

impl FieldKey {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "unique" => Some(Self::Unique),
            "index" => Some(Self::Index),
            _ => None,
        }
    }
}

/// Where a select/radio/checkbox field's choices come from.
///
/// Resolved once by [`Field::resolve`]; generators only ever see the tagged
/// form, never the raw strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsSource {
    /// The field has no options (or is not option-driven).
    None,
    /// Literal comma-separated value/label lists.
    Static { values: Vec<String>, labels: Vec<String> },
    /// Another entity's rows provide the choices.
    Entity {
        target: Fqcn,
        value_column: String,
        label_column: String,
    },
}

impl OptionsSource {
    pub fn is_entity(&self) -> bool {
        matches!(self, Self::Entity { .. })
    }

    /// Zip static values with labels. A label list shorter than the value
    /// list falls back to the value at that position; extra labels are
    /// ignored. Never fails.
    pub fn static_pairs(&self) -> Vec<(String, String)> {
        match self {
            Self::Static { values, labels } => values
                .iter()
                .enumerate()
                .map(|(i, v)| (v.clone(), labels.get(i).unwrap_or(v).clone()))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Raw field definition as submitted by the caller or read from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type", default)]
    pub sql_type: Option<String>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub input_type: Option<String>,
    #[serde(default)]
    pub options_source: Option<String>,
    #[serde(default)]
    pub options_value_col: Option<String>,
    #[serde(default)]
    pub options_label_col: Option<String>,
}

/// Validated column/UI-field definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub sql_type: SqlType,
    pub nullable: bool,
    pub key: Option<FieldKey>,
    pub default_value: Option<String>,
    pub comment: Option<String>,
    pub order: i64,
    pub input_type: InputType,
    pub options: OptionsSource,
}

impl Field {
    /// Resolve a raw spec into the validated model. `index` supplies the
    /// fallback emission order for specs without an explicit `order`.
    pub fn resolve(spec: &FieldSpec, index: usize) -> Result<Self, DomainError> {
        let name = spec.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::EmptyFieldName { index });
        }

        let sql_type = match spec.sql_type.as_deref().map(str::trim) {
            None | Some("") => SqlType::String,
            Some(raw) => SqlType::parse(raw).ok_or_else(|| DomainError::UnknownSqlType {
                field: name.clone(),
                raw: raw.to_string(),
            })?,
        };

        let input_type = match spec.input_type.as_deref() {
            None => InputType::Text,
            Some(raw) => InputType::parse(raw).ok_or_else(|| DomainError::UnknownInputType {
                field: name.clone(),
                raw: raw.to_string(),
            })?,
        };

        let options = Self::resolve_options(&name, spec)?;

        Ok(Self {
            name,
            sql_type,
            nullable: spec.nullable,
            key: spec.key.as_deref().and_then(FieldKey::parse),
            default_value: none_if_blank(spec.default.as_deref()),
            comment: none_if_blank(spec.comment.as_deref()),
            order: spec.order.unwrap_or(index as i64),
            input_type,
            options,
        })
    }

    fn resolve_options(name: &str, spec: &FieldSpec) -> Result<OptionsSource, DomainError> {
        let source = spec.options_source.as_deref().map(str::trim).unwrap_or("");
        if source.is_empty() {
            return Ok(OptionsSource::None);
        }

        if source == "static" {
            return Ok(OptionsSource::Static {
                values: split_csv(spec.options_value_col.as_deref()),
                labels: split_csv(spec.options_label_col.as_deref()),
            });
        }

        let target = Fqcn::normalize(source);
        if target.is_empty() {
            return Err(DomainError::InvalidOptionsSource {
                field: name.to_string(),
                reason: format!("'{source}' is not a resolvable entity reference"),
            });
        }

        Ok(OptionsSource::Entity {
            target,
            value_column: spec
                .options_value_col
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or("id")
                .to_string(),
            label_column: spec
                .options_label_col
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or("name")
                .to_string(),
        })
    }
}

fn none_if_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

fn split_csv(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str) -> FieldSpec {
        FieldSpec {
            name: name.into(),
            ..FieldSpec::default()
        }
    }

    #[test]
    fn type_defaults_to_string() {
        let f = Field::resolve(&spec("title"), 0).unwrap();
        assert_eq!(f.sql_type, SqlType::String);
        assert_eq!(f.input_type, InputType::Text);
        assert_eq!(f.options, OptionsSource::None);
    }

    #[test]
    fn type_parsing_is_case_insensitive() {
        assert_eq!(SqlType::parse("bigInteger"), Some(SqlType::BigInteger));
        assert_eq!(SqlType::parse("BIGINTEGER"), Some(SqlType::BigInteger));
        assert_eq!(SqlType::parse("ipAddress"), Some(SqlType::IpAddress));
        assert_eq!(SqlType::parse("nope"), None);
    }

    #[test]
    fn unknown_type_is_rejected_with_field_name() {
        let mut s = spec("size");
        s.sql_type = Some("hugetext".into());
        let err = Field::resolve(&s, 0).unwrap_err();
        assert_eq!(
            err,
            DomainError::UnknownSqlType {
                field: "size".into(),
                raw: "hugetext".into()
            }
        );
    }

    #[test]
    fn static_labels_fall_back_to_values() {
        let mut s = spec("gender");
        s.input_type = Some("select".into());
        s.options_source = Some("static".into());
        s.options_value_col = Some("male,female,other".into());
        s.options_label_col = Some("Male,Female".into());

        let f = Field::resolve(&s, 0).unwrap();
        assert_eq!(
            f.options.static_pairs(),
            vec![
                ("male".to_string(), "Male".to_string()),
                ("female".to_string(), "Female".to_string()),
                ("other".to_string(), "other".to_string()),
            ]
        );
    }

    #[test]
    fn entity_source_defaults_value_and_label_columns() {
        let mut s = spec("status_id");
        s.input_type = Some("select".into());
        s.options_source = Some("App\\Models\\Status".into());

        let f = Field::resolve(&s, 0).unwrap();
        match f.options {
            OptionsSource::Entity {
                target,
                value_column,
                label_column,
            } => {
                assert_eq!(target.to_string(), "App\\Models\\Status");
                assert_eq!(value_column, "id");
                assert_eq!(label_column, "name");
            }
            other => panic!("expected entity source, got {other:?}"),
        }
    }

    #[test]
    fn concatenated_entity_source_is_normalized() {
        let mut s = spec("status_id");
        s.input_type = Some("select".into());
        s.options_source = Some("AppModelsStatus".into());

        let f = Field::resolve(&s, 0).unwrap();
        match f.options {
            OptionsSource::Entity { target, .. } => {
                assert_eq!(target.to_string(), "App\\Models\\Status");
            }
            other => panic!("expected entity source, got {other:?}"),
        }
    }

    #[test]
    fn date_time_family_is_documented_nullable() {
        assert!(SqlType::DateTime.is_date_time());
        assert!(SqlType::TimestampTz.is_date_time());
        assert!(!SqlType::Time.is_date_time());
        assert_eq!(SqlType::Time.doc_type(), "string");
    }
}
