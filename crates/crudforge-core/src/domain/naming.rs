//! Naming resolver: canonical identifiers derived from raw name strings.
//!
//! Every generator and the route merge engine go through this module, which
//! is what guarantees cross-artifact consistency: the model FQCN, controller
//! FQCN, route slug and relation names for one scaffold always agree.
//!
//! All functions are pure and deterministic — calling twice with identical
//! input yields byte-identical output. Idempotent route merging and safe
//! re-generation depend on that.

use std::fmt;

use inflector::Inflector as _;
use serde::{Deserialize, Serialize};

/// A fully-qualified class name, held as namespace segments.
///
/// The canonical separator is `\` (the emitted artifacts are PHP), but
/// `parse` also accepts `.` and `/` so definition files can avoid escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Fqcn(Vec<String>);

impl Fqcn {
    /// Parse a separator-delimited name. Leading separators are trimmed;
    /// empty input yields an empty Fqcn.
    pub fn parse(raw: &str) -> Self {
        let segments = raw
            .trim()
            .split(['\\', '/', '.'])
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        Self(segments)
    }

    /// Parse, additionally repairing names whose separators were lost in
    /// transit: a single segment starting with `App` that still carries
    /// interior capitals (`AppModelsStatus`) is split on capital-letter
    /// boundaries and rejoined (`App\Models\Status`).
    pub fn normalize(raw: &str) -> Self {
        let parsed = Self::parse(raw);
        if parsed.0.len() != 1 {
            return parsed;
        }
        let only = &parsed.0[0];
        if !only.starts_with("App") || only == "App" {
            return parsed;
        }
        Self(split_capitals(only))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The short (class base) name, or `""` for an empty Fqcn.
    pub fn short(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or("")
    }

    /// The namespace part (everything but the short name).
    pub fn namespace(&self) -> String {
        match self.0.len() {
            0 | 1 => String::new(),
            n => self.0[..n - 1].join("\\"),
        }
    }

    /// Append a segment, returning a new Fqcn.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }
}

impl fmt::Display for Fqcn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("\\"))
    }
}

fn split_capitals(s: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    for c in s.chars() {
        if c.is_uppercase() && !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Configurable namespace roots for derived names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub model_namespace: String,
    pub admin_controller_namespace: String,
    pub api_controller_namespace: String,
    pub web_controller_namespace: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            model_namespace: "App\\Models".into(),
            admin_controller_namespace: "App\\Admin\\Controllers".into(),
            api_controller_namespace: "App\\Http\\Controllers\\Api".into(),
            web_controller_namespace: "App\\Http\\Controllers".into(),
        }
    }
}

/// Derives every canonical identifier the generators need.
#[derive(Debug, Clone, Default)]
pub struct NamingResolver {
    config: NamingConfig,
}

impl NamingResolver {
    pub fn new(config: NamingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NamingConfig {
        &self.config
    }

    /// `posts` -> `App\Models\Post`.
    pub fn derive_model_name(&self, table_name: &str) -> Fqcn {
        let class = table_name.trim().to_singular().to_pascal_case();
        Fqcn::parse(&self.config.model_namespace).child(class)
    }

    /// `App\Models\Post` -> `App\Admin\Controllers\PostController`.
    pub fn derive_controller_name(&self, model: &Fqcn) -> Fqcn {
        Fqcn::parse(&self.config.admin_controller_namespace)
            .child(format!("{}Controller", model.short()))
    }

    /// `App\Models\Post` -> `App\Http\Controllers\Api\PostApiController`.
    pub fn api_controller_name(&self, model: &Fqcn) -> Fqcn {
        Fqcn::parse(&self.config.api_controller_namespace)
            .child(format!("{}ApiController", model.short()))
    }

    /// `App\Models\Post` -> `App\Http\Controllers\PostWebController`.
    pub fn web_controller_name(&self, model: &Fqcn) -> Fqcn {
        Fqcn::parse(&self.config.web_controller_namespace)
            .child(format!("{}WebController", model.short()))
    }

    /// Kebab-case pluralized short name: `StudentInfo` -> `student-infos`.
    /// Used for both the web and API resource URIs.
    pub fn route_slug(&self, model: &Fqcn) -> String {
        pluralize_tail(&model.short().to_kebab_case(), '-')
    }

    /// Blade view directory for a slug: `student-infos` -> `student_infos`.
    pub fn view_dir(&self, slug: &str) -> String {
        slug.replace('-', "_")
    }

    /// Human title for a view directory: `student_infos` -> `Student Infos`.
    pub fn view_title(&self, view_dir: &str) -> String {
        view_dir.replace(['_', '-'], " ").to_title_case()
    }

    /// Camel-case relation accessor name for a target entity.
    /// `App\Models\BloodGroup` -> `bloodGroup` / `bloodGroups`.
    pub fn relation_name(&self, target: &Fqcn, plural: bool) -> String {
        let snake = target.short().to_snake_case();
        if plural {
            pluralize_tail(&snake, '_').to_camel_case()
        } else {
            snake.to_camel_case()
        }
    }

    /// Migration base name for a table: `posts` -> `create_posts_table`.
    pub fn migration_name(&self, table_name: &str) -> String {
        format!("create_{}_table", table_name.trim())
    }
}

/// Pluralize the last `sep`-delimited word, leaving the rest untouched.
/// `student-info` -> `student-infos`, `post` -> `posts`.
fn pluralize_tail(s: &str, sep: char) -> String {
    match s.rsplit_once(sep) {
        Some((head, tail)) => format!("{head}{sep}{}", tail.to_plural()),
        None => s.to_plural(),
    }
}

/// Uppercase the first character (menu titles use this form).
pub fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_leading_separators_and_accepts_dots() {
        assert_eq!(Fqcn::parse("\\App\\Models\\Post").to_string(), "App\\Models\\Post");
        assert_eq!(Fqcn::parse("App.Models.Post").to_string(), "App\\Models\\Post");
        assert!(Fqcn::parse("").is_empty());
    }

    #[test]
    fn normalize_repairs_concatenated_names() {
        assert_eq!(Fqcn::normalize("AppModelsFoo").to_string(), "App\\Models\\Foo");
        // Already-separated names pass through untouched.
        assert_eq!(
            Fqcn::normalize("App\\Models\\StudentInfo").to_string(),
            "App\\Models\\StudentInfo"
        );
        // Non-App single segments are not split.
        assert_eq!(Fqcn::normalize("Status").to_string(), "Status");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = Fqcn::normalize("AppModelsFoo").to_string();
        let twice = Fqcn::normalize(&once).to_string();
        assert_eq!(once, twice);
    }

    #[test]
    fn short_and_namespace() {
        let f = Fqcn::parse("App\\Models\\Post");
        assert_eq!(f.short(), "Post");
        assert_eq!(f.namespace(), "App\\Models");
    }

    #[test]
    fn derived_names_are_stable() {
        let naming = NamingResolver::default();
        let a = naming.derive_model_name("posts");
        let b = naming.derive_model_name("posts");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "App\\Models\\Post");
        assert_eq!(
            naming.derive_controller_name(&a).to_string(),
            "App\\Admin\\Controllers\\PostController"
        );
        assert_eq!(
            naming.api_controller_name(&a).to_string(),
            "App\\Http\\Controllers\\Api\\PostApiController"
        );
    }

    #[test]
    fn multi_word_tables_derive_class_case_models() {
        let naming = NamingResolver::default();
        let model = naming.derive_model_name("student_infos");
        assert_eq!(model.to_string(), "App\\Models\\StudentInfo");
        assert_eq!(naming.route_slug(&model), "student-infos");
        assert_eq!(naming.view_dir("student-infos"), "student_infos");
        assert_eq!(naming.view_title("student_infos"), "Student Infos");
    }

    #[test]
    fn relation_names() {
        let naming = NamingResolver::default();
        let target = Fqcn::parse("App\\Models\\BloodGroup");
        assert_eq!(naming.relation_name(&target, false), "bloodGroup");
        assert_eq!(naming.relation_name(&target, true), "bloodGroups");
    }

    #[test]
    fn menu_title_casing() {
        assert_eq!(ucfirst("student-infos"), "Student-infos");
        assert_eq!(ucfirst(""), "");
    }
}
