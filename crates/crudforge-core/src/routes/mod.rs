//! Route merge engine.
//!
//! A pure text-patching state machine over route-definition files: given the
//! current file content (or its absence) and one slug→controller entry, it
//! returns the new content plus the strategy that produced it. The thin I/O
//! wrapper lives in the orchestrator, which keeps this module unit-testable
//! without a filesystem.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::Fqcn;
use crate::generators::template::normalize_eol;

/// Which route file a declaration belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStyle {
    /// `app/Admin/routes.php` — group wrapper + `$router->resource(...)`.
    Admin,
    /// `routes/api.php` — `Route::apiResource(...)`.
    Api,
    /// `routes/web.php` — `Route::resource(...)`.
    Web,
}

impl RouteStyle {
    /// Path of the route file, relative to the host application root.
    pub fn file(self) -> &'static str {
        match self {
            Self::Admin => "app/Admin/routes.php",
            Self::Api => "routes/api.php",
            Self::Web => "routes/web.php",
        }
    }
}

/// One resource declaration to ensure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub slug: String,
    pub controller: Fqcn,
    pub style: RouteStyle,
}

impl RouteEntry {
    pub fn new(slug: impl Into<String>, controller: Fqcn, style: RouteStyle) -> Self {
        Self {
            slug: slug.into(),
            controller,
            style,
        }
    }

}

/// Insertion strategy that produced a merge result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// No file existed; a complete new one was emitted.
    CreatedFile,
    /// The mapping was already declared; the input is returned verbatim.
    AlreadyPresent,
    /// Inserted at the end of a `$router->resources([...])` bulk block.
    BulkBlock,
    /// Inserted before the closing delimiter of the route-group wrapper.
    GroupWrapper,
    /// Appended to the end of the file (fresh group for admin files).
    Appended,
}

impl std::fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CreatedFile => "created file",
            Self::AlreadyPresent => "already present",
            Self::BulkBlock => "bulk block",
            Self::GroupWrapper => "group wrapper",
            Self::Appended => "appended",
        };
        f.write_str(s)
    }
}

/// Result of a merge: the content to write plus how it was derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub content: String,
    pub strategy: MergeStrategy,
}

impl MergeOutcome {
    /// Whether the caller needs to write the file at all.
    pub fn changed(&self) -> bool {
        self.strategy != MergeStrategy::AlreadyPresent
    }
}

static BULK_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\$router->resources\(\s*\[(.*?)\]\s*\);").expect("bulk block pattern")
});

static GROUP_WRAPPER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Route::group\(\s*\[.*?\]\s*,\s*function\s*\(Router\s*\$router\)\s*\{")
        .expect("group wrapper pattern")
});

/// Idempotently merge one entry into a route file.
///
/// `existing` is `None` when the file is absent. An `AlreadyPresent` outcome
/// returns the input text verbatim so no-op merges never rewrite the file.
pub fn merge_route(existing: Option<&str>, entry: &RouteEntry) -> MergeOutcome {
    match entry.style {
        RouteStyle::Admin => merge_admin(existing, entry),
        RouteStyle::Api | RouteStyle::Web => merge_flat(existing, entry),
    }
}

fn merge_admin(existing: Option<&str>, entry: &RouteEntry) -> MergeOutcome {
    let Some(content) = existing else {
        return MergeOutcome {
            content: normalize_eol(&admin_group(entry)),
            strategy: MergeStrategy::CreatedFile,
        };
    };

    let map_entry = format!("'{}' => {}::class", entry.slug, entry.controller);
    let resource_call = format!("$router->resource('{}', {}::class", entry.slug, entry.controller);
    if content.contains(&map_entry) || content.contains(&resource_call) {
        return MergeOutcome {
            content: content.to_string(),
            strategy: MergeStrategy::AlreadyPresent,
        };
    }

    // Prefer the bulk resource-map block when one exists. The new entry
    // lands after the last existing entry, before the list's closing
    // whitespace, so indentation survives repeated merges.
    if let Some(caps) = BULK_BLOCK.captures(content) {
        let inner = caps.get(1).expect("inner list group");
        let insert_at = inner.start() + inner.as_str().trim_end().len();
        let insert = format!("\n        '{}' => {}::class,", entry.slug, entry.controller);
        let mut merged = String::with_capacity(content.len() + insert.len());
        merged.push_str(&content[..insert_at]);
        merged.push_str(&insert);
        merged.push_str(&content[insert_at..]);
        return MergeOutcome {
            content: normalize_eol(&merged),
            strategy: MergeStrategy::BulkBlock,
        };
    }

    // Then a single resource call before the group wrapper's closing brace.
    if GROUP_WRAPPER.is_match(content) {
        if let Some(pos) = content.rfind("});") {
            let insert = format!("    {};\n", resource_call_line(entry));
            let mut merged = String::with_capacity(content.len() + insert.len());
            merged.push_str(&content[..pos]);
            merged.push_str(&insert);
            merged.push_str(&content[pos..]);
            return MergeOutcome {
                content: normalize_eol(&merged),
                strategy: MergeStrategy::GroupWrapper,
            };
        }
    }

    // Fallback: append a fresh group wrapper at the end of the file.
    let merged = format!("{}\n\n{}", content.trim_end(), admin_group_block(entry));
    MergeOutcome {
        content: normalize_eol(&merged),
        strategy: MergeStrategy::Appended,
    }
}

fn merge_flat(existing: Option<&str>, entry: &RouteEntry) -> MergeOutcome {
    let header = "<?php\n\nuse Illuminate\\Support\\Facades\\Route;\n\n";
    let needle = flat_needle(entry);
    let line = format!("{needle};\n");

    let Some(content) = existing else {
        return MergeOutcome {
            content: normalize_eol(&format!("{header}{line}")),
            strategy: MergeStrategy::CreatedFile,
        };
    };

    if content.contains(&needle) {
        return MergeOutcome {
            content: content.to_string(),
            strategy: MergeStrategy::AlreadyPresent,
        };
    }

    let mut merged = if content.contains("use Illuminate\\Support\\Facades\\Route;") {
        content.to_string()
    } else {
        let body = content.strip_prefix("<?php").unwrap_or(content);
        format!("{header}{}", body.trim_start_matches('\n'))
    };

    if !merged.ends_with('\n') {
        merged.push('\n');
    }
    merged.push_str(&line);

    MergeOutcome {
        content: normalize_eol(&merged),
        strategy: MergeStrategy::Appended,
    }
}

fn resource_call_line(entry: &RouteEntry) -> String {
    format!("$router->resource('{}', {}::class)", entry.slug, entry.controller)
}

fn flat_needle(entry: &RouteEntry) -> String {
    let method = match entry.style {
        RouteStyle::Api => "apiResource",
        _ => "resource",
    };
    format!("Route::{method}('{}', {}::class)", entry.slug, entry.controller)
}

/// A complete admin routes file: header plus one group.
fn admin_group(entry: &RouteEntry) -> String {
    format!(
        "<?php\n\nuse Illuminate\\Routing\\Router;\n\n{}",
        admin_group_block(entry)
    )
}

/// The group wrapper alone, for appending to an existing file.
fn admin_group_block(entry: &RouteEntry) -> String {
    format!(
        "Route::group([\n\
         \x20   'prefix'     => config('admin.route.prefix'),\n\
         \x20   'namespace'  => config('admin.route.namespace'),\n\
         \x20   'middleware' => config('admin.route.middleware'),\n\
         \x20   'as'         => config('admin.route.prefix') . '.',\n\
         ], function (Router $router) {{\n\
         \x20   {};\n\
         }});\n",
        resource_call_line(entry)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_entry() -> RouteEntry {
        RouteEntry::new(
            "posts",
            Fqcn::parse("App\\Admin\\Controllers\\PostController"),
            RouteStyle::Admin,
        )
    }

    #[test]
    fn absent_file_yields_one_group_and_one_resource() {
        let outcome = merge_route(None, &admin_entry());
        assert_eq!(outcome.strategy, MergeStrategy::CreatedFile);
        assert_eq!(
            outcome
                .content
                .matches("$router->resource('posts', App\\Admin\\Controllers\\PostController::class);")
                .count(),
            1
        );
        assert!(outcome.content.starts_with("<?php\n"));
        assert!(outcome.content.ends_with("\n"));
    }

    #[test]
    fn remerging_the_created_file_is_a_no_op() {
        let first = merge_route(None, &admin_entry());
        let second = merge_route(Some(&first.content), &admin_entry());
        assert_eq!(second.strategy, MergeStrategy::AlreadyPresent);
        assert!(!second.changed());
        assert_eq!(second.content, first.content);
    }

    #[test]
    fn bulk_block_is_preferred_over_the_group_wrapper() {
        let existing = "<?php\n\nuse Illuminate\\Routing\\Router;\n\nRoute::group([\n    'prefix' => config('admin.route.prefix'),\n], function (Router $router) {\n    $router->resources([\n        'users' => App\\Admin\\Controllers\\UserController::class,\n    ]);\n});\n";
        let outcome = merge_route(Some(existing), &admin_entry());
        assert_eq!(outcome.strategy, MergeStrategy::BulkBlock);
        assert!(outcome.content.contains(
            "        'posts' => App\\Admin\\Controllers\\PostController::class,\n    ]);"
        ));
        // Existing entries survive.
        assert!(outcome.content.contains("'users' => App\\Admin\\Controllers\\UserController::class,"));

        let again = merge_route(Some(&outcome.content), &admin_entry());
        assert_eq!(again.strategy, MergeStrategy::AlreadyPresent);
        assert_eq!(again.content, outcome.content);
    }

    #[test]
    fn group_wrapper_insertion_lands_before_the_closing_delimiter() {
        let existing = "<?php\n\nuse Illuminate\\Routing\\Router;\n\nRoute::group([\n    'prefix' => config('admin.route.prefix'),\n], function (Router $router) {\n    $router->resource('users', App\\Admin\\Controllers\\UserController::class);\n});\n";
        let outcome = merge_route(Some(existing), &admin_entry());
        assert_eq!(outcome.strategy, MergeStrategy::GroupWrapper);

        let insert = outcome
            .content
            .find("$router->resource('posts', App\\Admin\\Controllers\\PostController::class);")
            .unwrap();
        let close = outcome.content.rfind("});").unwrap();
        assert!(insert < close);
    }

    #[test]
    fn unrecognized_file_gets_a_fresh_group_appended() {
        let existing = "<?php\n\n// hand-written routes, no group\n";
        let outcome = merge_route(Some(existing), &admin_entry());
        assert_eq!(outcome.strategy, MergeStrategy::Appended);
        assert!(outcome.content.starts_with("<?php\n\n// hand-written routes, no group\n"));
        assert!(outcome.content.contains("Route::group(["));
        // The appended block must not re-open the file.
        assert_eq!(outcome.content.matches("<?php").count(), 1);
    }

    #[test]
    fn api_file_is_created_with_header_and_resource() {
        let entry = RouteEntry::new(
            "student-infos",
            Fqcn::parse("App\\Http\\Controllers\\Api\\StudentInfoApiController"),
            RouteStyle::Api,
        );
        let outcome = merge_route(None, &entry);
        assert_eq!(outcome.strategy, MergeStrategy::CreatedFile);
        assert_eq!(
            outcome.content,
            "<?php\n\nuse Illuminate\\Support\\Facades\\Route;\n\nRoute::apiResource('student-infos', App\\Http\\Controllers\\Api\\StudentInfoApiController::class);\n"
        );

        let again = merge_route(Some(&outcome.content), &entry);
        assert_eq!(again.strategy, MergeStrategy::AlreadyPresent);
    }

    #[test]
    fn web_append_preserves_existing_routes_and_adds_missing_header() {
        let entry = RouteEntry::new(
            "posts",
            Fqcn::parse("App\\Http\\Controllers\\PostWebController"),
            RouteStyle::Web,
        );
        let existing = "<?php\n\nRoute::view('/', 'welcome');\n";
        let outcome = merge_route(Some(existing), &entry);
        assert_eq!(outcome.strategy, MergeStrategy::Appended);
        assert!(outcome.content.contains("use Illuminate\\Support\\Facades\\Route;"));
        assert!(outcome.content.contains("Route::view('/', 'welcome');"));
        assert!(outcome.content.ends_with(
            "Route::resource('posts', App\\Http\\Controllers\\PostWebController::class);\n"
        ));
    }

    #[test]
    fn line_endings_normalize_on_mutation() {
        let entry = RouteEntry::new(
            "posts",
            Fqcn::parse("App\\Http\\Controllers\\PostWebController"),
            RouteStyle::Web,
        );
        let existing = "<?php\r\n\r\nuse Illuminate\\Support\\Facades\\Route;\r\n";
        let outcome = merge_route(Some(existing), &entry);
        assert!(!outcome.content.contains('\r'));
        assert!(outcome.content.ends_with(";\n"));
    }

    #[test]
    fn route_files_by_style() {
        assert_eq!(RouteStyle::Admin.file(), "app/Admin/routes.php");
        assert_eq!(RouteStyle::Api.file(), "routes/api.php");
        assert_eq!(RouteStyle::Web.file(), "routes/web.php");
    }
}
