//! Named-hole text templates.
//!
//! A stub declares holes as `{{NAME}}` (uppercase identifiers); rendering
//! substitutes every provided variable and then fails if any hole is left
//! unresolved. The uppercase convention keeps holes distinguishable from
//! Blade output expressions (`{{ $model->title }}`), which always contain a
//! space or a lowercase character and pass through untouched.

use std::collections::BTreeMap;

use crate::generators::GeneratorError;

/// A stub with named holes.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    name: &'static str,
    body: &'static str,
}

impl Template {
    pub const fn new(name: &'static str, body: &'static str) -> Self {
        Self { name, body }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Substitute every variable, then verify no hole survived.
    pub fn render(&self, vars: &TemplateVars) -> Result<String, GeneratorError> {
        let mut out = self.body.to_string();
        for (key, value) in &vars.map {
            out = out.replace(&format!("{{{{{key}}}}}"), value);
        }

        if let Some(hole) = find_unresolved_hole(&out) {
            return Err(GeneratorError::UnresolvedHole {
                template: self.name,
                hole,
            });
        }

        Ok(out)
    }
}

/// Variables for one render pass.
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    map: BTreeMap<&'static str, String>,
}

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &'static str, value: impl Into<String>) -> &mut Self {
        self.map.insert(key, value.into());
        self
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.map.insert(key, value.into());
        self
    }
}

fn find_unresolved_hole(text: &str) -> Option<String> {
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        if let Some(end) = after.find("}}") {
            let inner = &after[..end];
            if is_hole_name(inner) {
                return Some(inner.to_string());
            }
            rest = &after[end + 2..];
        } else {
            break;
        }
    }
    None
}

fn is_hole_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Normalize line endings: CRLF/CR become LF, trailing whitespace-only tail
/// collapses to a single final newline. Applied to every written artifact so
/// re-runs diff cleanly.
pub fn normalize_eol(text: &str) -> String {
    let unix = text.replace("\r\n", "\n").replace('\r', "\n");
    format!("{}\n", unix.trim_end())
}

/// Collapse the blank-line noise left behind by empty holes: lines holding
/// only whitespace become empty and runs of blank lines shrink to one.
pub fn tidy_blank_lines(text: &str) -> String {
    let cleaned: Vec<&str> = text
        .lines()
        .map(|line| if line.trim().is_empty() { "" } else { line })
        .collect();
    let mut out = cleaned.join("\n");
    while out.contains("\n\n\n") {
        out = out.replace("\n\n\n", "\n\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_all_holes() {
        let t = Template::new("t", "class {{CLASS}} extends {{BASE}} {}");
        let out = t
            .render(&TemplateVars::new().with("CLASS", "Post").with("BASE", "Model"))
            .unwrap();
        assert_eq!(out, "class Post extends Model {}");
    }

    #[test]
    fn unresolved_hole_is_an_error() {
        let t = Template::new("t", "namespace {{NAMESPACE}};");
        let err = t.render(&TemplateVars::new()).unwrap_err();
        assert_eq!(
            err,
            GeneratorError::UnresolvedHole {
                template: "t",
                hole: "NAMESPACE".into()
            }
        );
    }

    #[test]
    fn blade_expressions_are_not_holes() {
        let t = Template::new("t", "<td>{{ $row->title }}</td> {{COL}}");
        let out = t.render(&TemplateVars::new().with("COL", "x")).unwrap();
        assert_eq!(out, "<td>{{ $row->title }}</td> x");
    }

    #[test]
    fn normalize_eol_handles_crlf_and_trailing_newlines() {
        assert_eq!(normalize_eol("a\r\nb\r\n\r\n"), "a\nb\n");
        assert_eq!(normalize_eol("a"), "a\n");
    }

    #[test]
    fn tidy_collapses_blank_runs() {
        assert_eq!(tidy_blank_lines("a\n    \n\n\nb"), "a\n\nb");
    }
}
