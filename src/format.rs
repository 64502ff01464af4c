//! Front matter formatting
//!
//! Rewrites a document's front matter into its stable form without
//! validating it against a schema, so drafts can be formatted too.

use std::fmt;

use serde_json::Value;
use similar::TextDiff;

use crate::error::Result;
use crate::front_matter;
use crate::loader::load_yaml;
use crate::serializer::{canonicalize_document, emit, EmitOptions};

/// Why a document needed rewriting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatReason {
    /// Root or input keys were not in canonical order
    KeyOrder,
    /// Indentation, quoting or wrapping differed
    Layout,
}

impl fmt::Display for FormatReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatReason::KeyOrder => write!(f, "canonical key order"),
            FormatReason::Layout => write!(f, "indent 2 / line width 120 layout"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOutcome {
    pub output: String,
    pub changed: bool,
    pub reasons: Vec<FormatReason>,
}

impl FormatOutcome {
    fn unchanged(text: &str) -> Self {
        Self {
            output: text.to_string(),
            changed: false,
            reasons: Vec::new(),
        }
    }
}

/// Format the front matter of `text`.
///
/// Documents without front matter, or with an empty block, are returned as-is.
/// Invalid YAML is an error.
pub fn format_document(text: &str) -> Result<FormatOutcome> {
    let Some(fm) = front_matter::split(text) else {
        return Ok(FormatOutcome::unchanged(text));
    };
    if fm.is_empty() {
        return Ok(FormatOutcome::unchanged(text));
    }

    let document = load_yaml(fm.yaml)?;
    let canonical = canonicalize_document(document.clone());
    let output = fm.rejoin(&emit(&canonical, EmitOptions::STABLE));
    if output == text {
        return Ok(FormatOutcome::unchanged(text));
    }

    let mut reasons = Vec::new();
    if key_sequence(&document) != key_sequence(&canonical) {
        reasons.push(FormatReason::KeyOrder);
    }
    let as_is = emit(&document, EmitOptions::STABLE);
    let mut original = fm.yaml.replace("\r\n", "\n");
    original.push('\n');
    if as_is != original {
        reasons.push(FormatReason::Layout);
    }

    Ok(FormatOutcome {
        output,
        changed: true,
        reasons,
    })
}

/// Root keys followed by the keys of each input entry
fn key_sequence(document: &Value) -> Vec<Vec<&str>> {
    let Some(root) = document.as_object() else {
        return Vec::new();
    };
    let mut sequence = vec![root.keys().map(String::as_str).collect::<Vec<_>>()];
    if let Some(Value::Array(inputs)) = root.get("inputs") {
        for input in inputs {
            if let Some(map) = input.as_object() {
                sequence.push(map.keys().map(String::as_str).collect());
            }
        }
    }
    sequence
}

/// Unified diff between two versions of a file
pub fn unified_diff(path: &str, before: &str, after: &str) -> String {
    TextDiff::from_lines(before, after)
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{}", path), &format!("b/{}", path))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reorders_and_reindents() {
        let doc = "---\nname: Greeting\nversion: 2\ninputs:\n    - type: string\n      name: who\n---\nHello {{who}}\n";
        let outcome = format_document(doc).unwrap();
        assert!(outcome.changed);
        assert_eq!(
            outcome.output,
            "---\nversion: 2\nname: Greeting\ninputs:\n  - name: who\n    type: string\n---\nHello {{who}}\n"
        );
        assert_eq!(outcome.reasons, vec![FormatReason::KeyOrder, FormatReason::Layout]);
    }

    #[test]
    fn test_formatted_document_is_a_fixed_point() {
        let doc = "---\nname: Greeting\nversion: 2\n---\nbody\n";
        let first = format_document(doc).unwrap();
        let second = format_document(&first.output).unwrap();
        assert!(!second.changed);
        assert_eq!(second.output, first.output);
    }

    #[test]
    fn test_layout_only_change() {
        let doc = "---\nversion: 2\ntags: [a, b]\n---\n";
        let outcome = format_document(doc).unwrap();
        assert_eq!(outcome.reasons, vec![FormatReason::Layout]);
        assert_eq!(outcome.output, "---\nversion: 2\ntags:\n  - a\n  - b\n---\n");
    }

    #[test]
    fn test_crlf_documents_keep_crlf() {
        let doc = "---\r\nname: x\r\nversion: 2\r\n---\r\nBody\r\n";
        let outcome = format_document(doc).unwrap();
        assert_eq!(outcome.output, "---\r\nversion: 2\r\nname: x\r\n---\r\nBody\r\n");
    }

    #[test]
    fn test_documents_without_front_matter_are_untouched() {
        let outcome = format_document("# just markdown\n").unwrap();
        assert!(!outcome.changed);
        let outcome = format_document("---\n   \n---\nbody").unwrap();
        assert!(!outcome.changed);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(format_document("---\nname: [x\n---\n").is_err());
    }

    #[test]
    fn test_unified_diff_headers() {
        let diff = unified_diff("p.md", "a\nb\n", "a\nc\n");
        assert!(diff.contains("--- a/p.md"));
        assert!(diff.contains("+++ b/p.md"));
        assert!(diff.contains("-b"));
        assert!(diff.contains("+c"));
    }
}
