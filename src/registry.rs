//! Prompt Registry
//!
//! Detects the declared version of a raw document, validates it against that
//! version's contract and migrates it forward to the latest version. Any
//! failure aborts the whole parse; nothing is partially applied.

use serde_json::Value;
use tracing::debug;

use crate::error::{PromptError, Result};
use crate::loader::load_yaml;
use crate::schema::PromptDefinition;
use crate::version::PromptVersion;

/// Input accepted by [`parse_prompt`]: YAML/JSON text or an already-loaded document
#[derive(Debug, Clone, PartialEq)]
pub enum RawPrompt {
    Text(String),
    Document(Value),
}

impl From<&str> for RawPrompt {
    fn from(text: &str) -> Self {
        RawPrompt::Text(text.to_string())
    }
}

impl From<String> for RawPrompt {
    fn from(text: String) -> Self {
        RawPrompt::Text(text)
    }
}

impl From<Value> for RawPrompt {
    fn from(document: Value) -> Self {
        RawPrompt::Document(document)
    }
}

/// Number of the latest supported schema version
pub fn latest_version() -> u32 {
    PromptVersion::LATEST.number()
}

/// Parse, validate and migrate a prompt document to the latest version
pub fn parse_prompt(raw: impl Into<RawPrompt>) -> Result<PromptDefinition> {
    let document = match raw.into() {
        RawPrompt::Text(text) => load_yaml(&text)?,
        RawPrompt::Document(document) => document,
    };

    let declared = detect_version(&document)?;
    debug!(version = %declared, "detected prompt version");

    let prompt = declared.contract().validate(tag_version(document, declared))?;
    Ok(migrate(prompt, declared))
}

/// Read the `version` tag; untagged documents are legacy v1
pub fn detect_version(document: &Value) -> Result<PromptVersion> {
    match document.get("version") {
        None => Ok(PromptVersion::UNTAGGED),
        Some(tag) => PromptVersion::from_tag(tag)
            .ok_or_else(|| PromptError::UnsupportedVersion(tag.to_string())),
    }
}

fn tag_version(mut document: Value, version: PromptVersion) -> Value {
    if let Value::Object(root) = &mut document {
        root.insert("version".to_string(), Value::from(version.number()));
    }
    document
}

/// Step a validated document through every migration hop up to the latest version
pub fn migrate(mut prompt: PromptDefinition, from: PromptVersion) -> PromptDefinition {
    let mut version = from;
    while let Some(next) = version.next() {
        debug!(from = %version, to = %next, "migrating prompt");
        prompt = match version {
            PromptVersion::V1 => migrate_v1_to_v2(prompt),
            PromptVersion::V2 => prompt,
        };
        version = next;
    }
    prompt
}

/// v1 and v2 declare the same fields; only the tag changes.
fn migrate_v1_to_v2(mut prompt: PromptDefinition) -> PromptDefinition {
    prompt.version = PromptVersion::V2.number();
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViolationKind;
    use serde_json::json;

    const ID: &str = "123e4567-e89b-12d3-a456-426614174000";

    #[test]
    fn test_untagged_document_is_v1() {
        let prompt = parse_prompt(json!({"id": ID, "name": "n", "template": "t"})).unwrap();
        assert_eq!(prompt.version, 2);
    }

    #[test]
    fn test_v1_is_strict() {
        let err = parse_prompt(json!({
            "version": 1, "id": ID, "name": "n", "template": "t", "extra": true
        }))
        .unwrap_err();
        match err {
            PromptError::SchemaValidation { version, violations } => {
                assert_eq!(version, 1);
                assert_eq!(violations[0].kind, ViolationKind::UnknownKey);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_v2_strips_unknown_keys() {
        let prompt = parse_prompt(json!({
            "version": 2, "id": ID, "name": "n", "template": "t", "extra": true
        }))
        .unwrap();
        assert_eq!(prompt.name, "n");
    }

    #[test]
    fn test_unsupported_version() {
        let err = parse_prompt("version: 5\nid: x\n").unwrap_err();
        match err {
            PromptError::UnsupportedVersion(found) => assert_eq!(found, "5"),
            other => panic!("expected unsupported version, got {:?}", other),
        }
    }

    #[test]
    fn test_null_version_is_unsupported() {
        let err = parse_prompt(json!({"version": null, "id": ID, "name": "n", "template": "t"}))
            .unwrap_err();
        assert!(matches!(err, PromptError::UnsupportedVersion(_)));
    }

    #[test]
    fn test_float_version_tag() {
        let prompt = parse_prompt("version: 2.0\nid: 123e4567-e89b-12d3-a456-426614174000\nname: n\ntemplate: t\n")
            .unwrap();
        assert_eq!(prompt.version, 2);
    }

    #[test]
    fn test_invalid_id_is_reported() {
        let err = parse_prompt(json!({"version": 2, "id": "not-a-uuid", "name": "n", "template": "t"}))
            .unwrap_err();
        assert!(err.violations().iter().any(|v| v.field() == "id"));
        assert!(err.to_string().contains("id"));
    }

    #[test]
    fn test_syntax_error_surfaces_from_loader() {
        let err = parse_prompt("id: [unterminated").unwrap_err();
        assert!(matches!(err, PromptError::DocumentSyntax(_)));
    }

    #[test]
    fn test_scalar_document_fails_validation() {
        let err = parse_prompt("just text").unwrap_err();
        assert!(matches!(err, PromptError::SchemaValidation { version: 1, .. }));
    }

    #[test]
    fn test_defaults_are_applied() {
        let prompt = parse_prompt(json!({
            "id": ID, "name": "n", "template": "t",
            "inputs": [{"type": "string", "name": "x"}]
        }))
        .unwrap();
        assert!(!prompt.inputs[0].required);
        assert!(prompt.tags.is_empty());
    }

    #[test]
    fn test_latest_version() {
        assert_eq!(latest_version(), 2);
    }
}
