//! Versioned schema contracts
//!
//! Each Prompt DSL version is a [`SchemaContract`]: a version number, an
//! unknown-key policy for the document root and a compiled JSON Schema.
//! Nested objects (`inputs[]`, `model`, `tests[]`) are strict in every version.

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{PromptError, Result, Violation, ViolationKind};
use crate::primitives::{SLUG_PATTERN, UUID_V1_TO_V6_PATTERN};
use crate::schema::{InputType, PromptDefinition};

/// Top-level fields declared by every current contract
pub const PROMPT_FIELDS: [&str; 17] = [
    "version",
    "id",
    "name",
    "slug",
    "template",
    "inputs",
    "model",
    "controls",
    "enums",
    "labels",
    "metadata",
    "tests",
    "context",
    "policies",
    "tags",
    "snapshot_with_inputs",
    "frameworkRef",
];

const ASSERT_FIELDS: [&str; 3] = ["contains", "notContains", "maxTokens"];

/// What to do with root keys outside the declared field set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownKeys {
    /// Fail validation
    Reject,
    /// Silently drop them from the validated result
    Strip,
}

/// A compiled, self-contained schema for one Prompt DSL version
pub struct SchemaContract {
    version: u32,
    unknown_keys: UnknownKeys,
    compiled: JSONSchema,
}

impl std::fmt::Debug for SchemaContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaContract")
            .field("version", &self.version)
            .field("unknown_keys", &self.unknown_keys)
            .finish()
    }
}

impl SchemaContract {
    /// Compile the contract for `version` with the given root policy
    pub fn compile(version: u32, unknown_keys: UnknownKeys) -> std::result::Result<Self, String> {
        let schema = json_schema(version, unknown_keys);
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema)
            .map_err(|e| format!("prompt schema v{} does not compile: {}", version, e))?;
        Ok(Self {
            version,
            unknown_keys,
            compiled,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn unknown_keys(&self) -> UnknownKeys {
        self.unknown_keys
    }

    /// Validate an untyped document and produce the typed value.
    ///
    /// Every violation is reported, not only the first one.
    pub fn validate(&self, document: Value) -> Result<PromptDefinition> {
        if let Err(violations) = self.check(&document) {
            return Err(PromptError::SchemaValidation {
                version: self.version,
                violations,
            });
        }

        // Shapes the schema cannot express (integer range) surface here.
        let document = self.strip(document);
        serde_json::from_value(document).map_err(|e| PromptError::SchemaValidation {
            version: self.version,
            violations: vec![Violation {
                path: String::new(),
                kind: ViolationKind::Constraint,
                message: e.to_string(),
            }],
        })
    }

    /// Run the JSON Schema without producing a typed value
    pub fn check(&self, document: &Value) -> std::result::Result<(), Vec<Violation>> {
        let errors = match self.compiled.validate(document) {
            Ok(()) => return Ok(()),
            Err(errors) => errors,
        };

        let mut violations = Vec::new();
        for error in errors {
            let path = error.instance_path.to_string();
            match &error.kind {
                ValidationErrorKind::Required { property } => {
                    let field = property.to_string();
                    violations.push(Violation {
                        path: format!("{}/{}", path, field.trim_matches('"')),
                        kind: ViolationKind::Missing,
                        message: "required field is missing".to_string(),
                    });
                }
                ValidationErrorKind::AdditionalProperties { unexpected } => {
                    for key in unexpected {
                        let key = key.to_string();
                        let key = key.trim_matches('"');
                        violations.push(Violation {
                            path: format!("{}/{}", path, key),
                            kind: ViolationKind::UnknownKey,
                            message: format!("unrecognized key '{}'", key),
                        });
                    }
                }
                kind => violations.push(Violation {
                    path,
                    kind: classify(kind),
                    message: error.to_string(),
                }),
            }
        }
        violations.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(version = self.version, count = violations.len(), "prompt document rejected");
        Err(violations)
    }

    fn strip(&self, mut document: Value) -> Value {
        let Some(root) = document.as_object_mut() else {
            return document;
        };
        if self.unknown_keys == UnknownKeys::Strip {
            let before = root.len();
            root.retain(|key, _| PROMPT_FIELDS.contains(&key.as_str()));
            if root.len() != before {
                debug!(version = self.version, dropped = before - root.len(), "stripped unknown keys");
            }
        }
        if let Some(Value::Array(tests)) = root.get_mut("tests") {
            for test in tests {
                if let Some(Value::Object(assert)) = test.get_mut("assert") {
                    assert.retain(|key, _| ASSERT_FIELDS.contains(&key.as_str()));
                }
            }
        }
        document
    }
}

fn classify(kind: &ValidationErrorKind) -> ViolationKind {
    match kind {
        ValidationErrorKind::Type { .. } => ViolationKind::Type,
        ValidationErrorKind::Pattern { .. } => ViolationKind::Pattern,
        ValidationErrorKind::Constant { .. } | ValidationErrorKind::Enum { .. } => {
            ViolationKind::Literal
        }
        _ => ViolationKind::Constraint,
    }
}

/// JSON Schema (draft 7) for one Prompt DSL version
pub fn json_schema(version: u32, unknown_keys: UnknownKeys) -> Value {
    let non_empty = json!({ "type": "string", "minLength": 1 });
    let strings = json!({ "type": "array", "items": { "type": "string" } });

    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": format!("PromptDslV{}", version),
        "type": "object",
        "required": ["version", "id", "name", "template"],
        "additionalProperties": unknown_keys == UnknownKeys::Strip,
        "properties": {
            "version": { "const": version },
            "id": { "type": "string", "pattern": UUID_V1_TO_V6_PATTERN },
            "name": non_empty,
            "slug": { "type": "string", "pattern": SLUG_PATTERN },
            "template": non_empty,
            "inputs": { "type": "array", "items": input_schema() },
            "model": {
                "type": "object",
                "required": ["provider", "name"],
                "additionalProperties": false,
                "properties": {
                    "provider": non_empty,
                    "name": non_empty,
                    "params": { "type": "object" }
                }
            },
            "controls": { "type": "object" },
            "enums": { "type": "object", "additionalProperties": strings },
            "labels": {
                "type": "object",
                "additionalProperties": {
                    "type": "object",
                    "additionalProperties": { "type": "string" }
                }
            },
            "metadata": { "type": "object" },
            "tests": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["name"],
                    "additionalProperties": false,
                    "properties": {
                        "name": non_empty,
                        "with": { "type": "object" },
                        "assert": {
                            "type": "object",
                            "properties": {
                                "contains": strings,
                                "notContains": strings,
                                "maxTokens": { "type": "integer", "exclusiveMinimum": 0 }
                            }
                        }
                    }
                }
            },
            "context": { "type": "object" },
            "policies": { "type": "object" },
            "tags": strings,
            "snapshot_with_inputs": { "type": "array" },
            "frameworkRef": { "type": "string" }
        }
    })
}

fn input_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "type"],
        "additionalProperties": false,
        "properties": {
            "name": { "type": "string", "minLength": 1 },
            "type": { "enum": InputType::ALL },
            "required": { "type": "boolean" },
            "ref": { "type": "string" },
            "description": { "type": "string" },
            "default": {}
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "123e4567-e89b-12d3-a456-426614174000";

    fn contract(policy: UnknownKeys) -> SchemaContract {
        SchemaContract::compile(2, policy).unwrap()
    }

    #[test]
    fn test_strip_drops_unknown_root_keys() {
        let doc = contract(UnknownKeys::Strip)
            .validate(json!({
                "version": 2, "id": ID, "name": "n", "template": "t", "owner": "me"
            }))
            .unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("owner").is_none());
    }

    #[test]
    fn test_reject_reports_unknown_root_keys() {
        let err = contract(UnknownKeys::Reject)
            .validate(json!({
                "version": 2, "id": ID, "name": "n", "template": "t", "owner": "me"
            }))
            .unwrap_err();
        let violations = err.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::UnknownKey);
        assert_eq!(violations[0].path, "/owner");
    }

    #[test]
    fn test_nested_input_is_strict_under_strip() {
        let err = contract(UnknownKeys::Strip)
            .validate(json!({
                "version": 2, "id": ID, "name": "n", "template": "t",
                "inputs": [{ "name": "x", "type": "string", "color": "red" }]
            }))
            .unwrap_err();
        assert!(err
            .violations()
            .iter()
            .any(|v| v.path == "/inputs/0/color" && v.kind == ViolationKind::UnknownKey));
    }

    #[test]
    fn test_collects_every_violation() {
        let err = contract(UnknownKeys::Strip)
            .validate(json!({
                "version": 2, "id": "nope", "template": "", "slug": "Bad Slug",
                "inputs": [{ "name": "x", "type": "date" }]
            }))
            .unwrap_err();
        let violations = err.violations();
        let find = |path: &str| violations.iter().find(|v| v.path == path).map(|v| v.kind);
        assert_eq!(find("/id"), Some(ViolationKind::Pattern));
        assert_eq!(find("/name"), Some(ViolationKind::Missing));
        assert_eq!(find("/slug"), Some(ViolationKind::Pattern));
        assert_eq!(find("/template"), Some(ViolationKind::Constraint));
        assert_eq!(find("/inputs/0/type"), Some(ViolationKind::Literal));
    }

    #[test]
    fn test_version_literal_mismatch() {
        let err = contract(UnknownKeys::Strip)
            .validate(json!({ "version": 1, "id": ID, "name": "n", "template": "t" }))
            .unwrap_err();
        assert_eq!(err.violations()[0].kind, ViolationKind::Literal);
        assert_eq!(err.violations()[0].field(), "version");
    }

    #[test]
    fn test_assert_unknown_keys_are_stripped() {
        let doc = contract(UnknownKeys::Strip)
            .validate(json!({
                "version": 2, "id": ID, "name": "n", "template": "t",
                "tests": [{ "name": "smoke", "assert": { "contains": ["hi"], "regex": "x" } }]
            }))
            .unwrap();
        let tests = doc.tests.unwrap();
        assert_eq!(tests[0].assert.contains, Some(vec!["hi".to_string()]));
        assert!(tests[0].with.is_empty());
    }

    #[test]
    fn test_integral_float_max_tokens() {
        let doc = contract(UnknownKeys::Strip)
            .validate(json!({
                "version": 2, "id": ID, "name": "n", "template": "t",
                "tests": [{ "name": "a", "assert": { "maxTokens": 5.0 } }]
            }))
            .unwrap();
        assert_eq!(doc.tests.unwrap()[0].assert.max_tokens, Some(5));
    }

    #[test]
    fn test_out_of_range_max_tokens_is_a_violation() {
        let err = contract(UnknownKeys::Strip)
            .validate(json!({
                "version": 2, "id": ID, "name": "n", "template": "t",
                "tests": [{ "name": "a", "assert": { "maxTokens": 1e30 } }]
            }))
            .unwrap_err();
        match err {
            PromptError::SchemaValidation { version, violations } => {
                assert_eq!(version, 2);
                assert_eq!(violations[0].kind, ViolationKind::Constraint);
                assert!(violations[0].message.contains("maxTokens"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_root() {
        let err = contract(UnknownKeys::Strip).validate(json!("hello")).unwrap_err();
        assert_eq!(err.violations()[0].kind, ViolationKind::Type);
        assert_eq!(err.violations()[0].path, "");
    }

    #[test]
    fn test_record_element_shapes() {
        let err = contract(UnknownKeys::Strip)
            .validate(json!({
                "version": 2, "id": ID, "name": "n", "template": "t",
                "enums": { "tone": ["formal", 3] },
                "labels": { "ja": { "greeting": true } },
                "tags": ["ok", false]
            }))
            .unwrap_err();
        let paths: Vec<&str> = err.violations().iter().map(|v| v.path.as_str()).collect();
        assert!(paths.contains(&"/enums/tone/1"));
        assert!(paths.contains(&"/labels/ja/greeting"));
        assert!(paths.contains(&"/tags/1"));
    }
}
