//! Prompt DSL document model
//!
//! [`PromptDefinition`] is always at the latest schema version once it leaves
//! [`crate::registry::parse_prompt`]. Free-form records keep their insertion order.

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

pub mod contract;

pub use contract::{SchemaContract, UnknownKeys};

/// Free-form, order-preserving record
pub type Record = Map<String, Value>;

/// A validated prompt document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDefinition {
    pub version: u32,
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub template: String,
    #[serde(default)]
    pub inputs: Vec<PromptInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<PromptModel>,
    /// Sampling controls shared across models (temperature, top_p, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controls: Option<Record>,
    /// Named enum groups referenced by `PromptInput::ref`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enums: Option<IndexMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<IndexMap<String, IndexMap<String, String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<Vec<PromptTest>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policies: Option<Record>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Input sets used by CI to produce rendering locks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_with_inputs: Option<Vec<Value>>,
    #[serde(rename = "frameworkRef", default, skip_serializing_if = "Option::is_none")]
    pub framework_ref: Option<String>,
}

impl PromptDefinition {
    /// Declared input names in declaration order
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(|i| i.name.as_str())
    }

    pub fn input(&self, name: &str) -> Option<&PromptInput> {
        self.inputs.iter().find(|i| i.name == name)
    }
}

/// Primitive type of a declared input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl InputType {
    pub const ALL: [&'static str; 5] = ["string", "number", "boolean", "array", "object"];

    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::String => "string",
            InputType::Number => "number",
            InputType::Boolean => "boolean",
            InputType::Array => "array",
            InputType::Object => "object",
        }
    }
}

/// A declared template input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptInput {
    pub name: String,
    #[serde(rename = "type")]
    pub input_type: InputType,
    #[serde(default)]
    pub required: bool,
    /// Name of an enum group in `PromptDefinition::enums`
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub enum_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Any shape; an explicit `null` is kept as `Some(Value::Null)`
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,
}

impl PromptInput {
    pub fn new(name: impl Into<String>, input_type: InputType) -> Self {
        Self {
            name: name.into(),
            input_type,
            required: false,
            enum_ref: None,
            description: None,
            default: None,
        }
    }
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn token_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    number
        .as_u64()
        .or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64)
                .map(|f| f as u64)
        })
        .map(Some)
        .ok_or_else(|| {
            D::Error::custom(format!("maxTokens {} is not a representable integer", number))
        })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptModel {
    pub provider: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Record>,
}

/// Inline prompt test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTest {
    pub name: String,
    #[serde(default)]
    pub with: Record,
    #[serde(default)]
    pub assert: TestAssertions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestAssertions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_contains: Option<Vec<String>>,
    /// Integral floats such as `5.0` are accepted
    #[serde(
        default,
        deserialize_with = "token_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_tokens: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_input_field_order_and_defaults() {
        let input: PromptInput =
            serde_json::from_value(json!({"type": "number", "name": "age"})).unwrap();
        assert!(!input.required);
        let keys: Vec<String> = serde_json::to_value(&input)
            .unwrap()
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["name", "type", "required"]);
    }

    #[test]
    fn test_explicit_null_default_is_kept() {
        let input: PromptInput =
            serde_json::from_value(json!({"name": "x", "type": "string", "default": null}))
                .unwrap();
        assert_eq!(input.default, Some(Value::Null));
        let back = serde_json::to_value(&input).unwrap();
        assert!(back.as_object().unwrap().contains_key("default"));
    }

    #[test]
    fn test_framework_ref_rename() {
        let doc: PromptDefinition = serde_json::from_value(json!({
            "version": 2,
            "id": "123e4567-e89b-12d3-a456-426614174000",
            "name": "n",
            "template": "t",
            "frameworkRef": "fw"
        }))
        .unwrap();
        assert_eq!(doc.framework_ref.as_deref(), Some("fw"));
        assert!(doc.inputs.is_empty());
        assert!(doc.tags.is_empty());
    }
}
