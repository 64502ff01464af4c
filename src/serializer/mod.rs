//! Deterministic serialization
//!
//! Content-equal documents always produce byte-identical text: the root keys
//! and the keys of each `inputs[]` element are put in canonical order, then
//! the value is emitted with [`EmitOptions::STABLE`]. Nothing else is
//! reordered; free-form records are user content and keep their own order.

use serde_json::{Map, Value};

use crate::schema::PromptDefinition;

mod emit;

pub use emit::{emit, EmitOptions};

/// Preferred root key order; other keys follow in lexicographic order
pub const PROMPT_KEY_ORDER: [&str; 17] = [
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

/// Canonical field order of an input entry
pub const INPUT_KEY_ORDER: [&str; 6] = ["name", "type", "required", "ref", "description", "default"];

/// Order `map`'s keys by their position in `preferred`.
///
/// Keys missing from `preferred` come last, sorted lexicographically. Values
/// are moved untouched.
pub fn order_keys(map: Map<String, Value>, preferred: &[&str]) -> Map<String, Value> {
    let mut entries: Vec<(String, Value)> = map.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| {
        let rank = |key: &str| preferred.iter().position(|p| *p == key).unwrap_or(usize::MAX);
        rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
    });
    entries.into_iter().collect()
}

/// Reorder the keys of every object element of `inputs`; other elements are left as-is
pub fn canonicalize_inputs(inputs: &mut Value) {
    let Value::Array(items) = inputs else {
        return;
    };
    for item in items.iter_mut() {
        if let Value::Object(map) = item {
            *map = order_keys(std::mem::take(map), &INPUT_KEY_ORDER);
        }
    }
}

/// Apply both canonical orderings to an untyped document
pub fn canonicalize_document(document: Value) -> Value {
    match document {
        Value::Object(mut root) => {
            if let Some(inputs) = root.get_mut("inputs") {
                canonicalize_inputs(inputs);
            }
            Value::Object(order_keys(root, &PROMPT_KEY_ORDER))
        }
        other => other,
    }
}

/// Serialize a validated prompt to stable YAML text
pub fn dump_prompt(prompt: &PromptDefinition) -> String {
    // Plain data with string keys; conversion to a JSON value cannot fail.
    let value = serde_json::to_value(prompt).unwrap_or(Value::Null);
    dump_value(&value)
}

/// Serialize any untyped document to stable YAML text
pub fn dump_value(document: &Value) -> String {
    emit(&canonicalize_document(document.clone()), EmitOptions::STABLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(value: &Value) -> Vec<String> {
        value.as_object().unwrap().keys().cloned().collect()
    }

    #[test]
    fn test_order_keys_preferred_then_lexicographic() {
        let map = json!({"zeta": 1, "template": "t", "alpha": 2, "version": 2, "id": "x"});
        let ordered = Value::Object(order_keys(map.as_object().unwrap().clone(), &PROMPT_KEY_ORDER));
        assert_eq!(keys(&ordered), ["version", "id", "template", "alpha", "zeta"]);
    }

    #[test]
    fn test_canonicalize_inputs_only_touches_objects() {
        let mut inputs = json!([
            {"default": {"z": 1, "a": 2}, "type": "object", "name": "cfg"},
            "loose",
            [1, 2]
        ]);
        canonicalize_inputs(&mut inputs);
        assert_eq!(keys(&inputs[0]), ["name", "type", "default"]);
        assert_eq!(keys(&inputs[0]["default"]), ["z", "a"]);
        assert_eq!(inputs[1], json!("loose"));
        assert_eq!(inputs[2], json!([1, 2]));
    }

    #[test]
    fn test_nested_records_keep_their_order() {
        let doc = json!({"metadata": {"b": 1, "a": 2}, "version": 2});
        let out = canonicalize_document(doc);
        assert_eq!(keys(&out), ["version", "metadata"]);
        assert_eq!(keys(&out["metadata"]), ["b", "a"]);
    }

    #[test]
    fn test_dump_is_order_independent() {
        let a = json!({"name": "n", "version": 2, "inputs": [{"type": "string", "name": "x"}]});
        let b = json!({"inputs": [{"name": "x", "type": "string"}], "version": 2, "name": "n"});
        assert_eq!(dump_value(&a), dump_value(&b));
    }

    #[test]
    fn test_non_object_documents_are_emitted_as_is() {
        assert_eq!(dump_value(&json!(["b", "a"])), "- b\n- a\n");
    }
}
