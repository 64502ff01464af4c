//! Document loading
//!
//! YAML is read as a superset of JSON and converted into an order-preserving
//! [`serde_json::Value`], which is the untyped form every other layer works on.

use serde_json::{Map, Number, Value};
use serde_yaml::Value as Yaml;

use crate::error::{PromptError, Result};

/// Parse YAML (or JSON) text into an untyped document
pub fn load_yaml(text: &str) -> Result<Value> {
    let yaml: Yaml = serde_yaml::from_str(text)?;
    to_json(yaml)
}

fn to_json(yaml: Yaml) -> Result<Value> {
    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => Value::Number(to_number(&n)?),
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(key_string(key)?, to_json(value)?);
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => to_json(tagged.value)?,
    })
}

fn to_number(n: &serde_yaml::Number) -> Result<Number> {
    if let Some(i) = n.as_i64() {
        return Ok(Number::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Number::from(u));
    }
    let f = n.as_f64().unwrap_or(f64::NAN);
    Number::from_f64(f).ok_or_else(|| PromptError::NonJsonValue(format!("non-finite number {}", n)))
}

/// Scalar keys are stringified the way YAML loaders for JSON-like targets do
fn key_string(key: Yaml) -> Result<String> {
    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Tagged(tagged) => key_string(tagged.value),
        Yaml::Sequence(_) | Yaml::Mapping(_) => Err(PromptError::NonJsonValue(
            "collections cannot be used as mapping keys".to_string(),
        )),
    }
}
