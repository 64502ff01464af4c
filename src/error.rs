//! Error types for the Prompt DSL

use std::fmt;

use thiserror::Error;

/// Result type for Prompt DSL operations
pub type Result<T> = std::result::Result<T, PromptError>;

/// Prompt DSL errors
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Prompt schema v{version} validation failed ({} violation(s)): {}", .violations.len(), join_violations(.violations))]
    SchemaValidation {
        version: u32,
        violations: Vec<Violation>,
    },

    #[error("Unsupported prompt version: {0}")]
    UnsupportedVersion(String),

    #[error("Invalid YAML/JSON document: {0}")]
    DocumentSyntax(#[from] serde_yaml::Error),

    #[error("Document value cannot be represented: {0}")]
    NonJsonValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl PromptError {
    /// Field-level violations, empty for non-validation errors
    pub fn violations(&self) -> &[Violation] {
        match self {
            PromptError::SchemaValidation { violations, .. } => violations,
            _ => &[],
        }
    }
}

/// Category of a single schema violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// A required field is absent
    Missing,
    /// Wrong primitive type
    Type,
    /// String failed a pattern match
    Pattern,
    /// Literal or enumeration mismatch
    Literal,
    /// Key not declared by a strict object
    UnknownKey,
    /// Any other constraint (length, bounds, element shape)
    Constraint,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::Missing => "missing",
            ViolationKind::Type => "type",
            ViolationKind::Pattern => "pattern",
            ViolationKind::Literal => "literal",
            ViolationKind::UnknownKey => "unknown_key",
            ViolationKind::Constraint => "constraint",
        }
    }
}

/// One field-level schema violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer of the offending field (`/inputs/0/type`), empty for the root
    pub path: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    /// Dotted field name, e.g. `inputs.0.type`
    pub fn field(&self) -> String {
        self.path.trim_start_matches('/').replace('/', ".")
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field();
        let field = if field.is_empty() { "(root)" } else { field.as_str() };
        write!(f, "{}: {} [{}]", field, self.message, self.kind.as_str())
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
