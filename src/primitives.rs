//! Shared field patterns
//!
//! Pattern strings are embedded verbatim in the JSON Schema contracts; the
//! placeholder pattern drives template scanning.

use once_cell::sync::Lazy;
use regex::Regex;

/// UUID restricted to versions 1 through 6
pub const UUID_V1_TO_V6_PATTERN: &str =
    "^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[1-6][0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}$";

/// Lowercase slug starting with an alphanumeric character
pub const SLUG_PATTERN: &str = "^[a-z0-9][a-z0-9_-]*$";

/// `{{ identifier }}` placeholder, capturing the identifier
pub const PLACEHOLDER_PATTERN: &str = r"\{\{\s*([a-zA-Z0-9_.-]+)\s*\}\}";

pub(crate) static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(PLACEHOLDER_PATTERN).unwrap());
