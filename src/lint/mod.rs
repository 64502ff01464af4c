//! Prompt Linting
//!
//! Checks that a template's `{{placeholders}}` and its declared inputs agree,
//! without rendering anything. Placeholders are opaque tokens: `user.name` is
//! compared as a whole against input names, never resolved as a path.
//!
//! ## Lints
//! 1. **INVALID_FRONT_MATTER** (error): the prompt does not parse or validate
//! 2. **MISSING_INPUT** (error): a placeholder has no declared input
//! 3. **UNUSED_INPUT** (warning): a declared input is never referenced

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use crate::config::LintConfig;
use crate::front_matter;
use crate::primitives::PLACEHOLDER_RE;
use crate::registry::parse_prompt;
use crate::schema::PromptDefinition;

/// Outcome of comparing template placeholders with declared inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Consistency {
    /// Placeholders with no matching input, sorted
    pub missing_in_inputs: Vec<String>,
    /// Inputs never referenced by the template, sorted
    pub missing_in_template: Vec<String>,
}

impl Consistency {
    pub fn is_consistent(&self) -> bool {
        self.missing_in_inputs.is_empty() && self.missing_in_template.is_empty()
    }
}

/// Distinct placeholder identifiers in `template`, single pass
pub fn extract_placeholders(template: &str) -> BTreeSet<String> {
    PLACEHOLDER_RE
        .captures_iter(template)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Compare a template with a list of input names
pub fn check_template_inputs<'a>(
    template: &str,
    input_names: impl IntoIterator<Item = &'a str>,
) -> Consistency {
    let placeholders = extract_placeholders(template);
    let inputs: BTreeSet<&str> = input_names.into_iter().filter(|n| !n.is_empty()).collect();

    Consistency {
        missing_in_inputs: placeholders
            .iter()
            .filter(|p| !inputs.contains(p.as_str()))
            .cloned()
            .collect(),
        missing_in_template: inputs
            .iter()
            .filter(|n| !placeholders.contains(**n))
            .map(|n| n.to_string())
            .collect(),
    }
}

/// Compare a validated prompt's template with its inputs
pub fn check_consistency(prompt: &PromptDefinition) -> Consistency {
    check_template_inputs(&prompt.template, prompt.input_names())
}

/// Why a document was not linted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintStatus {
    Checked,
    NoFrontMatter,
    EmptyFrontMatter,
    /// Front matter present but not loadable as YAML
    UnreadableFrontMatter,
    UnreadableFile,
}

/// Result of linting one document
#[derive(Debug)]
pub struct LintResult {
    pub document_id: String,
    pub status: LintStatus,
    pub errors: Vec<LintError>,
    pub warnings: Vec<LintWarning>,
}

impl LintResult {
    fn new(document_id: &str, status: LintStatus) -> Self {
        Self {
            document_id: document_id.to_string(),
            status,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Debug)]
pub struct LintError {
    pub code: &'static str,
    pub message: String,
    pub path: String,
}

#[derive(Debug)]
pub struct LintWarning {
    pub code: &'static str,
    pub message: String,
    pub path: String,
}

/// Lint a Markdown document carrying a prompt in its front matter.
///
/// The document body is the template: it replaces any `template` field of
/// the front matter before the prompt is parsed.
pub fn lint_document(document_id: &str, text: &str, config: &LintConfig) -> LintResult {
    match front_matter::split(text) {
        None => return LintResult::new(document_id, LintStatus::NoFrontMatter),
        Some(fm) if fm.is_empty() => {
            return LintResult::new(document_id, LintStatus::EmptyFrontMatter)
        }
        Some(_) => {}
    }
    let Some((mut data, body)) = front_matter::parse_front_matter(text) else {
        return LintResult::new(document_id, LintStatus::UnreadableFrontMatter);
    };

    let mut result = LintResult::new(document_id, LintStatus::Checked);
    if let Value::Object(root) = &mut data {
        root.insert("template".to_string(), Value::String(body));
    }

    let prompt = match parse_prompt(data) {
        Ok(prompt) => prompt,
        Err(e) => {
            result.errors.push(LintError {
                code: "INVALID_FRONT_MATTER",
                message: format!("Invalid front matter: {}", e),
                path: String::new(),
            });
            return result;
        }
    };

    let consistency = check_consistency(&prompt);
    if !consistency.missing_in_inputs.is_empty() {
        result.errors.push(LintError {
            code: "MISSING_INPUT",
            message: format!(
                "Variables used in template but missing in inputs: {}",
                consistency.missing_in_inputs.join(", ")
            ),
            path: "template".to_string(),
        });
    }
    if !consistency.missing_in_template.is_empty() {
        let message = format!(
            "Input(s) not referenced in template: {}",
            consistency.missing_in_template.join(", ")
        );
        if config.unused_inputs_are_errors {
            result.errors.push(LintError {
                code: "UNUSED_INPUT",
                message,
                path: "inputs".to_string(),
            });
        } else {
            result.warnings.push(LintWarning {
                code: "UNUSED_INPUT",
                message,
                path: "inputs".to_string(),
            });
        }
    }
    result
}

/// Lint every file in `paths`; unreadable files are reported, not fatal
pub fn lint_files(paths: &[PathBuf], config: &LintConfig) -> Vec<LintResult> {
    paths.iter().map(|path| lint_file(path, config)).collect()
}

fn lint_file(path: &Path, config: &LintConfig) -> LintResult {
    let document_id = path.to_string_lossy();
    match std::fs::read_to_string(path) {
        Ok(text) => lint_document(&document_id, &text, config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping unreadable file");
            LintResult::new(&document_id, LintStatus::UnreadableFile)
        }
    }
}
