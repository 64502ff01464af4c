//! Front matter envelope
//!
//! A document starts with a `---` line, carries a YAML/JSON block, closes with
//! another `---` line and continues with a free-form body. The body and the
//! document's line-ending style survive a rewrite of the block untouched.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::loader::load_yaml;

static ENVELOPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A---\r?\n(.*?)\r?\n---(\r?\n|\z)").unwrap());

static LINE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n").unwrap());

/// A document split around its front matter block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter<'a> {
    /// Raw block between the delimiters
    pub yaml: &'a str,
    /// Line break after the closing delimiter (empty at end of input)
    pub closing: &'a str,
    /// Everything after the envelope, verbatim
    pub rest: &'a str,
    /// `\r\n` when the document uses it anywhere, `\n` otherwise
    pub eol: &'static str,
}

impl<'a> FrontMatter<'a> {
    pub fn is_empty(&self) -> bool {
        self.yaml.trim().is_empty()
    }

    /// Rebuild the document around a replacement block.
    ///
    /// `yaml` uses `\n` line breaks; they are converted to the document's style.
    pub fn rejoin(&self, yaml: &str) -> String {
        let mut block = yaml.to_string();
        if !block.ends_with('\n') {
            block.push('\n');
        }
        if self.eol == "\r\n" {
            block = block.replace('\n', "\r\n");
        }
        format!("---{}{}---{}{}", self.eol, block, self.closing, self.rest)
    }
}

/// Locate the front matter block at the very start of `text`
pub fn split(text: &str) -> Option<FrontMatter<'_>> {
    let captures = ENVELOPE_RE.captures(text)?;
    let whole = captures.get(0)?;
    Some(FrontMatter {
        yaml: captures.get(1).map_or("", |m| m.as_str()),
        closing: captures.get(2).map_or("", |m| m.as_str()),
        rest: &text[whole.end()..],
        eol: if text.contains("\r\n") { "\r\n" } else { "\n" },
    })
}

/// Extract the front matter as a document plus the body text.
///
/// Line based and lenient: the block is trimmed, the body loses leading blank
/// lines and uses `\n` breaks. Returns `None` when there is no block or it is
/// not valid YAML.
pub fn parse_front_matter(text: &str) -> Option<(Value, String)> {
    let lines: Vec<&str> = LINE_BREAK_RE.split(text).collect();
    if lines.first().map(|l| l.trim_end() != "---").unwrap_or(true) {
        return None;
    }
    let close = lines
        .iter()
        .skip(1)
        .position(|l| l.trim_end() == "---")?
        + 1;

    let block = lines[1..close].join("\n");
    let body = lines[close + 1..].join("\n");
    let body = body.trim_start_matches('\n').to_string();

    let data = load_yaml(block.trim()).ok()?;
    Some((data, body))
}
