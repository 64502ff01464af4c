//! Block-style YAML emitter
//!
//! Emits mappings and sequences in block style with a fixed indentation and
//! a soft line width. Single-line scalars are quoted by `serde_yaml` so they
//! read back as the same value; multi-line strings become literal blocks and
//! over-long single-line strings are folded at spaces.

use serde_json::{Map, Value};

/// Fixed formatting parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitOptions {
    pub indent: usize,
    /// Soft limit; only plain prose strings are folded to honour it
    pub line_width: usize,
}

impl EmitOptions {
    pub const STABLE: EmitOptions = EmitOptions {
        indent: 2,
        line_width: 120,
    };
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self::STABLE
    }
}

/// Render `value` as YAML text ending in a newline
pub fn emit(value: &Value, options: EmitOptions) -> String {
    let mut emitter = Emitter {
        out: String::new(),
        indent: options.indent.max(1),
        line_width: options.line_width,
    };
    match value {
        Value::Object(map) if !map.is_empty() => emitter.mapping(map, 0, false),
        Value::Array(items) if !items.is_empty() => emitter.sequence(items, 0, false),
        Value::String(s) => {
            emitter.out.push_str(&quoted(s));
            emitter.out.push('\n');
        }
        scalar => {
            emitter.scalar(scalar, 0);
            emitter.out.push('\n');
        }
    }
    emitter.out
}

/// Longest key a YAML reader accepts without the explicit `? ` indicator
const MAX_IMPLICIT_KEY: usize = 1024;

struct Emitter {
    out: String,
    indent: usize,
    line_width: usize,
}

impl Emitter {
    fn pad(&mut self, width: usize) {
        self.out.extend(std::iter::repeat(' ').take(width));
    }

    fn mapping(&mut self, map: &Map<String, Value>, level: usize, inline_first: bool) {
        for (i, (key, value)) in map.iter().enumerate() {
            if i > 0 || !inline_first {
                self.pad(level);
            }
            let key = quoted(key);
            if key.chars().count() > MAX_IMPLICIT_KEY {
                self.out.push_str("? ");
                self.out.push_str(&key);
                self.out.push('\n');
                self.pad(level);
            } else {
                self.out.push_str(&key);
            }
            self.out.push(':');
            match value {
                Value::Object(child) if !child.is_empty() => {
                    self.out.push('\n');
                    self.mapping(child, level + self.indent, false);
                }
                Value::Array(items) if !items.is_empty() => {
                    self.out.push('\n');
                    self.sequence(items, level + self.indent, false);
                }
                scalar => {
                    self.out.push(' ');
                    self.scalar(scalar, level);
                    self.out.push('\n');
                }
            }
        }
    }

    fn sequence(&mut self, items: &[Value], level: usize, inline_first: bool) {
        // Entry content must line up after "- ", whatever the indent step.
        let child = level + self.indent.max(2);
        for (i, item) in items.iter().enumerate() {
            if i > 0 || !inline_first {
                self.pad(level);
            }
            self.out.push('-');
            self.pad(child - level - 1);
            match item {
                Value::Object(map) if !map.is_empty() => self.mapping(map, child, true),
                Value::Array(nested) if !nested.is_empty() => self.sequence(nested, child, true),
                scalar => {
                    self.scalar(scalar, level);
                    self.out.push('\n');
                }
            }
        }
    }

    /// `level` is the column of the owning key or dash
    fn scalar(&mut self, value: &Value, level: usize) {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => self.out.push_str(&n.to_string()),
            Value::String(s) => self.string(s, level),
            Value::Object(_) => self.out.push_str("{}"),
            Value::Array(_) => self.out.push_str("[]"),
        }
    }

    fn string(&mut self, s: &str, level: usize) {
        let content = level + self.indent;
        if s.contains('\n') && literal_safe(s) {
            self.literal(s, content);
        } else if level + s.chars().count() > self.line_width && fold_safe(s) {
            self.folded(s, content);
        } else {
            self.out.push_str(&quoted(s));
        }
    }

    fn literal(&mut self, s: &str, content: usize) {
        let (chomp, body) = match s.strip_suffix('\n') {
            None => ("-", s),
            Some(rest) if rest.ends_with('\n') => ("+", rest),
            Some(rest) => ("", rest),
        };
        self.out.push('|');
        let first = body.split('\n').find(|line| !line.is_empty());
        if first.map(|line| line.starts_with(' ')).unwrap_or(false) {
            self.out.push_str(&self.indent.to_string());
        }
        self.out.push_str(chomp);
        for line in body.split('\n') {
            self.out.push('\n');
            if !line.is_empty() {
                self.pad(content);
                self.out.push_str(line);
            }
        }
    }

    fn folded(&mut self, s: &str, content: usize) {
        let budget = self.line_width.saturating_sub(content).max(1);
        self.out.push_str(">-");

        let mut line = String::new();
        let mut line_len = 0;
        for word in s.split(' ') {
            let word_len = word.chars().count();
            if line_len > 0 && line_len + 1 + word_len > budget {
                self.out.push('\n');
                self.pad(content);
                self.out.push_str(&line);
                line.clear();
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.push_str(word);
            line_len += word_len;
        }
        self.out.push('\n');
        self.pad(content);
        self.out.push_str(&line);
    }
}

fn printable(c: char) -> bool {
    !(c.is_control() || c == '\u{2028}' || c == '\u{2029}' || c == '\u{feff}')
}

/// Block scalars cannot start a line's content with a tab: it would be read as indentation
fn literal_safe(s: &str) -> bool {
    !s.trim().is_empty()
        && s.chars().all(|c| c == '\n' || c == '\t' || printable(c))
        && !s.split('\n').any(|line| line.starts_with('\t'))
}

/// Folding only at single interior spaces keeps the folded text equal to `s`
fn fold_safe(s: &str) -> bool {
    s.contains(' ')
        && !s.starts_with(' ')
        && !s.ends_with(' ')
        && !s.contains("  ")
        && s.chars().all(printable)
}

/// Single-line scalar text for `s`, quoted only when YAML needs it
fn quoted(s: &str) -> String {
    if let Ok(text) = serde_yaml::to_string(s) {
        let text = text.strip_suffix('\n').unwrap_or(&text);
        if !text.contains('\n') && !text.starts_with("---") && !text.contains(yaml_break) {
            return text.to_string();
        }
    }
    // JSON string syntax is valid YAML double-quoted scalar syntax, except that
    // YAML also treats NEL, LS and PS as line breaks.
    let json = serde_json::to_string(s).unwrap_or_else(|_| String::from("\"\""));
    json.replace('\u{85}', "\\N")
        .replace('\u{2028}', "\\L")
        .replace('\u{2029}', "\\P")
}

fn yaml_break(c: char) -> bool {
    matches!(c, '\u{85}' | '\u{2028}' | '\u{2029}')
}
