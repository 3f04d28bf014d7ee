//! Sectioned `key = value` text format.
//!
//! Rules:
//! - `[name]` opens a section; a section name may appear only once.
//! - `key = value` or `key: value`, split on the first delimiter. Keys and
//!   values are trimmed. Keys are case-sensitive.
//! - Full-line comments start with `#` or `;`.
//! - An indented line directly after a key continues that key's value.
//! - A key outside any section, a repeated key within a section, or a line
//!   without a delimiter is a parse error.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::path::Path;

pub type Section = IndexMap<String, String>;
pub type Sections = IndexMap<String, Section>;

pub fn parse(content: &str, path: &Path) -> Result<Sections> {
    let mut sections = Sections::new();
    let mut current: Option<String> = None;
    let mut last_key: Option<String> = None;

    let fail = |line: usize, message: String| Error::ConfigParse {
        path: path.to_path_buf(),
        line,
        message,
    };

    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            last_key = None;
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if raw.starts_with(char::is_whitespace) {
            if let (Some(section), Some(key)) = (&current, &last_key) {
                if let Some(value) = sections
                    .get_mut(section)
                    .and_then(|entries| entries.get_mut(key))
                {
                    value.push('\n');
                    value.push_str(trimmed);
                    continue;
                }
            }
        }

        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            let name = &trimmed[1..trimmed.len() - 1];
            if name.is_empty() {
                return Err(fail(line, "empty section name".to_string()));
            }
            if sections.contains_key(name) {
                return Err(fail(line, format!("section '{name}' already exists")));
            }
            sections.insert(name.to_string(), Section::new());
            current = Some(name.to_string());
            last_key = None;
            continue;
        }

        let Some(section) = &current else {
            return Err(fail(line, "key/value pair before any section header".to_string()));
        };

        let Some(pos) = trimmed.find(|c: char| c == '=' || c == ':') else {
            return Err(fail(line, format!("expected 'key = value', found '{trimmed}'")));
        };
        let key = trimmed[..pos].trim();
        let value = trimmed[pos + 1..].trim();
        if key.is_empty() {
            return Err(fail(line, "empty key".to_string()));
        }

        let entries = sections
            .get_mut(section)
            .ok_or_else(|| fail(line, format!("section '{section}' vanished")))?;
        if entries.contains_key(key) {
            return Err(fail(
                line,
                format!("key '{key}' already exists in section '{section}'"),
            ));
        }
        entries.insert(key.to_string(), value.to_string());
        last_key = Some(key.to_string());
    }

    Ok(sections)
}

/// Serialize sections in the format [`parse`] reads.
pub fn render(sections: &Sections) -> String {
    let mut out = String::new();
    for (name, entries) in sections {
        out.push('[');
        out.push_str(name);
        out.push_str("]\n");
        for (key, value) in entries {
            out.push_str(key);
            out.push_str(" = ");
            out.push_str(&value.replace('\n', "\n\t"));
            out.push('\n');
        }
        out.push('\n');
    }
    out
}
