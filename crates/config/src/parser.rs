//! `KEY=VALUE` line format (spec §6).
//!
//! - `#` starts a comment (only at the start of a trimmed line — `#` inside
//!   a quoted value is literal).
//! - Blank lines are ignored.
//! - Values may be wrapped in matching single or double quotes; an `=`
//!   inside a quoted value does not end the value.
//! - Leading/trailing whitespace around key and (unquoted) value is trimmed.

use indexmap::IndexMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: missing '=' separator")]
    MissingEquals { line: usize },
    #[error("line {line}: empty key")]
    EmptyKey { line: usize },
    #[error("line {line}: unterminated quoted value")]
    UnterminatedQuote { line: usize },
}

/// Parse `KEY=VALUE` text into an ordered map, preserving input order so
/// round-tripping (unknown-key passthrough) produces stable output.
pub fn parse(text: &str) -> Result<IndexMap<String, String>, ParseError> {
    let mut out = IndexMap::new();
    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let eq_pos = line.find('=').ok_or(ParseError::MissingEquals { line: line_no })?;
        let key = line[..eq_pos].trim();
        if key.is_empty() {
            return Err(ParseError::EmptyKey { line: line_no });
        }
        let raw_value = line[eq_pos + 1..].trim();
        let value = unquote(raw_value).ok_or(ParseError::UnterminatedQuote { line: line_no })?;
        out.insert(key.to_string(), value);
    }
    Ok(out)
}

fn unquote(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 && (bytes[0] == b'"' || bytes[0] == b'\'') {
        let quote = bytes[0];
        if bytes[bytes.len() - 1] != quote {
            return None;
        }
        Some(raw[1..raw.len() - 1].to_string())
    } else {
        Some(raw.to_string())
    }
}

/// Serialize back to `KEY=VALUE` text, quoting values that contain `#` or
/// leading/trailing whitespace so re-parsing is lossless.
pub fn serialize(map: &IndexMap<String, String>) -> String {
    let mut out = String::new();
    for (key, value) in map {
        if needs_quoting(value) {
            out.push_str(&format!("{key}=\"{value}\"\n"));
        } else {
            out.push_str(&format!("{key}={value}\n"));
        }
    }
    out
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.contains('#')
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
