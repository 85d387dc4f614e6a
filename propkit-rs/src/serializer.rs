//! Rendering property values into header text.
//!
//! The output is deliberately narrower than full YAML: block-style lists,
//! two-space indentation, literal blocks for multi-line text, and double
//! quotes wherever a plain rendition would parse back as something else.

use crate::codec::{key_to_string, parses_as_number};
use indexmap::IndexMap;
use serde_yaml::Value;

const INDENT: &str = "  ";

/// Render a full property mapping as the body of a header block.
///
/// Every entry ends with a newline; an empty mapping renders as an empty
/// string.
pub fn serialize_properties(properties: &IndexMap<String, Value>) -> String {
    let mut out = String::new();
    for (key, value) in properties {
        write_entry(&mut out, key, value, 0);
    }
    out
}

/// Render a single value as it would appear in a header, without a key and
/// without a trailing newline. Total over all value shapes.
pub fn serialize_value(value: &Value) -> String {
    match value {
        Value::Sequence(items) if !items.is_empty() => {
            let mut out = String::new();
            for item in items {
                write_list_item(&mut out, item, 0);
            }
            out.trim_end_matches('\n').to_string()
        }
        Value::Mapping(map) if !map.is_empty() => {
            let mut out = String::new();
            for (k, v) in map {
                write_entry(&mut out, &key_to_string(k), v, 0);
            }
            out.trim_end_matches('\n').to_string()
        }
        Value::String(s) if takes_block_form(s) => block_scalar(s, 1),
        Value::Tagged(t) => serialize_value(&t.value),
        other => scalar_token(other),
    }
}

/// Flatten one level of list nesting, as the write path does when a property
/// value is assembled for serialization.
pub fn flatten_value(value: &Value) -> Value {
    match value {
        Value::Sequence(items) => {
            let mut flat = Vec::new();
            for item in items {
                match item {
                    Value::Sequence(sub) => flat.extend(sub.iter().cloned()),
                    other => flat.push(other.clone()),
                }
            }
            Value::Sequence(flat)
        }
        other => other.clone(),
    }
}

fn write_entry(out: &mut String, key: &str, value: &Value, indent: usize) {
    let pad = INDENT.repeat(indent);
    let key_token = string_token(key);
    match value {
        Value::Sequence(items) if !items.is_empty() => {
            out.push_str(&format!("{pad}{key_token}:\n"));
            for item in items {
                write_list_item(out, item, indent + 1);
            }
        }
        Value::Mapping(map) if !map.is_empty() => {
            out.push_str(&format!("{pad}{key_token}:\n"));
            for (k, v) in map {
                write_entry(out, &key_to_string(k), v, indent + 1);
            }
        }
        Value::String(s) if takes_block_form(s) => {
            out.push_str(&format!("{pad}{key_token}: {}\n", block_scalar(s, indent + 1)));
        }
        Value::Tagged(t) => write_entry(out, key, &t.value, indent),
        other => {
            out.push_str(&format!("{pad}{key_token}: {}\n", scalar_token(other)));
        }
    }
}

fn write_list_item(out: &mut String, item: &Value, indent: usize) {
    let pad = INDENT.repeat(indent);
    match item {
        Value::Sequence(items) if !items.is_empty() => {
            out.push_str(&format!("{pad}-\n"));
            for sub in items {
                write_list_item(out, sub, indent + 1);
            }
        }
        Value::Mapping(map) if !map.is_empty() => {
            let mut block = String::new();
            for (k, v) in map {
                write_entry(&mut block, &key_to_string(k), v, indent + 1);
            }
            // Hoist the first entry onto the marker line; the rest stay
            // aligned beneath it.
            out.push_str(&format!("{pad}- "));
            out.push_str(&block[pad.len() + INDENT.len()..]);
        }
        Value::String(s) if takes_block_form(s) => {
            out.push_str(&format!("{pad}- {}\n", block_scalar(s, indent + 1)));
        }
        Value::Tagged(t) => write_list_item(out, &t.value, indent),
        other => out.push_str(&format!("{pad}- {}\n", scalar_token(other))),
    }
}

/// Whether a string renders as a literal block: multi-line, no carriage
/// returns (a block re-parses them as plain newlines), and at least one
/// character besides line breaks. Everything else takes quoted form.
fn takes_block_form(s: &str) -> bool {
    s.contains('\n') && !s.contains('\r') && !s.trim_end_matches('\n').is_empty()
}

/// Literal block scalar: header with chomping indicator, then the content
/// lines indented one level past the parent.
fn block_scalar(text: &str, indent: usize) -> String {
    let pad = INDENT.repeat(indent);
    let stripped = text.trim_end_matches('\n');
    let trailing = text.len() - stripped.len();
    let chomp = match trailing {
        0 => "-",
        1 => "",
        _ => "+",
    };
    // Block indentation is inferred from the first non-empty line, so one
    // that itself starts with whitespace needs the explicit indicator.
    let first_starts_white = stripped
        .lines()
        .find(|l| !l.is_empty())
        .is_some_and(|l| l.starts_with(' ') || l.starts_with('\t'));
    let indicator = if first_starts_white { "2" } else { "" };

    // Every line carries the block indentation, blank lines included.
    let mut out = format!("|{indicator}{chomp}");
    for line in stripped.split('\n') {
        out.push('\n');
        out.push_str(&pad);
        out.push_str(line);
    }
    for _ in 1..trailing {
        out.push('\n');
        out.push_str(&pad);
    }
    out
}

/// Single-line token for a value. Containers reaching this point are empty;
/// the callers render non-empty ones in block form.
fn scalar_token(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => string_token(s),
        Value::Sequence(_) => "[]".to_string(),
        Value::Mapping(_) => "{}".to_string(),
        Value::Tagged(t) => scalar_token(&t.value),
    }
}

fn string_token(s: &str) -> String {
    if needs_quoting(s) {
        quoted(s)
    } else {
        s.to_string()
    }
}

/// True when a plain rendition of `s` would change meaning on re-parse.
fn needs_quoting(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    if s.contains('"') || s.contains(':') || s.contains('#') {
        return true;
    }
    if s.contains("[[") || s.contains("]]") {
        return true;
    }
    if s.contains('\n') || s.contains('\r') || s.contains('\t') {
        return true;
    }
    if s.trim() != s {
        return true;
    }
    if resolves_as_non_string(s) {
        return true;
    }
    if s.starts_with("---") {
        return true;
    }
    match s.chars().next() {
        // A leading dash or question mark is only ambiguous bare or followed
        // by a space.
        Some('-') | Some('?') => s.len() == 1 || s[1..].starts_with(' '),
        Some(c) => matches!(
            c,
            ',' | '[' | ']' | '{' | '}' | '&' | '*' | '!' | '|' | '>' | '\'' | '%' | '@' | '`'
        ),
        None => false,
    }
}

/// Plain forms the parser would resolve as null, boolean or number.
fn resolves_as_non_string(s: &str) -> bool {
    matches!(
        s,
        "null" | "Null" | "NULL" | "~" | "true" | "True" | "TRUE" | "false" | "False" | "FALSE"
    ) || matches!(
        s,
        ".inf" | ".Inf" | ".INF" | "+.inf" | "-.inf" | "-.Inf" | "-.INF" | ".nan" | ".NaN" | ".NAN"
    ) || parses_as_number(s)
        || is_radix_int(s)
}

fn is_radix_int(s: &str) -> bool {
    let body = s
        .strip_prefix('+')
        .or_else(|| s.strip_prefix('-'))
        .unwrap_or(s);
    if let Some(hex) = body.strip_prefix("0x") {
        !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit())
    } else if let Some(oct) = body.strip_prefix("0o") {
        !oct.is_empty() && oct.chars().all(|c| ('0'..='7').contains(&c))
    } else {
        false
    }
}

/// Double-quoted form with backslash escapes for the characters a quoted
/// scalar cannot carry literally.
fn quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
