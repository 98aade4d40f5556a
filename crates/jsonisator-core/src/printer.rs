//! Renders a [`Value`] tree as indented JSON text.
//!
//! Layout:
//!
//! - two spaces per nesting level, one member or element per line
//! - `[]` and `{}` for empty containers, on a single line
//! - `"key": value` with one space after the colon
//! - no trailing newline

use std::fmt::Write;

use crate::value::Value;

const INDENT: &str = "  ";

/// Render `value` as indented JSON text.
///
/// # Example
/// ```
/// use jsonisator_core::{print_value, Value};
/// let value = Value::Object(vec![
///     ("name".to_string(), Value::from("Ann")),
///     ("tags".to_string(), Value::Array(vec![])),
/// ]);
/// assert_eq!(print_value(&value), "{\n  \"name\": \"Ann\",\n  \"tags\": []\n}");
/// ```
pub fn print_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, 0, &mut out);
    out
}

fn write_value(value: &Value, depth: usize, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(text) => out.push_str(text),
        Value::Str(s) => write_string(s, out),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('\n');
                push_indent(depth + 1, out);
                write_value(item, depth + 1, out);
            }
            out.push('\n');
            push_indent(depth, out);
            out.push(']');
        }
        Value::Object(members) if members.is_empty() => out.push_str("{}"),
        Value::Object(members) => {
            out.push('{');
            for (i, (key, member)) in members.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('\n');
                push_indent(depth + 1, out);
                write_string(key, out);
                out.push_str(": ");
                write_value(member, depth + 1, out);
            }
            out.push('\n');
            push_indent(depth, out);
            out.push('}');
        }
    }
}

/// Emit a quoted string, escaping quotes, backslashes and control characters.
fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
