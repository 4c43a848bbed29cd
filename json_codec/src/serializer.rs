use std::fmt::Write;

use crate::json_value::{JsonValue, Map};

const INDENT: &str = "  ";

// Plain decimal notation is used for magnitudes in this range, exponent notation outside it
const PLAIN_MIN: f64 = 1e-4;
const PLAIN_MAX: f64 = 9_007_199_254_740_992.0; // 2^53

/// Output layout for [`serialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// No whitespace between tokens.
    #[default]
    Compact,
    /// One member per line, indented by two spaces per level, with `": "` after keys.
    Pretty,
}

pub fn serialize(value: &JsonValue, style: Style) -> String {
    let mut out = String::new();
    write_value(value, style, 0, &mut out);
    out
}

pub fn to_string(value: &JsonValue) -> String {
    serialize(value, Style::Compact)
}

pub fn to_string_pretty(value: &JsonValue) -> String {
    serialize(value, Style::Pretty)
}

fn write_value(value: &JsonValue, style: Style, indent: usize, out: &mut String) {
    match value {
        JsonValue::Null => out.push_str("null"),
        JsonValue::Bool(val) => out.push_str(if *val { "true" } else { "false" }),
        JsonValue::Number(num) => write_number(*num, out),
        JsonValue::String(text) => write_string(text, out),
        JsonValue::Array(items) => write_array(items, style, indent, out),
        JsonValue::Object(map) => write_object(map, style, indent, out),
    }
}

fn write_array(items: &[JsonValue], style: Style, indent: usize, out: &mut String) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }

    out.push('[');
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        push_newline(style, indent + 1, out);
        write_value(item, style, indent + 1, out);
    }
    push_newline(style, indent, out);
    out.push(']');
}

fn write_object(map: &Map, style: Style, indent: usize, out: &mut String) {
    if map.is_empty() {
        out.push_str("{}");
        return;
    }

    out.push('{');
    for (idx, (key, value)) in map.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        push_newline(style, indent + 1, out);
        write_string(key, out);
        out.push(':');
        if style == Style::Pretty {
            out.push(' ');
        }
        write_value(value, style, indent + 1, out);
    }
    push_newline(style, indent, out);
    out.push('}');
}

fn push_newline(style: Style, indent: usize, out: &mut String) {
    if style == Style::Compact {
        return;
    }

    out.push('\n');
    for _ in 0..indent {
        out.push_str(INDENT);
    }
}

// Both `Display` and `LowerExp` give the shortest digits that parse back to the same value,
// so 100.0 is written as `100` and 1e300 as `1e300`
fn write_number(num: f64, out: &mut String) {
    if !num.is_finite() {
        // No JSON spelling exists for NaN or infinity
        out.push_str("null");
        return;
    }

    let magnitude = num.abs();
    if num == 0.0 || (PLAIN_MIN..PLAIN_MAX).contains(&magnitude) {
        let _ = write!(out, "{num}");
    } else {
        let _ = write!(out, "{num:e}");
    }
}

fn write_string(text: &str, out: &mut String) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\u{0}'..='\u{1f}' => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            _ => out.push(c),
        }
    }
    out.push('"');
}
