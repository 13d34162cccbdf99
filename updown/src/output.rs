//! Output formatting: plain text (human-readable) and JSON.

use serde_json::Value;
use std::fmt::Write;

/// Widest a table cell may get before it is truncated.
const MAX_CELL: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable tables and key-value
    #[default]
    Plain,
    /// JSON (pretty-printed)
    Json,
}

/// Render a value in the chosen format.
pub fn render(value: &Value, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Plain => Ok(format_plain(value)),
        OutputFormat::Json => serde_json::to_string_pretty(value),
    }
}

/// Format value as plain text: arrays of objects become a table, objects
/// become `key: value` lines, nested values are indented.
pub fn format_plain(value: &Value) -> String {
    let mut out = String::new();
    format_plain_impl(value, &mut out, 0);
    out
}

fn format_plain_impl(v: &Value, out: &mut String, indent: usize) {
    let pad = "  ".repeat(indent);
    match v {
        Value::Array(arr) if arr.is_empty() => {
            let _ = writeln!(out, "{}<empty>", pad);
        }
        Value::Array(arr) if arr.iter().all(Value::is_object) => {
            format_table(arr, out, &pad);
        }
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                if item.is_object() || item.is_array() {
                    let _ = writeln!(out, "{}[{}]", pad, i + 1);
                    format_plain_impl(item, out, indent + 1);
                } else {
                    let _ = writeln!(out, "{}{}", pad, scalar(item));
                }
            }
        }
        Value::Object(map) => {
            for (k, val) in map {
                if val.is_object() || val.is_array() {
                    let _ = writeln!(out, "{}{}:", pad, k);
                    format_plain_impl(val, out, indent + 1);
                } else {
                    let _ = writeln!(out, "{}{}: {}", pad, k, scalar(val));
                }
            }
        }
        scalar_value => {
            let _ = writeln!(out, "{}{}", pad, scalar(scalar_value));
        }
    }
}

/// Columns are the scalar keys of the rows, in first-seen order. Nested
/// values are left out of the table.
fn format_table(rows: &[Value], out: &mut String, pad: &str) {
    let mut columns: Vec<&str> = Vec::new();
    for row in rows.iter().filter_map(Value::as_object) {
        for (k, v) in row {
            if !v.is_object() && !v.is_array() && !columns.contains(&k.as_str()) {
                columns.push(k);
            }
        }
    }
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| match row.get(*c) {
                    Some(v) => truncate(&scalar(v), MAX_CELL),
                    None => "-".to_string(),
                })
                .collect()
        })
        .collect();
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(c.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: Vec<&str>| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<w$}", v, w = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    let header = line(columns.clone());
    let _ = writeln!(out, "{}{}", pad, header);
    let _ = writeln!(out, "{}{}", pad, "-".repeat(header.chars().count()));
    for row in &cells {
        let _ = writeln!(out, "{}{}", pad, line(row.iter().map(String::as_str).collect()));
    }
}

fn scalar(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    let s = s.replace('\n', " ");
    if s.chars().count() <= max {
        s
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}
