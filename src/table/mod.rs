//! In-memory table representation and JSON loading.
//!
//! A [`Row`] is a string-keyed, string-valued mapping; a [`Table`] is an
//! ordered sequence of rows. All typed interpretation (number vs string vs
//! boolean) happens at comparison time inside the evaluator, never in the
//! row representation itself.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{Result, SiftError};

/// A single row: field name to value, keys unique, both textual.
pub type Row = BTreeMap<String, String>;

/// An ordered sequence of rows. Input and output of evaluation share this
/// representation.
pub type Table = Vec<Row>;

/// Load a table from a JSON file: an array of flat objects.
///
/// Scalar values are converted to their textual form — strings verbatim,
/// numbers and booleans via their JSON rendering, `null` as the empty
/// string. Arrays and nested objects are rejected.
pub fn load_json(path: impl AsRef<Path>) -> Result<Table> {
    let text = fs::read_to_string(path)?;
    parse_json(&text)
}

/// Parse JSON table text. See [`load_json`].
pub fn parse_json(text: &str) -> Result<Table> {
    let value: Value = serde_json::from_str(text)?;

    let rows = match value {
        Value::Array(rows) => rows,
        _ => return Err(SiftError::BadTable("expected a JSON array of objects".into())),
    };

    let mut table = Table::new();
    for (i, row_value) in rows.into_iter().enumerate() {
        let obj = match row_value {
            Value::Object(obj) => obj,
            other => {
                return Err(SiftError::BadTable(format!(
                    "row {i}: expected an object, got {other}"
                )));
            }
        };

        let mut row = Row::new();
        for (name, field_value) in obj {
            let text = match field_value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => String::new(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(SiftError::BadTable(format!(
                        "row {i}, field '{name}': nested values are not supported"
                    )));
                }
            };
            row.insert(name, text);
        }
        table.push(row);
    }

    Ok(table)
}
