//! JSON ingestion - an array of row objects
//!
//! Unlike CSV, JSON cells keep their type: numbers stay numeric, `null`
//! is missing.

use super::{modified_time, TableSource};
use crate::error::{RankWatchError, Result};
use crate::table::{RawTable, RawValue};
use serde_json::Value;
use std::path::PathBuf;

/// Parse `[{"column": value, ...}, ...]` into a table.
///
/// Columns are the union of all keys in first-seen order; keys a row lacks
/// are missing cells.
pub fn parse_json_table(text: &str) -> Result<RawTable> {
    let value: Value = serde_json::from_str(text)?;
    let records = match value {
        Value::Array(records) => records,
        other => {
            return Err(RankWatchError::DataError(format!(
                "Expected a JSON array of rows, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut objects = Vec::with_capacity(records.len());
    let mut columns: Vec<String> = Vec::new();
    for (idx, record) in records.into_iter().enumerate() {
        match record {
            Value::Object(map) => {
                for key in map.keys() {
                    if !columns.contains(key) {
                        columns.push(key.clone());
                    }
                }
                objects.push(map);
            }
            other => {
                return Err(RankWatchError::DataError(format!(
                    "Row {} is {}, expected an object",
                    idx,
                    json_kind(&other)
                )))
            }
        }
    }

    let mut table = RawTable::new(columns.clone());
    for object in objects {
        let row = columns
            .iter()
            .map(|column| object.get(column).map(cell).unwrap_or(RawValue::Missing))
            .collect();
        table.push_row(row);
    }

    Ok(table)
}

fn cell(value: &Value) -> RawValue {
    match value {
        Value::Null => RawValue::Missing,
        Value::Number(n) => n.as_f64().map(RawValue::Number).unwrap_or(RawValue::Missing),
        Value::String(s) if s.trim().is_empty() => RawValue::Missing,
        Value::String(s) => RawValue::Text(s.clone()),
        other => RawValue::Text(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// JSON file as a [`TableSource`]
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSource for JsonFileSource {
    fn load(&self) -> Result<RawTable> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            RankWatchError::DataError(format!(
                "Failed to read JSON {}: {}",
                self.path.display(),
                e
            ))
        })?;
        let table = parse_json_table(&text)?;
        Ok(table.with_snapshot_time(modified_time(&self.path)?))
    }

    fn name(&self) -> &str {
        "json"
    }
}
