//! Row-oriented records to columnar frames.

use polars::prelude::*;
use serde_json::Value;

use crate::error::{IngestError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Empty,
    Boolean,
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    fn widen(self, value: &Value) -> Self {
        let seen = match value {
            Value::Null => return self,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_i64() => Self::Integer,
            Value::Number(_) => Self::Float,
            _ => Self::Text,
        };
        match (self, seen) {
            (Self::Empty, kind) => kind,
            (current, kind) if current == kind => current,
            (Self::Integer, Self::Float) | (Self::Float, Self::Integer) => Self::Float,
            _ => Self::Text,
        }
    }
}

/// Convert JSON object records into a `DataFrame`.
///
/// Columns appear in first-seen key order; keys missing from a record become
/// nulls. Column types are inferred from the non-null values: all booleans,
/// all integers, all numbers, otherwise text. Rows that are not objects and
/// nested array/object values are rejected.
pub fn records_to_frame(records: &[Value]) -> Result<DataFrame> {
    let mut names: Vec<String> = Vec::new();
    for (row, record) in records.iter().enumerate() {
        let Value::Object(map) = record else {
            return Err(IngestError::RecordShape {
                row,
                message: format!("expected an object, found {}", value_kind(record)),
            });
        };
        for (key, value) in map {
            if matches!(value, Value::Array(_) | Value::Object(_)) {
                return Err(IngestError::RecordShape {
                    row,
                    message: format!("field {key:?} holds a nested {}", value_kind(value)),
                });
            }
            if !names.iter().any(|name| name == key) {
                names.push(key.clone());
            }
        }
    }

    let mut columns = Vec::with_capacity(names.len());
    for name in &names {
        let values: Vec<&Value> = records
            .iter()
            .map(|record| record.get(name).unwrap_or(&Value::Null))
            .collect();
        columns.push(build_column(name, &values));
    }
    Ok(DataFrame::new(columns)?)
}

fn build_column(name: &str, values: &[&Value]) -> Column {
    let kind = values
        .iter()
        .fold(ColumnKind::Empty, |kind, value| kind.widen(value));
    let name = PlSmallStr::from(name);
    match kind {
        ColumnKind::Boolean => {
            let data: Vec<Option<bool>> = values.iter().map(|v| v.as_bool()).collect();
            Series::new(name, data).into_column()
        }
        ColumnKind::Integer => {
            let data: Vec<Option<i64>> = values.iter().map(|v| v.as_i64()).collect();
            Series::new(name, data).into_column()
        }
        ColumnKind::Float => {
            let data: Vec<Option<f64>> = values.iter().map(|v| v.as_f64()).collect();
            Series::new(name, data).into_column()
        }
        ColumnKind::Empty | ColumnKind::Text => {
            let data: Vec<Option<String>> = values.iter().map(|v| value_text(v)).collect();
            Series::new(name, data).into_column()
        }
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
