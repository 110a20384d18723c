//! Load one result artifact into a [`Frame`] and stamp its run metadata.
//!
//! Accepted JSON layouts:
//!
//! * records: `[{"acc": 0.9, "split": "test"}, ...]`
//! * columns keyed by row: `{"acc": {"0": 0.9, "1": 0.8}}`
//! * column lists: `{"acc": [0.9, 0.8]}`
//!
//! Cells must be scalars. Anything else fails the whole run.

use std::path::Path;

use serde_json::{Map, Value as Json};

use crate::convention::RunMetadata;
use crate::error::{AggregateError, Result};
use crate::table::{Frame, Value};

type Row = Vec<(String, Value)>;

/// Read `path` and append `meta` as constant columns.
///
/// Metadata columns overwrite same-named data columns.
pub fn load(path: &Path, meta: &RunMetadata) -> Result<Frame> {
    let text = std::fs::read_to_string(path).map_err(|source| AggregateError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let json: Json = serde_json::from_str(&text).map_err(|e| malformed(path, e.to_string()))?;

    let rows = match json {
        Json::Array(items) => records(items).map_err(|r| malformed(path, r))?,
        Json::Object(map) => columns(map).map_err(|r| malformed(path, r))?,
        other => {
            return Err(malformed(
                path,
                format!("expected an array or object at top level, found {}", kind(&other)),
            ))
        }
    };

    let mut frame = Frame::from_rows(rows);
    for (name, value) in meta.columns() {
        frame.set_constant(name, Value::Text(value.to_string()));
    }
    Ok(frame)
}

fn malformed(path: &Path, reason: String) -> AggregateError {
    AggregateError::MalformedArtifact {
        path: path.to_path_buf(),
        reason,
    }
}

fn records(items: Vec<Json>) -> std::result::Result<Vec<Row>, String> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Json::Object(fields) => fields
                .into_iter()
                .map(|(k, v)| cell(&v).map(|c| (k.clone(), c)).ok_or_else(|| nested(&k, &v)))
                .collect(),
            other => Err(format!("record {i} is {}, expected an object", kind(&other))),
        })
        .collect()
}

fn columns(map: Map<String, Json>) -> std::result::Result<Vec<Row>, String> {
    if map.values().all(Json::is_object) {
        return keyed_columns(map);
    }
    if map.values().all(Json::is_array) {
        return list_columns(map);
    }
    Err("object values must be all objects (keyed by row) or all arrays (column lists)".into())
}

fn keyed_columns(map: Map<String, Json>) -> std::result::Result<Vec<Row>, String> {
    let mut keys: Vec<String> = Vec::new();
    let mut rows: Vec<Row> = Vec::new();
    for (column, values) in map {
        let Json::Object(values) = values else {
            continue;
        };
        for (key, v) in values {
            let c = cell(&v).ok_or_else(|| nested(&column, &v))?;
            let idx = match keys.iter().position(|k| *k == key) {
                Some(idx) => idx,
                None => {
                    keys.push(key);
                    rows.push(Vec::new());
                    keys.len() - 1
                }
            };
            rows[idx].push((column.clone(), c));
        }
    }
    Ok(rows)
}

fn list_columns(map: Map<String, Json>) -> std::result::Result<Vec<Row>, String> {
    let mut len: Option<usize> = None;
    let mut rows: Vec<Row> = Vec::new();
    for (column, values) in map {
        let Json::Array(values) = values else {
            continue;
        };
        match len {
            None => {
                len = Some(values.len());
                rows = vec![Vec::new(); values.len()];
            }
            Some(n) if n != values.len() => {
                return Err(format!(
                    "column '{column}' has {} values, expected {n}",
                    values.len()
                ))
            }
            Some(_) => {}
        }
        for (row, v) in rows.iter_mut().zip(values) {
            let c = cell(&v).ok_or_else(|| nested(&column, &v))?;
            row.push((column.clone(), c));
        }
    }
    Ok(rows)
}

fn cell(v: &Json) -> Option<Value> {
    Value::from_json(v)
}

fn nested(column: &str, v: &Json) -> String {
    format!("column '{column}' holds {}, expected a scalar", kind(v))
}

fn kind(v: &Json) -> &'static str {
    match v {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}
