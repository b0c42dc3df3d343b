use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;

use crate::state::data_model::RowSet;

#[derive(Debug, thiserror::Error)]
pub enum RowSourceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("JSON root is not an array")]
    NotAnArray,
    #[error("JSON array contains non-object elements")]
    NotArrayOfObjects,
}

pub fn load_rows(path: &Path) -> Result<RowSet, RowSourceError> {
    let content = fs::read_to_string(path)?;
    parse_rows(&content)
}

/// Accepts a bare array of objects or an endpoint envelope `{ "data": [...] }`.
pub fn parse_rows(content: &str) -> Result<RowSet, RowSourceError> {
    let value: Value = serde_json::from_str(content)?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => return Err(RowSourceError::NotAnArray),
        },
        _ => return Err(RowSourceError::NotAnArray),
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(map.into_iter().collect()),
            _ => Err(RowSourceError::NotArrayOfObjects),
        })
        .collect()
}
