//! Record flattening
//!
//! Turns one nested extension record into one row aligned with a
//! [`FieldSpec`] schema. Missing or mistyped fields yield `None`; flattening
//! never fails.

use crate::export::schema::{Extraction, FieldSpec, Normalization};
use serde_json::Value;

/// One flattened record: a value (or nothing) per schema column
pub type FlatRow = Vec<Option<Value>>;

/// Flattens a record against a schema
///
/// The returned row always has exactly `schema.len()` entries.
pub fn flatten(record: &Value, schema: &[FieldSpec]) -> FlatRow {
    schema
        .iter()
        .map(|field| {
            let value = match field.extraction {
                Extraction::Path(keys) => resolve_path(record, keys),
                Extraction::Statistic(name) => lookup_statistic(record, name),
            };
            value.map(|v| normalize(v, field.normalization))
        })
        .collect()
}

/// Follows `keys` from the record root; any missing step or non-object yields `None`
fn resolve_path<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let mut current = record;
    for key in keys {
        current = current.as_object()?.get(*key)?;
    }
    (!current.is_null()).then_some(current)
}

/// Value of the first `statistics` entry named `name`
fn lookup_statistic<'a>(record: &'a Value, name: &str) -> Option<&'a Value> {
    record
        .get("statistics")?
        .as_array()?
        .iter()
        .find(|stat| stat.get("statisticName").and_then(Value::as_str) == Some(name))?
        .get("value")
        .filter(|value| !value.is_null())
}

fn normalize(value: &Value, normalization: Normalization) -> Value {
    match (normalization, value) {
        (Normalization::DatePrefix, Value::String(timestamp)) => {
            let date = timestamp.split('T').next().unwrap_or_default();
            Value::String(date.to_string())
        }
        _ => value.clone(),
    }
}

/// Text form of a cell for the delimited table
///
/// Absent values are empty; strings are written raw; numbers and booleans
/// use their JSON spelling; lists and objects are written as compact JSON.
pub fn cell_text(cell: &Option<Value>) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
