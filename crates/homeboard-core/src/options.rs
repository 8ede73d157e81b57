//! # Options Module
//!
//! Item options are arbitrary JSON objects, stored as flat rows:
//!
//! ```text
//! path                 kind     value
//! location.name        string   "Paris"
//! location.latitude    number   48.85
//! showSeconds          boolean  true
//! ```
//!
//! [`map_options`] folds those rows back into one nested object and
//! [`flatten_options`] produces them from an object. Paths use `.` as the
//! separator, so object keys may not contain a dot.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON shape of a stored option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    String,
    Number,
    Boolean,
    Null,
    Array,
    /// Marker for an empty object; non-empty objects are never stored.
    Object,
}

impl OptionKind {
    /// The kind of a JSON value.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Null => Self::Null,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

/// A flat option row without storage ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    pub path: String,
    pub kind: OptionKind,
    /// JSON text of the value.
    pub value: String,
}

impl OptionEntry {
    /// Build an entry from a path and a JSON value.
    pub fn from_value(path: impl Into<String>, value: &Value) -> Result<Self> {
        let path = path.into();
        let text = serde_json::to_string(value).map_err(|e| CoreError::InvalidOptionValue {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            path,
            kind: OptionKind::of(value),
            value: text,
        })
    }
}

impl From<&crate::OptionRow> for OptionEntry {
    fn from(row: &crate::OptionRow) -> Self {
        Self {
            path: row.path.clone(),
            kind: row.kind,
            value: row.value.clone(),
        }
    }
}

fn split_path(path: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(CoreError::InvalidPath(path.to_string()));
    }
    Ok(segments)
}

/// Set `value` at the dotted `path` inside `target`.
///
/// Missing intermediate objects are created. Walking through a non-object,
/// or replacing an object with a non-object, is a [`CoreError::PathConflict`].
/// An empty object assigned onto an existing object leaves it untouched.
pub fn add_at_path(target: &mut Map<String, Value>, path: &str, value: Value) -> Result<()> {
    let segments = split_path(path)?;
    let Some((last, parents)) = segments.split_last() else {
        return Err(CoreError::InvalidPath(path.to_string()));
    };

    let mut current = target;
    for (depth, segment) in parents.iter().enumerate() {
        let slot = current
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match slot {
            Value::Object(map) => map,
            _ => return Err(CoreError::PathConflict(parents[..=depth].join("."))),
        };
    }

    let existing_is_object = matches!(current.get(*last), Some(Value::Object(_)));
    match value {
        Value::Object(ref incoming) if existing_is_object && incoming.is_empty() => Ok(()),
        _ if existing_is_object => Err(CoreError::PathConflict(path.to_string())),
        value => {
            current.insert((*last).to_string(), value);
            Ok(())
        }
    }
}

/// Parse an option's JSON text and check it matches the declared kind.
pub fn decode_value(path: &str, kind: OptionKind, text: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(text).map_err(|e| CoreError::InvalidOptionValue {
        path: path.to_string(),
        reason: e.to_string(),
    })?;

    let actual = OptionKind::of(&value);
    if actual != kind {
        return Err(CoreError::InvalidOptionValue {
            path: path.to_string(),
            reason: format!("declared {:?}, found {:?}", kind, actual),
        });
    }
    if let Value::Object(map) = &value
        && !map.is_empty()
    {
        return Err(CoreError::InvalidOptionValue {
            path: path.to_string(),
            reason: "object markers must be empty".to_string(),
        });
    }
    Ok(value)
}

/// Rebuild a nested options object from flat rows.
///
/// Rows are applied in path order, so an object marker always lands before
/// its children and the result does not depend on storage order.
pub fn map_options(entries: &[OptionEntry]) -> Result<Map<String, Value>> {
    let mut sorted: Vec<&OptionEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    let mut options = Map::new();
    for entry in sorted {
        let value = decode_value(&entry.path, entry.kind, &entry.value)?;
        add_at_path(&mut options, &entry.path, value)?;
    }
    Ok(options)
}

/// Flatten an options object into rows.
pub fn flatten_options(options: &Map<String, Value>) -> Result<Vec<OptionEntry>> {
    let mut entries = Vec::new();
    flatten_into(options, "", &mut entries)?;
    Ok(entries)
}

fn flatten_into(options: &Map<String, Value>, prefix: &str, out: &mut Vec<OptionEntry>) -> Result<()> {
    for (key, value) in options {
        if key.is_empty() || key.contains('.') {
            return Err(CoreError::InvalidPath(format!("{prefix}{key}")));
        }
        let path = format!("{prefix}{key}");
        match value {
            Value::Object(nested) if !nested.is_empty() => {
                flatten_into(nested, &format!("{path}."), out)?;
            }
            other => out.push(OptionEntry::from_value(path, other)?),
        }
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
