// Observation scope - named value slots with change versioning
use crate::error::{ConveyError, Result};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;

/// The observation context bindings evaluate against.
///
/// Each root key carries a version that is bumped on every write; the
/// binding engine snapshots versions per binding and recomputes only
/// bindings whose observed roots moved. Dotted paths traverse into objects
/// by field name and into arrays by index.
#[derive(Debug, Default)]
pub struct Scope {
    values: IndexMap<String, Value>,
    versions: HashMap<String, u64>,
}

impl Scope {
    /// Create a new empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scope from a JSON object, one root key per field
    pub fn from_object(object: Value) -> Result<Self> {
        let Value::Object(map) = object else {
            return Err(ConveyError::invalid_config(
                "scope context must be a JSON object",
            ));
        };

        let mut scope = Self::new();
        for (key, value) in map {
            scope.set(key, value);
        }
        Ok(scope)
    }

    /// Set a root value, bumping its version
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        *self.versions.entry(key.clone()).or_insert(0) += 1;
        self.values.insert(key, value);
    }

    /// Get a root value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Current version of a root key; 0 if it was never written
    pub fn version(&self, key: &str) -> u64 {
        self.versions.get(key).copied().unwrap_or(0)
    }

    /// Resolve a dotted path to a value
    pub fn resolve_path(&self, segments: &[String]) -> Result<Value> {
        let Some((root, rest)) = segments.split_first() else {
            return Err(ConveyError::expr("empty path"));
        };

        let mut current = self
            .values
            .get(root)
            .ok_or_else(|| ConveyError::expr(format!("'{root}' is not in scope")))?;

        for segment in rest {
            current = index_into(current, segment)
                .ok_or_else(|| path_error(segments, segment))?;
        }

        Ok(current.clone())
    }

    /// Assign a value at a dotted path, bumping the root's version.
    ///
    /// The root slot is created if absent; intermediate segments must
    /// already exist and be containers.
    pub fn set_path(&mut self, segments: &[String], value: Value) -> Result<()> {
        let Some((root, rest)) = segments.split_first() else {
            return Err(ConveyError::expr("empty path"));
        };

        let [mids @ .., last] = rest else {
            self.set(root.clone(), value);
            return Ok(());
        };

        *self.versions.entry(root.clone()).or_insert(0) += 1;

        let mut current = self
            .values
            .get_mut(root)
            .ok_or_else(|| ConveyError::expr(format!("'{root}' is not in scope")))?;
        for segment in mids {
            current = index_into_mut(current, segment)
                .ok_or_else(|| path_error(segments, segment))?;
        }

        match current {
            Value::Object(map) => {
                map.insert(last.clone(), value);
                Ok(())
            }
            Value::Array(items) => {
                let idx: usize = last
                    .parse()
                    .map_err(|_| path_error(segments, last))?;
                let slot = items
                    .get_mut(idx)
                    .ok_or_else(|| path_error(segments, last))?;
                *slot = value;
                Ok(())
            }
            _ => Err(path_error(segments, last)),
        }
    }

    /// Root keys currently in scope, in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

fn index_into<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => items.get(segment.parse::<usize>().ok()?),
        _ => None,
    }
}

fn index_into_mut<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => {
            let idx = segment.parse::<usize>().ok()?;
            items.get_mut(idx)
        }
        _ => None,
    }
}

fn path_error(segments: &[String], segment: &str) -> ConveyError {
    ConveyError::expr(format!(
        "cannot resolve '{}' in path '{}'",
        segment,
        segments.join(".")
    ))
}
