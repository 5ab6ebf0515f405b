//! Dataset trait for loading and saving data held in files.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::Result;

/// Read-only snapshot of a dataset's configuration, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Description(BTreeMap<String, Value>);

impl Description {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Description {
    /// Renders `key=value` pairs, comma separated, skipping nulls.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.0 {
            if value.is_null() {
                continue;
            }
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            match value {
                Value::String(s) => write!(f, "{}={}", key, s)?,
                other => write!(f, "{}={}", key, other)?,
            }
        }
        Ok(())
    }
}

/// Trait for datasets a catalog can load from and save to.
///
/// Implementations perform one blocking read or write per call and keep no
/// state between calls.
pub trait Dataset: Send + Sync {
    type Data;

    fn load(&self) -> Result<Self::Data>;
    fn save(&self, data: &Self::Data) -> Result<()>;

    /// Checks whether there is something to load, without reading it.
    fn exists(&self) -> Result<bool>;

    /// Describes the dataset configuration. Must not touch the filesystem.
    fn describe(&self) -> Description;
}
