//! Serializer options for YAML datasets.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use datacat_core::error::{Error, Result};

/// How collections are rendered on save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowStyle {
    /// Multi-line, indented collections.
    #[default]
    Block,
    /// Inline collections on a single line, e.g. `{a: [1, 2]}`.
    Flow,
}

impl FlowStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowStyle::Block => "block",
            FlowStyle::Flow => "flow",
        }
    }
}

/// Accepts `block`/`flow` or a boolean, where `true` means flow.
impl<'de> Deserialize<'de> for FlowStyle {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flag(bool),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Flag(true) => Ok(FlowStyle::Flow),
            Repr::Flag(false) => Ok(FlowStyle::Block),
            Repr::Name(name) => match name.to_lowercase().as_str() {
                "block" => Ok(FlowStyle::Block),
                "flow" | "inline" => Ok(FlowStyle::Flow),
                other => Err(de::Error::custom(format!(
                    "unknown flow_style '{}', expected 'block' or 'flow'",
                    other
                ))),
            },
        }
    }
}

/// Effective serializer settings for a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SaveOptions {
    pub flow_style: FlowStyle,
    /// Sort mapping keys recursively before writing.
    pub sort_keys: bool,
    /// Start the document with `---`.
    pub explicit_start: bool,
    /// End the document with `...`.
    pub explicit_end: bool,
}

/// Options applied when the caller does not override them.
pub fn default_save_args() -> Mapping {
    let mut args = Mapping::new();
    args.insert(
        Value::String("flow_style".to_string()),
        Value::String(FlowStyle::Block.as_str().to_string()),
    );
    args
}

impl SaveOptions {
    /// Merges caller arguments over [`default_save_args`]; caller keys win.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for non-string keys, unknown keys, or
    /// values of the wrong type.
    pub fn merged(overrides: &Mapping) -> Result<Self> {
        let mut args = default_save_args();
        for (key, value) in overrides {
            if !key.is_string() {
                return Err(Error::Configuration(format!(
                    "save_args keys must be strings, got {:?}",
                    key
                )));
            }
            args.insert(key.clone(), value.clone());
        }

        serde_yaml::from_value(Value::Mapping(args))
            .map_err(|e| Error::Configuration(format!("Invalid save_args: {}", e)))
    }

    pub fn with_flow_style(mut self, flow_style: FlowStyle) -> Self {
        self.flow_style = flow_style;
        self
    }

    pub fn with_sort_keys(mut self, sort_keys: bool) -> Self {
        self.sort_keys = sort_keys;
        self
    }

    pub fn with_explicit_start(mut self, explicit_start: bool) -> Self {
        self.explicit_start = explicit_start;
        self
    }

    pub fn with_explicit_end(mut self, explicit_end: bool) -> Self {
        self.explicit_end = explicit_end;
        self
    }
}
