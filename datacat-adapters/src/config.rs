//! Catalog entry configuration for YAML datasets.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use datacat_core::version::Version;

/// Configuration for a YAML dataset, as written in a catalog entry.
///
/// ```yaml
/// filepath: data/01_raw/params.yml
/// save_args:
///   flow_style: block
/// version:
///   load: 2020-01-01T00.00.00.000Z
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YamlDatasetConfig {
    /// Path to the YAML file.
    pub filepath: PathBuf,
    /// Serializer arguments, merged over the defaults.
    #[serde(default)]
    pub save_args: Mapping,
    /// Versioning policy; `None` for an unversioned dataset.
    #[serde(default)]
    pub version: Option<Version>,
}

impl YamlDatasetConfig {
    /// Creates a configuration for an unversioned file with default save args.
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            filepath: filepath.into(),
            save_args: Mapping::new(),
            version: None,
        }
    }

    /// Replaces all save args.
    pub fn with_save_args(mut self, save_args: Mapping) -> Self {
        self.save_args = save_args;
        self
    }

    /// Sets a single save arg.
    pub fn with_save_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.save_args
            .insert(Value::String(key.into()), value.into());
        self
    }

    /// Sets the versioning policy.
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_entry() {
        let yaml = r#"
filepath: data/params.yml
save_args:
  flow_style: flow
version:
  load: "2020-01-01"
"#;

        let config: YamlDatasetConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.filepath, PathBuf::from("data/params.yml"));
        assert_eq!(config.save_args.len(), 1);
        let version = config.version.unwrap();
        assert_eq!(version.load.as_deref(), Some("2020-01-01"));
        assert!(version.save.is_none());
    }

    #[test]
    fn test_parse_defaults() {
        let config: YamlDatasetConfig = serde_yaml::from_str("filepath: a.yml").unwrap();
        assert!(config.save_args.is_empty());
        assert!(config.version.is_none());
    }

    #[test]
    fn test_builder() {
        let config = YamlDatasetConfig::new("a.yml")
            .with_save_arg("sort_keys", true)
            .with_version(Version::pinned("v1"));
        assert_eq!(config.save_args.len(), 1);
        assert_eq!(config.version, Some(Version::pinned("v1")));
    }
}
