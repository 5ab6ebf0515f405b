//! Local YAML file dataset.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use datacat_core::dataset::{Dataset, Description};
use datacat_core::error::{Error, Result};
use datacat_core::path::DatasetPath;
use datacat_core::version::{LocalFileResolver, Version, VersionedFileResolver};

use crate::codec::{Codec, SafeYamlCodec};
use crate::config::YamlDatasetConfig;
use crate::options::SaveOptions;

/// Loads and saves a YAML document to a local file.
///
/// The payload is any YAML value, typically a mapping:
///
/// ```no_run
/// use datacat_adapters::YamlDataset;
/// use datacat_core::Dataset;
///
/// let dataset = YamlDataset::new("out/config.yml", None, None)?;
/// let payload: serde_yaml::Value =
///     serde_yaml::from_str("a_string: Hello, World!\na_list: [1, 2, 3]")?;
/// dataset.save(&payload)?;
/// assert_eq!(dataset.load()?, payload);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct YamlDataset {
    path: DatasetPath,
    save_options: SaveOptions,
    version: Option<Version>,
    resolver: Box<dyn VersionedFileResolver>,
    codec: Box<dyn Codec>,
}

impl YamlDataset {
    pub const NAME: &'static str = "YamlDataset";

    /// Creates a dataset pointing at `filepath`.
    ///
    /// `save_args` are merged over `{flow_style: block}`. With a `version`,
    /// reads and writes go through `<filepath>/<version>/<file name>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the path, save args or version pins
    /// are invalid.
    pub fn new(
        filepath: impl AsRef<Path>,
        save_args: Option<&Mapping>,
        version: Option<Version>,
    ) -> Result<Self> {
        warn!(
            dataset = Self::NAME,
            "{} is deprecated and will be removed in a future release",
            Self::NAME
        );

        let path = DatasetPath::new(filepath)?;
        let save_options = match save_args {
            Some(args) => SaveOptions::merged(args)?,
            None => SaveOptions::merged(&Mapping::new())?,
        };
        if let Some(version) = &version {
            version.validate()?;
        }

        let resolver = LocalFileResolver::new(path.clone(), version.clone());

        Ok(Self {
            path,
            save_options,
            version,
            resolver: Box::new(resolver),
            codec: Box::new(SafeYamlCodec),
        })
    }

    /// Creates a dataset from a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: YamlDatasetConfig) -> Result<Self> {
        Self::new(&config.filepath, Some(&config.save_args), config.version)
    }

    /// Replaces the path resolver, e.g. with a framework-provided one that
    /// understands "latest" and autogenerated versions.
    pub fn with_resolver(mut self, resolver: impl VersionedFileResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn with_codec(mut self, codec: impl Codec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    pub fn save_options(&self) -> &SaveOptions {
        &self.save_options
    }

    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    /// Loads the document and deserializes it into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the document does not match `T`, plus any
    /// error [`Dataset::load`] returns.
    pub fn load_as<T: DeserializeOwned>(&self) -> Result<T> {
        let (load_path, value) = self.load_resolved()?;
        serde_yaml::from_value(value).map_err(|e| Error::Parse {
            path: load_path,
            message: e.to_string(),
        })
    }

    /// Serializes `data` into a YAML value and saves it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if `data` cannot be represented as
    /// YAML, plus any error [`Dataset::save`] returns.
    pub fn save_from<T: Serialize + ?Sized>(&self, data: &T) -> Result<()> {
        let value =
            serde_yaml::to_value(data).map_err(|e| Error::Serialization(e.to_string()))?;
        self.save(&value)
    }

    /// Loads the document along with the path it was read from.
    fn load_resolved(&self) -> Result<(PathBuf, Value)> {
        let load_path = self.resolver.resolve_load_path()?;
        debug!(path = %load_path.display(), "Loading YAML dataset");

        let file = File::open(&load_path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::NotFound {
                path: load_path.clone(),
            },
            _ => Error::Io(e),
        })?;
        let mut reader = BufReader::new(file);

        match self.codec.parse(&mut reader) {
            Ok(value) => Ok((load_path, value)),
            Err(e) => Err(e.into_error(&load_path)),
        }
    }
}

fn write_error(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
    move |source| Error::Write {
        path: path.to_path_buf(),
        source,
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error(path))?;
    }
    Ok(())
}

impl Dataset for YamlDataset {
    type Data = Value;

    fn load(&self) -> Result<Value> {
        self.load_resolved().map(|(_, value)| value)
    }

    fn save(&self, data: &Value) -> Result<()> {
        let save_path: PathBuf = self.resolver.resolve_save_path()?;

        // Render before the target file is touched.
        let text = self
            .codec
            .serialize(data, &self.save_options)
            .map_err(|e| e.into_error(&save_path))?;

        ensure_parent_dir(&save_path)?;
        let mut file = File::create(&save_path).map_err(write_error(&save_path))?;
        file.write_all(text.as_bytes())
            .map_err(write_error(&save_path))?;

        debug!(path = %save_path.display(), bytes = text.len(), "Saved YAML dataset");
        Ok(())
    }

    fn exists(&self) -> Result<bool> {
        let load_path = match self.resolver.resolve_load_path() {
            Ok(path) => path,
            Err(e) if e.is_no_version_available() => {
                debug!(path = %self.path, "No version available, dataset does not exist");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        Ok(load_path.is_file())
    }

    fn describe(&self) -> Description {
        let save_args =
            serde_json::to_value(&self.save_options).unwrap_or(serde_json::Value::Null);

        Description::new()
            .with("filepath", self.path.to_string())
            .with("save_args", save_args)
            .with("version", self.version.as_ref().map(|v| v.to_string()))
    }
}

impl fmt::Display for YamlDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", Self::NAME, self.describe())
    }
}

impl fmt::Debug for YamlDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YamlDataset")
            .field("path", &self.path)
            .field("save_options", &self.save_options)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
