//! Versioning policy and the resolver contract that turns it into paths.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path::DatasetPath;

/// Which copy of a dataset to read and which to write.
///
/// A `None` side means "let the resolver decide": the latest copy on load,
/// an autogenerated one on save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Version {
    pub load: Option<String>,
    pub save: Option<String>,
}

impl Version {
    pub fn new(load: Option<String>, save: Option<String>) -> Self {
        Self { load, save }
    }

    /// Pins both sides to the same version.
    pub fn pinned(version: impl Into<String>) -> Self {
        let version = version.into();
        Self {
            load: Some(version.clone()),
            save: Some(version),
        }
    }

    /// Checks that every pinned version is usable as a single path component.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for empty pins, `.`/`..`, or pins
    /// containing a path separator.
    pub fn validate(&self) -> Result<()> {
        for (side, pin) in [("load", &self.load), ("save", &self.save)] {
            let Some(pin) = pin else { continue };
            if pin.is_empty() || pin == "." || pin == ".." {
                return Err(Error::Configuration(format!(
                    "Invalid {} version: {:?}",
                    side, pin
                )));
            }
            if pin.contains('/') || pin.contains('\\') || pin.contains('\0') {
                return Err(Error::Configuration(format!(
                    "{} version must be a single path component: {:?}",
                    side, pin
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |pin: &Option<String>| match pin {
            Some(pin) => format!("'{}'", pin),
            None => "None".to_string(),
        };
        write!(
            f,
            "Version(load={}, save={})",
            side(&self.load),
            side(&self.save)
        )
    }
}

/// Resolves the concrete files a dataset reads from and writes to.
///
/// Resolvers own the versioning scheme. Datasets call them once per
/// operation and never cache the result.
pub trait VersionedFileResolver: Send + Sync {
    /// Path to read on `load` and check on `exists`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoVersionAvailable`] when no version can be chosen.
    fn resolve_load_path(&self) -> Result<PathBuf>;

    /// Path to write on `save`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoVersionAvailable`] when no version can be chosen.
    fn resolve_save_path(&self) -> Result<PathBuf>;
}

/// Resolver for unversioned files and explicitly pinned versions.
///
/// Without a version, both operations use the dataset path itself. With a
/// version, a pinned side resolves to `<path>/<version>/<file name>`. An
/// unpinned side yields [`Error::NoVersionAvailable`]; picking the latest
/// copy or generating a fresh one requires a framework resolver.
#[derive(Debug, Clone)]
pub struct LocalFileResolver {
    path: DatasetPath,
    version: Option<Version>,
}

impl LocalFileResolver {
    pub fn new(path: DatasetPath, version: Option<Version>) -> Self {
        Self { path, version }
    }

    fn versioned_path(&self, version: &str) -> PathBuf {
        self.path.as_path().join(version).join(self.path.file_name())
    }

    fn resolve(&self, side: &str, pin: impl Fn(&Version) -> Option<&String>) -> Result<PathBuf> {
        let Some(version) = &self.version else {
            return Ok(self.path.as_path().to_path_buf());
        };

        match pin(version) {
            Some(pin) => Ok(self.versioned_path(pin)),
            None => Err(Error::NoVersionAvailable {
                path: self.path.as_path().to_path_buf(),
                message: format!("no {} version pinned", side),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }
}

impl VersionedFileResolver for LocalFileResolver {
    fn resolve_load_path(&self) -> Result<PathBuf> {
        self.resolve("load", |v| v.load.as_ref())
    }

    fn resolve_save_path(&self) -> Result<PathBuf> {
        self.resolve("save", |v| v.save.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let version = Version::new(None, Some("2020-01-01T00.00.00.000Z".to_string()));
        assert_eq!(
            version.to_string(),
            "Version(load=None, save='2020-01-01T00.00.00.000Z')"
        );
    }

    #[test]
    fn test_validate_rejects_separators() {
        assert!(Version::pinned("v1").validate().is_ok());
        assert!(Version::pinned("a/b").validate().is_err());
        assert!(Version::pinned("..").validate().is_err());
        assert!(Version::new(Some(String::new()), None).validate().is_err());
    }
}
