//! Validated dataset paths.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The abstract location of a dataset file.
///
/// A `DatasetPath` always names a file: it is non-empty, has a final
/// file-name component and carries no NUL bytes. Whether the file exists is
/// not checked here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PathBuf", into = "PathBuf")]
pub struct DatasetPath(PathBuf);

impl DatasetPath {
    /// Validates and wraps a file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the path is empty, ends in a
    /// separator, has no file name (`.`, `..`, `/`) or contains a NUL byte.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = path.to_string_lossy();

        if raw.trim().is_empty() {
            return Err(Error::Configuration(
                "Dataset path cannot be empty".to_string(),
            ));
        }

        if raw.contains('\0') {
            return Err(Error::Configuration(format!(
                "Dataset path contains a null byte: {:?}",
                raw
            )));
        }

        if raw.ends_with('/') || raw.ends_with(std::path::MAIN_SEPARATOR) {
            return Err(Error::Configuration(format!(
                "Dataset path must name a file, not a directory: {}",
                raw
            )));
        }

        if path.file_name().is_none() {
            return Err(Error::Configuration(format!(
                "Dataset path has no file name: {}",
                raw
            )));
        }

        Ok(Self(path.to_path_buf()))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Final component of the path.
    pub fn file_name(&self) -> &OsStr {
        // Checked in `new`.
        self.0.file_name().unwrap_or_default()
    }
}

impl AsRef<Path> for DatasetPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for DatasetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl TryFrom<PathBuf> for DatasetPath {
    type Error = Error;

    fn try_from(path: PathBuf) -> Result<Self> {
        Self::new(path)
    }
}

impl From<DatasetPath> for PathBuf {
    fn from(path: DatasetPath) -> Self {
        path.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_relative_file() {
        let path = DatasetPath::new("out/config.yml").unwrap();
        assert_eq!(path.as_path(), Path::new("out/config.yml"));
        assert_eq!(path.file_name(), "config.yml");
    }

    #[test]
    fn test_rejects_directory_like_paths() {
        assert!(DatasetPath::new("").is_err());
        assert!(DatasetPath::new("   ").is_err());
        assert!(DatasetPath::new("out/").is_err());
        assert!(DatasetPath::new("..").is_err());
        assert!(DatasetPath::new("/").is_err());
    }

    #[test]
    fn test_rejects_null_bytes() {
        let err = DatasetPath::new("out/con\0fig.yml").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
