//! Error types and result aliases.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dataset configuration: {0}")]
    Configuration(String),

    #[error("Dataset file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize payload: {0}")]
    Serialization(String),

    #[error("No version available for {}: {message}", path.display())]
    NoVersionAvailable { path: PathBuf, message: String },
}

impl Error {
    /// Returns `true` when the load target does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Returns `true` when the resolver could not pick a version.
    pub fn is_no_version_available(&self) -> bool {
        matches!(self, Error::NoVersionAvailable { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
