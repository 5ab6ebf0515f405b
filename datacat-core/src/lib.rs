//! Core library for Datacat datasets.

pub mod dataset;
pub mod error;
pub mod path;
pub mod version;

pub use dataset::{Dataset, Description};
pub use error::{Error, Result};
pub use path::DatasetPath;
pub use version::{LocalFileResolver, Version, VersionedFileResolver};
