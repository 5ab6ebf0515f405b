use std::path::{Path, PathBuf};

use datacat_core::path::DatasetPath;
use datacat_core::version::{LocalFileResolver, Version, VersionedFileResolver};
use datacat_core::Error;

fn resolver(version: Option<Version>) -> LocalFileResolver {
    LocalFileResolver::new(DatasetPath::new("data/params.yml").unwrap(), version)
}

#[test]
fn test_unversioned_uses_path_for_both_sides() {
    let resolver = resolver(None);
    assert_eq!(resolver.path(), Path::new("data/params.yml"));
    assert_eq!(
        resolver.resolve_load_path().unwrap(),
        PathBuf::from("data/params.yml")
    );
    assert_eq!(
        resolver.resolve_save_path().unwrap(),
        PathBuf::from("data/params.yml")
    );
}

#[test]
fn test_pinned_version_layout() {
    let resolver = resolver(Some(Version::new(
        Some("2020-01-01T00.00.00.000Z".to_string()),
        Some("2020-02-01T00.00.00.000Z".to_string()),
    )));

    assert_eq!(
        resolver.resolve_load_path().unwrap(),
        PathBuf::from("data/params.yml/2020-01-01T00.00.00.000Z/params.yml")
    );
    assert_eq!(
        resolver.resolve_save_path().unwrap(),
        PathBuf::from("data/params.yml/2020-02-01T00.00.00.000Z/params.yml")
    );
}

#[test]
fn test_unpinned_side_has_no_version() {
    let resolver = resolver(Some(Version::new(Some("v1".to_string()), None)));

    assert!(resolver.resolve_load_path().is_ok());
    let err = resolver.resolve_save_path().unwrap_err();
    assert!(err.is_no_version_available());
    assert!(matches!(err, Error::NoVersionAvailable { .. }));
}

#[test]
fn test_default_version_resolves_nothing() {
    let resolver = resolver(Some(Version::default()));
    assert!(resolver.resolve_load_path().unwrap_err().is_no_version_available());
    assert!(resolver.resolve_save_path().unwrap_err().is_no_version_available());
}

#[test]
fn test_version_deserialize_partial() {
    let version: Version = serde_json::from_str(r#"{"load": "v3"}"#).unwrap();
    assert_eq!(version.load.as_deref(), Some("v3"));
    assert_eq!(version.save, None);
}
