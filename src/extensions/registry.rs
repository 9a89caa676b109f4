//! Extension manifest scanning.

use std::fs;
use std::path::Path;

use tracing::{debug, error, warn};

use crate::common::error::ExtensionError;

/// File extension marking an eligible manifest entry (`ping.ext`).
pub const EXTENSION_FILE_SUFFIX: &str = "ext";

/// Prefix of every extension identifier (`extensions.ping`).
pub const IDENTIFIER_PREFIX: &str = "extensions";

/// Build the extension manifest from `directory`.
///
/// Returns one identifier per `*.ext` file in directory-listing order.
/// A missing directory is created and yields an empty manifest. Enumeration
/// errors are logged and whatever was collected so far is returned.
pub fn scan(directory: impl AsRef<Path>) -> Vec<String> {
    let directory = directory.as_ref();
    let mut manifest = Vec::new();

    if let Err(e) = scan_into(directory, &mut manifest) {
        match e {
            ExtensionError::DirectoryMissing { .. } => warn!("{}", e),
            e => error!("Failed to scan extensions: {}", e),
        }
    }

    debug!("Extension manifest: {:?}", manifest);
    manifest
}

fn scan_into(directory: &Path, manifest: &mut Vec<String>) -> Result<(), ExtensionError> {
    let enumeration_error = |e| ExtensionError::Enumeration {
        path: directory.display().to_string(),
        source: e,
    };

    if !directory.exists() {
        fs::create_dir_all(directory).map_err(enumeration_error)?;
        return Err(ExtensionError::DirectoryMissing {
            path: directory.display().to_string(),
        });
    }

    for entry in fs::read_dir(directory).map_err(enumeration_error)? {
        let entry = entry.map_err(enumeration_error)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(id) = identifier_for(&path) {
            manifest.push(id);
        }
    }

    Ok(())
}

/// Map `extensions/ping.ext` to `extensions.ping`; other files map to `None`.
fn identifier_for(path: &Path) -> Option<String> {
    if path.extension()? != EXTENSION_FILE_SUFFIX {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    Some(format!("{}.{}", IDENTIFIER_PREFIX, stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_ignores_non_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.ext", "b.ext", "notes.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let mut manifest = scan(dir.path());
        manifest.sort();

        assert_eq!(manifest, vec!["extensions.a", "extensions.b"]);
    }

    #[test]
    fn test_scan_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("extensions");

        assert!(scan(&missing).is_empty());
        assert!(missing.is_dir());
    }

    #[test]
    fn test_scan_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested.ext")).unwrap();
        fs::write(dir.path().join("ping.ext"), "").unwrap();

        assert_eq!(scan(dir.path()), vec!["extensions.ping"]);
    }

    #[test]
    fn test_scan_of_regular_file_is_logged_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("extensions");
        fs::write(&file, "not a directory").unwrap();

        assert!(scan(&file).is_empty());
        assert!(file.is_file());
        assert_eq!(fs::read_to_string(&file).unwrap(), "not a directory");

        let mut manifest = Vec::new();
        let result = scan_into(&file, &mut manifest);
        assert!(matches!(result, Err(ExtensionError::Enumeration { .. })));
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_identifier_for() {
        assert_eq!(
            identifier_for(Path::new("extensions/ping.ext")).as_deref(),
            Some("extensions.ping")
        );
        assert_eq!(identifier_for(Path::new("extensions/ping.ext.bak")), None);
        assert_eq!(identifier_for(Path::new("extensions/README")), None);
    }
}
