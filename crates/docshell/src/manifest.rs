//! Revision manifest loading from disk.

use std::ffi::OsStr;
use std::path::Path;

use docshell_core::RevManifest;

use crate::error::{Result, ShellError};

/// Load a revision manifest.
///
/// This is an I/O operation that:
/// - Validates the path points at a `.json` file
/// - Reads the manifest from disk
/// - Parses it with the pure [`RevManifest::from_json`]
pub fn load_manifest(path: &Path) -> Result<RevManifest> {
    let canonical = path.canonicalize().map_err(|e| ShellError::ManifestLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    if canonical.extension() != Some(OsStr::new("json")) {
        return Err(ShellError::ManifestLoad {
            path: path.display().to_string(),
            reason: "Manifest must be a .json file".to_string(),
        });
    }

    let content = std::fs::read_to_string(&canonical).map_err(|e| ShellError::ManifestLoad {
        path: canonical.display().to_string(),
        reason: e.to_string(),
    })?;

    let manifest = RevManifest::from_json(&content)?;

    tracing::info!(
        entries = manifest.len(),
        manifest_path = %canonical.display(),
        "Revision manifest loaded"
    );

    Ok(manifest)
}
