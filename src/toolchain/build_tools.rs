//! build-tools version selection.

use std::path::{Path, PathBuf};

use crate::error::{Result, StripError};

/// Pick the build-tools directory to use under `sdk`.
///
/// Versions are compared as plain strings, so `9.0.0` sorts above
/// `33.0.0`.
pub fn find_build_tools(sdk: &Path) -> Result<PathBuf> {
    let dir = sdk.join("build-tools");
    let entries = std::fs::read_dir(&dir).map_err(|_| StripError::BuildToolsNotFound {
        sdk: sdk.to_path_buf(),
    })?;

    let versions: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();

    let latest = select_version(&versions).ok_or_else(|| StripError::BuildToolsNotFound {
        sdk: sdk.to_path_buf(),
    })?;

    Ok(dir.join(latest))
}

/// Lexicographically greatest version name.
// TODO: compare dotted versions numerically once SDKs with single-digit
// majors no longer need to be supported side by side.
pub fn select_version(versions: &[String]) -> Option<&str> {
    versions.iter().max().map(String::as_str)
}
