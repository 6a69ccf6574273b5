//! Locating and reading the dependency manifest.
//!
//! Only the plain `requirements.txt` layout is understood: one package per
//! line. Blank lines and `#` comments are ignored; everything else is kept
//! verbatim, version specifiers included.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// File name looked up by [`find_manifest`]
pub const MANIFEST_FILE_NAME: &str = "requirements.txt";

/// Path of the manifest inside `dir`. The file is not required to exist.
///
/// An empty `dir` resolves relative to the current working directory.
pub fn find_manifest(dir: impl AsRef<Path>) -> PathBuf {
    dir.as_ref().join(MANIFEST_FILE_NAME)
}

/// Read the manifest at `path` into an ordered list of package identifiers.
pub fn parse_manifest(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::ManifestNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Io(e),
    })?;

    let packages = parse_manifest_str(&content);
    tracing::debug!(
        "Parsed {} package(s) from {}",
        packages.len(),
        path.display()
    );
    Ok(packages)
}

/// Split manifest text into package identifiers, preserving order
pub fn parse_manifest_str(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}
