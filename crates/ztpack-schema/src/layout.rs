//! The exported package layout: the durable contract consumers build
//! against.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name of the serialized layout inside a package root.
pub const LAYOUT_FILE: &str = "ztpack.layout.json";

/// Errors produced while reading or writing a [`PackageLayout`].
#[derive(Error, Debug)]
pub enum LayoutError {
    /// The layout file could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The layout file is not valid JSON for this schema.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Metadata exported for consumers of a finished package.
///
/// Written as JSON into the package root by the `package_info` stage.
/// Directory entries are relative to the package root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageLayout {
    /// Package name.
    pub name: String,
    /// Package version.
    pub version: semver::Version,
    /// Header roots.
    pub includedirs: Vec<String>,
    /// Library directories.
    pub libdirs: Vec<String>,
    /// Runtime binary directories.
    pub bindirs: Vec<String>,
    /// Linkable library names.
    pub libs: Vec<String>,
    /// Preprocessor defines consumers must set (e.g. the static-linkage
    /// marker for a `shared=false` build).
    pub defines: Vec<String>,
}

impl PackageLayout {
    /// Write the layout into `package_dir` as [`LAYOUT_FILE`].
    pub fn write(&self, package_dir: &Path) -> Result<(), LayoutError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(package_dir.join(LAYOUT_FILE), json)?;
        Ok(())
    }

    /// Read a layout back from a package root.
    pub fn read(package_dir: &Path) -> Result<Self, LayoutError> {
        let content = std::fs::read_to_string(package_dir.join(LAYOUT_FILE))?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PackageLayout {
        PackageLayout {
            name: "ztcpp".to_string(),
            version: semver::Version::new(3, 0, 1),
            includedirs: vec!["include".to_string()],
            libdirs: vec!["lib".to_string()],
            bindirs: vec!["bin".to_string()],
            libs: vec!["ztcpp".to_string()],
            defines: vec![],
        }
    }

    #[test]
    fn test_write_and_read() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = sample();
        layout.write(tmp.path()).unwrap();

        assert!(tmp.path().join(LAYOUT_FILE).exists());
        let loaded = PackageLayout::read(tmp.path()).unwrap();
        assert_eq!(loaded, layout);
    }

    #[test]
    fn test_read_missing_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            PackageLayout::read(tmp.path()),
            Err(LayoutError::Io(_))
        ));
    }
}
