//! Local package store
//!
//! Finished packages live under `<store>/<name>/<version>`, each directory
//! holding the canonical `include`/`lib`/`bin` layout plus the exported
//! layout manifest. The requirements stage resolves dependency references
//! here; `create` installs what it just built here.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ztpack_schema::{PackageLayout, PackageRef};

use crate::error::StoreError;

/// A dependency reference resolved to concrete on-disk directories.
#[derive(Debug, Clone)]
pub struct ResolvedDependency {
    /// Dependency name.
    pub name: String,
    /// Resolved version.
    pub version: semver::Version,
    /// Package root in the store.
    pub root: PathBuf,
    /// Absolute header roots.
    pub includedirs: Vec<PathBuf>,
    /// Absolute library directories.
    pub libdirs: Vec<PathBuf>,
    /// Absolute runtime binary directories.
    pub bindirs: Vec<PathBuf>,
    /// Linkable library names.
    pub libs: Vec<String>,
    /// Preprocessor defines the dependency exports.
    pub defines: Vec<String>,
}

/// Handle to a package store root.
#[derive(Debug, Clone)]
pub struct PackageStore {
    root: PathBuf,
}

impl PackageStore {
    /// Open a store at `root`. The directory is created lazily on install.
    pub fn open(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// The store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory a reference resolves to: `<root>/<name>/<version>`.
    pub fn package_dir(&self, name: &str, version: &semver::Version) -> PathBuf {
        self.root.join(name).join(version.to_string())
    }

    /// Resolve a dependency reference against the store.
    ///
    /// `forced_options` carries option values the consumer imposes on the
    /// dependency; `shared=false` requires the resolved package to provide
    /// a static archive.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the package directory is absent,
    /// [`StoreError::NoStaticLibrary`] if static linkage is forced but no
    /// static archive exists.
    pub fn resolve(
        &self,
        reference: &PackageRef,
        forced_options: Option<&BTreeMap<String, bool>>,
    ) -> Result<ResolvedDependency, StoreError> {
        let root = self.package_dir(&reference.name, &reference.version);
        if !root.is_dir() {
            return Err(StoreError::NotFound {
                reference: reference.to_string(),
                searched: root.display().to_string(),
            });
        }

        let (includedirs, libdirs, bindirs, libs, defines) =
            match PackageLayout::read(&root) {
                Ok(layout) => (
                    join_all(&root, &layout.includedirs),
                    join_all(&root, &layout.libdirs),
                    join_all(&root, &layout.bindirs),
                    layout.libs,
                    layout.defines,
                ),
                // Packages produced outside ztpack carry no layout manifest;
                // fall back to the conventional directory roles.
                Err(_) => (
                    existing(&root, &["include", "Include"]),
                    existing(&root, &["lib"]),
                    existing(&root, &["bin"]),
                    vec![reference.name.clone()],
                    Vec::new(),
                ),
            };

        let forced_static = forced_options
            .and_then(|opts| opts.get("shared").copied())
            .is_some_and(|shared| !shared);
        if forced_static && !has_static_archive(&libdirs) {
            return Err(StoreError::NoStaticLibrary(reference.name.clone()));
        }

        Ok(ResolvedDependency {
            name: reference.name.clone(),
            version: reference.version.clone(),
            root,
            includedirs,
            libdirs,
            bindirs,
            libs,
            defines,
        })
    }

    /// Install a finished package tree into the store, replacing any
    /// previous copy of the same version. Returns the store directory.
    pub fn install(
        &self,
        package_dir: &Path,
        name: &str,
        version: &semver::Version,
    ) -> Result<PathBuf, StoreError> {
        let dest = self.package_dir(name, version);
        if dest.exists() {
            std::fs::remove_dir_all(&dest)?;
        }
        std::fs::create_dir_all(&dest)?;
        copy_dir_all(package_dir, &dest)
            .map_err(|e| StoreError::Io(std::io::Error::other(e.to_string())))?;
        Ok(dest)
    }
}

fn join_all(root: &Path, rels: &[String]) -> Vec<PathBuf> {
    rels.iter().map(|r| root.join(r)).collect()
}

fn existing(root: &Path, candidates: &[&str]) -> Vec<PathBuf> {
    candidates
        .iter()
        .map(|c| root.join(c))
        .filter(|p| p.is_dir())
        .collect()
}

fn has_static_archive(libdirs: &[PathBuf]) -> bool {
    libdirs.iter().any(|dir| {
        std::fs::read_dir(dir)
            .map(|entries| {
                entries.filter_map(Result::ok).any(|e| {
                    let path = e.path();
                    matches!(
                        path.extension().and_then(|e| e.to_str()),
                        Some("a" | "lib")
                    )
                })
            })
            .unwrap_or(false)
    })
}

/// Recursively copy a directory tree from `src` to `dst`.
///
/// # Errors
///
/// Returns an error if any file or directory cannot be copied.
pub fn copy_dir_all(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> anyhow::Result<()> {
    fs_extra::dir::copy(
        src,
        dst,
        &fs_extra::dir::CopyOptions::new()
            .content_only(true)
            .overwrite(true),
    )
    .map_err(|e| anyhow::anyhow!("Copy failed: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn seed_package(store_root: &Path, name: &str, version: &str, static_lib: bool) -> PathBuf {
        let root = store_root.join(name).join(version);
        std::fs::create_dir_all(root.join("include")).unwrap();
        std::fs::create_dir_all(root.join("lib")).unwrap();
        std::fs::write(root.join("include/header.h"), "").unwrap();
        if static_lib {
            std::fs::write(root.join(format!("lib/lib{name}.a")), "").unwrap();
        } else {
            std::fs::write(root.join(format!("lib/lib{name}.so")), "").unwrap();
        }
        root
    }

    fn forced_static() -> BTreeMap<String, bool> {
        let mut m = BTreeMap::new();
        m.insert("shared".to_string(), false);
        m
    }

    #[test]
    fn test_resolve_conventional_layout() {
        let tmp = tempdir().unwrap();
        seed_package(tmp.path(), "libzt", "3.0.0", true);

        let store = PackageStore::open(tmp.path());
        let reference: PackageRef = "libzt/3.0.0".parse().unwrap();
        let dep = store.resolve(&reference, Some(&forced_static())).unwrap();

        assert_eq!(dep.name, "libzt");
        assert_eq!(dep.includedirs.len(), 1);
        assert_eq!(dep.libdirs.len(), 1);
        assert_eq!(dep.libs, vec!["libzt"]);
    }

    #[test]
    fn test_resolve_missing_package() {
        let tmp = tempdir().unwrap();
        let store = PackageStore::open(tmp.path());
        let reference: PackageRef = "libzt/9.9.9".parse().unwrap();
        assert!(matches!(
            store.resolve(&reference, None),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_forced_static_requires_archive() {
        let tmp = tempdir().unwrap();
        seed_package(tmp.path(), "libzt", "3.0.0", false);

        let store = PackageStore::open(tmp.path());
        let reference: PackageRef = "libzt/3.0.0".parse().unwrap();

        // Shared-only package resolves fine without forcing...
        assert!(store.resolve(&reference, None).is_ok());
        // ...but not when the consumer forces static linkage.
        assert!(matches!(
            store.resolve(&reference, Some(&forced_static())),
            Err(StoreError::NoStaticLibrary(_))
        ));
    }

    #[test]
    fn test_install_replaces_existing() {
        let tmp = tempdir().unwrap();
        let store = PackageStore::open(&tmp.path().join("store"));
        let version = semver::Version::new(3, 0, 1);

        let pkg = tmp.path().join("package");
        std::fs::create_dir_all(pkg.join("lib")).unwrap();
        std::fs::write(pkg.join("lib/libztcpp.so"), "v1").unwrap();
        let installed = store.install(&pkg, "ztcpp", &version).unwrap();
        assert!(installed.join("lib/libztcpp.so").exists());

        std::fs::write(pkg.join("lib/libztcpp.so"), "v2").unwrap();
        store.install(&pkg, "ztcpp", &version).unwrap();
        let content = std::fs::read_to_string(installed.join("lib/libztcpp.so")).unwrap();
        assert_eq!(content, "v2");
    }
}
