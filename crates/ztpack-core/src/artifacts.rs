//! Extension-based artifact classification and routing.
//!
//! Build outputs are classified purely by file name (plus the executable
//! bit on Unix) and routed into the canonical package layout:
//!
//! | category                         | destination |
//! |----------------------------------|-------------|
//! | headers (`.h` `.hpp` `.hh` `.inl`) | `include/`  |
//! | shared objects (`.so`, `.so.N`, `.dylib`) | `lib/` |
//! | static archives (`.a`, `.lib`)   | `lib/`      |
//! | DLLs (`.dll`)                    | `bin/`      |
//! | executables (`.exe`, exec bit)   | `bin/`      |
//!
//! Routing is lossless: files are copied byte-for-byte and destination
//! directories are created as needed.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::StageError;

/// What a build output file is, judged from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// C/C++ header.
    Header,
    /// Shared object / dylib, including versioned `.so.N` names.
    SharedLib,
    /// Static archive or MSVC import/static `.lib`.
    StaticLib,
    /// Windows runtime DLL.
    Dll,
    /// Executable program.
    Executable,
    /// Anything else; never packaged by the sweep.
    Other,
}

impl ArtifactKind {
    /// Package subdirectory this category lands in, or `None` for
    /// [`ArtifactKind::Other`].
    pub fn dest_subdir(&self) -> Option<&'static str> {
        match self {
            Self::Header => Some("include"),
            Self::SharedLib | Self::StaticLib => Some("lib"),
            Self::Dll | Self::Executable => Some("bin"),
            Self::Other => None,
        }
    }
}

/// Classify a file by extension; on Unix, extensionless files with the
/// executable bit set count as executables.
pub fn classify(path: &Path) -> ArtifactKind {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return ArtifactKind::Other;
    };
    let name = name.to_lowercase();

    if name.ends_with(".h") || name.ends_with(".hpp") || name.ends_with(".hh") || name.ends_with(".inl")
    {
        return ArtifactKind::Header;
    }
    if name.ends_with(".dll") {
        return ArtifactKind::Dll;
    }
    if name.ends_with(".so") || name.contains(".so.") || name.ends_with(".dylib") {
        return ArtifactKind::SharedLib;
    }
    if name.ends_with(".a") || name.ends_with(".lib") {
        return ArtifactKind::StaticLib;
    }
    if name.ends_with(".exe") {
        return ArtifactKind::Executable;
    }
    if !name.contains('.') && is_executable(path) {
        return ArtifactKind::Executable;
    }
    ArtifactKind::Other
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    false
}

/// Sweep `src_root` for packageable artifacts and copy them into
/// `package_root` by category.
///
/// Files already present at their destination are left alone (the build
/// tool's own install step ran first and wins). `skip_dirs` and any
/// `CMakeFiles` subtree (try-compile leftovers) are excluded. Returns the
/// destinations written.
pub fn sweep_tree(
    src_root: &Path,
    package_root: &Path,
    skip_dirs: &[&Path],
) -> Result<Vec<PathBuf>, StageError> {
    let mut routed = Vec::new();

    for entry in WalkDir::new(src_root).into_iter().filter_map(Result::ok) {
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        if skip_dirs.iter().any(|skip| path.starts_with(skip)) {
            continue;
        }
        if path
            .components()
            .any(|c| c.as_os_str() == "CMakeFiles")
        {
            continue;
        }

        let kind = classify(path);
        let Some(subdir) = kind.dest_subdir() else {
            continue;
        };

        let dest = package_root.join(subdir).join(dest_rel(path, src_root, kind));
        if dest.exists() {
            continue;
        }
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(path, &dest)?;
        routed.push(dest);
    }

    Ok(routed)
}

/// Destination path relative to the category subdirectory.
///
/// Headers keep their structure below the nearest `include`/`Include`
/// ancestor so `Include/ZTCpp/Service.hpp` lands at
/// `include/ZTCpp/Service.hpp`; everything else is routed flat by file
/// name.
fn dest_rel(path: &Path, src_root: &Path, kind: ArtifactKind) -> PathBuf {
    if kind == ArtifactKind::Header {
        if let Ok(rel) = path.strip_prefix(src_root) {
            let components: Vec<_> = rel.components().collect();
            let include_root = components
                .iter()
                .rposition(|c| {
                    let s = c.as_os_str();
                    s == "include" || s == "Include"
                });
            if let Some(idx) = include_root {
                return components[idx + 1..].iter().collect();
            }
        }
    }
    PathBuf::from(path.file_name().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_classify() {
        assert_eq!(classify(Path::new("libztcpp.so")), ArtifactKind::SharedLib);
        assert_eq!(classify(Path::new("libzt.so.3.0.1")), ArtifactKind::SharedLib);
        assert_eq!(classify(Path::new("ztcpp.dylib")), ArtifactKind::SharedLib);
        assert_eq!(classify(Path::new("ztcpp.dll")), ArtifactKind::Dll);
        assert_eq!(classify(Path::new("ztcpp.lib")), ArtifactKind::StaticLib);
        assert_eq!(classify(Path::new("libzt.a")), ArtifactKind::StaticLib);
        assert_eq!(classify(Path::new("Service.hpp")), ArtifactKind::Header);
        assert_eq!(classify(Path::new("demo.exe")), ArtifactKind::Executable);
        assert_eq!(classify(Path::new("notes.txt")), ArtifactKind::Other);
    }

    #[test]
    fn test_sweep_routes_exactly() {
        let tmp = tempdir().unwrap();
        let build = tmp.path().join("build");
        let pkg = tmp.path().join("package");

        std::fs::create_dir_all(build.join("Include/ZTCpp")).unwrap();
        std::fs::write(build.join("Include/ZTCpp/Service.hpp"), "// service").unwrap();
        std::fs::write(build.join("libztcpp.so"), "so").unwrap();
        std::fs::write(build.join("ztcpp.lib"), "lib").unwrap();
        std::fs::write(build.join("ztcpp.dll"), "dll").unwrap();
        std::fs::write(build.join("notes.txt"), "junk").unwrap();

        let routed = sweep_tree(&build, &pkg, &[]).unwrap();
        assert_eq!(routed.len(), 4);

        assert!(pkg.join("lib/libztcpp.so").exists());
        assert!(pkg.join("lib/ztcpp.lib").exists());
        assert!(pkg.join("bin/ztcpp.dll").exists());
        assert!(pkg.join("include/ZTCpp/Service.hpp").exists());
        assert!(!pkg.join("bin/notes.txt").exists());

        // Lossless: content is unchanged.
        assert_eq!(
            std::fs::read_to_string(pkg.join("include/ZTCpp/Service.hpp")).unwrap(),
            "// service"
        );
        assert_eq!(std::fs::read_to_string(pkg.join("bin/ztcpp.dll")).unwrap(), "dll");
    }

    #[test]
    fn test_sweep_skips_cmakefiles_and_existing() {
        let tmp = tempdir().unwrap();
        let build = tmp.path().join("build");
        let pkg = tmp.path().join("package");

        std::fs::create_dir_all(build.join("CMakeFiles/3.28.1")).unwrap();
        std::fs::write(build.join("CMakeFiles/3.28.1/probe.dll"), "probe").unwrap();
        std::fs::write(build.join("ztcpp.dll"), "new").unwrap();
        std::fs::create_dir_all(pkg.join("bin")).unwrap();
        std::fs::write(pkg.join("bin/ztcpp.dll"), "installed").unwrap();

        let routed = sweep_tree(&build, &pkg, &[]).unwrap();
        assert!(routed.is_empty());
        // The install step's copy wins over the stray.
        assert_eq!(
            std::fs::read_to_string(pkg.join("bin/ztcpp.dll")).unwrap(),
            "installed"
        );
        assert!(!pkg.join("bin/probe.dll").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_sweep_detects_executables() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempdir().unwrap();
        let build = tmp.path().join("build");
        let pkg = tmp.path().join("package");
        std::fs::create_dir_all(&build).unwrap();

        let exe = build.join("ztdemo");
        std::fs::write(&exe, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();
        // Same content without the executable bit stays behind.
        std::fs::write(build.join("README"), "text").unwrap();

        sweep_tree(&build, &pkg, &[]).unwrap();
        assert!(pkg.join("bin/ztdemo").exists());
        assert!(!pkg.join("bin/README").exists());
    }
}
