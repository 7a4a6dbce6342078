//! ztpack home directory layout.

use dirs::home_dir;
use std::path::PathBuf;

/// Returns the primary ztpack directory, or None if the user's home cannot
/// be resolved.
pub fn try_ztpack_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("ZTPACK_HOME") {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".ztpack"))
}

/// Returns the canonical ztpack home directory (`~/.ztpack`).
///
/// # Panics
///
/// Panics if neither `ZTPACK_HOME` is set nor the user's home directory can
/// be resolved.
pub fn ztpack_home() -> PathBuf {
    try_ztpack_home().expect("Could not determine home directory. Set ZTPACK_HOME to override.")
}

/// Package store path: ~/.ztpack/store
pub fn store_path() -> PathBuf {
    ztpack_home().join("store")
}

/// Logs directory: ~/.ztpack/logs
pub fn log_dir() -> PathBuf {
    ztpack_home().join("logs")
}

/// Generate a build log path for a package
pub fn build_log_path(package: &str, version: &semver::Version) -> PathBuf {
    let timestamp = chrono::Utc::now().format("%Y%m%d-%H%M%S");
    log_dir().join(format!("build-{package}-{version}-{timestamp}.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_log_path_shape() {
        let path = build_log_path("ztcpp", &semver::Version::new(3, 0, 1));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("build-ztcpp-3.0.1-"));
        assert!(name.ends_with(".log"));
    }
}
