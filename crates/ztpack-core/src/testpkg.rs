//! Test-package runner: validate that a finished package can actually be
//! consumed.
//!
//! Builds a minimal consumer executable against the just-built package and
//! runs it — but only when the host is capable of executing binaries for
//! the target OS/architecture. When it is not (a cross build), the run
//! step is an explicit, logged skip reported as success, never a failure.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};
use ztpack_schema::{Arch, Os, PackageLayout, Settings};

use crate::cmake::CMake;
use crate::error::{StageError, ToolError};
use crate::generate::{self, ToolchainConfig, TOOLCHAIN_FILE};
use crate::paths;
use crate::store::ResolvedDependency;

/// Name of the consumer executable the test project builds.
pub const TEST_EXECUTABLE: &str = "ztcpp-conan-test-package";

/// Outcome of a test-package run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    /// The consumer executable was built and exited 0.
    Passed,
    /// Built, but not executed: the host cannot run target binaries.
    Skipped {
        /// Why execution was skipped.
        reason: String,
    },
}

/// A test-package invocation: consumer project, package under test, and
/// the settings the package was built with.
#[derive(Debug)]
pub struct TestPackage {
    /// Consumer project sources (`CMakeLists.txt` + `example.cpp`).
    pub project_dir: PathBuf,
    /// Root of the package being validated.
    pub package_dir: PathBuf,
    /// Test build folder.
    pub build_dir: PathBuf,
    /// Settings the package targets.
    pub settings: Settings,
    /// Stream subprocess output instead of logging it.
    pub verbose: bool,
}

impl TestPackage {
    /// Set up a run with the conventional `build/` folder inside the test
    /// project.
    pub fn new(project_dir: &Path, package_dir: &Path, settings: Settings, verbose: bool) -> Self {
        Self {
            project_dir: project_dir.to_path_buf(),
            package_dir: package_dir.to_path_buf(),
            build_dir: project_dir.join("build"),
            settings,
            verbose,
        }
    }

    /// Build the consumer against the package; run it when the host can.
    ///
    /// # Errors
    ///
    /// Fails when the package has no layout manifest, the consumer build
    /// fails, or the executed consumer exits non-zero. A capability
    /// mismatch is *not* an error.
    pub fn run(&self) -> Result<TestOutcome, StageError> {
        let layout = PackageLayout::read(&self.package_dir)?;
        let log = paths::build_log_path(&format!("{}-test", layout.name), &layout.version);
        std::fs::create_dir_all(&self.build_dir)?;

        let staged = self.stage_runtime_libs(&layout)?;
        debug!(count = staged.len(), "staged runtime libraries");

        self.generate(&layout)?;

        let cmake = CMake::locate()?;
        let toolchain = self.build_dir.join("generators").join(TOOLCHAIN_FILE);
        cmake.configure(&self.project_dir, &self.build_dir, &toolchain, &log, self.verbose)?;
        cmake.build(&self.build_dir, &log, self.verbose)?;

        if let Err(reason) = can_run(&self.settings) {
            info!(reason, "skipping test execution");
            return Ok(TestOutcome::Skipped {
                reason: reason.to_string(),
            });
        }

        let exe = self.find_executable()?;
        info!(exe = %exe.display(), "running test package");

        let (env_name, env_value) = runtime_search_path(&layout, &self.package_dir, &self.build_dir);
        let status = Command::new(&exe)
            .current_dir(&self.build_dir)
            .env(&env_name, env_value)
            .status()
            .map_err(|source| ToolError::Launch {
                tool: TEST_EXECUTABLE.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(ToolError::Failed {
                action: format!("test package '{TEST_EXECUTABLE}'"),
                code: status.code(),
            }
            .into());
        }
        Ok(TestOutcome::Passed)
    }

    /// Copy `*.dll` / `*.dylib` from the package's lib and bin dirs into
    /// the test build folder, so a dynamically linked consumer can run
    /// without a system-wide install.
    fn stage_runtime_libs(&self, layout: &PackageLayout) -> Result<Vec<PathBuf>, StageError> {
        let patterns = [
            glob::Pattern::new("*.dll").expect("valid pattern"),
            glob::Pattern::new("*.dylib").expect("valid pattern"),
        ];

        let mut staged = Vec::new();
        for rel in layout.libdirs.iter().chain(layout.bindirs.iter()) {
            let dir = self.package_dir.join(rel);
            let Ok(entries) = std::fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.filter_map(Result::ok) {
                let path = entry.path();
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                if patterns.iter().any(|p| p.matches(name)) {
                    let dest = self.build_dir.join(name);
                    std::fs::copy(&path, &dest)?;
                    staged.push(dest);
                }
            }
        }
        Ok(staged)
    }

    /// Write toolchain/deps files pointing the consumer at the package.
    fn generate(&self, layout: &PackageLayout) -> Result<(), StageError> {
        let generators_dir = self.build_dir.join("generators");
        std::fs::create_dir_all(&generators_dir)?;

        let dep = ResolvedDependency {
            name: layout.name.clone(),
            version: layout.version.clone(),
            root: self.package_dir.clone(),
            includedirs: join_all(&self.package_dir, &layout.includedirs),
            libdirs: join_all(&self.package_dir, &layout.libdirs),
            bindirs: join_all(&self.package_dir, &layout.bindirs),
            libs: layout.libs.clone(),
            defines: layout.defines.clone(),
        };
        let deps_path = generators_dir.join(generate::DEPS_FILE);
        generate::write_deps_file(&deps_path, std::slice::from_ref(&dep))?;

        let config = ToolchainConfig {
            build_type: Some(self.settings.build_type),
            cppstd: self.settings.effective_cppstd(),
            defines: layout.defines.clone(),
            deps_file: Some(deps_path),
            ..ToolchainConfig::default()
        };
        generate::write_toolchain_file(&generators_dir.join(TOOLCHAIN_FILE), &config)
    }

    /// Locate the built consumer executable inside the test build tree
    /// (single-config and multi-config generators place it differently).
    fn find_executable(&self) -> Result<PathBuf, StageError> {
        let candidates = [
            TEST_EXECUTABLE.to_string(),
            format!("{TEST_EXECUTABLE}.exe"),
        ];
        for entry in walkdir::WalkDir::new(&self.build_dir)
            .into_iter()
            .filter_map(Result::ok)
        {
            if entry.file_type().is_file()
                && candidates
                    .iter()
                    .any(|c| entry.file_name().to_string_lossy() == *c)
            {
                return Ok(entry.path().to_path_buf());
            }
        }
        Err(StageError::MissingArtifact(format!(
            "{TEST_EXECUTABLE} in {}",
            self.build_dir.display()
        )))
    }
}

/// Can the host execute a binary built for `settings`?
///
/// Same OS and architecture always can; an Apple Silicon macOS host can
/// additionally run `x86_64` macOS binaries through Rosetta 2. Everything
/// else is a capability mismatch, returned as the skip reason.
pub fn can_run(settings: &Settings) -> Result<(), &'static str> {
    if settings.os != Os::current() {
        return Err("target OS differs from host");
    }
    let host_arch = Arch::current();
    if settings.arch == host_arch {
        return Ok(());
    }
    if settings.os == Os::Macos && host_arch == Arch::Arm64 && settings.arch == Arch::X86_64 {
        // Rosetta 2 translates x86_64 binaries on Apple Silicon.
        return Ok(());
    }
    Err("target architecture cannot execute on this host")
}

/// The loader search path variable and value for running a dynamically
/// linked test binary: the test build folder plus the package's lib and
/// bin dirs, prepended to any existing value.
fn runtime_search_path(
    layout: &PackageLayout,
    package_dir: &Path,
    build_dir: &Path,
) -> (String, String) {
    let var = match Os::current() {
        Os::Windows => "PATH",
        Os::Macos => "DYLD_LIBRARY_PATH",
        Os::Linux => "LD_LIBRARY_PATH",
    };
    let sep = if Os::current() == Os::Windows { ';' } else { ':' };

    let mut dirs: Vec<String> = vec![build_dir.display().to_string()];
    for rel in layout.bindirs.iter().chain(layout.libdirs.iter()) {
        dirs.push(package_dir.join(rel).display().to_string());
    }
    if let Ok(existing) = std::env::var(var) {
        if !existing.is_empty() {
            dirs.push(existing);
        }
    }
    (var.to_string(), dirs.join(&sep.to_string()))
}

fn join_all(root: &Path, rels: &[String]) -> Vec<PathBuf> {
    rels.iter().map(|r| root.join(r)).collect()
}
