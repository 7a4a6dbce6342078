//! CMake subprocess driver.
//!
//! ztpack never interprets the build system; it locates `cmake`, invokes
//! configure/build/install as blocking subprocesses, and propagates a
//! non-zero exit verbatim. No retries, no recovery, no timeout: a hang in
//! the external tool hangs the pipeline, by contract.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::info;

use crate::context::RecipeContext;
use crate::error::{StageError, ToolError};
use crate::generate;

/// Environment variable naming an explicit CMake executable, bypassing
/// `PATH` discovery.
pub const CMAKE_ENV: &str = "ZTPACK_CMAKE";

/// Handle to a located CMake executable.
#[derive(Debug, Clone)]
pub struct CMake {
    exe: PathBuf,
}

impl CMake {
    /// Locate CMake: `ZTPACK_CMAKE` if set, otherwise `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::NotFound`] when neither yields an executable.
    pub fn locate() -> Result<Self, ToolError> {
        if let Ok(exe) = std::env::var(CMAKE_ENV) {
            return Ok(Self {
                exe: PathBuf::from(exe),
            });
        }
        which::which("cmake")
            .map(|exe| Self { exe })
            .map_err(|_| ToolError::NotFound("cmake".to_string()))
    }

    /// Path of the located executable.
    pub fn exe(&self) -> &Path {
        &self.exe
    }

    /// `cmake -S <source> -B <build> -DCMAKE_TOOLCHAIN_FILE=<toolchain>`.
    pub fn configure(
        &self,
        source_dir: &Path,
        build_dir: &Path,
        toolchain: &Path,
        log_path: &Path,
        verbose: bool,
    ) -> Result<(), ToolError> {
        let mut cmd = Command::new(&self.exe);
        cmd.arg("-S")
            .arg(source_dir)
            .arg("-B")
            .arg(build_dir)
            .arg(format!("-DCMAKE_TOOLCHAIN_FILE={}", toolchain.display()));
        self.run(cmd, "cmake configure", log_path, verbose)
    }

    /// `cmake --build <build> --parallel <jobs>`.
    pub fn build(&self, build_dir: &Path, log_path: &Path, verbose: bool) -> Result<(), ToolError> {
        let mut cmd = Command::new(&self.exe);
        cmd.arg("--build")
            .arg(build_dir)
            .arg("--parallel")
            .arg(num_cpus::get().to_string());
        self.run(cmd, "cmake build", log_path, verbose)
    }

    /// `cmake --install <build> --prefix <prefix>`.
    pub fn install(
        &self,
        build_dir: &Path,
        prefix: &Path,
        log_path: &Path,
        verbose: bool,
    ) -> Result<(), ToolError> {
        let mut cmd = Command::new(&self.exe);
        cmd.arg("--install").arg(build_dir).arg("--prefix").arg(prefix);
        self.run(cmd, "cmake install", log_path, verbose)
    }

    fn run(
        &self,
        mut cmd: Command,
        action: &str,
        log_path: &Path,
        verbose: bool,
    ) -> Result<(), ToolError> {
        info!(action, exe = %self.exe.display(), "running");

        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ToolError::Launch {
                tool: "cmake".to_string(),
                source,
            })?;
        }

        let status = if verbose {
            cmd.status()
        } else {
            // Append so configure/build/install share one log per run.
            let log_file = std::fs::File::options()
                .create(true)
                .append(true)
                .open(log_path)
                .map_err(|source| ToolError::Launch {
                    tool: "cmake".to_string(),
                    source,
                })?;
            cmd.stdout(Stdio::from(log_file.try_clone().map_err(|source| {
                ToolError::Launch {
                    tool: "cmake".to_string(),
                    source,
                }
            })?))
            .stderr(Stdio::from(log_file))
            .status()
        }
        .map_err(|source| ToolError::Launch {
            tool: "cmake".to_string(),
            source,
        })?;

        if !status.success() {
            if !verbose {
                if let Ok(tail) = read_last_lines(log_path, 20) {
                    eprintln!("\n{action} failed. Last 20 lines:");
                    eprintln!("{tail}");
                    eprintln!("\nFull log: {}", log_path.display());
                }
            }
            return Err(ToolError::Failed {
                action: action.to_string(),
                code: status.code(),
            });
        }
        Ok(())
    }
}

/// `build` stage: CMake configure then build, over the generated
/// toolchain. A failure in either subprocess is surfaced verbatim.
pub fn build(cx: &mut RecipeContext) -> Result<(), StageError> {
    let cmake = CMake::locate()?;
    let toolchain = cx.folders.generators_dir.join(generate::TOOLCHAIN_FILE);
    cmake.configure(
        &cx.folders.source_dir,
        &cx.folders.build_dir,
        &toolchain,
        &cx.build_log,
        cx.verbose,
    )?;
    cmake.build(&cx.folders.build_dir, &cx.build_log, cx.verbose)?;
    Ok(())
}

/// Read the last N lines from a file efficiently.
///
/// Seeks to near the end and reads a fixed-size tail buffer instead of
/// loading the whole file, so large build logs stay cheap to report.
fn read_last_lines(path: &Path, n: usize) -> std::io::Result<String> {
    use std::fs::File;
    use std::io::{Read, Seek, SeekFrom};

    // 16KB is enough for ~400 lines at 40 chars each.
    const TAIL_SIZE: u64 = 16 * 1024;

    let mut file = File::open(path)?;
    let file_len = file.metadata()?.len();

    let seek_pos = file_len.saturating_sub(TAIL_SIZE);
    file.seek(SeekFrom::Start(seek_pos))?;

    let mut buffer = String::new();
    file.read_to_string(&mut buffer)?;

    // If we seeked mid-file, skip the first (partial) line in-place.
    let content = if seek_pos > 0 {
        buffer
            .find('\n')
            .map_or(buffer.as_str(), |idx| &buffer[idx + 1..])
    } else {
        &buffer
    };

    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(n);
    Ok(lines[start..].join("\n"))
}
