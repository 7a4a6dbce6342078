//! Domain-specific errors for the packaging pipeline

use thiserror::Error;
use ztpack_schema::{CppStd, LayoutError};

/// Failure launching or waiting on an external tool.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The tool executable was not found on `PATH` (or via its env
    /// override).
    #[error("'{0}' not found on PATH (set ZTPACK_CMAKE to override)")]
    NotFound(String),

    /// The tool could not be spawned at all.
    #[error("Failed to launch '{tool}': {source}")]
    Launch {
        /// Tool executable name.
        tool: String,
        /// Underlying spawn error.
        source: std::io::Error,
    },

    /// The tool ran and exited non-zero. The status is propagated verbatim;
    /// there is no retry.
    #[error("{action} failed with exit code: {code:?}")]
    Failed {
        /// What was being run, e.g. `cmake --build`.
        action: String,
        /// The subprocess exit code, if one was produced.
        code: Option<i32>,
    },
}

impl ToolError {
    /// The exit code to propagate upward, mirroring the failing subprocess
    /// where one exists.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Failed { code: Some(c), .. } => *c,
            _ => 1,
        }
    }
}

/// Failure resolving a dependency reference in the local package store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The referenced package/version is not present in the store.
    #[error("Package '{reference}' not found in store at {searched}")]
    NotFound {
        /// The reference that failed to resolve.
        reference: String,
        /// Directory that was searched.
        searched: String,
    },

    /// The dependency is forced to static linkage but provides no static
    /// archive.
    #[error("Dependency '{0}' is required with shared=false but provides no static library")]
    NoStaticLibrary(String),

    /// Store directories could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Any error a pipeline stage can fail with.
#[derive(Error, Debug)]
pub enum StageError {
    /// The configured compiler standard is below the recipe's minimum.
    /// Raised by the configure stage, before any build work starts.
    #[error("{package} requires C++{required} or newer ({detected} configured)")]
    UnsupportedStandard {
        /// Package being configured.
        package: String,
        /// Minimum standard the recipe declares.
        required: CppStd,
        /// What the settings actually provide, for the message.
        detected: String,
    },

    /// An option was referenced that the recipe does not declare.
    #[error("Unknown option '{0}'")]
    UnknownOption(String),

    /// An option was set to a value outside its declared values.
    #[error("Option '{name}' cannot be set to {value}")]
    InvalidOptionValue {
        /// Option name.
        name: String,
        /// Rejected value.
        value: bool,
    },

    /// Dependency resolution failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// An external tool invocation failed.
    #[error("{0}")]
    Tool(#[from] ToolError),

    /// Layout metadata could not be written or read.
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// A build output that must exist was not produced.
    #[error("Expected build artifact not found: {0}")]
    MissingArtifact(String),

    /// Filesystem operations failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
