//! ztpack-core - Recipe lifecycle pipeline
//!
//! Implements the fixed-order packaging pipeline a recipe runs through:
//!
//! `config_options → configure → requirements → generate → build → package
//! → package_info`
//!
//! Every stage operates on one mutable [`RecipeContext`]; the first failing
//! stage halts the run (there is no retry or branching back). The build
//! itself is an external CMake invocation; this crate only configures it,
//! waits on it, and routes what it produced into the canonical
//! `bin`/`lib`/`include` package layout.
//!
//! Validation of a finished package (build a consumer executable against it
//! and run it where the host can execute target binaries) lives in
//! [`testpkg`].

pub mod artifacts;
pub mod cmake;
pub mod configure;
pub mod context;
pub mod error;
pub mod generate;
pub mod options;
pub mod package;
pub mod paths;
pub mod pipeline;
pub mod store;
pub mod testpkg;

// Re-exports
pub use context::{Folders, RecipeContext};
pub use error::{StageError, StoreError, ToolError};
pub use options::OptionSet;
pub use pipeline::{PipelineError, Stage};
pub use store::{PackageStore, ResolvedDependency};
pub use testpkg::{TestOutcome, TestPackage};
