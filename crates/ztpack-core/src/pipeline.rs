//! The recipe lifecycle: a fixed-order sequence of named stages.
//!
//! `config_options → configure → requirements → generate → build → package
//! → package_info`, strictly sequential with no branching back. The first
//! stage to fail halts the run and is named in the resulting error.

use thiserror::Error;
use tracing::info;

use crate::cmake;
use crate::configure;
use crate::context::RecipeContext;
use crate::error::StageError;
use crate::generate;
use crate::package;

/// A named lifecycle stage. Ordering follows the lifecycle sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Platform-dependent option pruning.
    ConfigOptions,
    /// Standard check, option pruning, dependency option forcing.
    Configure,
    /// Dependency resolution.
    Requirements,
    /// Toolchain and deps file generation.
    Generate,
    /// External build invocation.
    Build,
    /// Artifact collection into the package layout.
    Package,
    /// Consumer metadata export.
    PackageInfo,
}

/// The full lifecycle, in execution order.
pub const SEQUENCE: [Stage; 7] = [
    Stage::ConfigOptions,
    Stage::Configure,
    Stage::Requirements,
    Stage::Generate,
    Stage::Build,
    Stage::Package,
    Stage::PackageInfo,
];

impl Stage {
    /// Stage name as reported in logs and errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigOptions => "config_options",
            Self::Configure => "configure",
            Self::Requirements => "requirements",
            Self::Generate => "generate",
            Self::Build => "build",
            Self::Package => "package",
            Self::PackageInfo => "package_info",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal failure of a pipeline run, tagged with the stage that raised
/// it.
#[derive(Error, Debug)]
#[error("stage '{stage}' failed: {source}")]
pub struct PipelineError {
    /// The stage that failed.
    pub stage: Stage,
    /// What went wrong.
    #[source]
    pub source: StageError,
}

impl PipelineError {
    /// Process exit code to propagate: the failing subprocess's own code
    /// where one exists, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match &self.source {
            StageError::Tool(tool) => tool.exit_code(),
            _ => 1,
        }
    }
}

/// Run the lifecycle over `cx`, up to and including `through`.
///
/// # Errors
///
/// Returns the first stage failure; later stages do not run.
pub fn run(cx: &mut RecipeContext, through: Stage) -> Result<(), PipelineError> {
    for stage in SEQUENCE {
        if stage > through {
            break;
        }
        info!(stage = stage.as_str(), package = %cx.recipe.package.name, "running stage");
        dispatch(stage, cx).map_err(|source| PipelineError { stage, source })?;
    }
    Ok(())
}

fn dispatch(stage: Stage, cx: &mut RecipeContext) -> Result<(), StageError> {
    match stage {
        Stage::ConfigOptions => configure::config_options(cx),
        Stage::Configure => configure::configure(cx),
        Stage::Requirements => configure::requirements(cx),
        Stage::Generate => generate::generate(cx),
        Stage::Build => cmake::build(cx),
        Stage::Package => package::package(cx),
        Stage::PackageInfo => package::package_info(cx),
    }
}
