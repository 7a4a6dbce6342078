//! Configuration stages: option pruning, the minimum-standard assertion,
//! and dependency resolution.
//!
//! All three run before any build work; a failure here is a configuration
//! error, never a build error.

use tracing::debug;
use ztpack_schema::{CppStd, Os, Settings};

use crate::context::RecipeContext;
use crate::error::StageError;

/// `config_options` stage: drop options that do not apply to the target
/// platform. `fPIC` has no meaning on Windows.
pub fn config_options(cx: &mut RecipeContext) -> Result<(), StageError> {
    if cx.settings.os == Os::Windows && cx.options.rm_safe("fPIC") {
        debug!("removed fPIC option (not applicable on Windows)");
    }
    Ok(())
}

/// `configure` stage: assert the minimum C++ standard, prune `fPIC` for
/// shared builds, and force every dependency to static linkage.
///
/// The forcing is unconditional: the vendored SDK is linked statically into
/// this package regardless of this package's own linkage mode.
pub fn configure(cx: &mut RecipeContext) -> Result<(), StageError> {
    check_min_cppstd(
        &cx.settings,
        cx.recipe.build.min_cppstd,
        &cx.recipe.package.name,
    )?;

    if cx.is_shared() && cx.options.rm_safe("fPIC") {
        debug!("removed fPIC option (shared build)");
    }

    for req in &cx.recipe.dependencies.requires {
        cx.dep_option_overrides
            .entry(req.name.clone())
            .or_default()
            .insert("shared".to_string(), false);
    }

    Ok(())
}

/// `requirements` stage: resolve every declared reference in the store,
/// honoring the option overrides recorded during configure.
pub fn requirements(cx: &mut RecipeContext) -> Result<(), StageError> {
    let mut deps = Vec::with_capacity(cx.recipe.dependencies.requires.len());
    for req in &cx.recipe.dependencies.requires {
        let forced = cx.dep_option_overrides.get(&req.name);
        let dep = cx.store.resolve(req, forced)?;
        debug!(dependency = %req, root = %dep.root.display(), "resolved");
        deps.push(dep);
    }
    cx.deps = deps;
    Ok(())
}

/// Fail unless the effective C++ standard is at least `required`.
///
/// The effective standard is the explicit `cppstd` setting when present,
/// otherwise the compiler's default for its version. A compiler whose
/// default predates C++11 yields no effective standard and fails the
/// check.
pub fn check_min_cppstd(
    settings: &Settings,
    required: CppStd,
    package: &str,
) -> Result<(), StageError> {
    match settings.effective_cppstd() {
        Some(std) if std >= required => Ok(()),
        detected => Err(StageError::UnsupportedStandard {
            package: package.to_string(),
            required,
            detected: detected.map_or_else(
                || {
                    format!(
                        "no standard: {} {} defaults below C++11",
                        settings.compiler, settings.compiler_version
                    )
                },
                |std| format!("C++{std}"),
            ),
        }),
    }
}
