//! Create command: full lifecycle, store install, test-package validation.

use std::path::Path;

use anyhow::Result;
use ztpack_core::{Stage, TestOutcome, TestPackage, pipeline};

use crate::SettingsArgs;
use crate::ui::Output;

/// Run the whole lifecycle for a recipe, install the result into the
/// store, and validate it with the consumer test project.
#[allow(clippy::too_many_arguments)]
pub fn create(
    recipe_path: &Path,
    source_dir: Option<&Path>,
    test_project: Option<&Path>,
    skip_test: bool,
    settings: &SettingsArgs,
    options: &[String],
    store_root: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let output = Output::new();
    let mut cx = super::load_context(recipe_path, source_dir, settings, options, store_root, verbose)?;

    let name = cx.recipe.package.name.clone();
    let version = cx.recipe.package.version.clone();
    output.info(&format!("Building {name}/{version}..."));

    pipeline::run(&mut cx, Stage::PackageInfo)?;

    let installed = cx.store.install(&cx.folders.package_dir, &name, &version)?;
    output.success(&format!("Packaged {name}/{version} -> {}", installed.display()));

    if skip_test {
        return Ok(());
    }

    let project = test_project.map_or_else(
        || cx.folders.recipe_dir.join("test_package"),
        Path::to_path_buf,
    );
    if !project.is_dir() {
        output.warning(&format!(
            "No test project at {}; skipping validation",
            project.display()
        ));
        return Ok(());
    }

    // Validate the store copy: that is what consumers will resolve.
    let tester = TestPackage::new(&project, &installed, cx.settings.clone(), verbose);
    match tester.run()? {
        TestOutcome::Passed => output.success("Test package passed"),
        TestOutcome::Skipped { reason } => {
            output.info(&format!("Test execution skipped: {reason}"));
        }
    }
    Ok(())
}
