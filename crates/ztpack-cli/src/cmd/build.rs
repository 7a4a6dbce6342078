//! Build command: run the lifecycle through the build stage.

use std::path::Path;

use anyhow::Result;
use ztpack_core::{Stage, pipeline};

use crate::SettingsArgs;
use crate::ui::Output;

/// Configure, generate, and build; the package stages do not run.
pub fn build(
    recipe_path: &Path,
    source_dir: Option<&Path>,
    settings: &SettingsArgs,
    options: &[String],
    store_root: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let output = Output::new();
    let mut cx = super::load_context(recipe_path, source_dir, settings, options, store_root, verbose)?;

    pipeline::run(&mut cx, Stage::Build)?;

    output.success(&format!(
        "Built {}/{} in {}",
        cx.recipe.package.name,
        cx.recipe.package.version,
        cx.folders.build_dir.display()
    ));
    Ok(())
}
