//! Package command: run the lifecycle through metadata export.

use std::path::Path;

use anyhow::Result;
use ztpack_core::{Stage, pipeline};

use crate::SettingsArgs;
use crate::ui::Output;

/// Full lifecycle without a store install: the package tree and its layout
/// manifest are left in the recipe's package folder.
pub fn package(
    recipe_path: &Path,
    source_dir: Option<&Path>,
    settings: &SettingsArgs,
    options: &[String],
    store_root: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let output = Output::new();
    let mut cx = super::load_context(recipe_path, source_dir, settings, options, store_root, verbose)?;

    pipeline::run(&mut cx, Stage::PackageInfo)?;

    output.success(&format!(
        "Packaged {}/{} -> {}",
        cx.recipe.package.name,
        cx.recipe.package.version,
        cx.folders.package_dir.display()
    ));
    Ok(())
}
