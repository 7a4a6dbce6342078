//! Command modules - one file per CLI command

pub mod build;
pub mod check;
pub mod completions;
pub mod create;
pub mod info;
pub mod package;
pub mod test;

use std::path::Path;

use anyhow::{Context, Result};
use ztpack_core::{Folders, PackageStore, RecipeContext, paths};
use ztpack_schema::RecipeManifest;

use crate::{SettingsArgs, parse_option_overrides};

/// Load a recipe and assemble the pipeline context for it: folders rooted
/// at the recipe, store from the `--store` flag or `ZTPACK_HOME`, settings
/// from host detection plus overrides, and `-o` option overrides applied.
pub(crate) fn load_context(
    recipe_path: &Path,
    source_dir: Option<&Path>,
    settings: &SettingsArgs,
    options: &[String],
    store_root: Option<&Path>,
    verbose: bool,
) -> Result<RecipeContext> {
    let recipe = RecipeManifest::from_file(recipe_path)
        .with_context(|| format!("Failed to load recipe {}", recipe_path.display()))?;

    let recipe_dir = match recipe_path.parent() {
        Some(dir) if dir.as_os_str().is_empty() => Path::new("."),
        Some(dir) => dir,
        None => Path::new("."),
    };
    let mut folders = Folders::for_recipe(recipe_dir);
    if let Some(source_dir) = source_dir {
        folders = folders.with_source_dir(source_dir);
    }

    let store_root = store_root.map_or_else(paths::store_path, Path::to_path_buf);
    let store = PackageStore::open(&store_root);

    let mut cx = RecipeContext::new(recipe, settings.resolve(), store, folders, verbose);
    for (name, value) in parse_option_overrides(options)? {
        cx.options.set(&name, value)?;
    }
    Ok(cx)
}
