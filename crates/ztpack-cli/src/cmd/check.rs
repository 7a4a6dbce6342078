//! Check command: validate a recipe file.

use std::path::Path;

use anyhow::{Context, Result};
use ztpack_schema::RecipeManifest;

use crate::ui::Output;

/// Parse and validate a recipe, printing a short summary.
pub fn check(path: &Path) -> Result<()> {
    let recipe = RecipeManifest::from_file(path).context("Failed to parse recipe")?;

    let output = Output::new();
    output.success("Recipe is valid");
    println!("  Name: {}", recipe.package.name);
    println!("  Version: {}", recipe.package.version);
    println!("  Min C++ standard: {}", recipe.build.min_cppstd);
    for (name, decl) in &recipe.options {
        println!("  Option: {name} (default {})", decl.default);
    }
    for req in &recipe.dependencies.requires {
        println!("  Requires: {req}");
    }

    Ok(())
}
