//! Package stages: assemble the final layout and export consumer metadata.

use tracing::{debug, info};
use ztpack_schema::PackageLayout;

use crate::artifacts;
use crate::cmake::CMake;
use crate::context::RecipeContext;
use crate::error::StageError;

/// `package` stage: run the build tool's own install step into the package
/// folder, then sweep the build tree for stray binary artifacts the install
/// missed and route them by extension.
pub fn package(cx: &mut RecipeContext) -> Result<(), StageError> {
    std::fs::create_dir_all(&cx.folders.package_dir)?;

    let cmake = CMake::locate()?;
    cmake.install(
        &cx.folders.build_dir,
        &cx.folders.package_dir,
        &cx.build_log,
        cx.verbose,
    )?;

    let swept = artifacts::sweep_tree(
        &cx.folders.build_dir,
        &cx.folders.package_dir,
        &[&cx.folders.generators_dir],
    )?;
    if !swept.is_empty() {
        debug!(count = swept.len(), "routed stray artifacts");
    }

    info!(package = %cx.folders.package_dir.display(), "packaged");
    Ok(())
}

/// `package_info` stage: compute the layout exported to consumers and
/// write it into the package root.
///
/// A static build (`shared=false`) additionally exports the recipe's
/// static-linkage defines so consumer code can adjust symbol-visibility
/// macros.
pub fn package_info(cx: &mut RecipeContext) -> Result<(), StageError> {
    let spec = &cx.recipe.layout;
    let defines = if cx.is_shared() {
        Vec::new()
    } else {
        spec.static_defines.clone()
    };

    let layout = PackageLayout {
        name: cx.recipe.package.name.clone(),
        version: cx.recipe.package.version.clone(),
        includedirs: spec.includedirs.clone(),
        libdirs: spec.libdirs.clone(),
        bindirs: spec.bindirs.clone(),
        libs: spec.libs.clone(),
        defines,
    };
    layout.write(&cx.folders.package_dir)?;
    cx.layout = Some(layout);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Folders;
    use crate::store::PackageStore;
    use tempfile::tempdir;
    use ztpack_schema::{RecipeManifest, Settings};

    const RECIPE: &str = r#"
[package]
name = "ztcpp"
version = "3.0.1"

[build]
min_cppstd = "17"

[options.shared]
values = [true, false]
default = true

[layout]
libs = ["ztcpp"]
static_defines = ["ZTCPP_STATIC"]
"#;

    fn context(dir: &std::path::Path) -> RecipeContext {
        let recipe = RecipeManifest::from_str(RECIPE).unwrap();
        let store = PackageStore::open(&dir.join("store"));
        let folders = Folders::for_recipe(dir);
        std::fs::create_dir_all(&folders.package_dir).unwrap();
        RecipeContext::new(recipe, Settings::host(), store, folders, false)
    }

    #[test]
    fn test_package_info_shared_has_no_static_define() {
        let tmp = tempdir().unwrap();
        let mut cx = context(tmp.path());
        package_info(&mut cx).unwrap();

        let layout = PackageLayout::read(&cx.folders.package_dir).unwrap();
        assert_eq!(layout.libs, vec!["ztcpp"]);
        assert_eq!(layout.includedirs, vec!["include"]);
        assert_eq!(layout.libdirs, vec!["lib"]);
        assert_eq!(layout.bindirs, vec!["bin"]);
        assert!(layout.defines.is_empty());
    }

    #[test]
    fn test_package_info_static_exports_define() {
        let tmp = tempdir().unwrap();
        let mut cx = context(tmp.path());
        cx.options.set("shared", false).unwrap();
        package_info(&mut cx).unwrap();

        let layout = cx.layout.as_ref().unwrap();
        assert_eq!(layout.defines, vec!["ZTCPP_STATIC"]);
    }
}
