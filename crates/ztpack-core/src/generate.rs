//! Generate stage: toolchain and dependency-resolution files for the
//! external build.
//!
//! Two files go into `<build>/generators/`:
//!
//! - `ztpack_deps.cmake` — where each dependency's headers and libraries
//!   live, as `<NAME>_INCLUDE_DIRS` / `<NAME>_LIBRARY_DIRS` /
//!   `<NAME>_LIBRARIES` variables plus a `CMAKE_PREFIX_PATH` entry.
//! - `ztpack_toolchain.cmake` — derived build flags: language standard,
//!   linkage mode, position-independent code, build type, and the recipe's
//!   pass-through variables. Includes the deps file.
//!
//! The stage has no side effects beyond writing these files.

use std::path::{Path, PathBuf};

use tracing::debug;
use ztpack_schema::{BuildType, CppStd};

use crate::context::RecipeContext;
use crate::error::StageError;
use crate::store::ResolvedDependency;

/// File name of the generated toolchain file.
pub const TOOLCHAIN_FILE: &str = "ztpack_toolchain.cmake";

/// File name of the generated dependency manifest.
pub const DEPS_FILE: &str = "ztpack_deps.cmake";

const HEADER: &str = "# Generated by ztpack. Do not edit.\n";

/// Inputs for a toolchain file.
#[derive(Debug, Clone, Default)]
pub struct ToolchainConfig {
    /// `CMAKE_BUILD_TYPE`.
    pub build_type: Option<BuildType>,
    /// `CMAKE_CXX_STANDARD`.
    pub cppstd: Option<CppStd>,
    /// `BUILD_SHARED_LIBS`, when the recipe has a linkage choice.
    pub shared: Option<bool>,
    /// `CMAKE_POSITION_INDEPENDENT_CODE`, when `fPIC` survived configure.
    pub fpic: Option<bool>,
    /// Pass-through variables, already rendered to CMake syntax.
    pub variables: Vec<(String, String)>,
    /// Compile definitions to force onto every target.
    pub defines: Vec<String>,
    /// Dependency manifest to include, if any.
    pub deps_file: Option<PathBuf>,
}

/// Variable prefix for a dependency: uppercased, `-`/`.` to `_`
/// (`libzt` → `LIBZT`).
pub fn var_prefix(name: &str) -> String {
    name.to_uppercase().replace(['-', '.'], "_")
}

/// Render a path for embedding in a CMake string (forward slashes only).
fn cmake_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

fn cmake_path_list(paths: &[PathBuf]) -> String {
    paths.iter().map(|p| cmake_path(p)).collect::<Vec<_>>().join(";")
}

/// Write the dependency manifest for `deps` to `path`.
pub fn write_deps_file(path: &Path, deps: &[ResolvedDependency]) -> Result<(), StageError> {
    let mut out = String::from(HEADER);
    for dep in deps {
        let prefix = var_prefix(&dep.name);
        let root = cmake_path(&dep.root);
        out.push_str(&format!("\n# {} {}\n", dep.name, dep.version));
        out.push_str(&format!("set({prefix}_ROOT \"{root}\")\n"));
        out.push_str(&format!("list(APPEND CMAKE_PREFIX_PATH \"{root}\")\n"));
        out.push_str(&format!(
            "set({prefix}_INCLUDE_DIRS \"{}\")\n",
            cmake_path_list(&dep.includedirs)
        ));
        out.push_str(&format!(
            "set({prefix}_LIBRARY_DIRS \"{}\")\n",
            cmake_path_list(&dep.libdirs)
        ));
        out.push_str(&format!("set({prefix}_LIBRARIES \"{}\")\n", dep.libs.join(";")));
        if !dep.defines.is_empty() {
            out.push_str(&format!("set({prefix}_DEFINES \"{}\")\n", dep.defines.join(";")));
        }
    }
    std::fs::write(path, out)?;
    Ok(())
}

/// Write a toolchain file for `config` to `path`.
pub fn write_toolchain_file(path: &Path, config: &ToolchainConfig) -> Result<(), StageError> {
    let mut out = String::from(HEADER);

    if let Some(build_type) = config.build_type {
        out.push_str(&format!(
            "set(CMAKE_BUILD_TYPE \"{build_type}\" CACHE STRING \"Build type\")\n"
        ));
    }
    if let Some(std) = config.cppstd {
        out.push_str(&format!(
            "set(CMAKE_CXX_STANDARD {std} CACHE STRING \"C++ standard\")\n"
        ));
        out.push_str("set(CMAKE_CXX_STANDARD_REQUIRED ON CACHE BOOL \"\")\n");
    }
    if let Some(shared) = config.shared {
        out.push_str(&format!(
            "set(BUILD_SHARED_LIBS {} CACHE BOOL \"\")\n",
            on_off(shared)
        ));
    }
    if let Some(fpic) = config.fpic {
        out.push_str(&format!(
            "set(CMAKE_POSITION_INDEPENDENT_CODE {} CACHE BOOL \"\")\n",
            on_off(fpic)
        ));
    }
    for (name, value) in &config.variables {
        out.push_str(&format!("set({name} {value} CACHE STRING \"\")\n"));
    }
    for define in &config.defines {
        out.push_str(&format!("add_compile_definitions({define})\n"));
    }
    if let Some(deps_file) = &config.deps_file {
        out.push_str(&format!("include(\"{}\")\n", cmake_path(deps_file)));
    }

    std::fs::write(path, out)?;
    Ok(())
}

fn on_off(v: bool) -> &'static str {
    if v { "ON" } else { "OFF" }
}

/// The `generate` stage: write both files into the generators folder.
pub fn generate(cx: &mut RecipeContext) -> Result<(), StageError> {
    std::fs::create_dir_all(&cx.folders.generators_dir)?;

    let deps_path = cx.folders.generators_dir.join(DEPS_FILE);
    write_deps_file(&deps_path, &cx.deps)?;

    let mut variables: Vec<(String, String)> = cx
        .recipe
        .toolchain
        .variables
        .iter()
        .map(|(k, v)| (k.clone(), v.to_string()))
        .collect();
    if !cx.is_shared() {
        variables.extend(
            cx.recipe
                .toolchain
                .static_variables
                .iter()
                .map(|(k, v)| (k.clone(), v.to_string())),
        );
    }

    let defines = cx
        .deps
        .iter()
        .flat_map(|d| d.defines.iter().cloned())
        .collect();

    let config = ToolchainConfig {
        build_type: Some(cx.settings.build_type),
        cppstd: cx.settings.effective_cppstd(),
        shared: cx.options.get("shared"),
        fpic: cx.options.get("fPIC"),
        variables,
        defines,
        deps_file: Some(deps_path),
    };
    let toolchain_path = cx.folders.generators_dir.join(TOOLCHAIN_FILE);
    write_toolchain_file(&toolchain_path, &config)?;

    debug!(dir = %cx.folders.generators_dir.display(), "wrote toolchain and deps files");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configure;
    use crate::context::Folders;
    use crate::store::PackageStore;
    use tempfile::tempdir;
    use ztpack_schema::{Arch, Compiler, Os, RecipeManifest, Settings};

    const RECIPE: &str = r#"
[package]
name = "ztcpp"
version = "3.0.1"

[build]
min_cppstd = "17"

[options.shared]
values = [true, false]
default = true

[options.fPIC]
values = [true, false]
default = true

[toolchain.variables]
ZTCPP_SKIP_EXAMPLES = 1

[toolchain.static_variables]
ZTCPP_STATIC = 1

[layout]
libs = ["ztcpp"]
static_defines = ["ZTCPP_STATIC"]
"#;

    fn fake_dep(root: &Path) -> ResolvedDependency {
        ResolvedDependency {
            name: "libzt".to_string(),
            version: semver::Version::new(3, 0, 1),
            root: root.to_path_buf(),
            includedirs: vec![root.join("include")],
            libdirs: vec![root.join("lib")],
            bindirs: vec![],
            libs: vec!["zt".to_string()],
            defines: vec![],
        }
    }

    fn context(dir: &Path, shared: bool) -> RecipeContext {
        let recipe = RecipeManifest::from_str(RECIPE).unwrap();
        let settings = Settings {
            os: Os::Linux,
            arch: Arch::X86_64,
            compiler: Compiler::Gcc,
            compiler_version: 13,
            build_type: ztpack_schema::BuildType::Release,
            cppstd: Some(CppStd::Cpp17),
        };
        let store = PackageStore::open(&dir.join("store"));
        let folders = Folders::for_recipe(dir);
        let mut cx = RecipeContext::new(recipe, settings, store, folders, false);
        cx.options.set("shared", shared).unwrap();
        configure::config_options(&mut cx).unwrap();
        configure::configure(&mut cx).unwrap();
        cx.deps = vec![fake_dep(&dir.join("dep"))];
        cx
    }

    #[test]
    fn test_generate_shared() {
        let tmp = tempdir().unwrap();
        let mut cx = context(tmp.path(), true);
        generate(&mut cx).unwrap();

        let toolchain =
            std::fs::read_to_string(cx.folders.generators_dir.join(TOOLCHAIN_FILE)).unwrap();
        assert!(toolchain.contains("set(CMAKE_CXX_STANDARD 17"));
        assert!(toolchain.contains("set(BUILD_SHARED_LIBS ON"));
        assert!(toolchain.contains("set(ZTCPP_SKIP_EXAMPLES 1"));
        // Shared build: no static marker, and fPIC was pruned.
        assert!(!toolchain.contains("ZTCPP_STATIC"));
        assert!(!toolchain.contains("CMAKE_POSITION_INDEPENDENT_CODE"));

        let deps = std::fs::read_to_string(cx.folders.generators_dir.join(DEPS_FILE)).unwrap();
        assert!(deps.contains("set(LIBZT_INCLUDE_DIRS"));
        assert!(deps.contains("set(LIBZT_LIBRARIES \"zt\")"));
        assert!(deps.contains("list(APPEND CMAKE_PREFIX_PATH"));
    }

    #[test]
    fn test_generate_static() {
        let tmp = tempdir().unwrap();
        let mut cx = context(tmp.path(), false);
        generate(&mut cx).unwrap();

        let toolchain =
            std::fs::read_to_string(cx.folders.generators_dir.join(TOOLCHAIN_FILE)).unwrap();
        assert!(toolchain.contains("set(BUILD_SHARED_LIBS OFF"));
        assert!(toolchain.contains("set(ZTCPP_STATIC 1"));
        assert!(toolchain.contains("set(CMAKE_POSITION_INDEPENDENT_CODE ON"));
    }

    #[test]
    fn test_var_prefix() {
        assert_eq!(var_prefix("libzt"), "LIBZT");
        assert_eq!(var_prefix("my-dep.v2"), "MY_DEP_V2");
    }
}
