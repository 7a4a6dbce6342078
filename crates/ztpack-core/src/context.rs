//! The per-invocation configuration object the pipeline stages share.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ztpack_schema::{PackageLayout, RecipeManifest, Settings};

use crate::options::OptionSet;
use crate::paths;
use crate::store::{PackageStore, ResolvedDependency};

/// Working directories for one recipe invocation.
#[derive(Debug, Clone)]
pub struct Folders {
    /// Directory containing the recipe descriptor.
    pub recipe_dir: PathBuf,
    /// Root of the source tree handed to the build tool.
    pub source_dir: PathBuf,
    /// Out-of-source build tree.
    pub build_dir: PathBuf,
    /// Where the generate stage writes toolchain/deps files.
    pub generators_dir: PathBuf,
    /// Where the package stage assembles the final layout.
    pub package_dir: PathBuf,
}

impl Folders {
    /// Conventional folders next to a recipe: sources in the recipe
    /// directory itself, `build/` and `package/` beneath it.
    pub fn for_recipe(recipe_dir: &Path) -> Self {
        let build_dir = recipe_dir.join("build");
        Self {
            recipe_dir: recipe_dir.to_path_buf(),
            source_dir: recipe_dir.to_path_buf(),
            generators_dir: build_dir.join("generators"),
            package_dir: recipe_dir.join("package"),
            build_dir,
        }
    }

    /// Replace the source directory (for recipes that sit outside the
    /// source tree they build).
    pub fn with_source_dir(mut self, source_dir: &Path) -> Self {
        self.source_dir = source_dir.to_path_buf();
        self
    }
}

/// The one mutable configuration object the pipeline operates on.
///
/// Built once per invocation, mutated in place by the configure stages,
/// read-only afterwards. There is no concurrent access.
#[derive(Debug)]
pub struct RecipeContext {
    /// The recipe being built.
    pub recipe: RecipeManifest,
    /// Ambient settings (OS, arch, compiler, build type, C++ standard).
    pub settings: Settings,
    /// Effective option set; pruned during configure.
    pub options: OptionSet,
    /// Option values forced onto dependencies (keyed by dependency name).
    /// Populated during configure, honored during requirements.
    pub dep_option_overrides: BTreeMap<String, BTreeMap<String, bool>>,
    /// Working directories.
    pub folders: Folders,
    /// Store used to resolve dependency references.
    pub store: PackageStore,
    /// Dependencies resolved by the requirements stage.
    pub deps: Vec<ResolvedDependency>,
    /// Layout produced by the `package_info` stage.
    pub layout: Option<PackageLayout>,
    /// Stream subprocess output instead of redirecting it to the log file.
    pub verbose: bool,
    /// Build log destination for non-verbose runs.
    pub build_log: PathBuf,
}

impl RecipeContext {
    /// Assemble a fresh context. Options start at their declared defaults;
    /// command line overrides are applied by the caller through
    /// [`OptionSet::set`] before the pipeline runs.
    pub fn new(
        recipe: RecipeManifest,
        settings: Settings,
        store: PackageStore,
        folders: Folders,
        verbose: bool,
    ) -> Self {
        let options = OptionSet::from_declarations(&recipe.options);
        let build_log = paths::build_log_path(&recipe.package.name, &recipe.package.version);
        Self {
            recipe,
            settings,
            options,
            dep_option_overrides: BTreeMap::new(),
            folders,
            store,
            deps: Vec::new(),
            layout: None,
            verbose,
            build_log,
        }
    }

    /// Whether this invocation builds a shared library.
    ///
    /// `shared` is a declared option of every recipe in this family; if a
    /// recipe omits it, the build is treated as static.
    pub fn is_shared(&self) -> bool {
        self.options.is_enabled("shared")
    }
}
