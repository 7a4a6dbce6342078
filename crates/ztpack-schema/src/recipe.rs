//! TOML recipe parsing
//!
//! Human-readable package build descriptors.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CppStd, PackageRef};

/// Errors produced while loading or validating a recipe.
#[derive(Error, Debug)]
pub enum RecipeError {
    /// The recipe file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The recipe file is not valid TOML for this schema.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The recipe parsed but is internally inconsistent.
    #[error("Invalid recipe: {0}")]
    Invalid(String),
}

/// Package identity and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMeta {
    /// Package name (also the default library target name).
    pub name: String,
    /// Release version.
    pub version: semver::Version,
    /// SPDX license identifier.
    #[serde(default)]
    pub license: String,
    /// Author, `Name <email>`.
    #[serde(default)]
    pub author: String,
    /// Upstream project URL.
    #[serde(default)]
    pub url: String,
    /// One-line description.
    #[serde(default)]
    pub description: String,
}

/// Build requirements checked before any build work starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReqs {
    /// Minimum C++ standard the package's sources need.
    pub min_cppstd: CppStd,
}

/// Declaration of one boolean build option: the values it may take and its
/// default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionDecl {
    /// Allowed values.
    pub values: Vec<bool>,
    /// Default value, applied when no override is given.
    pub default: bool,
}

/// Pinned external dependencies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencySpec {
    /// References resolved before the build and linked statically into the
    /// package.
    #[serde(default)]
    pub requires: Vec<PackageRef>,
}

/// A value passed through to the build system's toolchain file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarValue {
    /// Boolean, rendered as `ON`/`OFF`.
    Bool(bool),
    /// Integer, rendered as-is.
    Int(i64),
    /// String, rendered quoted.
    Str(String),
}

impl std::fmt::Display for VarValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(true) => write!(f, "ON"),
            Self::Bool(false) => write!(f, "OFF"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "\"{s}\""),
        }
    }
}

/// Variables the generate stage forwards to the toolchain file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolchainSpec {
    /// Always emitted.
    #[serde(default)]
    pub variables: BTreeMap<String, VarValue>,
    /// Emitted only when the package is built with `shared=false`.
    #[serde(default)]
    pub static_variables: BTreeMap<String, VarValue>,
}

/// The layout contract exported to consumers of the finished package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSpec {
    /// Linkable library names.
    pub libs: Vec<String>,
    /// Header roots, relative to the package root.
    #[serde(default = "default_includedirs")]
    pub includedirs: Vec<String>,
    /// Library directories, relative to the package root.
    #[serde(default = "default_libdirs")]
    pub libdirs: Vec<String>,
    /// Runtime binary directories, relative to the package root.
    #[serde(default = "default_bindirs")]
    pub bindirs: Vec<String>,
    /// Preprocessor defines exported only for static builds.
    #[serde(default)]
    pub static_defines: Vec<String>,
}

fn default_includedirs() -> Vec<String> {
    vec!["include".to_string()]
}

fn default_libdirs() -> Vec<String> {
    vec!["lib".to_string()]
}

fn default_bindirs() -> Vec<String> {
    vec!["bin".to_string()]
}

/// Complete build recipe for one package release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeManifest {
    /// Identity and metadata.
    pub package: PackageMeta,
    /// Pre-build requirements.
    pub build: BuildReqs,
    /// Declared build options.
    #[serde(default)]
    pub options: BTreeMap<String, OptionDecl>,
    /// Pinned external dependencies.
    #[serde(default)]
    pub dependencies: DependencySpec,
    /// Toolchain pass-through variables.
    #[serde(default)]
    pub toolchain: ToolchainSpec,
    /// Exported package layout.
    pub layout: LayoutSpec,
}

impl RecipeManifest {
    /// Parse a recipe from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, RecipeError> {
        let content = fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a recipe from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, RecipeError> {
        let recipe: Self = toml::from_str(content)?;
        recipe.validate()?;
        Ok(recipe)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check internal consistency: non-empty identity, option defaults
    /// within their allowed values, non-empty layout library list.
    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.package.name.is_empty() {
            return Err(RecipeError::Invalid("package.name is empty".to_string()));
        }
        for (name, decl) in &self.options {
            if decl.values.is_empty() {
                return Err(RecipeError::Invalid(format!(
                    "option '{name}' declares no allowed values"
                )));
            }
            if !decl.values.contains(&decl.default) {
                return Err(RecipeError::Invalid(format!(
                    "option '{name}' defaults to {} which is not in its allowed values",
                    decl.default
                )));
            }
        }
        if self.layout.libs.is_empty() {
            return Err(RecipeError::Invalid("layout.libs is empty".to_string()));
        }
        Ok(())
    }
}
