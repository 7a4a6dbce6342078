//! ztpack - recipe-driven build and packaging for ZTCpp
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! The CLI over the `ztpack-core` pipeline. One recipe descriptor drives
//! the whole lifecycle: configure options and settings, generate toolchain
//! inputs, run the external CMake build, collect artifacts into the
//! canonical package layout, export consumer metadata, and validate the
//! result with a consumer test build.
//!
//! # Commands
//!
//! - `create` - full lifecycle, install into the store, run the test package
//! - `build` - stop after the build stage
//! - `package` - stop after metadata export (no store install)
//! - `test` - validate an existing package directory
//! - `check` - validate a recipe descriptor
//! - `info` - show a package's exported layout

pub mod cmd;
pub mod ui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ztpack_schema::{Arch, BuildType, Compiler, CppStd, Os, Settings};

#[derive(Debug, Parser)]
#[command(name = "ztpack")]
#[command(author, version, about = "ztpack - build and package ZTCpp releases")]
pub struct Cli {
    /// Stream build tool output instead of logging it
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Package store root (default: ~/.ztpack/store, env ZTPACK_HOME)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full lifecycle, install into the store, and test the result
    Create {
        /// Recipe file (ztcpp.toml)
        recipe: PathBuf,
        /// Source tree to build (default: the recipe's directory)
        #[arg(long)]
        source_dir: Option<PathBuf>,
        /// Consumer test project (default: <recipe dir>/test_package)
        #[arg(long)]
        test_project: Option<PathBuf>,
        /// Skip the test-package validation
        #[arg(long)]
        skip_test: bool,
        #[command(flatten)]
        settings: SettingsArgs,
        /// Option overrides, e.g. -o shared=False
        #[arg(short = 'o', long = "option")]
        options: Vec<String>,
    },
    /// Configure, generate, and build; stop before packaging
    Build {
        /// Recipe file (ztcpp.toml)
        recipe: PathBuf,
        /// Source tree to build (default: the recipe's directory)
        #[arg(long)]
        source_dir: Option<PathBuf>,
        #[command(flatten)]
        settings: SettingsArgs,
        /// Option overrides, e.g. -o shared=False
        #[arg(short = 'o', long = "option")]
        options: Vec<String>,
    },
    /// Run the lifecycle through metadata export, without a store install
    Package {
        /// Recipe file (ztcpp.toml)
        recipe: PathBuf,
        /// Source tree to build (default: the recipe's directory)
        #[arg(long)]
        source_dir: Option<PathBuf>,
        #[command(flatten)]
        settings: SettingsArgs,
        /// Option overrides, e.g. -o shared=False
        #[arg(short = 'o', long = "option")]
        options: Vec<String>,
    },
    /// Build and run the consumer test against an existing package
    Test {
        /// Package directory (containing the layout manifest)
        package_dir: PathBuf,
        /// Consumer test project (default: ./test_package)
        #[arg(long)]
        test_project: Option<PathBuf>,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Validate a recipe file
    Check {
        /// Recipe file to check
        recipe: PathBuf,
    },
    /// Show the layout a package exports to consumers
    Info {
        /// Package directory (or store path)
        package_dir: PathBuf,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Settings overrides shared by the lifecycle commands. Anything not given
/// falls back to host detection.
#[derive(Debug, clap::Args)]
pub struct SettingsArgs {
    /// Target operating system
    #[arg(long)]
    pub os: Option<Os>,

    /// Target architecture
    #[arg(long)]
    pub arch: Option<Arch>,

    /// Compiler family
    #[arg(long)]
    pub compiler: Option<Compiler>,

    /// Compiler major version (MSVC: toolset version)
    #[arg(long)]
    pub compiler_version: Option<u32>,

    /// Build configuration
    #[arg(long)]
    pub build_type: Option<BuildType>,

    /// C++ standard (e.g. 17, gnu17)
    #[arg(long)]
    pub cppstd: Option<CppStd>,
}

impl SettingsArgs {
    /// Host settings with these overrides applied.
    pub fn resolve(&self) -> Settings {
        let mut settings = Settings::host();
        if let Some(os) = self.os {
            settings.os = os;
        }
        if let Some(arch) = self.arch {
            settings.arch = arch;
        }
        if let Some(compiler) = self.compiler {
            settings.compiler = compiler;
        }
        if let Some(version) = self.compiler_version {
            settings.compiler_version = version;
        }
        if let Some(build_type) = self.build_type {
            settings.build_type = build_type;
        }
        settings.cppstd = self.cppstd.or(settings.cppstd);
        settings
    }
}

/// Parse `-o name=value` overrides into (name, bool) pairs.
///
/// Values accept `True`/`False`, `true`/`false`, and `1`/`0`.
pub fn parse_option_overrides(raw: &[String]) -> anyhow::Result<Vec<(String, bool)>> {
    raw.iter()
        .map(|spec| {
            let (name, value) = spec
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("Invalid option '{spec}': expected name=value"))?;
            let value = match value.to_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                other => anyhow::bail!("Invalid value '{other}' for option '{name}'"),
            };
            Ok((name.to_string(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_option_overrides() {
        let parsed =
            parse_option_overrides(&["shared=False".to_string(), "fPIC=1".to_string()]).unwrap();
        assert_eq!(
            parsed,
            vec![("shared".to_string(), false), ("fPIC".to_string(), true)]
        );

        assert!(parse_option_overrides(&["shared".to_string()]).is_err());
        assert!(parse_option_overrides(&["shared=maybe".to_string()]).is_err());
    }

    #[test]
    fn test_settings_args_resolve() {
        let args = SettingsArgs {
            os: Some(Os::Windows),
            arch: None,
            compiler: None,
            compiler_version: Some(194),
            build_type: Some(BuildType::Debug),
            cppstd: Some(CppStd::Cpp20),
        };
        let settings = args.resolve();
        assert_eq!(settings.os, Os::Windows);
        assert_eq!(settings.compiler_version, 194);
        assert_eq!(settings.build_type, BuildType::Debug);
        assert_eq!(settings.cppstd, Some(CppStd::Cpp20));
    }
}
