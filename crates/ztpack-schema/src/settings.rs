//! Ambient build settings: compiler, build type, and the full settings set.

use serde::{Deserialize, Serialize};

use crate::{Arch, CppStd, Os};

/// Compiler family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Compiler {
    /// GNU GCC.
    Gcc,
    /// LLVM Clang.
    Clang,
    /// Apple's Clang fork shipped with Xcode.
    AppleClang,
    /// Microsoft Visual C++.
    Msvc,
}

impl Compiler {
    /// The C++ standard this compiler defaults to when no `-std=` flag is
    /// given, keyed by major version.
    ///
    /// Returns `None` for versions old enough that the default predates
    /// C++11; the minimum-standard check treats that as "below any
    /// supported level".
    pub fn default_cppstd(&self, major_version: u32) -> Option<CppStd> {
        match self {
            Self::Gcc => match major_version {
                0..=5 => None,
                6..=10 => Some(CppStd::Cpp14),
                _ => Some(CppStd::Cpp17),
            },
            Self::Clang => match major_version {
                0..=5 => None,
                6..=15 => Some(CppStd::Cpp14),
                _ => Some(CppStd::Cpp17),
            },
            Self::AppleClang => match major_version {
                0..=9 => None,
                10..=14 => Some(CppStd::Cpp14),
                _ => Some(CppStd::Cpp17),
            },
            // MSVC has defaulted to C++14 since VS2015 (toolset 190).
            Self::Msvc => {
                if major_version >= 190 {
                    Some(CppStd::Cpp14)
                } else {
                    None
                }
            }
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gcc => "gcc",
            Self::Clang => "clang",
            Self::AppleClang => "apple-clang",
            Self::Msvc => "msvc",
        }
    }
}

impl std::fmt::Display for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Compiler {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gcc" | "g++" => Ok(Self::Gcc),
            "clang" => Ok(Self::Clang),
            "apple-clang" | "appleclang" => Ok(Self::AppleClang),
            "msvc" | "visual-studio" => Ok(Self::Msvc),
            _ => Err(format!("Unknown compiler: {s}")),
        }
    }
}

/// CMake-style build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BuildType {
    /// Unoptimized, with debug info.
    Debug,
    /// Optimized.
    #[default]
    Release,
    /// Optimized, with debug info.
    RelWithDebInfo,
    /// Optimized for size.
    MinSizeRel,
}

impl BuildType {
    /// The exact spelling `CMAKE_BUILD_TYPE` expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
            Self::RelWithDebInfo => "RelWithDebInfo",
            Self::MinSizeRel => "MinSizeRel",
        }
    }
}

impl std::fmt::Display for BuildType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BuildType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "release" => Ok(Self::Release),
            "relwithdebinfo" => Ok(Self::RelWithDebInfo),
            "minsizerel" => Ok(Self::MinSizeRel),
            _ => Err(format!("Unknown build type: {s}")),
        }
    }
}

/// The full ambient settings set a recipe is configured against.
///
/// Defaults come from host detection ([`Settings::host`]); every field can
/// be overridden from the command line for cross builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Target operating system.
    pub os: Os,
    /// Target CPU architecture.
    pub arch: Arch,
    /// Compiler family.
    pub compiler: Compiler,
    /// Compiler major version (MSVC: toolset version, e.g. 194).
    pub compiler_version: u32,
    /// Build configuration.
    pub build_type: BuildType,
    /// Explicitly requested C++ standard. When unset, the compiler's
    /// default standard is consulted by the minimum-standard check.
    pub cppstd: Option<CppStd>,
}

impl Settings {
    /// Detect settings for the host ztpack is running on.
    ///
    /// Compiler versions are conservative baselines for each platform's
    /// current toolchain; pass explicit overrides when they matter.
    pub fn host() -> Self {
        let os = Os::current();
        let (compiler, compiler_version) = match os {
            Os::Windows => (Compiler::Msvc, 194),
            Os::Macos => (Compiler::AppleClang, 15),
            Os::Linux => (Compiler::Gcc, 13),
        };
        Self {
            os,
            arch: Arch::current(),
            compiler,
            compiler_version,
            build_type: BuildType::Release,
            cppstd: None,
        }
    }

    /// The standard the build will actually use: the explicit setting if
    /// present, otherwise the compiler's default.
    pub fn effective_cppstd(&self) -> Option<CppStd> {
        self.cppstd
            .or_else(|| self.compiler.default_cppstd(self.compiler_version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiler_default_standards() {
        assert_eq!(Compiler::Gcc.default_cppstd(13), Some(CppStd::Cpp17));
        assert_eq!(Compiler::Gcc.default_cppstd(9), Some(CppStd::Cpp14));
        assert_eq!(Compiler::Gcc.default_cppstd(4), None);
        assert_eq!(Compiler::Msvc.default_cppstd(194), Some(CppStd::Cpp14));
        assert_eq!(Compiler::Clang.default_cppstd(17), Some(CppStd::Cpp17));
    }

    #[test]
    fn test_effective_cppstd_prefers_explicit() {
        let mut settings = Settings::host();
        settings.compiler = Compiler::Gcc;
        settings.compiler_version = 9;
        assert_eq!(settings.effective_cppstd(), Some(CppStd::Cpp14));

        settings.cppstd = Some(CppStd::Cpp20);
        assert_eq!(settings.effective_cppstd(), Some(CppStd::Cpp20));
    }

    #[test]
    fn test_build_type_cmake_spelling() {
        assert_eq!(BuildType::RelWithDebInfo.as_str(), "RelWithDebInfo");
        assert_eq!(
            "relwithdebinfo".parse::<BuildType>().unwrap(),
            BuildType::RelWithDebInfo
        );
    }
}
