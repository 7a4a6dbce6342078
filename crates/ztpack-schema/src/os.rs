//! Target operating system.

use serde::{Deserialize, Serialize};

/// Operating system a package is built for.
///
/// Doubles as the host OS (via [`Os::current`]) and as a settings value that
/// can be overridden for cross builds. Windows is special-cased throughout
/// the pipeline: the `fPIC` option never applies there, and runtime library
/// discovery goes through `PATH` instead of the loader path variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    /// Microsoft Windows (MSVC toolchains).
    Windows,
    /// Linux distributions.
    Linux,
    /// Apple macOS.
    Macos,
}

impl Os {
    /// Get the operating system ztpack is running on.
    pub fn current() -> Self {
        #[cfg(target_os = "windows")]
        {
            Self::Windows
        }
        #[cfg(target_os = "macos")]
        {
            Self::Macos
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            Self::Linux
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::Macos => "macos",
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Os {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "windows" | "win" | "win32" | "win64" => Ok(Self::Windows),
            "linux" => Ok(Self::Linux),
            "macos" | "darwin" | "osx" => Ok(Self::Macos),
            _ => Err(format!("Unknown operating system: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("darwin".parse::<Os>().unwrap(), Os::Macos);
        assert_eq!("Windows".parse::<Os>().unwrap(), Os::Windows);
        assert_eq!("linux".parse::<Os>().unwrap(), Os::Linux);
        assert!("beos".parse::<Os>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for os in [Os::Windows, Os::Linux, Os::Macos] {
            assert_eq!(os.to_string().parse::<Os>().unwrap(), os);
        }
    }
}
