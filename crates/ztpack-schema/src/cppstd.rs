//! C++ language standard levels.

use serde::{Deserialize, Serialize};

/// A C++ standard level.
///
/// Ordered, so minimum-standard checks are plain comparisons:
/// `CppStd::Cpp14 < CppStd::Cpp17`. GNU dialect markers (`gnu17`) are
/// accepted on input but not tracked; only the level matters for the
/// minimum-standard assertion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(try_from = "String", into = "String")]
pub enum CppStd {
    /// C++11.
    Cpp11,
    /// C++14.
    Cpp14,
    /// C++17.
    #[default]
    Cpp17,
    /// C++20.
    Cpp20,
    /// C++23.
    Cpp23,
}

impl CppStd {
    /// Two-digit year form, e.g. `17`. This is what `CMAKE_CXX_STANDARD`
    /// expects.
    pub fn year(&self) -> u8 {
        match self {
            Self::Cpp11 => 11,
            Self::Cpp14 => 14,
            Self::Cpp17 => 17,
            Self::Cpp20 => 20,
            Self::Cpp23 => 23,
        }
    }
}

impl std::fmt::Display for CppStd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.year())
    }
}

impl std::str::FromStr for CppStd {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let digits = normalized
            .strip_prefix("gnu++")
            .or_else(|| normalized.strip_prefix("c++"))
            .or_else(|| normalized.strip_prefix("gnu"))
            .unwrap_or(&normalized);
        match digits {
            "11" => Ok(Self::Cpp11),
            "14" => Ok(Self::Cpp14),
            "17" => Ok(Self::Cpp17),
            "20" => Ok(Self::Cpp20),
            "23" => Ok(Self::Cpp23),
            _ => Err(format!("Unknown C++ standard: {s}")),
        }
    }
}

impl TryFrom<String> for CppStd {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CppStd> for String {
    fn from(std: CppStd) -> Self {
        std.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(CppStd::Cpp14 < CppStd::Cpp17);
        assert!(CppStd::Cpp20 > CppStd::Cpp17);
        assert!(CppStd::Cpp17 >= CppStd::Cpp17);
    }

    #[test]
    fn test_parse_dialects() {
        assert_eq!("17".parse::<CppStd>().unwrap(), CppStd::Cpp17);
        assert_eq!("gnu17".parse::<CppStd>().unwrap(), CppStd::Cpp17);
        assert_eq!("c++20".parse::<CppStd>().unwrap(), CppStd::Cpp20);
        assert_eq!("gnu++14".parse::<CppStd>().unwrap(), CppStd::Cpp14);
        assert!("03".parse::<CppStd>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(CppStd::Cpp17.to_string(), "17");
    }
}
