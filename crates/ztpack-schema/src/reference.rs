//! Dependency coordinates: `name/version[@user/channel]`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while parsing a [`PackageRef`].
#[derive(Error, Debug)]
pub enum RefError {
    /// The string does not match `name/version[@user/channel]`.
    #[error("Invalid package reference '{0}': expected name/version[@user/channel]")]
    Malformed(String),

    /// The version component is not a valid semantic version.
    #[error("Invalid version in package reference: {0}")]
    Version(#[from] semver::Error),
}

/// A pinned reference to one external package.
///
/// The grammar matches the dependency coordinates the ztcpp recipes have
/// used across releases: `libzt/3.0.0`, `libzt/1.1.0@jbatnozic/stable`.
/// `user` and `channel` always come as a pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageRef {
    /// Package name, e.g. `libzt`.
    pub name: String,
    /// Pinned version.
    pub version: semver::Version,
    /// Optional owner qualifier.
    pub user: Option<String>,
    /// Optional channel qualifier (e.g. `stable`).
    pub channel: Option<String>,
}

impl PackageRef {
    /// Shorthand for a reference without user/channel qualifiers.
    pub fn new(name: &str, version: semver::Version) -> Self {
        Self {
            name: name.to_string(),
            version,
            user: None,
            channel: None,
        }
    }
}

impl std::fmt::Display for PackageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.name, self.version)?;
        if let (Some(user), Some(channel)) = (&self.user, &self.channel) {
            write!(f, "@{user}/{channel}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for PackageRef {
    type Err = RefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || RefError::Malformed(s.to_string());

        let (coord, qualifier) = match s.split_once('@') {
            Some((coord, qualifier)) => (coord, Some(qualifier)),
            None => (s, None),
        };

        let (name, version) = coord.split_once('/').ok_or_else(malformed)?;
        if name.is_empty() || version.is_empty() {
            return Err(malformed());
        }

        let (user, channel) = match qualifier {
            Some(q) => {
                let (user, channel) = q.split_once('/').ok_or_else(malformed)?;
                if user.is_empty() || channel.is_empty() {
                    return Err(malformed());
                }
                (Some(user.to_string()), Some(channel.to_string()))
            }
            None => (None, None),
        };

        Ok(Self {
            name: name.to_string(),
            version: version.parse()?,
            user,
            channel,
        })
    }
}

impl TryFrom<String> for PackageRef {
    type Error = RefError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PackageRef> for String {
    fn from(r: PackageRef) -> Self {
        r.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let r: PackageRef = "libzt/3.0.0".parse().unwrap();
        assert_eq!(r.name, "libzt");
        assert_eq!(r.version, semver::Version::new(3, 0, 0));
        assert!(r.user.is_none());
        assert!(r.channel.is_none());
    }

    #[test]
    fn test_parse_with_channel() {
        let r: PackageRef = "libzt/1.1.0@jbatnozic/stable".parse().unwrap();
        assert_eq!(r.name, "libzt");
        assert_eq!(r.version, semver::Version::new(1, 1, 0));
        assert_eq!(r.user.as_deref(), Some("jbatnozic"));
        assert_eq!(r.channel.as_deref(), Some("stable"));
    }

    #[test]
    fn test_display_roundtrip() {
        for s in ["libzt/3.0.0", "libzt/3.0.1@jbatnozic/stable"] {
            let r: PackageRef = s.parse().unwrap();
            assert_eq!(r.to_string(), s);
        }
    }

    #[test]
    fn test_rejects_malformed() {
        assert!("libzt".parse::<PackageRef>().is_err());
        assert!("libzt/".parse::<PackageRef>().is_err());
        assert!("libzt/3.0.0@jbatnozic".parse::<PackageRef>().is_err());
        assert!("libzt/not-a-version".parse::<PackageRef>().is_err());
    }
}
