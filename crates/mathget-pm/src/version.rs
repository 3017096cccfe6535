//! Dot-separated numeric version handling
//!
//! MathScript package versions are plain dot-separated numbers ("1.2.10").
//! There is no prerelease or build metadata; ordering compares each
//! component as an integer, so "1.10.0" sorts after "1.9.0".

use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while parsing a version string
#[derive(Debug, Error)]
pub enum VersionError {
    /// A component was not a plain non-negative integer
    #[error("invalid version component in \"{0}\"")]
    InvalidComponent(String),

    /// The version string was empty
    #[error("empty version string")]
    Empty,
}

/// A parsed version, keeping the original string for display and
/// filename round-trips.
#[derive(Debug, Clone)]
pub struct Version {
    components: Vec<u64>,
    raw: String,
}

impl Version {
    /// Parse a version string such as "1.2.10".
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(VersionError::Empty);
        }

        let components = s
            .split('.')
            .map(|component| {
                component
                    .parse::<u64>()
                    .map_err(|_| VersionError::InvalidComponent(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            components,
            raw: s.to_string(),
        })
    }

    /// The version exactly as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// Equality and ordering are component-wise; "1.2" and a hypothetical
// "01.2" compare equal even though their raw strings differ.
impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.components.cmp(&other.components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_parse_components() {
        assert_eq!(v("1.2.10").components(), &[1, 2, 10]);
        assert_eq!(v("0.1").components(), &[0, 1]);
        assert_eq!(v("3").components(), &[3]);
    }

    #[test]
    fn test_numeric_ordering_beats_lexicographic() {
        assert!(v("1.10.0") > v("1.9.0"));
        assert!(v("2.0.0") > v("1.99.99"));
    }

    #[test]
    fn test_shorter_prefix_sorts_first() {
        assert!(v("1.2") < v("1.2.0"));
        assert!(v("1.2.1") > v("1.2"));
    }

    #[test]
    fn test_display_round_trips() {
        assert_eq!(v("1.2.10").to_string(), "1.2.10");
    }

    #[test]
    fn test_invalid_components_rejected() {
        assert!(Version::parse("1.a.0").is_err());
        assert!(Version::parse("1..0").is_err());
        assert!(Version::parse("").is_err());
        assert!(Version::parse("1.0-beta").is_err());
    }
}
