// ABOUTME: Engine API version parsing and comparison.
// ABOUTME: Versions are dotted numeric triples; a missing patch component is zero.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseVersionError {
    #[error("version cannot be empty")]
    Empty,

    #[error("invalid version '{0}': expected MAJOR.MINOR or MAJOR.MINOR.PATCH")]
    InvalidFormat(String),
}

/// A dotted API version such as `1.19` or `1.2.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ApiVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            patch: 0,
        }
    }

    pub fn parse(input: &str) -> Result<Self, ParseVersionError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseVersionError::Empty);
        }

        let invalid = || ParseVersionError::InvalidFormat(input.to_string());
        let parts = input
            .split('.')
            .map(|p| {
                if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                p.parse::<u32>().map_err(|_| invalid())
            })
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [major, minor] => Ok(Self::new(*major, *minor)),
            [major, minor, patch] => Ok(Self {
                major: *major,
                minor: *minor,
                patch: *patch,
            }),
            _ => Err(invalid()),
        }
    }

    /// Whether this version is the same as or newer than `other`.
    pub fn at_least(&self, other: ApiVersion) -> bool {
        *self >= other
    }
}

impl FromStr for ApiVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patch == 0 {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}

/// Three-way version comparison with an inverted sign.
///
/// Returns `1` when `v1` is older than `v2`, `-1` when it is newer and `0`
/// when they are equal, so `compare_versions("1.9", "1.10")` is `1`. Use
/// [`ApiVersion`]'s `Ord` for the conventional direction.
pub fn compare_versions(v1: &str, v2: &str) -> Result<i8, ParseVersionError> {
    let v1 = ApiVersion::parse(v1)?;
    let v2 = ApiVersion::parse(v2)?;
    Ok(match v1.cmp(&v2) {
        Ordering::Equal => 0,
        Ordering::Greater => -1,
        Ordering::Less => 1,
    })
}
