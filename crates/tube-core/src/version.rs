//! # Release Versions
//!
//! Dotted numeric versions as used in release tags (`1.2`, `v1.3.0`).
//!
//! Missing components compare as zero, so `1.2 == 1.2.0`. Only a newer
//! version triggers an update; a different but older tag does not.

use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// A parsed release version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReleaseVersion {
    // Trailing zeros trimmed; never empty.
    components: Vec<u64>,
}

impl ReleaseVersion {
    /// Parses a tag such as `1.2`, `v1.3.0` or `V2`.
    ///
    /// ## Errors
    /// [`CoreError::InvalidVersion`] for empty tags, empty components
    /// (`1..2`), and anything that is not a digit (`1.2-beta`).
    pub fn parse(tag: &str) -> CoreResult<Self> {
        let trimmed = tag.trim();
        let digits = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        if digits.is_empty() {
            return Err(CoreError::InvalidVersion(tag.to_string()));
        }

        let mut components = digits
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(CoreError::InvalidVersion(tag.to_string()));
                }
                part.parse::<u64>()
                    .map_err(|_| CoreError::InvalidVersion(tag.to_string()))
            })
            .collect::<CoreResult<Vec<u64>>>()?;

        while components.len() > 1 && components.last() == Some(&0) {
            components.pop();
        }

        Ok(ReleaseVersion { components })
    }

    /// Returns true if `self` is strictly newer than `other`.
    pub fn is_newer_than(&self, other: &ReleaseVersion) -> bool {
        self > other
    }
}

impl FromStr for ReleaseVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReleaseVersion::parse(s)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for component in &self.components {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{component}")?;
            first = false;
        }
        Ok(())
    }
}
