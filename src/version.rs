//! Format-version marker.
//!
//! Each store keeps one reserved entry recording the layout its contents were
//! written with. Bump [`FormatVersion::CURRENT`] when stored data changes in a
//! breaking way. Versions start at 1; 0 is never valid.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Reserved key holding the marker
pub const VERSION_KEY: &str = "formatVersion";

/// A valid (non-zero) format version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct FormatVersion(NonZeroU32);

impl FormatVersion {
    /// Version written by this release
    pub const CURRENT: FormatVersion = FormatVersion(match NonZeroU32::new(1) {
        Some(v) => v,
        None => unreachable!(),
    });

    /// `None` for 0
    pub fn new(version: u32) -> Option<Self> {
        NonZeroU32::new(version).map(FormatVersion)
    }

    /// Numeric value
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for FormatVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for FormatVersion {
    type Error = String;

    fn try_from(version: u32) -> Result<Self, Self::Error> {
        Self::new(version).ok_or_else(|| "format version must be at least 1".to_string())
    }
}

impl From<FormatVersion> for u32 {
    fn from(version: FormatVersion) -> Self {
        version.get()
    }
}
