//! Quotation version labels.

use serde::{Deserialize, Serialize};

/// Structured version label: the leading integer deal lineage (`major`) and
/// a free-form iteration suffix (`minor`). Renders as `"{major}.{minor}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionLabel {
    pub major: u64,
    pub minor: String,
}

impl VersionLabel {
    pub fn new(major: u64, minor: impl Into<String>) -> Self {
        Self {
            major,
            minor: minor.into(),
        }
    }

    /// First version of a new deal lineage, e.g. `3.0`.
    pub fn first_of_lineage(major: u64) -> Self {
        Self::new(major, "0")
    }
}

impl std::fmt::Display for VersionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
