//! Strongly-typed identifiers for the Hypothesis Lab domain.
//!
//! Analyses are keyed by the row id the database assigns; stored datasets are
//! keyed by a time-ordered UUID v7 so that uploads with the same filename never
//! collide.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a persisted analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisId(i64);

impl AnalysisId {
    /// Wrap a database row id
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying row id
    #[inline]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for AnalysisId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<AnalysisId> for i64 {
    fn from(id: AnalysisId) -> Self {
        id.0
    }
}

/// Key under which the raw bytes of an uploaded dataset are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetKey(Uuid);

impl DatasetKey {
    /// Create a new key with a time-ordered UUID v7
    #[inline]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get a reference to the underlying UUID
    #[inline]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DatasetKey {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for DatasetKey {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for DatasetKey {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
