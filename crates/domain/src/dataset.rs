//! Datasets consumed by the statistics engine.

use crate::errors::DatasetError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single `(group, value)` record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Group label
    pub group: String,
    /// Measured value
    pub value: f64,
}

impl Observation {
    /// Create an observation
    pub fn new(group: impl Into<String>, value: f64) -> Self {
        Self {
            group: group.into(),
            value,
        }
    }
}

/// Validated, non-empty, ordered sequence of observations.
///
/// Every value is finite. The dataset is immutable once built; the engine
/// borrows it and never modifies it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    /// Build a dataset, rejecting empty input and non-finite values
    pub fn new(observations: Vec<Observation>) -> Result<Self, DatasetError> {
        if observations.is_empty() {
            return Err(DatasetError::Empty);
        }
        if let Some(row) = observations.iter().position(|o| !o.value.is_finite()) {
            return Err(DatasetError::NonFinite { row: row + 1 });
        }
        Ok(Self { observations })
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Always false for a constructed dataset
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Observations in input order
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// The full value column in input order
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    /// Number of distinct group labels
    pub fn group_count(&self) -> usize {
        self.partition().len()
    }

    /// Partition values by group label, in order of first appearance
    pub fn partition(&self) -> GroupPartition {
        let mut groups: IndexMap<String, Vec<f64>> = IndexMap::new();
        for obs in &self.observations {
            groups.entry(obs.group.clone()).or_default().push(obs.value);
        }
        GroupPartition { groups }
    }
}

impl<'de> Deserialize<'de> for Dataset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            observations: Vec<Observation>,
        }
        let raw = Raw::deserialize(deserializer)?;
        Dataset::new(raw.observations).map_err(serde::de::Error::custom)
    }
}

/// Values grouped by label.
///
/// Keys keep the order in which each label first appeared in the dataset,
/// which is also the order the two-group tests use to pick the first and
/// second sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupPartition {
    groups: IndexMap<String, Vec<f64>>,
}

impl GroupPartition {
    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the partition holds no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Values of one group
    pub fn get(&self, group: &str) -> Option<&[f64]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    /// Group labels in order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// `(label, values)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Value vectors in order
    pub fn samples(&self) -> Vec<&[f64]> {
        self.groups.values().map(Vec::as_slice).collect()
    }

    /// Total number of values across all groups
    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Flatten back into observations, group by group
    pub fn rows(&self) -> Vec<Observation> {
        self.iter()
            .flat_map(|(group, values)| values.iter().map(move |v| Observation::new(group, *v)))
            .collect()
    }
}

impl FromIterator<(String, Vec<f64>)> for GroupPartition {
    fn from_iter<I: IntoIterator<Item = (String, Vec<f64>)>>(iter: I) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}
