//! API response bodies.
//!
//! Analyses are returned as flat JSON objects: the stored record together
//! with its group partition and the flattened `(group, value)` rows.

use chrono::{DateTime, Utc};
use hypothesis_lab_domain::{Analysis, GroupPartition, GroupRequirement, Observation, TestKind};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One `(group, value)` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DataRow {
    /// Group label
    pub group: String,
    /// Measured value
    pub value: f64,
}

impl From<Observation> for DataRow {
    fn from(obs: Observation) -> Self {
        Self {
            group: obs.group,
            value: obs.value,
        }
    }
}

/// A stored or re-run analysis
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResponse {
    /// Analysis id
    pub id: i64,
    /// Uploaded file name
    pub filename: String,
    /// Canonical test name
    #[schema(example = "t-test")]
    pub test_type: String,
    /// Human-readable test name
    #[schema(example = "Mann-Whitney U")]
    pub test_name: String,
    /// Confidence level
    pub confidence_level: f64,
    /// Median of the value column
    pub median: Option<f64>,
    /// Sample standard deviation of the value column
    pub std_dev: Option<f64>,
    /// Two-sided p-value
    pub p_value: Option<f64>,
    /// Test statistic
    pub statistic: Option<f64>,
    /// `reject null`, `fail to reject null` or the reason the test did not run
    pub result: String,
    /// `reject`, `fail_to_reject` or `structural_error`
    pub decision: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Values by group, in order of first appearance
    #[schema(value_type = Object)]
    pub groups: GroupPartition,
    /// Flattened rows, group by group
    pub data: Vec<DataRow>,
}

impl From<Analysis> for AnalysisResponse {
    fn from(analysis: Analysis) -> Self {
        let data = analysis.rows().into_iter().map(DataRow::from).collect();
        Self {
            id: analysis.id.value(),
            filename: analysis.filename,
            test_type: analysis.test_kind.as_str().to_string(),
            test_name: analysis.test_kind.display_name().to_string(),
            confidence_level: analysis.confidence_level.value(),
            median: analysis.median,
            std_dev: analysis.std_dev,
            p_value: analysis.p_value,
            statistic: analysis.statistic,
            result: analysis.decision.label().to_string(),
            decision: analysis.decision.kind().to_string(),
            created_at: analysis.created_at,
            groups: analysis.groups,
            data,
        }
    }
}

/// A supported test
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestKindResponse {
    /// Canonical name accepted as `test_type`
    pub name: String,
    /// Human-readable name
    pub display_name: String,
    /// `exactly_two`, `at_least_two` or `any`
    pub groups: String,
    /// What the test checks
    pub description: String,
}

impl From<TestKind> for TestKindResponse {
    fn from(kind: TestKind) -> Self {
        let groups = match kind.group_requirement() {
            GroupRequirement::ExactlyTwo => "exactly_two",
            GroupRequirement::AtLeastTwo => "at_least_two",
            GroupRequirement::Any => "any",
        };
        Self {
            name: kind.as_str().to_string(),
            display_name: kind.display_name().to_string(),
            groups: groups.to_string(),
            description: kind.description().to_string(),
        }
    }
}

/// Root greeting
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Greeting text
    pub message: String,
}

/// Confirmation for a completed action
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DetailResponse {
    /// Outcome text
    pub detail: String,
}
