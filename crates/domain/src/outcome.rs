//! Confidence levels, decisions and the outcome of a hypothesis test.

use crate::dataset::GroupPartition;
use crate::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label stored for a rejected null hypothesis
pub const REJECT_LABEL: &str = "reject null";

/// Label stored when the null hypothesis is retained
pub const FAIL_TO_REJECT_LABEL: &str = "fail to reject null";

/// Confidence level strictly inside (0, 1)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ConfidenceLevel(f64);

impl ConfidenceLevel {
    /// Validate and wrap a confidence level
    pub fn new(value: f64) -> Result<Self, EngineError> {
        if value.is_finite() && value > 0.0 && value < 1.0 {
            Ok(Self(value))
        } else {
            Err(EngineError::InvalidConfidenceLevel(value))
        }
    }

    /// The raw level
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Significance threshold, `1 - confidence`
    pub fn alpha(&self) -> f64 {
        1.0 - self.0
    }

    /// Decide on the null hypothesis; rejection requires `p < alpha` strictly
    pub fn decide(&self, p_value: f64) -> Decision {
        if p_value < self.alpha() {
            Decision::Reject
        } else {
            Decision::FailToReject
        }
    }
}

impl Default for ConfidenceLevel {
    fn default() -> Self {
        Self(0.95)
    }
}

impl<'de> Deserialize<'de> for ConfidenceLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        ConfidenceLevel::new(value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Verdict of a hypothesis test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    /// The null hypothesis is rejected
    Reject,
    /// The null hypothesis is retained
    FailToReject,
    /// The dataset does not fit the test's group requirement
    StructuralError {
        /// Human-readable explanation
        message: String,
    },
}

impl Decision {
    /// Text stored in the `result` column
    pub fn label(&self) -> &str {
        match self {
            Self::Reject => REJECT_LABEL,
            Self::FailToReject => FAIL_TO_REJECT_LABEL,
            Self::StructuralError { message } => message,
        }
    }

    /// Short machine name
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::FailToReject => "fail_to_reject",
            Self::StructuralError { .. } => "structural_error",
        }
    }

    /// Whether the test produced numbers
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::StructuralError { .. })
    }
}

/// Numbers and verdict produced by one test invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Median of the full value column
    pub median: Option<f64>,
    /// Sample standard deviation of the full value column
    pub std_dev: Option<f64>,
    /// Two-sided p-value
    pub p_value: Option<f64>,
    /// Test statistic (t, F, χ², U, T or H)
    pub statistic: Option<f64>,
    /// Verdict
    pub decision: Decision,
}

impl TestOutcome {
    /// Outcome for a dataset whose group count does not fit the test
    pub fn structural(message: impl Into<String>) -> Self {
        Self {
            median: None,
            std_dev: None,
            p_value: None,
            statistic: None,
            decision: Decision::StructuralError {
                message: message.into(),
            },
        }
    }

    /// Label stored in the `result` column
    pub fn result_label(&self) -> &str {
        self.decision.label()
    }
}

/// Outcome together with the partition the test ran on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRun {
    /// The test outcome
    pub outcome: TestOutcome,
    /// Values grouped by label
    pub partition: GroupPartition,
}
