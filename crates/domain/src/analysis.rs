//! Persisted analysis records.

use crate::dataset::{GroupPartition, Observation};
use crate::identifiers::{AnalysisId, DatasetKey};
use crate::outcome::{ConfidenceLevel, Decision, TestOutcome, TestRun};
use crate::test_kind::TestKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored test run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Row id
    pub id: AnalysisId,
    /// Name of the uploaded file
    pub filename: String,
    /// Test that was run
    pub test_kind: TestKind,
    /// Confidence level the verdict was taken at
    pub confidence_level: ConfidenceLevel,
    /// Median of the value column
    pub median: Option<f64>,
    /// Sample standard deviation of the value column
    pub std_dev: Option<f64>,
    /// Two-sided p-value
    pub p_value: Option<f64>,
    /// Test statistic
    pub statistic: Option<f64>,
    /// Verdict
    pub decision: Decision,
    /// Values grouped by label
    pub groups: GroupPartition,
    /// Where the raw upload is kept, if it still is
    pub dataset_key: Option<DatasetKey>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Analysis {
    /// Result label (`reject null`, `fail to reject null` or a structural message)
    pub fn result(&self) -> &str {
        self.decision.label()
    }

    /// Flattened `(group, value)` rows
    pub fn rows(&self) -> Vec<Observation> {
        self.groups.rows()
    }

    /// The stored outcome
    pub fn outcome(&self) -> TestOutcome {
        TestOutcome {
            median: self.median,
            std_dev: self.std_dev,
            p_value: self.p_value,
            statistic: self.statistic,
            decision: self.decision.clone(),
        }
    }

    /// Copy of this record carrying a fresh run's numbers, identity unchanged
    pub fn with_run(&self, run: TestRun) -> Self {
        Self {
            median: run.outcome.median,
            std_dev: run.outcome.std_dev,
            p_value: run.outcome.p_value,
            statistic: run.outcome.statistic,
            decision: run.outcome.decision,
            groups: run.partition,
            ..self.clone()
        }
    }
}

/// An analysis about to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnalysis {
    /// Name of the uploaded file
    pub filename: String,
    /// Test that was run
    pub test_kind: TestKind,
    /// Confidence level
    pub confidence_level: ConfidenceLevel,
    /// Outcome of the run
    pub outcome: TestOutcome,
    /// Values grouped by label
    pub groups: GroupPartition,
    /// Where the raw upload is kept
    pub dataset_key: Option<DatasetKey>,
}

impl NewAnalysis {
    /// Assemble an insertable record from a completed run
    pub fn from_run(
        filename: impl Into<String>,
        test_kind: TestKind,
        confidence_level: ConfidenceLevel,
        run: TestRun,
        dataset_key: Option<DatasetKey>,
    ) -> Self {
        Self {
            filename: filename.into(),
            test_kind,
            confidence_level,
            outcome: run.outcome,
            groups: run.partition,
            dataset_key,
        }
    }

    /// Materialize with the id and timestamp assigned by storage
    pub fn into_analysis(self, id: AnalysisId, created_at: DateTime<Utc>) -> Analysis {
        Analysis {
            id,
            filename: self.filename,
            test_kind: self.test_kind,
            confidence_level: self.confidence_level,
            median: self.outcome.median,
            std_dev: self.outcome.std_dev,
            p_value: self.outcome.p_value,
            statistic: self.outcome.statistic,
            decision: self.outcome.decision,
            groups: self.groups,
            dataset_key: self.dataset_key,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    fn run() -> TestRun {
        let dataset = Dataset::new(vec![
            Observation::new("A", 1.0),
            Observation::new("B", 2.0),
        ])
        .unwrap();
        TestRun {
            outcome: TestOutcome {
                median: Some(1.5),
                std_dev: Some(0.7),
                p_value: Some(0.01),
                statistic: Some(4.2),
                decision: Decision::Reject,
            },
            partition: dataset.partition(),
        }
    }

    #[test]
    fn test_new_analysis_into_analysis() {
        let new = NewAnalysis::from_run(
            "data.csv",
            TestKind::TTest,
            ConfidenceLevel::default(),
            run(),
            None,
        );
        let analysis = new.into_analysis(AnalysisId::new(1), Utc::now());
        assert_eq!(analysis.result(), "reject null");
        assert_eq!(analysis.rows().len(), 2);
        assert_eq!(analysis.outcome().median, Some(1.5));
    }

    #[test]
    fn test_with_run_keeps_identity() {
        let analysis = NewAnalysis::from_run(
            "data.csv",
            TestKind::TTest,
            ConfidenceLevel::default(),
            run(),
            None,
        )
        .into_analysis(AnalysisId::new(7), Utc::now());

        let mut fresh = run();
        fresh.outcome.decision = Decision::FailToReject;
        let rerun = analysis.with_run(fresh);
        assert_eq!(rerun.id, analysis.id);
        assert_eq!(rerun.created_at, analysis.created_at);
        assert_eq!(rerun.result(), "fail to reject null");
    }
}
