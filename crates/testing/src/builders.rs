//! Fluent builder pattern for constructing test data.

use chrono::{DateTime, Utc};
use hypothesis_lab_application::HypothesisEngine;
use hypothesis_lab_domain::{
    Analysis, AnalysisId, ConfidenceLevel, Dataset, DatasetKey, NewAnalysis, Observation,
    TestKind,
};

use crate::fixtures::encode;

/// Builder for datasets and their CSV form
#[derive(Clone, Default)]
pub struct DatasetBuilder {
    observations: Vec<Observation>,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one observation
    pub fn with_observation(mut self, group: impl Into<String>, value: f64) -> Self {
        self.observations.push(Observation::new(group, value));
        self
    }

    /// Append every value under `group`
    pub fn with_group(
        mut self,
        group: impl Into<String>,
        values: impl IntoIterator<Item = f64>,
    ) -> Self {
        let group = group.into();
        self.observations
            .extend(values.into_iter().map(|v| Observation::new(group.clone(), v)));
        self
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn build(self) -> Dataset {
        Dataset::new(self.observations).unwrap()
    }

    /// CSV bytes with a `group,value` header
    pub fn to_csv(&self) -> Vec<u8> {
        encode(&self.observations)
    }
}

/// Builder for analyses computed by the engine
#[derive(Clone)]
pub struct AnalysisBuilder {
    id: AnalysisId,
    filename: String,
    test_kind: TestKind,
    confidence_level: ConfidenceLevel,
    dataset: DatasetBuilder,
    dataset_key: Option<DatasetKey>,
    created_at: DateTime<Utc>,
}

impl AnalysisBuilder {
    pub fn new() -> Self {
        Self {
            id: AnalysisId::new(1),
            filename: "data.csv".to_string(),
            test_kind: TestKind::TTest,
            confidence_level: ConfidenceLevel::default(),
            dataset: DatasetBuilder::new()
                .with_group("A", [1.0, 2.0])
                .with_group("B", [10.0, 11.0]),
            dataset_key: Some(DatasetKey::new()),
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = AnalysisId::new(id);
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_test_kind(mut self, kind: TestKind) -> Self {
        self.test_kind = kind;
        self
    }

    pub fn with_confidence_level(mut self, confidence: f64) -> Self {
        self.confidence_level = ConfidenceLevel::new(confidence).unwrap();
        self
    }

    pub fn with_dataset(mut self, dataset: DatasetBuilder) -> Self {
        self.dataset = dataset;
        self
    }

    pub fn with_dataset_key(mut self, key: Option<DatasetKey>) -> Self {
        self.dataset_key = key;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// CSV bytes of the dataset the analysis is computed from
    pub fn csv(&self) -> Vec<u8> {
        self.dataset.to_csv()
    }

    /// Run the engine and return an insertable record
    pub fn build_new(self) -> NewAnalysis {
        let dataset = self.dataset.build();
        let run = HypothesisEngine::default()
            .run_test(&dataset, self.test_kind, self.confidence_level)
            .unwrap();
        NewAnalysis::from_run(
            self.filename,
            self.test_kind,
            self.confidence_level,
            run,
            self.dataset_key,
        )
    }

    pub fn build(self) -> Analysis {
        let id = self.id;
        let created_at = self.created_at;
        self.build_new().into_analysis(id, created_at)
    }
}

impl Default for AnalysisBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_builder() {
        let builder = DatasetBuilder::new()
            .with_group("x", [1.0, 2.0])
            .with_observation("y", 3.0);
        let csv = String::from_utf8(builder.to_csv()).unwrap();
        assert_eq!(csv, "group,value\nx,1\nx,2\ny,3\n");
        assert_eq!(builder.build().group_count(), 2);
    }

    #[test]
    fn test_analysis_builder() {
        let analysis = AnalysisBuilder::new()
            .with_id(9)
            .with_test_kind(TestKind::MannWhitneyU)
            .build();
        assert_eq!(analysis.id, AnalysisId::new(9));
        assert_eq!(analysis.test_kind, TestKind::MannWhitneyU);
        assert!(analysis.p_value.is_some());
    }
}
