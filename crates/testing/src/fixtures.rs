//! Test fixtures for generating datasets and analyses with realistic data.
//!
//! Fixed fixtures carry the well-known reference datasets; the `create_random_*`
//! helpers use `fake` for labels and measurements.

use chrono::Utc;
use fake::{faker::lorem::en::Word, Fake};
use hypothesis_lab_application::{HypothesisEngine, UploadRequest};
use hypothesis_lab_domain::{
    Analysis, AnalysisId, ConfidenceLevel, Dataset, DatasetKey, NewAnalysis, Observation,
    TestKind,
};
use hypothesis_lab_infrastructure::CsvDatasetCodec;

/// `A: 1, 2` / `B: 10, 11`, the classic two-group example
pub const TWO_GROUP_CSV: &str = "group,value\nA,1\nA,2\nB,10\nB,11\n";

/// Three groups of three, no ties
pub const THREE_GROUP_CSV: &str = "group,value\na,1\na,2\na,3\nb,4\nb,5\nb,6\nc,7\nc,8\nc,9\n";

/// Two-group CSV bytes
pub fn two_group_csv() -> Vec<u8> {
    TWO_GROUP_CSV.as_bytes().to_vec()
}

/// Three-group CSV bytes
pub fn three_group_csv() -> Vec<u8> {
    THREE_GROUP_CSV.as_bytes().to_vec()
}

/// The two-group reference dataset
pub fn create_test_dataset() -> Dataset {
    decode(TWO_GROUP_CSV.as_bytes())
}

/// A dataset with `groups` randomly named groups of `per_group` values each
pub fn create_random_dataset(groups: usize, per_group: usize) -> Dataset {
    let observations = (0..groups)
        .flat_map(|g| {
            let label = format!("{}-{}", Word().fake::<String>(), g);
            (0..per_group).map(move |_| Observation::new(label.clone(), (0.0..100.0).fake::<f64>()))
        })
        .collect();
    Dataset::new(observations).unwrap()
}

/// CSV bytes for a random dataset
pub fn create_random_csv(groups: usize, per_group: usize) -> Vec<u8> {
    encode(create_random_dataset(groups, per_group).observations())
}

/// A random `.csv` filename
pub fn create_test_filename() -> String {
    format!("{}.csv", Word().fake::<String>())
}

/// An upload of the two-group reference CSV
pub fn create_test_upload_request(test_type: impl Into<String>) -> UploadRequest {
    UploadRequest {
        filename: create_test_filename(),
        content: two_group_csv(),
        test_type: test_type.into(),
        confidence_level: Some(0.95),
    }
}

/// A t-test run on the reference dataset, ready to insert
pub fn create_test_new_analysis() -> NewAnalysis {
    create_test_new_analysis_for(TestKind::TTest)
}

/// A run of `kind` on the three-group dataset when it needs more than two
/// groups, otherwise on the two-group dataset
pub fn create_test_new_analysis_for(kind: TestKind) -> NewAnalysis {
    let dataset = match kind {
        TestKind::Anova | TestKind::KruskalWallis | TestKind::ChiSquare => {
            decode(THREE_GROUP_CSV.as_bytes())
        }
        _ => create_test_dataset(),
    };
    let confidence = ConfidenceLevel::default();
    let run = HypothesisEngine::default()
        .run_test(&dataset, kind, confidence)
        .unwrap();
    NewAnalysis::from_run(
        create_test_filename(),
        kind,
        confidence,
        run,
        Some(DatasetKey::new()),
    )
}

/// A stored t-test analysis with id 1
pub fn create_test_analysis() -> Analysis {
    create_test_new_analysis().into_analysis(AnalysisId::new(1), Utc::now())
}

pub(crate) fn decode(bytes: &[u8]) -> Dataset {
    CsvDatasetCodec::new().decode_bytes(bytes).unwrap()
}

pub(crate) fn encode(observations: &[Observation]) -> Vec<u8> {
    CsvDatasetCodec::new().encode(observations).unwrap()
}
