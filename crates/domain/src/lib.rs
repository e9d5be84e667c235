//! Hypothesis Lab Domain Types
//!
//! This crate provides the core domain model for the Hypothesis Lab service.
//! It defines the dataset shape the statistics engine consumes, the closed set of
//! supported hypothesis tests, test outcomes, persisted analyses and the error
//! hierarchy shared by every layer.
//!
//! ## Architecture
//!
//! - **identifiers**: Strongly-typed identifiers for analyses and stored datasets
//! - **dataset**: Observations, datasets and the derived group partition
//! - **test_kind**: The six supported hypothesis tests and their structural requirements
//! - **outcome**: Confidence levels, decisions and test outcomes
//! - **analysis**: The persisted analysis record
//! - **errors**: Error types with error codes and HTTP status codes
//!
//! ## Usage
//!
//! ```rust
//! use hypothesis_lab_domain::{ConfidenceLevel, Dataset, Observation, TestKind};
//!
//! let dataset = Dataset::new(vec![
//!     Observation::new("A", 1.0),
//!     Observation::new("B", 2.0),
//! ])
//! .unwrap();
//! assert_eq!(dataset.group_count(), 2);
//!
//! let kind: TestKind = "Mann-Whitney U".parse().unwrap();
//! assert_eq!(kind, TestKind::MannWhitneyU);
//!
//! let confidence = ConfidenceLevel::new(0.95).unwrap();
//! assert!((confidence.alpha() - 0.05).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod dataset;
pub mod errors;
pub mod identifiers;
pub mod outcome;
pub mod test_kind;

// Re-export commonly used types
pub use analysis::{Analysis, NewAnalysis};
pub use dataset::{Dataset, GroupPartition, Observation};
pub use errors::{
    AnalysisError, AppError, AppResult, ComputationError, DatabaseError, DatasetError,
    EngineError, EngineResult,
};
pub use identifiers::{AnalysisId, DatasetKey};
pub use outcome::{ConfidenceLevel, Decision, TestOutcome, TestRun};
pub use test_kind::{GroupRequirement, TestKind};
