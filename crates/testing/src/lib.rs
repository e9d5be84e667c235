//! Testing utilities for Hypothesis Lab
//!
//! This crate provides:
//! - Fixtures for generating datasets, CSV uploads and analyses
//! - Builder patterns for customizing test data
//! - In-memory mock implementations of the repository and storage ports
//! - An in-memory SQLite database with the schema applied
//!
//! # Example
//!
//! ```rust,ignore
//! use hypothesis_lab_testing::{builders::DatasetBuilder, mocks::InMemoryAnalysisRepository};
//!
//! let csv = DatasetBuilder::new()
//!     .with_group("control", [1.0, 2.0, 3.0])
//!     .with_group("treatment", [4.0, 5.0, 6.0])
//!     .to_csv();
//! let repository = InMemoryAnalysisRepository::new();
//! ```

pub mod builders;
pub mod database;
pub mod fixtures;
pub mod mocks;

// Re-export commonly used testing libraries
pub use fake;
pub use proptest;
pub use wiremock;
