//! Error types for the Hypothesis Lab domain.
//!
//! This module defines the error hierarchy for dataset validation, the
//! statistics engine and persisted analyses. Every top-level error carries a
//! machine-readable code and an HTTP status for API responses.

use crate::identifiers::AnalysisId;

/// Top-level application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Dataset construction or decoding errors
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Statistics engine errors
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Persisted analysis errors
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Dataset(_) => "DATASET_ERROR",
            Self::Engine(e) => e.error_code(),
            Self::Analysis(AnalysisError::NotFound(_)) => "NOT_FOUND",
            Self::Analysis(_) => "ANALYSIS_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Analysis(AnalysisError::NotFound(_)) => 404,
            Self::Analysis(AnalysisError::DatasetMissing(_)) => 404,
            Self::Database(_) => 503,
            Self::Internal(_) => 500,
            _ => 400,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

/// Errors raised while building a dataset from raw records
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatasetError {
    /// The dataset has no observations
    #[error("Dataset contains no observations")]
    Empty,

    /// A required column is absent from the input
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A record lacks a required field
    #[error("Row {row}: missing field '{field}'")]
    MissingField {
        /// One-based data row number
        row: usize,
        /// Name of the absent field
        field: String,
    },

    /// A value could not be read as a number
    #[error("Row {row}: value '{value}' is not a number")]
    InvalidValue {
        /// One-based data row number
        row: usize,
        /// The raw text that failed to parse
        value: String,
    },

    /// A value is NaN or infinite
    #[error("Row {row}: value must be finite")]
    NonFinite {
        /// One-based data row number
        row: usize,
    },

    /// The input is not well-formed CSV
    #[error("Malformed CSV: {0}")]
    Malformed(String),
}

/// Errors returned by the statistics engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// The requested test is not one of the supported kinds
    #[error("Unknown test type: {0}")]
    UnknownTestKind(String),

    /// The confidence level lies outside the open interval (0, 1)
    #[error("Confidence level must be strictly between 0 and 1, got {0}")]
    InvalidConfidenceLevel(f64),

    /// The statistical routine could not produce a result for this data
    #[error(transparent)]
    Computation(#[from] ComputationError),
}

impl EngineError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTestKind(_) => "UNKNOWN_TEST_KIND",
            Self::InvalidConfidenceLevel(_) => "INVALID_CONFIDENCE_LEVEL",
            Self::Computation(_) => "COMPUTATION_ERROR",
        }
    }
}

/// Degenerate-input failures inside a statistical routine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComputationError {
    /// Too few groups for the requested test
    #[error("{test} requires at least {required} groups, got {actual}")]
    TooFewGroups {
        /// Display name of the test
        test: &'static str,
        /// Minimum number of groups
        required: usize,
        /// Number of groups present
        actual: usize,
    },

    /// A group holds too few observations
    #[error("group '{group}' has {actual} observations, {test} needs at least {required}")]
    TooFewObservations {
        /// Display name of the test
        test: &'static str,
        /// Offending group label
        group: String,
        /// Minimum number of observations
        required: usize,
        /// Number of observations present
        actual: usize,
    },

    /// Paired samples differ in length
    #[error("paired samples must have equal length, got {left} and {right}")]
    UnequalPairs {
        /// Length of the first sample
        left: usize,
        /// Length of the second sample
        right: usize,
    },

    /// Every paired difference is zero
    #[error("all paired differences are zero")]
    AllZeroDifferences,

    /// The data has no spread, the statistic is undefined
    #[error("{0}: zero variance in the data")]
    ZeroVariance(&'static str),

    /// Every value shares the same rank
    #[error("{0}: all values are tied")]
    AllTied(&'static str),

    /// Too few observations overall
    #[error("{test} requires at least {required} observations, got {actual}")]
    InsufficientData {
        /// Name of the statistic or test
        test: &'static str,
        /// Minimum number of observations
        required: usize,
        /// Number of observations present
        actual: usize,
    },

    /// The reference distribution could not be constructed
    #[error("distribution error: {0}")]
    Distribution(String),
}

/// Errors concerning persisted analyses
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Analysis not found
    #[error("Analysis not found: {0}")]
    NotFound(AnalysisId),

    /// The stored dataset for an analysis is gone
    #[error("Dataset for analysis {0} is no longer available")]
    DatasetMissing(AnalysisId),

    /// Stored record could not be interpreted
    #[error("Corrupt analysis record: {0}")]
    Corrupt(String),
}

/// Database errors
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Connection could not be established
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Application-wide result type
pub type AppResult<T> = Result<T, AppError>;

/// Engine result type
pub type EngineResult<T> = Result<T, EngineError>;
