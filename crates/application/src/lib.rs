//! Application layer for Hypothesis Lab
//!
//! This crate holds the hypothesis engine and orchestrates it together with
//! storage behind repository ports.
//!
//! ## Modules
//!
//! - `engine` - Test dispatch and the statistical routines
//! - `services` - Analysis service and the ports infrastructure implements

pub mod engine;
pub mod services;

// Re-export commonly used types
pub use engine::{
    EngineConfig, HypothesisEngine, HypothesisEngineBuilder, PValueMethod, TestStatistic,
};
pub use services::{
    AnalysisRepositoryPort, AnalysisService, DatasetDecoder, DatasetStorePort, ServiceConfig,
    ServiceContext, UploadRequest,
};

use hypothesis_lab_domain::{DatasetError, EngineError};
use thiserror::Error;

/// Application-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplicationError {
    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The uploaded dataset could not be read
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// The engine rejected the request or the data
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Storage backend unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl ApplicationError {
    /// Get HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            ApplicationError::NotFound(_) => 404,
            ApplicationError::InvalidInput(_) => 400,
            ApplicationError::Dataset(_) => 400,
            ApplicationError::Engine(_) => 400,
            ApplicationError::Internal(_) => 500,
            ApplicationError::ServiceUnavailable(_) => 503,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApplicationError::ServiceUnavailable(_))
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ApplicationError::NotFound(_) => "NOT_FOUND",
            ApplicationError::InvalidInput(_) => "INVALID_INPUT",
            ApplicationError::Dataset(_) => "INVALID_DATASET",
            ApplicationError::Engine(e) => e.error_code(),
            ApplicationError::Internal(_) => "INTERNAL_ERROR",
            ApplicationError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;
