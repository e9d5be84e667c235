//! Infrastructure layer for Hypothesis Lab
//!
//! This crate provides implementations for:
//! - Database access (SQLite with sqlx)
//! - The analysis repository
//! - Raw dataset storage on the local filesystem
//! - CSV decoding of uploaded datasets
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hypothesis_lab_infrastructure::{
//!     CsvDatasetCodec, DatabaseConfig, DatabasePool, FileSystemDatasetStore,
//!     SqliteAnalysisRepository,
//! };
//!
//! let pool = DatabasePool::new(&DatabaseConfig::from(&app_config.database)).await?;
//! pool.migrate().await?;
//!
//! let repository = SqliteAnalysisRepository::new(pool.pool().clone());
//! let store = FileSystemDatasetStore::new(&app_config.storage.upload_dir).await?;
//! let decoder = CsvDatasetCodec::new();
//! ```

pub mod csv_codec;
pub mod database;
pub mod repositories;
pub mod storage;

pub use csv_codec::{CsvDatasetCodec, GROUP_COLUMN, VALUE_COLUMN};
pub use database::{DatabaseConfig, DatabasePool, HealthStatus, PoolStats};
pub use repositories::SqliteAnalysisRepository;
pub use storage::{FileSystemDatasetStore, StorageHealthStatus};

use hypothesis_lab_application::ApplicationError;

pub type Result<T> = std::result::Result<T, Error>;

/// Infrastructure-level errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database errors from sqlx
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem errors from dataset storage
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// CSV reader errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored row could not be turned back into a domain value
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Database(sqlx::Error::PoolTimedOut)
                | Error::Database(sqlx::Error::Io(_))
                | Error::Storage(_)
        )
    }

    /// Get HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Configuration(_) => 400,
            Error::Csv(_) => 400,
            Error::Database(_) | Error::Storage(_) => 503,
            Error::Serialization(_) | Error::Corrupt(_) => 500,
        }
    }
}

impl From<Error> for ApplicationError {
    fn from(e: Error) -> Self {
        match e {
            Error::Database(_) | Error::Storage(_) => {
                ApplicationError::ServiceUnavailable(e.to_string())
            }
            Error::Csv(_) | Error::Configuration(_) => ApplicationError::InvalidInput(e.to_string()),
            Error::Serialization(_) | Error::Corrupt(_) => ApplicationError::Internal(e.to_string()),
        }
    }
}

/// Infrastructure health check result
#[derive(Debug, Clone)]
pub struct InfrastructureHealth {
    /// Overall health status
    pub healthy: bool,
    /// Database health
    pub database: Option<HealthStatus>,
    /// Dataset storage health
    pub storage: Option<StorageHealthStatus>,
}

impl InfrastructureHealth {
    /// Create a new health status
    pub fn new() -> Self {
        Self {
            healthy: true,
            database: None,
            storage: None,
        }
    }

    /// Set database health
    pub fn with_database(mut self, status: HealthStatus) -> Self {
        if !status.healthy {
            self.healthy = false;
        }
        self.database = Some(status);
        self
    }

    /// Set storage health
    pub fn with_storage(mut self, status: StorageHealthStatus) -> Self {
        if !status.healthy {
            self.healthy = false;
        }
        self.storage = Some(status);
        self
    }
}

impl Default for InfrastructureHealth {
    fn default() -> Self {
        Self::new()
    }
}
