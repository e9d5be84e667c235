//! Storage module - raw dataset files on the local filesystem
//!
//! Every upload is written verbatim to `<upload_dir>/<dataset key>.csv` so
//! that an analysis can be re-run against exactly the bytes it was computed
//! from.

use async_trait::async_trait;
use hypothesis_lab_application::{ApplicationError, DatasetStorePort};
use hypothesis_lab_domain::DatasetKey;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::Result;

/// Filesystem-backed dataset store.
#[derive(Debug, Clone)]
pub struct FileSystemDatasetStore {
    root: PathBuf,
}

impl FileSystemDatasetStore {
    /// Open the store, creating the upload directory if needed.
    #[instrument(skip(root), fields(root = %root.as_ref().display()))]
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await?;
        info!("Dataset store ready");
        Ok(Self { root })
    }

    /// Directory holding the stored files
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the file for `key`
    pub fn path_for(&self, key: DatasetKey) -> PathBuf {
        self.root.join(format!("{key}.csv"))
    }

    async fn write(&self, key: DatasetKey, bytes: &[u8]) -> Result<()> {
        tokio::fs::write(self.path_for(key), bytes).await?;
        Ok(())
    }

    async fn read(&self, key: DatasetKey) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn unlink(&self, key: DatasetKey) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(dataset_key = %key, "Dataset already absent");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check that the upload directory is still reachable.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> StorageHealthStatus {
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => StorageHealthStatus {
                healthy: true,
                root: self.root.clone(),
                error: None,
            },
            Ok(_) => StorageHealthStatus {
                healthy: false,
                root: self.root.clone(),
                error: Some("upload path is not a directory".to_string()),
            },
            Err(e) => {
                warn!(error = %e, "Dataset store health check failed");
                StorageHealthStatus {
                    healthy: false,
                    root: self.root.clone(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

#[async_trait]
impl DatasetStorePort for FileSystemDatasetStore {
    #[instrument(skip(self, bytes), fields(dataset_key = %key, size = bytes.len()))]
    async fn save(&self, key: DatasetKey, bytes: &[u8]) -> std::result::Result<(), ApplicationError> {
        self.write(key, bytes).await?;
        debug!("Dataset stored");
        Ok(())
    }

    #[instrument(skip(self), fields(dataset_key = %key))]
    async fn load(&self, key: DatasetKey) -> std::result::Result<Option<Vec<u8>>, ApplicationError> {
        Ok(self.read(key).await?)
    }

    #[instrument(skip(self), fields(dataset_key = %key))]
    async fn remove(&self, key: DatasetKey) -> std::result::Result<(), ApplicationError> {
        Ok(self.unlink(key).await?)
    }
}

/// Health status for the dataset store.
#[derive(Debug, Clone)]
pub struct StorageHealthStatus {
    /// Whether the upload directory is usable
    pub healthy: bool,
    /// Upload directory
    pub root: PathBuf,
    /// Error message if unhealthy
    pub error: Option<String>,
}
