//! Mock implementations for repositories and storage.
//!
//! Provides in-memory mocks for testing without database or filesystem
//! dependencies.

use async_trait::async_trait;
use chrono::Utc;
use hypothesis_lab_application::{AnalysisRepositoryPort, ApplicationError, DatasetStorePort};
use hypothesis_lab_domain::{Analysis, AnalysisId, DatasetKey, NewAnalysis};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// In-memory analysis repository with auto-incrementing ids
pub struct InMemoryAnalysisRepository {
    analyses: Arc<RwLock<BTreeMap<AnalysisId, Analysis>>>,
    next_id: Arc<RwLock<i64>>,
    fail_writes: Arc<RwLock<bool>>,
}

impl InMemoryAnalysisRepository {
    pub fn new() -> Self {
        Self {
            analyses: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(RwLock::new(1)),
            fail_writes: Arc::new(RwLock::new(false)),
        }
    }

    /// Make every subsequent insert fail as if the database were down
    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.write() = fail;
    }

    pub fn count(&self) -> usize {
        self.analyses.read().len()
    }

    pub fn get(&self, id: AnalysisId) -> Option<Analysis> {
        self.analyses.read().get(&id).cloned()
    }

    /// Store a ready-made analysis under its own id
    pub fn seed(&self, analysis: Analysis) {
        let mut next_id = self.next_id.write();
        *next_id = (*next_id).max(analysis.id.value() + 1);
        self.analyses.write().insert(analysis.id, analysis);
    }

    pub fn clear(&self) {
        self.analyses.write().clear();
    }
}

impl Default for InMemoryAnalysisRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisRepositoryPort for InMemoryAnalysisRepository {
    async fn insert(&self, analysis: &NewAnalysis) -> Result<Analysis, ApplicationError> {
        if *self.fail_writes.read() {
            return Err(ApplicationError::ServiceUnavailable(
                "database unavailable".to_string(),
            ));
        }

        let id = {
            let mut next_id = self.next_id.write();
            let id = AnalysisId::new(*next_id);
            *next_id += 1;
            id
        };

        let stored = analysis.clone().into_analysis(id, Utc::now());
        self.analyses.write().insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, id: AnalysisId) -> Result<Option<Analysis>, ApplicationError> {
        Ok(self.get(id))
    }

    async fn list_recent(&self) -> Result<Vec<Analysis>, ApplicationError> {
        let mut analyses: Vec<Analysis> = self.analyses.read().values().cloned().collect();
        analyses.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(analyses)
    }

    async fn delete(&self, id: AnalysisId) -> Result<bool, ApplicationError> {
        Ok(self.analyses.write().remove(&id).is_some())
    }
}

/// In-memory dataset store
pub struct InMemoryDatasetStore {
    blobs: Arc<RwLock<HashMap<DatasetKey, Vec<u8>>>>,
}

impl InMemoryDatasetStore {
    pub fn new() -> Self {
        Self {
            blobs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn contains(&self, key: DatasetKey) -> bool {
        self.blobs.read().contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }

    /// Drop a blob behind the service's back
    pub fn evict(&self, key: DatasetKey) {
        self.blobs.write().remove(&key);
    }
}

impl Default for InMemoryDatasetStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatasetStorePort for InMemoryDatasetStore {
    async fn save(&self, key: DatasetKey, bytes: &[u8]) -> Result<(), ApplicationError> {
        self.blobs.write().insert(key, bytes.to_vec());
        Ok(())
    }

    async fn load(&self, key: DatasetKey) -> Result<Option<Vec<u8>>, ApplicationError> {
        Ok(self.blobs.read().get(&key).cloned())
    }

    async fn remove(&self, key: DatasetKey) -> Result<(), ApplicationError> {
        self.blobs.write().remove(&key);
        Ok(())
    }
}
