//! Analysis Service
//!
//! Business logic for uploading datasets, running hypothesis tests against
//! them, and managing the stored analyses.

use super::{ServiceConfig, ServiceContext};
use crate::engine::HypothesisEngine;
use crate::{ApplicationError, ApplicationResult};
use async_trait::async_trait;
use hypothesis_lab_domain::{
    Analysis, AnalysisId, ConfidenceLevel, Dataset, DatasetError, DatasetKey, NewAnalysis,
    TestKind,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Analysis repository trait (to be implemented by infrastructure)
#[async_trait]
pub trait AnalysisRepositoryPort: Send + Sync {
    async fn insert(&self, analysis: &NewAnalysis) -> Result<Analysis, ApplicationError>;
    async fn get_by_id(&self, id: AnalysisId) -> Result<Option<Analysis>, ApplicationError>;
    /// All analyses, newest first
    async fn list_recent(&self) -> Result<Vec<Analysis>, ApplicationError>;
    /// Returns false when no row matched
    async fn delete(&self, id: AnalysisId) -> Result<bool, ApplicationError>;
}

/// Raw dataset storage trait (to be implemented by infrastructure)
#[async_trait]
pub trait DatasetStorePort: Send + Sync {
    async fn save(&self, key: DatasetKey, bytes: &[u8]) -> Result<(), ApplicationError>;
    async fn load(&self, key: DatasetKey) -> Result<Option<Vec<u8>>, ApplicationError>;
    async fn remove(&self, key: DatasetKey) -> Result<(), ApplicationError>;
}

/// Turns uploaded bytes into a validated dataset
pub trait DatasetDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<Dataset, DatasetError>;
}

/// Upload request
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub filename: String,
    pub content: Vec<u8>,
    pub test_type: String,
    /// Falls back to the configured default when absent
    pub confidence_level: Option<f64>,
}

/// Analysis service implementation
pub struct AnalysisService<R, S, D>
where
    R: AnalysisRepositoryPort,
    S: DatasetStorePort,
    D: DatasetDecoder,
{
    repository: Arc<R>,
    store: Arc<S>,
    decoder: Arc<D>,
    engine: Arc<HypothesisEngine>,
    config: ServiceConfig,
}

impl<R, S, D> AnalysisService<R, S, D>
where
    R: AnalysisRepositoryPort,
    S: DatasetStorePort,
    D: DatasetDecoder,
{
    pub fn new(
        repository: Arc<R>,
        store: Arc<S>,
        decoder: Arc<D>,
        engine: Arc<HypothesisEngine>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repository,
            store,
            decoder,
            engine,
            config,
        }
    }

    /// Run a test on an uploaded dataset and store the result.
    ///
    /// Nothing is persisted when decoding or the test fails.
    #[instrument(
        skip(self, ctx, request),
        fields(
            correlation_id = %ctx.correlation_id,
            filename = %request.filename,
            test_type = %request.test_type,
        )
    )]
    pub async fn upload(
        &self,
        ctx: &ServiceContext,
        request: UploadRequest,
    ) -> ApplicationResult<Analysis> {
        let kind: TestKind = request.test_type.parse()?;
        let confidence = ConfidenceLevel::new(
            request
                .confidence_level
                .unwrap_or(self.config.default_confidence),
        )?;

        let dataset = self.decoder.decode(&request.content)?;
        debug!(observations = dataset.len(), "Dataset decoded");

        let run = self.engine.run_test(&dataset, kind, confidence)?;

        let key = DatasetKey::new();
        self.store.save(key, &request.content).await?;

        let new = NewAnalysis::from_run(request.filename, kind, confidence, run, Some(key));
        let analysis = match self.repository.insert(&new).await {
            Ok(analysis) => analysis,
            Err(e) => {
                if let Err(cleanup) = self.store.remove(key).await {
                    warn!(dataset_key = %key, error = %cleanup, "Failed to remove orphaned dataset");
                }
                return Err(e);
            }
        };

        info!(
            analysis_id = %analysis.id,
            result = analysis.result(),
            "Analysis created"
        );
        Ok(analysis)
    }

    /// All stored analyses, newest first
    #[instrument(skip(self, ctx), fields(correlation_id = %ctx.correlation_id))]
    pub async fn history(&self, ctx: &ServiceContext) -> ApplicationResult<Vec<Analysis>> {
        let analyses = self.repository.list_recent().await?;
        debug!(count = analyses.len(), "Fetched analysis history");
        Ok(analyses)
    }

    /// Get one analysis
    #[instrument(skip(self, ctx), fields(correlation_id = %ctx.correlation_id))]
    pub async fn get(&self, ctx: &ServiceContext, id: AnalysisId) -> ApplicationResult<Analysis> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::NotFound("Analysis not found".to_string()))
    }

    /// Re-run a stored analysis against its original dataset.
    ///
    /// The fresh numbers are returned under the stored identity and are not
    /// written back.
    #[instrument(skip(self, ctx), fields(correlation_id = %ctx.correlation_id))]
    pub async fn rerun(&self, ctx: &ServiceContext, id: AnalysisId) -> ApplicationResult<Analysis> {
        let analysis = self.get(ctx, id).await?;

        let missing = || ApplicationError::NotFound("Original CSV not found for re-run".to_string());
        let key = analysis.dataset_key.ok_or_else(missing)?;
        let bytes = self.store.load(key).await?.ok_or_else(|| {
            warn!(analysis_id = %id, dataset_key = %key, "Stored dataset is missing");
            missing()
        })?;

        let dataset = self.decoder.decode(&bytes)?;
        let run = self
            .engine
            .run_test(&dataset, analysis.test_kind, analysis.confidence_level)?;

        info!(analysis_id = %id, "Analysis re-run");
        Ok(analysis.with_run(run))
    }

    /// Delete an analysis and its stored dataset
    #[instrument(skip(self, ctx), fields(correlation_id = %ctx.correlation_id))]
    pub async fn delete(&self, ctx: &ServiceContext, id: AnalysisId) -> ApplicationResult<()> {
        let analysis = self.get(ctx, id).await?;

        if !self.repository.delete(id).await? {
            return Err(ApplicationError::NotFound("Analysis not found".to_string()));
        }

        if let Some(key) = analysis.dataset_key {
            if let Err(e) = self.store.remove(key).await {
                warn!(dataset_key = %key, error = %e, "Failed to remove stored dataset");
            }
        }

        info!(analysis_id = %id, "Analysis deleted");
        Ok(())
    }
}
