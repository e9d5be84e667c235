//! Application state and dependency injection.
//!
//! This module defines the shared application state that is passed
//! to all route handlers via Axum's state extraction.

use async_trait::async_trait;
use hypothesis_lab_application::{
    AnalysisRepositoryPort, AnalysisService, ApplicationError, DatasetDecoder, DatasetStorePort,
    EngineConfig, HypothesisEngine, ServiceConfig, ServiceContext, UploadRequest,
};
use hypothesis_lab_common::AppConfig;
use hypothesis_lab_domain::{Analysis, AnalysisId};
use hypothesis_lab_infrastructure::{
    CsvDatasetCodec, DatabaseConfig, DatabasePool, FileSystemDatasetStore, HealthStatus,
    InfrastructureHealth, SqliteAnalysisRepository,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Analysis service (type-erased)
    pub analysis_service: Arc<dyn AnalysisServiceTrait>,

    /// Dependency checks behind `/ready`
    pub readiness: Arc<dyn ReadinessProbe>,
}

impl AppState {
    /// Connect to the database and upload directory named in `config`
    /// and wire the production services.
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let pool = DatabasePool::new(&DatabaseConfig::from(&config.database)).await?;
        pool.migrate().await?;

        let store = FileSystemDatasetStore::new(&config.storage.upload_dir).await?;
        let repository = SqliteAnalysisRepository::new(pool.pool().clone());

        let engine = HypothesisEngine::new(EngineConfig {
            mann_whitney_exact_max: config.engine.mann_whitney_exact_max,
            wilcoxon_exact_max: config.engine.wilcoxon_exact_max,
        });
        let service = AnalysisService::new(
            Arc::new(repository),
            Arc::new(store.clone()),
            Arc::new(CsvDatasetCodec::new()),
            Arc::new(engine),
            ServiceConfig {
                default_confidence: config.engine.default_confidence,
            },
        );

        info!(
            database = %config.database.url,
            upload_dir = %config.storage.upload_dir.display(),
            "Application state initialized"
        );

        Ok(Self::with_services(
            config,
            service,
            InfrastructureProbe::new(pool, store),
        ))
    }

    /// Create application state with custom service implementations
    pub fn with_services<A, P>(config: AppConfig, analysis_service: A, readiness: P) -> Self
    where
        A: AnalysisServiceTrait + 'static,
        P: ReadinessProbe + 'static,
    {
        Self {
            config: Arc::new(config),
            analysis_service: Arc::new(analysis_service),
            readiness: Arc::new(readiness),
        }
    }
}

// ============================================================================
// SERVICE TRAITS (Type-erased interfaces for route handlers)
// ============================================================================

/// Type-erased analysis service trait
#[async_trait]
pub trait AnalysisServiceTrait: Send + Sync {
    async fn upload(
        &self,
        ctx: &ServiceContext,
        request: UploadRequest,
    ) -> Result<Analysis, ApplicationError>;

    async fn history(&self, ctx: &ServiceContext) -> Result<Vec<Analysis>, ApplicationError>;

    async fn rerun(&self, ctx: &ServiceContext, id: AnalysisId)
        -> Result<Analysis, ApplicationError>;

    async fn delete(&self, ctx: &ServiceContext, id: AnalysisId) -> Result<(), ApplicationError>;
}

#[async_trait]
impl<R, S, D> AnalysisServiceTrait for AnalysisService<R, S, D>
where
    R: AnalysisRepositoryPort + 'static,
    S: DatasetStorePort + 'static,
    D: DatasetDecoder + 'static,
{
    async fn upload(
        &self,
        ctx: &ServiceContext,
        request: UploadRequest,
    ) -> Result<Analysis, ApplicationError> {
        AnalysisService::upload(self, ctx, request).await
    }

    async fn history(&self, ctx: &ServiceContext) -> Result<Vec<Analysis>, ApplicationError> {
        AnalysisService::history(self, ctx).await
    }

    async fn rerun(
        &self,
        ctx: &ServiceContext,
        id: AnalysisId,
    ) -> Result<Analysis, ApplicationError> {
        AnalysisService::rerun(self, ctx, id).await
    }

    async fn delete(&self, ctx: &ServiceContext, id: AnalysisId) -> Result<(), ApplicationError> {
        AnalysisService::delete(self, ctx, id).await
    }
}

/// Readiness check of the backing stores
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    async fn check(&self) -> InfrastructureHealth;
}

/// Checks the SQLite pool and the upload directory
pub struct InfrastructureProbe {
    pool: DatabasePool,
    store: FileSystemDatasetStore,
}

impl InfrastructureProbe {
    pub fn new(pool: DatabasePool, store: FileSystemDatasetStore) -> Self {
        Self { pool, store }
    }
}

#[async_trait]
impl ReadinessProbe for InfrastructureProbe {
    async fn check(&self) -> InfrastructureHealth {
        let database = self
            .pool
            .health_check()
            .await
            .unwrap_or_else(|e| HealthStatus {
                healthy: false,
                latency: Duration::ZERO,
                pool_size: 0,
                idle_connections: 0,
                error: Some(e.to_string()),
            });

        InfrastructureHealth::new()
            .with_database(database)
            .with_storage(self.store.health_check().await)
    }
}
