//! In-memory SQLite database for repository tests.

use hypothesis_lab_infrastructure::{DatabaseConfig, DatabasePool, SqliteAnalysisRepository};
use std::sync::Arc;

/// A private `sqlite::memory:` database with the schema applied.
///
/// The database disappears when the last clone of the pool is dropped.
pub struct TestDatabase {
    pool: DatabasePool,
}

impl TestDatabase {
    /// Open a fresh database and create the schema
    pub async fn new() -> Result<Self, hypothesis_lab_infrastructure::Error> {
        let pool = DatabasePool::new(&DatabaseConfig::in_memory()).await?;
        pool.migrate().await?;
        Ok(Self { pool })
    }

    /// Get the database pool
    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// A repository over this database
    pub fn analysis_repository(&self) -> Arc<SqliteAnalysisRepository> {
        Arc::new(SqliteAnalysisRepository::new(self.pool.pool().clone()))
    }

    /// Remove every stored analysis
    pub async fn clean(&self) -> Result<(), hypothesis_lab_infrastructure::Error> {
        let repo = SqliteAnalysisRepository::new(self.pool.pool().clone());
        for analysis in repo.list().await? {
            repo.remove(analysis.id).await?;
        }
        Ok(())
    }
}
