//! Database module - SQLite connection pool and schema
//!
//! Provides connection pool management, schema creation and health checks
//! for the analysis store.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::{Error, Result};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS analyses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        filename TEXT NOT NULL,
        test_type TEXT NOT NULL,
        confidence_level REAL NOT NULL,
        median REAL,
        std_dev REAL,
        p_value REAL,
        statistic REAL,
        result TEXT NOT NULL,
        decision TEXT NOT NULL,
        groups TEXT NOT NULL,
        dataset_key TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_analyses_created_at ON analyses (created_at DESC)",
];

/// Database configuration for SQLite connections.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database connection URL (sqlite://path.db?mode=rwc or sqlite::memory:)
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Timeout for acquiring a connection from the pool
    pub acquire_timeout: Duration,
    /// How long a writer waits on a locked database
    pub busy_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://hypothesis.db?mode=rwc".to_string(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
        }
    }
}

impl DatabaseConfig {
    /// Create a test configuration backed by a private in-memory database.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(1),
        }
    }

    /// Whether the URL points at an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl From<&hypothesis_lab_common::DatabaseConfig> for DatabaseConfig {
    fn from(config: &hypothesis_lab_common::DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.pool_size,
            acquire_timeout: Duration::from_secs(config.timeout_seconds),
            ..Default::default()
        }
    }
}

/// Database connection pool wrapper with health monitoring.
#[derive(Clone)]
pub struct DatabasePool {
    pool: SqlitePool,
}

impl DatabasePool {
    /// Create a new database pool with the given configuration.
    ///
    /// An in-memory database lives only as long as its connection, so such a
    /// pool is pinned to a single connection that is never recycled.
    #[instrument(skip(config), fields(max_connections = config.max_connections))]
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("Initializing database connection pool");

        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout);

        let mut pool_options = SqlitePoolOptions::new().acquire_timeout(config.acquire_timeout);
        pool_options = if config.is_in_memory() {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(config.max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(Error::Database)?;

        info!("Database pool initialized successfully");
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get reference to the underlying pool.
    #[inline]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the `analyses` table and its index if they do not exist yet.
    #[instrument(skip(self))]
    pub async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        debug!("Database schema ready");
        Ok(())
    }

    /// Check database health by executing a simple query.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<HealthStatus> {
        let start = std::time::Instant::now();

        match sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
        {
            Ok(_) => {
                let latency = start.elapsed();
                debug!(latency_ms = latency.as_millis(), "Health check passed");
                Ok(HealthStatus {
                    healthy: true,
                    latency,
                    pool_size: self.pool.size(),
                    idle_connections: self.pool.num_idle(),
                    error: None,
                })
            }
            Err(e) => {
                warn!(error = %e, "Health check failed");
                Ok(HealthStatus {
                    healthy: false,
                    latency: start.elapsed(),
                    pool_size: self.pool.size(),
                    idle_connections: self.pool.num_idle(),
                    error: Some(e.to_string()),
                })
            }
        }
    }

    /// Get current pool statistics.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle(),
        }
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        info!("Closing database pool");
        self.pool.close().await;
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("size", &self.pool.size())
            .field("idle", &self.pool.num_idle())
            .finish()
    }
}

/// Health status for database connections.
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the database is healthy
    pub healthy: bool,
    /// Query latency
    pub latency: Duration,
    /// Current pool size
    pub pool_size: u32,
    /// Number of idle connections
    pub idle_connections: usize,
    /// Error message if unhealthy
    pub error: Option<String>,
}

/// Pool statistics.
#[derive(Debug, Clone, Copy)]
pub struct PoolStats {
    /// Current pool size
    pub size: u32,
    /// Idle connections
    pub idle: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_detection() {
        assert!(DatabaseConfig::in_memory().is_in_memory());
        assert!(!DatabaseConfig::default().is_in_memory());
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let pool = DatabasePool::new(&DatabaseConfig::in_memory()).await.unwrap();
        pool.migrate().await.unwrap();
        pool.migrate().await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM analyses")
            .fetch_one(pool.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_health_check() {
        let pool = DatabasePool::new(&DatabaseConfig::in_memory()).await.unwrap();
        let health = pool.health_check().await.unwrap();
        assert!(health.healthy);
        assert!(health.error.is_none());
        assert_eq!(pool.stats().size, 1);
    }
}
