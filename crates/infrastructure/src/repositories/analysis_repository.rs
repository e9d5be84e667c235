//! Analysis repository implementation.
//!
//! SQLite-backed persistence for analysis records. The group partition is
//! kept as a JSON object in insertion order so history can show the exact
//! groups a test ran on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, instrument};

use hypothesis_lab_application::{AnalysisRepositoryPort, ApplicationError};
use hypothesis_lab_domain::{
    Analysis, AnalysisId, ConfidenceLevel, DatasetKey, Decision, GroupPartition, NewAnalysis,
    TestKind,
};

use crate::{Error, Result};

const SELECT_COLUMNS: &str = "id, filename, test_type, confidence_level, median, std_dev, \
     p_value, statistic, result, decision, groups, dataset_key, created_at";

/// SQLite implementation of the analysis repository.
#[derive(Debug, Clone)]
pub struct SqliteAnalysisRepository {
    pool: SqlitePool,
}

impl SqliteAnalysisRepository {
    /// Create a new SQLite analysis repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a record and return it with its assigned id and timestamp.
    #[instrument(skip(self, analysis), fields(filename = %analysis.filename, test_type = %analysis.test_kind))]
    pub async fn create(&self, analysis: &NewAnalysis) -> Result<Analysis> {
        let created_at = Utc::now();
        let groups = serde_json::to_string(&analysis.groups)?;
        let outcome = &analysis.outcome;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO analyses (
                filename, test_type, confidence_level, median, std_dev,
                p_value, statistic, result, decision, groups, dataset_key, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&analysis.filename)
        .bind(analysis.test_kind.as_str())
        .bind(analysis.confidence_level.value())
        .bind(outcome.median)
        .bind(outcome.std_dev)
        .bind(outcome.p_value)
        .bind(outcome.statistic)
        .bind(outcome.result_label())
        .bind(outcome.decision.kind())
        .bind(&groups)
        .bind(analysis.dataset_key.map(|k| k.to_string()))
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;

        debug!(analysis_id = id, "Analysis inserted");
        Ok(analysis
            .clone()
            .into_analysis(AnalysisId::new(id), created_at))
    }

    /// Find an analysis by id.
    #[instrument(skip(self), fields(analysis_id = %id))]
    pub async fn find_by_id(&self, id: AnalysisId) -> Result<Option<Analysis>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM analyses WHERE id = ?"
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_analysis(&r)).transpose()
    }

    /// Every analysis, newest first.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Analysis>> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM analyses ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Fetched analyses");
        rows.iter().map(row_to_analysis).collect()
    }

    /// Delete an analysis; false when no row matched.
    #[instrument(skip(self), fields(analysis_id = %id))]
    pub async fn remove(&self, id: AnalysisId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM analyses WHERE id = ?")
            .bind(id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of stored analyses.
    pub async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM analyses")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

/// Convert a database row to an Analysis.
fn row_to_analysis(row: &SqliteRow) -> Result<Analysis> {
    let test_type: String = row.try_get("test_type")?;
    let test_kind: TestKind = test_type
        .parse()
        .map_err(|_| Error::Corrupt(format!("unknown test type '{test_type}'")))?;

    let confidence: f64 = row.try_get("confidence_level")?;
    let confidence_level = ConfidenceLevel::new(confidence)
        .map_err(|e| Error::Corrupt(e.to_string()))?;

    let result: String = row.try_get("result")?;
    let decision_kind: String = row.try_get("decision")?;
    let decision = decode_decision(&decision_kind, result)?;

    let groups_json: String = row.try_get("groups")?;
    let groups: GroupPartition = serde_json::from_str(&groups_json)?;

    let dataset_key = row
        .try_get::<Option<String>, _>("dataset_key")?
        .map(|k| {
            k.parse::<DatasetKey>()
                .map_err(|e| Error::Corrupt(format!("invalid dataset key '{k}': {e}")))
        })
        .transpose()?;

    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(Analysis {
        id: AnalysisId::new(row.try_get("id")?),
        filename: row.try_get("filename")?,
        test_kind,
        confidence_level,
        median: row.try_get("median")?,
        std_dev: row.try_get("std_dev")?,
        p_value: row.try_get("p_value")?,
        statistic: row.try_get("statistic")?,
        decision,
        groups,
        dataset_key,
        created_at,
    })
}

fn decode_decision(kind: &str, label: String) -> Result<Decision> {
    match kind {
        "reject" => Ok(Decision::Reject),
        "fail_to_reject" => Ok(Decision::FailToReject),
        "structural_error" => Ok(Decision::StructuralError { message: label }),
        other => Err(Error::Corrupt(format!("unknown decision '{other}'"))),
    }
}

#[async_trait]
impl AnalysisRepositoryPort for SqliteAnalysisRepository {
    async fn insert(&self, analysis: &NewAnalysis) -> std::result::Result<Analysis, ApplicationError> {
        Ok(self.create(analysis).await?)
    }

    async fn get_by_id(&self, id: AnalysisId) -> std::result::Result<Option<Analysis>, ApplicationError> {
        Ok(self.find_by_id(id).await?)
    }

    async fn list_recent(&self) -> std::result::Result<Vec<Analysis>, ApplicationError> {
        Ok(self.list().await?)
    }

    async fn delete(&self, id: AnalysisId) -> std::result::Result<bool, ApplicationError> {
        Ok(self.remove(id).await?)
    }
}
