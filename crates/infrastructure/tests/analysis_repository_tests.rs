//! Integration tests for the SQLite analysis repository
//!
//! Every test runs against its own `sqlite::memory:` database.

use hypothesis_lab_application::{AnalysisRepositoryPort, HypothesisEngine};
use hypothesis_lab_domain::{
    AnalysisId, ConfidenceLevel, DatasetKey, Decision, NewAnalysis, TestKind,
};
use hypothesis_lab_infrastructure::{
    CsvDatasetCodec, DatabaseConfig, DatabasePool, SqliteAnalysisRepository,
};

async fn repository() -> SqliteAnalysisRepository {
    let pool = DatabasePool::new(&DatabaseConfig::in_memory()).await.unwrap();
    pool.migrate().await.unwrap();
    SqliteAnalysisRepository::new(pool.pool().clone())
}

fn new_analysis(csv: &str, kind: TestKind) -> NewAnalysis {
    let dataset = CsvDatasetCodec::new().decode_bytes(csv.as_bytes()).unwrap();
    let confidence = ConfidenceLevel::default();
    let run = HypothesisEngine::default()
        .run_test(&dataset, kind, confidence)
        .unwrap();
    NewAnalysis::from_run("data.csv", kind, confidence, run, Some(DatasetKey::new()))
}

#[tokio::test]
async fn test_insert_and_get() {
    let repo = repository().await;
    let new = new_analysis("group,value\nA,1\nA,2\nB,10\nB,11\n", TestKind::TTest);

    let created = repo.insert(&new).await.unwrap();
    assert!(created.id.value() > 0);
    assert_eq!(created.decision, Decision::Reject);

    let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.filename, "data.csv");
    assert_eq!(fetched.test_kind, TestKind::TTest);
    assert_eq!(fetched.median, Some(6.0));
    assert_eq!(fetched.p_value, created.p_value);
    assert_eq!(fetched.dataset_key, new.dataset_key);
    assert_eq!(fetched.result(), "reject null");
}

#[tokio::test]
async fn test_group_order_survives_storage() {
    let repo = repository().await;
    let new = new_analysis(
        "group,value\nzeta,1\nalpha,2\nzeta,3\nmid,4\nalpha,5\nmid,6\n",
        TestKind::KruskalWallis,
    );

    let created = repo.insert(&new).await.unwrap();
    let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();

    let labels: Vec<&str> = fetched.groups.labels().collect();
    assert_eq!(labels, vec!["zeta", "alpha", "mid"]);
    assert_eq!(fetched.groups.get("zeta"), Some(&[1.0, 3.0][..]));
    assert_eq!(fetched.rows().len(), 6);
}

#[tokio::test]
async fn test_structural_outcome_round_trip() {
    let repo = repository().await;
    let new = new_analysis("group,value\nA,1\nB,2\nC,3\n", TestKind::MannWhitneyU);

    let created = repo.insert(&new).await.unwrap();
    let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();

    assert!(fetched.decision.is_structural());
    assert_eq!(fetched.result(), "Mann-Whitney U requires exactly 2 groups");
    assert!(fetched.median.is_none());
    assert!(fetched.p_value.is_none());
}

#[tokio::test]
async fn test_list_recent_newest_first() {
    let repo = repository().await;
    let first = repo
        .insert(&new_analysis("group,value\nA,1\nA,2\nB,3\nB,4\n", TestKind::Anova))
        .await
        .unwrap();
    let second = repo
        .insert(&new_analysis("group,value\nA,1\nA,2\nB,3\nB,5\n", TestKind::Anova))
        .await
        .unwrap();

    let history = repo.list_recent().await.unwrap();
    let ids: Vec<AnalysisId> = history.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
    assert_eq!(repo.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_delete() {
    let repo = repository().await;
    let created = repo
        .insert(&new_analysis("group,value\nA,1\nB,2\n", TestKind::ChiSquare))
        .await
        .unwrap();

    assert!(repo.delete(created.id).await.unwrap());
    assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    assert!(!repo.delete(created.id).await.unwrap());
}

#[tokio::test]
async fn test_missing_analysis() {
    let repo = repository().await;
    assert!(repo.get_by_id(AnalysisId::new(999)).await.unwrap().is_none());
    assert!(repo.list_recent().await.unwrap().is_empty());
}
