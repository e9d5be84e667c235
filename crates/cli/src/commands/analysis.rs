//! Remote analysis commands
//!
//! Upload, history, re-run and delete against a running API server.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use hypothesis_lab_domain::GroupPartition;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::commands::{fmt_number, CommandContext};
use crate::interactive::{confirm, spinner};
use crate::output::{colors, Render, TableFormatter};

/// One `(group, value)` row as returned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    pub group: String,
    pub value: f64,
}

/// Analysis record as returned by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: i64,
    pub filename: String,
    pub test_type: String,
    #[serde(default)]
    pub test_name: String,
    pub confidence_level: f64,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
    pub p_value: Option<f64>,
    pub statistic: Option<f64>,
    pub result: String,
    #[serde(default)]
    pub decision: String,
    pub created_at: DateTime<Utc>,
    pub groups: GroupPartition,
    #[serde(default)]
    pub data: Vec<DataRow>,
}

impl Render for AnalysisRecord {
    fn format_table(&self) -> Result<String> {
        let sizes = self
            .groups
            .iter()
            .map(|(label, values)| format!("{label} ({})", values.len()))
            .collect::<Vec<_>>()
            .join(", ");

        TableFormatter::key_value(vec![
            ("ID", self.id.to_string()),
            ("File", self.filename.clone()),
            ("Test", self.test_type.clone()),
            ("Confidence", self.confidence_level.to_string()),
            ("Groups", sizes),
            ("Median", fmt_number(self.median)),
            ("Std dev", fmt_number(self.std_dev)),
            ("Statistic", fmt_number(self.statistic)),
            ("p-value", fmt_number(self.p_value)),
            ("Result", self.result.clone()),
            ("Created", self.created_at.to_rfc3339()),
        ])
    }
}

/// Stored analyses, newest first
#[derive(Debug, Clone, Serialize)]
pub struct History(pub Vec<AnalysisRecord>);

impl Render for History {
    fn format_table(&self) -> Result<String> {
        let rows = self
            .0
            .iter()
            .map(|a| {
                vec![
                    a.id.to_string(),
                    a.filename.clone(),
                    a.test_type.clone(),
                    a.confidence_level.to_string(),
                    fmt_number(a.p_value),
                    a.result.clone(),
                    a.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                ]
            })
            .collect();
        TableFormatter::simple(
            vec!["ID", "File", "Test", "Confidence", "p-value", "Result", "Created"],
            rows,
        )
    }
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    detail: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServerStatus {
    pub status: String,
    pub version: String,
}

impl Render for ServerStatus {
    fn format_table(&self) -> Result<String> {
        TableFormatter::key_value(vec![
            ("Status", self.status.clone()),
            ("Version", self.version.clone()),
        ])
    }
}

/// Upload a CSV file and run a test on the server
pub async fn upload(
    ctx: &CommandContext,
    file: PathBuf,
    test_type: String,
    confidence_level: Option<f64>,
) -> Result<()> {
    let content =
        fs::read(&file).with_context(|| format!("Failed to read {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.csv".to_string());
    let confidence = confidence_level.unwrap_or(ctx.config.default_confidence);

    let sp = spinner("Uploading...");
    let record: Result<AnalysisRecord> = ctx
        .client
        .upload_csv(&file_name, content, &test_type, Some(confidence))
        .await;
    sp.finish_and_clear();

    ctx.emit(&record?)
}

/// List stored analyses
pub async fn history(ctx: &CommandContext, limit: Option<usize>) -> Result<()> {
    let sp = spinner("Fetching history...");
    let records: Result<Vec<AnalysisRecord>> = ctx.client.get("/history").await;
    sp.finish_and_clear();

    let mut records = records?;
    if records.is_empty() {
        println!("{}", colors::warning("No analyses found."));
        return Ok(());
    }
    if let Some(limit) = limit {
        records.truncate(limit);
    }

    ctx.emit(&History(records))
}

/// Re-run a stored analysis on the server
pub async fn rerun(ctx: &CommandContext, id: i64) -> Result<()> {
    let sp = spinner("Re-running analysis...");
    let record: Result<AnalysisRecord> = ctx.client.post_empty(&format!("/rerun/{id}")).await;
    sp.finish_and_clear();

    ctx.emit(&record?)
}

/// Delete a stored analysis, asking first unless `yes` is set
pub async fn delete(ctx: &CommandContext, id: i64, yes: bool) -> Result<()> {
    if !yes && !confirm(&format!("Delete analysis {id} and its CSV?"))? {
        println!("{}", colors::dim("Cancelled."));
        return Ok(());
    }

    let response: DetailResponse = ctx.client.delete(&format!("/delete/{id}")).await?;
    println!("{}", colors::success(&format!("{} analysis {id}", response.detail)));
    Ok(())
}

/// Show server health
pub async fn status(ctx: &CommandContext) -> Result<()> {
    let status: ServerStatus = ctx
        .client
        .get("/health")
        .await
        .with_context(|| format!("Server at {} is not reachable", ctx.client.base_url()))?;
    ctx.emit(&status)
}
