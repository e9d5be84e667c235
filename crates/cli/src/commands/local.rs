//! Local commands
//!
//! These run the hypothesis engine in-process on a CSV file; no server needed.

use anyhow::{Context, Result};
use hypothesis_lab_application::HypothesisEngine;
use hypothesis_lab_domain::{ConfidenceLevel, Dataset, GroupPartition, GroupRequirement, TestKind};
use hypothesis_lab_infrastructure::CsvDatasetCodec;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::commands::{fmt_number, CommandContext};
use crate::interactive::{progress_bar, select};
use crate::output::{Render, TableFormatter};

/// One test run on a local file
#[derive(Debug, Clone, Serialize)]
pub struct LocalRun {
    pub file: String,
    pub test_type: String,
    pub test_name: String,
    pub confidence_level: f64,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
    pub p_value: Option<f64>,
    pub statistic: Option<f64>,
    pub result: String,
    pub decision: String,
    pub groups: GroupPartition,
}

impl Render for LocalRun {
    fn format_table(&self) -> Result<String> {
        let sizes = self
            .groups
            .iter()
            .map(|(label, values)| format!("{label} ({})", values.len()))
            .collect::<Vec<_>>()
            .join(", ");

        TableFormatter::key_value(vec![
            ("File", self.file.clone()),
            ("Test", self.test_name.clone()),
            ("Confidence", self.confidence_level.to_string()),
            ("Groups", sizes),
            ("Median", fmt_number(self.median)),
            ("Std dev", fmt_number(self.std_dev)),
            ("Statistic", fmt_number(self.statistic)),
            ("p-value", fmt_number(self.p_value)),
            ("Result", self.result.clone()),
        ])
    }
}

/// One row of a comparison across every test
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub test_type: String,
    pub statistic: Option<f64>,
    pub p_value: Option<f64>,
    pub result: String,
    pub decision: String,
}

/// Every test run on the same file
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub file: String,
    pub confidence_level: f64,
    pub runs: Vec<ComparisonRow>,
}

impl Render for Comparison {
    fn format_table(&self) -> Result<String> {
        let rows = self
            .runs
            .iter()
            .map(|r| {
                vec![
                    r.test_type.clone(),
                    fmt_number(r.statistic),
                    fmt_number(r.p_value),
                    r.result.clone(),
                ]
            })
            .collect();
        TableFormatter::simple(vec!["Test", "Statistic", "p-value", "Result"], rows)
    }
}

/// Supported test, as listed by `kinds`
#[derive(Debug, Clone, Serialize)]
pub struct KindRow {
    pub name: String,
    pub display_name: String,
    pub groups: String,
    pub description: String,
}

impl From<TestKind> for KindRow {
    fn from(kind: TestKind) -> Self {
        let groups = match kind.group_requirement() {
            GroupRequirement::ExactlyTwo => "exactly 2",
            GroupRequirement::AtLeastTwo => "2 or more",
            GroupRequirement::Any => "any",
        };
        Self {
            name: kind.as_str().to_string(),
            display_name: kind.display_name().to_string(),
            groups: groups.to_string(),
            description: kind.description().to_string(),
        }
    }
}

/// All supported tests
#[derive(Debug, Clone, Serialize)]
pub struct KindList(pub Vec<KindRow>);

impl Render for KindList {
    fn format_table(&self) -> Result<String> {
        let rows = self
            .0
            .iter()
            .map(|k| {
                vec![
                    k.name.clone(),
                    k.display_name.clone(),
                    k.groups.clone(),
                    k.description.clone(),
                ]
            })
            .collect();
        TableFormatter::simple(vec!["Name", "Display name", "Groups", "Description"], rows)
    }
}

/// Read and decode a local CSV file
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    CsvDatasetCodec::new()
        .decode_bytes(&bytes)
        .with_context(|| format!("Invalid dataset in {}", path.display()))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Run one test on a local file
pub fn run_file(
    engine: &HypothesisEngine,
    path: &Path,
    test_type: &str,
    confidence_level: f64,
) -> Result<LocalRun> {
    let dataset = load_dataset(path)?;
    let run = engine.run_named(&dataset, test_type, confidence_level)?;
    let kind: TestKind = test_type.parse()?;

    Ok(LocalRun {
        file: file_label(path),
        test_type: kind.as_str().to_string(),
        test_name: kind.display_name().to_string(),
        confidence_level,
        median: run.outcome.median,
        std_dev: run.outcome.std_dev,
        p_value: run.outcome.p_value,
        statistic: run.outcome.statistic,
        result: run.outcome.result_label().to_string(),
        decision: run.outcome.decision.kind().to_string(),
        groups: run.partition,
    })
}

/// Run every test on a local file
///
/// A test that cannot run on the data is reported in its row instead of
/// aborting the comparison.
pub fn compare_file(
    engine: &HypothesisEngine,
    path: &Path,
    confidence_level: f64,
    mut on_progress: impl FnMut(TestKind),
) -> Result<Comparison> {
    let dataset = load_dataset(path)?;
    let confidence = ConfidenceLevel::new(confidence_level)?;

    let runs = TestKind::ALL
        .into_iter()
        .map(|kind| {
            on_progress(kind);
            match engine.run_test(&dataset, kind, confidence) {
                Ok(run) => ComparisonRow {
                    test_type: kind.as_str().to_string(),
                    statistic: run.outcome.statistic,
                    p_value: run.outcome.p_value,
                    result: run.outcome.result_label().to_string(),
                    decision: run.outcome.decision.kind().to_string(),
                },
                Err(e) => ComparisonRow {
                    test_type: kind.as_str().to_string(),
                    statistic: None,
                    p_value: None,
                    result: e.to_string(),
                    decision: "error".to_string(),
                },
            }
        })
        .collect();

    Ok(Comparison {
        file: file_label(path),
        confidence_level,
        runs,
    })
}

/// `run`: one test on a local file, prompting for the test when none is given
pub async fn run(
    ctx: &CommandContext,
    file: PathBuf,
    test_type: Option<String>,
    confidence_level: Option<f64>,
) -> Result<()> {
    let test_type = match test_type {
        Some(t) => t,
        None => {
            let names: Vec<&str> = TestKind::ALL.iter().map(|k| k.display_name()).collect();
            let index = select("Test to run", &names)?;
            TestKind::ALL[index].as_str().to_string()
        }
    };
    let confidence = confidence_level.unwrap_or(ctx.config.default_confidence);

    let result = run_file(&HypothesisEngine::default(), &file, &test_type, confidence)?;
    ctx.emit(&result)
}

/// `compare`: every test on a local file
pub async fn compare(
    ctx: &CommandContext,
    file: PathBuf,
    confidence_level: Option<f64>,
) -> Result<()> {
    let confidence = confidence_level.unwrap_or(ctx.config.default_confidence);

    let pb = progress_bar(TestKind::ALL.len() as u64);
    let comparison = compare_file(&HypothesisEngine::default(), &file, confidence, |kind| {
        pb.set_message(kind.display_name());
        pb.inc(1);
    });
    pb.finish_and_clear();

    ctx.emit(&comparison?)
}

/// `kinds`: the supported tests
pub async fn kinds(ctx: &CommandContext) -> Result<()> {
    let list = KindList(TestKind::ALL.into_iter().map(KindRow::from).collect());
    ctx.emit(&list)
}
