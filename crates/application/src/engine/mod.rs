//! Hypothesis engine - test dispatch and statistics
//!
//! The engine checks a dataset against the structural requirements of the
//! selected test, runs the statistical routine, computes summary statistics
//! over the full value column and takes the reject / fail-to-reject decision.
//! It holds no state beyond its configuration and is safe to share across
//! threads.

mod contingency;
mod descriptive;
mod parametric;
mod rank;

pub use contingency::{chi_square_independence, ContingencyTable};
pub use descriptive::{mean, median, sample_std_dev, sample_variance};
pub use parametric::{one_way_anova, student_t_test};
pub use rank::{kruskal_wallis, mann_whitney_u, rank_with_ties, wilcoxon_signed_rank};

use hypothesis_lab_domain::{
    ComputationError, ConfidenceLevel, Dataset, EngineResult, GroupPartition, GroupRequirement,
    TestKind, TestOutcome, TestRun,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// How a p-value was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PValueMethod {
    /// Closed-form or continuous reference distribution
    Distribution,
    /// Enumerated null distribution
    Exact,
    /// Normal approximation
    Asymptotic,
}

/// Statistic and two-sided p-value from one routine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestStatistic {
    pub statistic: f64,
    pub p_value: f64,
    pub method: PValueMethod,
}

impl TestStatistic {
    pub fn new(statistic: f64, p_value: f64) -> Self {
        Self {
            statistic,
            p_value,
            method: PValueMethod::Distribution,
        }
    }

    pub fn with_method(mut self, method: PValueMethod) -> Self {
        self.method = method;
        self
    }
}

pub(crate) fn distribution_error(e: impl std::fmt::Display) -> ComputationError {
    ComputationError::Distribution(e.to_string())
}

/// Hypothesis engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Largest smaller-sample size for the exact Mann-Whitney distribution
    pub mann_whitney_exact_max: usize,
    /// Largest number of non-zero pairs for the exact Wilcoxon distribution
    pub wilcoxon_exact_max: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mann_whitney_exact_max: 8,
            wilcoxon_exact_max: 50,
        }
    }
}

/// The hypothesis-test engine
#[derive(Debug, Clone, Default)]
pub struct HypothesisEngine {
    config: EngineConfig,
}

impl HypothesisEngine {
    /// Create an engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run a test selected by name.
    ///
    /// The name is resolved before the confidence level is checked, and both
    /// before any computation.
    pub fn run_named(
        &self,
        dataset: &Dataset,
        test_kind: &str,
        confidence_level: f64,
    ) -> EngineResult<TestRun> {
        let kind: TestKind = test_kind.parse()?;
        let confidence = ConfidenceLevel::new(confidence_level)?;
        self.run_test(dataset, kind, confidence)
    }

    /// Run `kind` against `dataset` and decide at `confidence`.
    ///
    /// Two-group tests on a dataset with any other number of groups return a
    /// structural outcome rather than an error.
    #[instrument(skip(self, dataset), fields(observations = dataset.len(), confidence = %confidence))]
    pub fn run_test(
        &self,
        dataset: &Dataset,
        kind: TestKind,
        confidence: ConfidenceLevel,
    ) -> EngineResult<TestRun> {
        let partition = dataset.partition();

        if kind.group_requirement() == GroupRequirement::ExactlyTwo && partition.len() != 2 {
            debug!(groups = partition.len(), "group count does not fit test");
            return Ok(TestRun {
                outcome: TestOutcome::structural(kind.structural_message()),
                partition,
            });
        }

        let result = self.compute(kind, &partition)?;

        let values = dataset.values();
        let median = median(&values);
        let std_dev = sample_std_dev(&values)?;
        let decision = confidence.decide(result.p_value);

        debug!(
            statistic = result.statistic,
            p_value = result.p_value,
            method = ?result.method,
            decision = decision.kind(),
            "test completed"
        );

        Ok(TestRun {
            outcome: TestOutcome {
                median,
                std_dev: Some(std_dev),
                p_value: Some(result.p_value),
                statistic: Some(result.statistic),
                decision,
            },
            partition,
        })
    }

    /// Dispatch to the statistical routine for `kind`
    pub fn compute(
        &self,
        kind: TestKind,
        partition: &GroupPartition,
    ) -> Result<TestStatistic, ComputationError> {
        match kind {
            TestKind::TTest => {
                let (a, b) = two_samples(partition);
                student_t_test(a, b)
            }
            TestKind::Anova => one_way_anova(partition),
            TestKind::ChiSquare => chi_square_independence(partition),
            TestKind::MannWhitneyU => {
                let (a, b) = two_samples(partition);
                mann_whitney_u(a, b, self.config.mann_whitney_exact_max)
            }
            TestKind::Wilcoxon => {
                let (a, b) = two_samples(partition);
                wilcoxon_signed_rank(a, b, self.config.wilcoxon_exact_max)
            }
            TestKind::KruskalWallis => kruskal_wallis(partition),
        }
    }
}

/// First and second group in partition order
fn two_samples(partition: &GroupPartition) -> (&[f64], &[f64]) {
    let mut samples = partition.samples().into_iter();
    let a = samples.next().unwrap_or(&[]);
    let b = samples.next().unwrap_or(&[]);
    (a, b)
}

/// Builder for HypothesisEngine
pub struct HypothesisEngineBuilder {
    config: EngineConfig,
}

impl HypothesisEngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn mann_whitney_exact_max(mut self, max: usize) -> Self {
        self.config.mann_whitney_exact_max = max;
        self
    }

    pub fn wilcoxon_exact_max(mut self, max: usize) -> Self {
        self.config.wilcoxon_exact_max = max;
        self
    }

    pub fn build(self) -> HypothesisEngine {
        HypothesisEngine::new(self.config)
    }
}

impl Default for HypothesisEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
