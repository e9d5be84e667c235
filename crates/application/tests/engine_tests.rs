//! Tests for the hypothesis engine
//!
//! Reference results plus properties that must hold for any dataset.

use hypothesis_lab_application::HypothesisEngine;
use hypothesis_lab_domain::{
    ComputationError, ConfidenceLevel, Dataset, Decision, EngineError, Observation, TestKind,
};
use hypothesis_lab_testing::builders::DatasetBuilder;
use hypothesis_lab_testing::fixtures::{create_random_dataset, create_test_dataset};
use proptest::prelude::*;

fn two_groups(a: &[f64], b: &[f64]) -> Dataset {
    DatasetBuilder::new()
        .with_group("A", a.iter().copied())
        .with_group("B", b.iter().copied())
        .build()
}

fn run(dataset: &Dataset, kind: TestKind, confidence: f64) -> hypothesis_lab_domain::TestRun {
    HypothesisEngine::default()
        .run_test(dataset, kind, ConfidenceLevel::new(confidence).unwrap())
        .unwrap()
}

#[test]
fn test_t_test_reference_example() {
    let outcome = run(&create_test_dataset(), TestKind::TTest, 0.95).outcome;

    assert_eq!(outcome.median, Some(6.0));
    assert!((outcome.std_dev.unwrap() - (82.0f64 / 3.0).sqrt()).abs() < 1e-12);
    assert!((outcome.statistic.unwrap() + 12.727922061357855).abs() < 1e-9);
    assert!((outcome.p_value.unwrap() - 0.0061162653).abs() < 1e-8);
    assert_eq!(outcome.decision, Decision::Reject);
    assert_eq!(outcome.result_label(), "reject null");
}

#[test]
fn test_every_kind_by_name() {
    let engine = HypothesisEngine::default();
    let data = DatasetBuilder::new()
        .with_group("a", [1.0, 2.0, 3.0, 4.0])
        .with_group("b", [5.0, 7.0, 6.0, 9.0])
        .build();

    for name in [
        "t-test",
        "ANOVA",
        "chi-square",
        "Mann-Whitney U",
        "Wilcoxon",
        "Kruskal-Wallis",
    ] {
        let run = engine.run_named(&data, name, 0.95).unwrap();
        assert!(run.outcome.p_value.is_some(), "{name} produced no p-value");
        assert!(!run.outcome.decision.is_structural());
    }
}

#[test]
fn test_anova_reference() {
    let data = DatasetBuilder::new()
        .with_group("a", [1.0, 2.0, 3.0])
        .with_group("b", [4.0, 5.0, 6.0])
        .build();
    let outcome = run(&data, TestKind::Anova, 0.95).outcome;
    assert!((outcome.statistic.unwrap() - 13.5).abs() < 1e-12);
    assert!((outcome.p_value.unwrap() - 0.0213116411).abs() < 1e-8);
    assert_eq!(outcome.decision, Decision::Reject);

    // same data, stricter threshold
    let outcome = run(&data, TestKind::Anova, 0.99).outcome;
    assert_eq!(outcome.decision, Decision::FailToReject);
}

#[test]
fn test_kruskal_wallis_reference() {
    let data = DatasetBuilder::new()
        .with_group("a", [1.0, 2.0, 3.0])
        .with_group("b", [4.0, 5.0, 6.0])
        .with_group("c", [7.0, 8.0, 9.0])
        .build();
    let outcome = run(&data, TestKind::KruskalWallis, 0.95).outcome;
    assert!((outcome.statistic.unwrap() - 7.2).abs() < 1e-12);
    assert!((outcome.p_value.unwrap() - (-3.6f64).exp()).abs() < 1e-10);
}

#[test]
fn test_mann_whitney_exact_reference() {
    let data = two_groups(&[1.0, 2.0, 3.0, 4.0, 5.0], &[6.0, 7.0, 8.0, 9.0, 10.0]);
    let outcome = run(&data, TestKind::MannWhitneyU, 0.95).outcome;
    assert_eq!(outcome.statistic, Some(0.0));
    assert!((outcome.p_value.unwrap() - 2.0 / 252.0).abs() < 1e-12);
}

#[test]
fn test_wilcoxon_reference() {
    let data = two_groups(
        &[2.0, 4.0, 6.0, 8.0, 10.0, 12.0],
        &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
    );
    let outcome = run(&data, TestKind::Wilcoxon, 0.95).outcome;
    assert_eq!(outcome.statistic, Some(0.0));
    assert!((outcome.p_value.unwrap() - 0.03125).abs() < 1e-12);
}

#[test]
fn test_wilcoxon_unequal_pairs_is_computation_error() {
    let data = two_groups(&[1.0, 2.0, 3.0], &[1.0, 2.0]);
    let err = HypothesisEngine::default()
        .run_test(&data, TestKind::Wilcoxon, ConfidenceLevel::default())
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Computation(ComputationError::UnequalPairs { left: 3, right: 2 })
    );
}

#[test]
fn test_chi_square_single_group_has_no_dependence() {
    let data = DatasetBuilder::new().with_group("only", [1.0, 2.0, 2.0]).build();
    let outcome = run(&data, TestKind::ChiSquare, 0.95).outcome;
    assert_eq!(outcome.statistic, Some(0.0));
    assert_eq!(outcome.p_value, Some(1.0));
    assert_eq!(outcome.decision, Decision::FailToReject);
}

#[test]
fn test_single_observation_has_no_std_dev() {
    let data = Dataset::new(vec![Observation::new("A", 1.0)]).unwrap();
    let err = HypothesisEngine::default()
        .run_test(&data, TestKind::ChiSquare, ConfidenceLevel::default())
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Computation(ComputationError::InsufficientData { .. })
    ));
}

#[test]
fn test_bogus_name() {
    let err = HypothesisEngine::default()
        .run_named(&create_test_dataset(), "bogus", 0.95)
        .unwrap_err();
    assert_eq!(err, EngineError::UnknownTestKind("bogus".to_string()));
}

fn two_group_strategy() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (3usize..12).prop_flat_map(|n| {
        (
            proptest::collection::vec(-1000.0f64..1000.0, n),
            proptest::collection::vec(-1000.0f64..1000.0, n),
        )
    })
}

proptest! {
    #[test]
    fn prop_summary_is_independent_of_test_kind((a, b) in two_group_strategy()) {
        let data = two_groups(&a, &b);
        let reference = run(&data, TestKind::TTest, 0.95).outcome;

        for kind in TestKind::ALL {
            let outcome = run(&data, kind, 0.95).outcome;
            prop_assert_eq!(outcome.median, reference.median);
            prop_assert_eq!(outcome.std_dev, reference.std_dev);
        }
    }

    #[test]
    fn prop_decision_follows_p_value(
        (a, b) in two_group_strategy(),
        confidence in 0.5f64..0.999,
    ) {
        let data = two_groups(&a, &b);
        for kind in TestKind::ALL {
            let outcome = run(&data, kind, confidence).outcome;
            let p = outcome.p_value.unwrap();
            prop_assert!((0.0..=1.0).contains(&p));
            let expected = if p < 1.0 - confidence {
                Decision::Reject
            } else {
                Decision::FailToReject
            };
            prop_assert_eq!(outcome.decision, expected);
        }
    }

    #[test]
    fn prop_runs_are_idempotent((a, b) in two_group_strategy()) {
        let data = two_groups(&a, &b);
        for kind in TestKind::ALL {
            prop_assert_eq!(run(&data, kind, 0.95), run(&data, kind, 0.95));
        }
    }

    #[test]
    fn prop_two_group_tests_are_structural_otherwise(
        groups in prop_oneof![Just(1usize), 3usize..6],
        per_group in 2usize..5,
    ) {
        let data = create_random_dataset(groups, per_group);
        for kind in [TestKind::TTest, TestKind::MannWhitneyU, TestKind::Wilcoxon] {
            let outcome = run(&data, kind, 0.95).outcome;
            prop_assert_eq!(
                outcome.decision,
                Decision::StructuralError { message: kind.structural_message() }
            );
            prop_assert!(outcome.median.is_none());
            prop_assert!(outcome.statistic.is_none());
        }
    }

    #[test]
    fn prop_unknown_names_are_rejected(name in "[a-z]{3,12}") {
        prop_assume!(name.parse::<TestKind>().is_err());
        let err = HypothesisEngine::default()
            .run_named(&create_test_dataset(), &name, 0.95)
            .unwrap_err();
        prop_assert_eq!(err, EngineError::UnknownTestKind(name));
    }
}
