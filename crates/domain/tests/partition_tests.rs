//! Tests for dataset partitioning and test-kind parsing
//!
//! Property tests over arbitrary label/value sequences plus the parsing rules
//! for test names coming from forms and the command line.

use hypothesis_lab_domain::{Dataset, EngineError, GroupRequirement, Observation, TestKind};
use proptest::prelude::*;

// ============================================================================
// GroupPartition Tests
// ============================================================================

fn observations() -> impl Strategy<Value = Vec<Observation>> {
    prop::collection::vec(
        (prop::sample::select(vec!["A", "B", "C", "D"]), -1.0e6f64..1.0e6),
        1..60,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(g, v)| Observation::new(g, v))
            .collect()
    })
}

proptest! {
    #[test]
    fn partition_preserves_every_value(rows in observations()) {
        let dataset = Dataset::new(rows.clone()).unwrap();
        let partition = dataset.partition();
        prop_assert_eq!(partition.total(), rows.len());

        for (label, values) in partition.iter() {
            let expected: Vec<f64> = rows
                .iter()
                .filter(|o| o.group == label)
                .map(|o| o.value)
                .collect();
            prop_assert_eq!(values.to_vec(), expected);
        }
    }

    #[test]
    fn partition_labels_follow_first_appearance(rows in observations()) {
        let dataset = Dataset::new(rows.clone()).unwrap();
        let mut seen: Vec<&str> = Vec::new();
        for o in &rows {
            if !seen.contains(&o.group.as_str()) {
                seen.push(&o.group);
            }
        }
        let partition = dataset.partition();
        let labels: Vec<&str> = partition.labels().collect();
        prop_assert_eq!(labels, seen);
    }

    #[test]
    fn partition_rows_flatten_group_by_group(rows in observations()) {
        let partition = Dataset::new(rows).unwrap().partition();
        let flattened = partition.rows();
        prop_assert_eq!(flattened.len(), partition.total());
        let rebuilt = Dataset::new(flattened).unwrap().partition();
        prop_assert_eq!(rebuilt, partition);
    }

    #[test]
    fn unknown_names_never_parse(name in "[a-z]{1,12}") {
        let known = ["anova", "wilcoxon", "ttest"];
        prop_assume!(!known.contains(&name.as_str()));
        prop_assert!(matches!(
            name.parse::<TestKind>(),
            Err(EngineError::UnknownTestKind(_))
        ));
    }
}

// ============================================================================
// TestKind Tests
// ============================================================================

#[test]
fn test_group_requirements() {
    assert_eq!(TestKind::TTest.group_requirement(), GroupRequirement::ExactlyTwo);
    assert_eq!(TestKind::MannWhitneyU.group_requirement(), GroupRequirement::ExactlyTwo);
    assert_eq!(TestKind::Wilcoxon.group_requirement(), GroupRequirement::ExactlyTwo);
    assert_eq!(TestKind::Anova.group_requirement(), GroupRequirement::AtLeastTwo);
    assert_eq!(TestKind::KruskalWallis.group_requirement(), GroupRequirement::AtLeastTwo);
    assert_eq!(TestKind::ChiSquare.group_requirement(), GroupRequirement::Any);
}

#[test]
fn test_parse_is_case_and_separator_insensitive() {
    assert_eq!("T-TEST".parse::<TestKind>().unwrap(), TestKind::TTest);
    assert_eq!("chi square".parse::<TestKind>().unwrap(), TestKind::ChiSquare);
    assert_eq!("kruskal_wallis".parse::<TestKind>().unwrap(), TestKind::KruskalWallis);
    assert_eq!("  mann whitney u ".parse::<TestKind>().unwrap(), TestKind::MannWhitneyU);
}

#[test]
fn test_unknown_kind_keeps_input() {
    match "z-test".parse::<TestKind>() {
        Err(EngineError::UnknownTestKind(name)) => assert_eq!(name, "z-test"),
        other => panic!("unexpected: {other:?}"),
    }
}
