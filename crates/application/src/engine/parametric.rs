//! Parametric tests: Student's two-sample t-test and one-way ANOVA.

use super::descriptive::{mean, sum_of_squares};
use super::{distribution_error, TestStatistic};
use hypothesis_lab_domain::{ComputationError, GroupPartition};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

/// Two-sample t-test with pooled variance, two-sided.
///
/// t = (x̄₁ - x̄₂) / √(s²ₚ (1/n₁ + 1/n₂)), df = n₁ + n₂ - 2.
pub fn student_t_test(a: &[f64], b: &[f64]) -> Result<TestStatistic, ComputationError> {
    let n1 = a.len();
    let n2 = b.len();
    if n1 + n2 < 3 {
        return Err(ComputationError::InsufficientData {
            test: "t-test",
            required: 3,
            actual: n1 + n2,
        });
    }

    let df = (n1 + n2 - 2) as f64;
    let pooled_var = (sum_of_squares(a) + sum_of_squares(b)) / df;
    if pooled_var <= 0.0 {
        return Err(ComputationError::ZeroVariance("t-test"));
    }

    let se = (pooled_var * (1.0 / n1 as f64 + 1.0 / n2 as f64)).sqrt();
    let t = (mean(a) - mean(b)) / se;

    let dist = StudentsT::new(0.0, 1.0, df).map_err(distribution_error)?;
    let p_value = (2.0 * dist.sf(t.abs())).min(1.0);

    Ok(TestStatistic::new(t, p_value))
}

/// One-way ANOVA F-test across every group of the partition.
///
/// F = (SS_between / (k - 1)) / (SS_within / (N - k)).
pub fn one_way_anova(partition: &GroupPartition) -> Result<TestStatistic, ComputationError> {
    const TEST: &str = "ANOVA";

    let k = partition.len();
    if k < 2 {
        return Err(ComputationError::TooFewGroups {
            test: TEST,
            required: 2,
            actual: k,
        });
    }
    for (label, values) in partition.iter() {
        if values.len() < 2 {
            return Err(ComputationError::TooFewObservations {
                test: TEST,
                group: label.to_string(),
                required: 2,
                actual: values.len(),
            });
        }
    }

    let all: Vec<f64> = partition.samples().concat();
    let n = all.len();
    let grand_mean = mean(&all);

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for values in partition.samples() {
        let group_mean = mean(values);
        ss_between += values.len() as f64 * (group_mean - grand_mean).powi(2);
        ss_within += sum_of_squares(values);
    }

    if ss_within <= 0.0 {
        return Err(ComputationError::ZeroVariance(TEST));
    }

    let df_between = (k - 1) as f64;
    let df_within = (n - k) as f64;
    let f = (ss_between / df_between) / (ss_within / df_within);

    let dist = FisherSnedecor::new(df_between, df_within).map_err(distribution_error)?;
    Ok(TestStatistic::new(f, dist.sf(f)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition(groups: &[(&str, &[f64])]) -> GroupPartition {
        groups
            .iter()
            .map(|(label, values)| (label.to_string(), values.to_vec()))
            .collect()
    }

    #[test]
    fn test_t_test_reference() {
        let r = student_t_test(&[1.0, 2.0], &[10.0, 11.0]).unwrap();
        assert!((r.statistic - (-12.727922061357855)).abs() < 1e-9);
        assert!((r.p_value - 0.006116264).abs() < 1e-6);
    }

    #[test]
    fn test_t_test_zero_variance() {
        let err = student_t_test(&[3.0, 3.0], &[3.0, 3.0]).unwrap_err();
        assert_eq!(err, ComputationError::ZeroVariance("t-test"));
    }

    #[test]
    fn test_t_test_two_singletons() {
        assert!(matches!(
            student_t_test(&[1.0], &[2.0]),
            Err(ComputationError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_anova_reference() {
        let r = one_way_anova(&partition(&[
            ("a", &[1.0, 2.0, 3.0]),
            ("b", &[4.0, 5.0, 6.0]),
        ]))
        .unwrap();
        assert!((r.statistic - 13.5).abs() < 1e-12);
        assert!((r.p_value - 0.021311641).abs() < 1e-6);
    }

    #[test]
    fn test_anova_singleton_group() {
        let err = one_way_anova(&partition(&[("a", &[1.0, 2.0]), ("b", &[3.0])])).unwrap_err();
        assert!(matches!(
            err,
            ComputationError::TooFewObservations { ref group, actual: 1, .. } if group == "b"
        ));
    }

    #[test]
    fn test_anova_single_group() {
        let err = one_way_anova(&partition(&[("a", &[1.0, 2.0])])).unwrap_err();
        assert!(matches!(err, ComputationError::TooFewGroups { actual: 1, .. }));
    }
}
