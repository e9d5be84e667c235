//! Chi-square test of independence on the group × value contingency table.

use super::{distribution_error, TestStatistic};
use hypothesis_lab_domain::{ComputationError, GroupPartition};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Observed counts, rows = groups in partition order, columns = distinct
/// values in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct ContingencyTable {
    columns: Vec<f64>,
    counts: Vec<Vec<f64>>,
}

impl ContingencyTable {
    /// Cross-tabulate each group's values, treating every distinct value as a category
    pub fn from_partition(partition: &GroupPartition) -> Self {
        // -0.0 and 0.0 are the same category
        let normalize = |v: f64| if v == 0.0 { 0.0 } else { v };

        let mut columns: Vec<f64> = partition
            .samples()
            .into_iter()
            .flatten()
            .map(|v| normalize(*v))
            .collect();
        columns.sort_by(f64::total_cmp);
        columns.dedup();

        let counts = partition
            .samples()
            .into_iter()
            .map(|values| {
                let mut row = vec![0.0; columns.len()];
                for v in values {
                    if let Ok(idx) = columns.binary_search_by(|c| c.total_cmp(&normalize(*v))) {
                        row[idx] += 1.0;
                    }
                }
                row
            })
            .collect();

        Self { columns, counts }
    }

    /// Number of rows (groups)
    pub fn rows(&self) -> usize {
        self.counts.len()
    }

    /// Number of columns (distinct values)
    pub fn cols(&self) -> usize {
        self.columns.len()
    }

    /// Observed count at `(row, col)`
    pub fn count(&self, row: usize, col: usize) -> f64 {
        self.counts[row][col]
    }

    /// Degrees of freedom, `(r - 1)(c - 1)`
    pub fn dof(&self) -> usize {
        self.rows().saturating_sub(1) * self.cols().saturating_sub(1)
    }

    /// Expected counts under independence, `row_total * col_total / total`
    pub fn expected(&self) -> Vec<Vec<f64>> {
        let row_totals: Vec<f64> = self.counts.iter().map(|r| r.iter().sum()).collect();
        let col_totals: Vec<f64> = (0..self.cols())
            .map(|c| self.counts.iter().map(|r| r[c]).sum())
            .collect();
        let total: f64 = row_totals.iter().sum();

        row_totals
            .iter()
            .map(|rt| col_totals.iter().map(|ct| rt * ct / total).collect())
            .collect()
    }
}

/// Pearson chi-square test of independence.
///
/// Yates' continuity correction is applied when there is one degree of
/// freedom. A table with zero degrees of freedom yields statistic 0 and p = 1.
pub fn chi_square_independence(
    partition: &GroupPartition,
) -> Result<TestStatistic, ComputationError> {
    let table = ContingencyTable::from_partition(partition);
    let dof = table.dof();
    if dof == 0 {
        return Ok(TestStatistic::new(0.0, 1.0));
    }

    let expected = table.expected();
    let yates = dof == 1;

    let mut statistic = 0.0;
    for (r, row) in expected.iter().enumerate() {
        for (c, &e) in row.iter().enumerate() {
            let mut observed = table.count(r, c);
            if yates {
                let diff = e - observed;
                observed += diff.abs().min(0.5) * diff.signum();
            }
            statistic += (observed - e).powi(2) / e;
        }
    }

    let dist = ChiSquared::new(dof as f64).map_err(distribution_error)?;
    Ok(TestStatistic::new(statistic, dist.sf(statistic)))
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

    fn repeat(pairs: &[(f64, usize)]) -> Vec<f64> {
        pairs
            .iter()
            .flat_map(|(v, n)| std::iter::repeat(*v).take(*n))
            .collect()
    }

    #[test]
    fn test_table_layout() {
        let table = ContingencyTable::from_partition(&partition(&[
            ("b", &[2.0, 1.0, 2.0]),
            ("a", &[1.0, -0.0, 0.0]),
        ]));
        assert_eq!(table.rows(), 2);
        assert_eq!(table.cols(), 3);
        assert_eq!(table.count(0, 2), 2.0);
        assert_eq!(table.count(1, 0), 2.0);
        assert_eq!(table.dof(), 2);
    }

    #[test]
    fn test_yates_correction_on_2x2() {
        let a = repeat(&[(0.0, 10), (1.0, 20)]);
        let b = repeat(&[(0.0, 20), (1.0, 10)]);
        let r = chi_square_independence(&partition(&[("A", &a), ("B", &b)])).unwrap();
        assert!((r.statistic - 5.4).abs() < 1e-9);
        assert!((r.p_value - 0.020136).abs() < 1e-5);
    }

    #[test]
    fn test_three_by_two_without_correction() {
        let a = repeat(&[(1.0, 8), (2.0, 2)]);
        let b = repeat(&[(1.0, 4), (2.0, 6)]);
        let c = repeat(&[(1.0, 3), (2.0, 7)]);
        let r = chi_square_independence(&partition(&[("A", &a), ("B", &b), ("C", &c)])).unwrap();
        assert!((r.statistic - 5.6).abs() < 1e-9);
        assert!((r.p_value - 0.060810063).abs() < 1e-7);
    }

    #[test]
    fn test_zero_dof() {
        let r = chi_square_independence(&partition(&[("A", &[1.0, 2.0, 3.0])])).unwrap();
        assert_eq!(r.statistic, 0.0);
        assert_eq!(r.p_value, 1.0);

        let r = chi_square_independence(&partition(&[("A", &[1.0]), ("B", &[1.0, 1.0])])).unwrap();
        assert_eq!(r.statistic, 0.0);
        assert_eq!(r.p_value, 1.0);
    }

    #[test]
    fn test_independent_table() {
        let a = repeat(&[(1.0, 5), (2.0, 5), (3.0, 5)]);
        let b = repeat(&[(1.0, 5), (2.0, 5), (3.0, 5)]);
        let r = chi_square_independence(&partition(&[("A", &a), ("B", &b)])).unwrap();
        assert!(r.statistic.abs() < 1e-12);
        assert!((r.p_value - 1.0).abs() < 1e-12);
    }
}
