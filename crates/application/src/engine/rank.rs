//! Rank-based tests: Mann-Whitney U, Wilcoxon signed-rank and Kruskal-Wallis H.

use super::{distribution_error, PValueMethod, TestStatistic};
use hypothesis_lab_domain::{ComputationError, GroupPartition};
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};
use std::cmp::Ordering;

/// Average ranks of `values` (1-based, ties share the mean rank) in input
/// order, together with the tie term Σ(t³ - t) over tie groups.
pub fn rank_with_ties(values: &[f64]) -> (Vec<f64>, f64) {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| values[i].partial_cmp(&values[j]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; n];
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // Positions i..j are tied; average rank = (i+1 + j) / 2
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = avg_rank;
        }
        let t = (j - i) as f64;
        tie_term += t * t * t - t;
        i = j;
    }
    (ranks, tie_term)
}

fn standard_normal() -> Result<Normal, ComputationError> {
    Normal::new(0.0, 1.0).map_err(distribution_error)
}

/// Mann-Whitney U test, two-sided.
///
/// The reported statistic is U₁, the count for the first sample. The exact
/// null distribution is used when there are no ties and the smaller sample has
/// at most `exact_max` observations; otherwise the normal approximation with
/// tie and continuity correction.
pub fn mann_whitney_u(
    a: &[f64],
    b: &[f64],
    exact_max: usize,
) -> Result<TestStatistic, ComputationError> {
    const TEST: &str = "Mann-Whitney U";

    let n1 = a.len();
    let n2 = b.len();
    if n1 == 0 || n2 == 0 {
        return Err(ComputationError::InsufficientData {
            test: TEST,
            required: 2,
            actual: n1 + n2,
        });
    }

    let combined: Vec<f64> = a.iter().chain(b).copied().collect();
    let (ranks, tie_term) = rank_with_ties(&combined);

    let n1f = n1 as f64;
    let n2f = n2 as f64;
    let r1: f64 = ranks[..n1].iter().sum();
    let u1 = r1 - n1f * (n1f + 1.0) / 2.0;
    let u2 = n1f * n2f - u1;
    let u_max = u1.max(u2);

    if tie_term == 0.0 && n1.min(n2) <= exact_max {
        let counts = mann_whitney_counts(n1.min(n2), n1.max(n2));
        let total: f64 = counts.iter().sum();
        let k = u_max.round() as usize;
        let upper: f64 = counts[k.min(counts.len())..].iter().sum();
        let p_value = (2.0 * upper / total).min(1.0);
        return Ok(TestStatistic::new(u1, p_value).with_method(PValueMethod::Exact));
    }

    let nf = n1f + n2f;
    let mu = n1f * n2f / 2.0;
    let sigma_sq = n1f * n2f / 12.0 * ((nf + 1.0) - tie_term / (nf * (nf - 1.0)));
    if sigma_sq <= 0.0 {
        return Err(ComputationError::AllTied(TEST));
    }

    let z = (u_max - mu - 0.5) / sigma_sq.sqrt();
    let p_value = (2.0 * standard_normal()?.sf(z)).min(1.0);
    Ok(TestStatistic::new(u1, p_value).with_method(PValueMethod::Asymptotic))
}

/// Number of arrangements yielding each U value for samples of sizes `m` and
/// `n`: the coefficients of the Gaussian binomial `[m+n choose m]_q`.
fn mann_whitney_counts(m: usize, n: usize) -> Vec<f64> {
    let max_u = m * n;
    let mut counts = vec![0.0; max_u + 1];
    counts[0] = 1.0;
    for i in 1..=m {
        // multiply by (1 - q^(n+i)), truncated at degree max_u
        let shift = n + i;
        for k in (shift..=max_u).rev() {
            counts[k] -= counts[k - shift];
        }
        // divide by (1 - q^i)
        for k in i..=max_u {
            counts[k] += counts[k - i];
        }
    }
    counts
}

/// Wilcoxon signed-rank test on the paired differences `a[i] - b[i]`, two-sided.
///
/// Zero differences are dropped. The statistic is `T = min(R⁺, R⁻)`. The exact
/// null distribution is used for at most `exact_max` pairs when there are no
/// ties and no zeros; otherwise the normal approximation with tie correction.
pub fn wilcoxon_signed_rank(
    a: &[f64],
    b: &[f64],
    exact_max: usize,
) -> Result<TestStatistic, ComputationError> {
    const TEST: &str = "Wilcoxon";

    if a.len() != b.len() {
        return Err(ComputationError::UnequalPairs {
            left: a.len(),
            right: b.len(),
        });
    }

    let diffs: Vec<f64> = a
        .iter()
        .zip(b)
        .map(|(x, y)| x - y)
        .filter(|d| *d != 0.0)
        .collect();
    let zeros = a.len() - diffs.len();
    if diffs.is_empty() {
        return Err(ComputationError::AllZeroDifferences);
    }

    let abs_diffs: Vec<f64> = diffs.iter().map(|d| d.abs()).collect();
    let (ranks, tie_term) = rank_with_ties(&abs_diffs);

    let r_plus: f64 = diffs
        .iter()
        .zip(&ranks)
        .filter(|(d, _)| **d > 0.0)
        .fold(0.0, |acc, (_, r)| acc + r);
    let r_minus: f64 = ranks.iter().sum::<f64>() - r_plus;
    let t = r_plus.min(r_minus);

    let n = diffs.len();
    if n <= exact_max && tie_term == 0.0 && zeros == 0 {
        let counts = signed_rank_counts(n);
        let total = 2f64.powi(n as i32);
        let k = t.round() as usize;
        let lower: f64 = counts[..=k.min(counts.len() - 1)].iter().sum();
        let p_value = (2.0 * lower / total).min(1.0);
        return Ok(TestStatistic::new(t, p_value).with_method(PValueMethod::Exact));
    }

    let nf = n as f64;
    let mean = nf * (nf + 1.0) / 4.0;
    let var = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - tie_term / 48.0;
    if var <= 0.0 {
        return Err(ComputationError::AllTied(TEST));
    }

    let z = (t - mean) / var.sqrt();
    let p_value = (2.0 * standard_normal()?.sf(z.abs())).min(1.0);
    Ok(TestStatistic::new(t, p_value).with_method(PValueMethod::Asymptotic))
}

/// Number of subsets of `{1, ..., n}` with each possible sum.
fn signed_rank_counts(n: usize) -> Vec<f64> {
    let max_sum = n * (n + 1) / 2;
    let mut counts = vec![0.0; max_sum + 1];
    counts[0] = 1.0;
    for rank in 1..=n {
        for s in (rank..=max_sum).rev() {
            counts[s] += counts[s - rank];
        }
    }
    counts
}

/// Kruskal-Wallis H test with tie correction, referred to χ²(k - 1).
pub fn kruskal_wallis(partition: &GroupPartition) -> Result<TestStatistic, ComputationError> {
    const TEST: &str = "Kruskal-Wallis";

    let k = partition.len();
    if k < 2 {
        return Err(ComputationError::TooFewGroups {
            test: TEST,
            required: 2,
            actual: k,
        });
    }

    let all: Vec<f64> = partition.samples().concat();
    let (ranks, tie_term) = rank_with_ties(&all);
    let nf = all.len() as f64;

    let mut sum_sq_over_n = 0.0;
    let mut offset = 0;
    for values in partition.samples() {
        let rank_sum: f64 = ranks[offset..offset + values.len()].iter().sum();
        sum_sq_over_n += rank_sum * rank_sum / values.len() as f64;
        offset += values.len();
    }

    let h = 12.0 / (nf * (nf + 1.0)) * sum_sq_over_n - 3.0 * (nf + 1.0);
    let correction = 1.0 - tie_term / (nf * nf * nf - nf);
    if correction <= 0.0 {
        return Err(ComputationError::AllTied(TEST));
    }
    let h = h / correction;

    let dist = ChiSquared::new((k - 1) as f64).map_err(distribution_error)?;
    Ok(TestStatistic::new(h, dist.sf(h)))
}
