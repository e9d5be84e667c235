//! Summary statistics over the value column.

use hypothesis_lab_domain::ComputationError;
use statrs::statistics::{Data, Median, Statistics};

/// Arithmetic mean; `NaN` for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    values.mean()
}

/// Sum of squared deviations from the mean
pub fn sum_of_squares(values: &[f64]) -> f64 {
    let m = values.mean();
    values.iter().map(|v| (v - m).powi(2)).sum()
}

/// Median, averaging the two middle values for even lengths
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(Data::new(values.to_vec()).median())
}

fn require_two(values: &[f64]) -> Result<(), ComputationError> {
    if values.len() < 2 {
        return Err(ComputationError::InsufficientData {
            test: "standard deviation",
            required: 2,
            actual: values.len(),
        });
    }
    Ok(())
}

/// Sample variance with an `n - 1` divisor
pub fn sample_variance(values: &[f64]) -> Result<f64, ComputationError> {
    require_two(values)?;
    Ok(values.variance())
}

/// Sample standard deviation with an `n - 1` divisor
pub fn sample_std_dev(values: &[f64]) -> Result<f64, ComputationError> {
    require_two(values)?;
    Ok(values.std_dev())
}
