//! Column statistics and rescaling helpers.

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the population standard deviation given a pre-computed mean.
/// Returns 0.0 for empty input.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    variance.sqrt()
}

/// Rescales a column in place to zero mean and unit variance, using the
/// population standard deviation.
///
/// Returns `false` when the column has no variance; the column is zeroed
/// instead of dividing by zero and the caller decides what a constant
/// column should contribute.
pub fn standardize_column(values: &mut [f64]) -> bool {
    let m = mean(values);
    let sd = stddev(values, m);

    if sd == 0.0 {
        values.fill(0.0);
        return false;
    }

    for v in values.iter_mut() {
        *v = (*v - m) / sd;
    }
    true
}

/// Linearly rescales values so the minimum maps to 0 and the maximum to
/// `scale`. When every value is identical the whole batch maps to 0.
pub fn min_max_scale(values: &[f64], scale: f64) -> Vec<f64> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }

    if values.is_empty() || max == min {
        return vec![0.0; values.len()];
    }

    values.iter().map(|v| (v - min) / (max - min) * scale).collect()
}
