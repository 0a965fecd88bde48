//! First-principal-component extraction.
//!
//! The scoring pipeline uses PCA only to rank feature importance: the
//! loading magnitudes of the component with the largest eigenvalue serve
//! as data-driven weights. No dimensionality reduction happens here.

use nalgebra::DMatrix;

/// Returns the loading vector of the first principal component of the
/// given column-major data.
///
/// `columns` must all have the same length and already be centered
/// (standardized columns are); the population covariance then reduces to
/// `E[x_i * x_j]`. The sign of the returned vector is arbitrary — PCA
/// components have no canonical orientation — so callers interested in
/// magnitudes must take absolute values.
///
/// Returns an all-zero vector when there are no rows.
pub fn first_component(columns: &[Vec<f64>]) -> Vec<f64> {
    let n_features = columns.len();
    let n_rows = columns.first().map_or(0, Vec::len);
    if n_features == 0 || n_rows == 0 {
        return vec![0.0; n_features];
    }

    let mut covariance = DMatrix::zeros(n_features, n_features);
    for i in 0..n_features {
        for j in i..n_features {
            let c = columns[i]
                .iter()
                .zip(&columns[j])
                .map(|(a, b)| a * b)
                .sum::<f64>()
                / n_rows as f64;
            covariance[(i, j)] = c;
            covariance[(j, i)] = c;
        }
    }

    let eigen = covariance.symmetric_eigen();

    let mut largest = 0;
    for k in 1..n_features {
        if eigen.eigenvalues[k] > eigen.eigenvalues[largest] {
            largest = k;
        }
    }

    eigen.eigenvectors.column(largest).iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::standardize::standardize_column;

    const EPS: f64 = 1e-6;

    #[test]
    fn test_first_component_is_unit_length() {
        let columns = vec![
            vec![1.0, -1.0, 0.5, -0.5],
            vec![0.9, -1.1, 0.4, -0.2],
        ];
        let loadings = first_component(&columns);
        let norm: f64 = loadings.iter().map(|l| l * l).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < EPS);
    }

    #[test]
    fn test_perfectly_correlated_columns_load_equally() {
        // Two identical standardized columns: the dominant variance axis
        // is the diagonal, so |loadings| are 1/sqrt(2) each.
        let mut a = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let mut b = a.clone();
        standardize_column(&mut a);
        standardize_column(&mut b);

        let loadings = first_component(&[a, b]);
        let expected = 1.0 / 2.0_f64.sqrt();
        assert!((loadings[0].abs() - expected).abs() < EPS);
        assert!((loadings[1].abs() - expected).abs() < EPS);
    }

    #[test]
    fn test_uncorrelated_low_variance_column_loads_near_zero() {
        // First column carries almost all variance; the second is tiny
        // noise orthogonal to it.
        let columns = vec![
            vec![10.0, -10.0, 10.0, -10.0],
            vec![0.01, 0.01, -0.01, -0.01],
        ];
        let loadings = first_component(&columns);
        assert!(loadings[0].abs() > 0.99);
        assert!(loadings[1].abs() < 0.01);
    }

    #[test]
    fn test_no_rows_yields_zero_vector() {
        let loadings = first_component(&[Vec::new(), Vec::new()]);
        assert_eq!(loadings, vec![0.0, 0.0]);
    }
}
