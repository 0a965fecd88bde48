//! Batch scoring pipeline.
//!
//! Turns a dense listing feature table into composite Quality-of-Life
//! scores: log transform of skewed columns, standardization, directional
//! sign inversion, PCA-derived weighting, weighted composite, min-max
//! normalization to a 0–100 scale.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::scoring::pca::first_component;
use crate::scoring::standardize::{min_max_scale, standardize_column};
use crate::scoring::types::{
    FEATURE_COUNT, FEATURE_NAMES, ListingFeatures, QolBatch, QolScore, QolWeights, ScoreError,
};

// Column indices into FEATURE_NAMES.
const PRICE: usize = 0;
const AQI: usize = 1;
const NEAREST_BUS_STOP: usize = 3;
const NEAREST_PARK: usize = 6;

/// Skewed, strictly non-negative columns that get a log(1+x) transform
/// before standardization to tame their right tails.
const LOG_COLUMNS: [usize; 3] = [PRICE, NEAREST_BUS_STOP, NEAREST_PARK];

/// Columns where a lower raw value means a better outcome; their
/// standardized values are negated so that across every column a larger
/// value always means a better living condition. The PCA weighting
/// depends on this orientation.
const INVERTED_COLUMNS: [usize; 3] = [AQI, NEAREST_BUS_STOP, NEAREST_PARK];

/// Scores a whole batch of listings.
///
/// PCA and the final normalization are whole-batch statistics, so the
/// entire input must be materialized before calling; there is no
/// incremental mode. Weights and normalized scores are relative to this
/// batch: re-running on the identical batch reproduces them exactly,
/// while any change in batch composition changes both. Callers chunking
/// a listing set into separate runs are choosing per-chunk scales.
///
/// An empty batch returns an empty result with zero weights.
///
/// # Errors
///
/// Returns [`ScoreError`] for duplicate listing ids, non-finite values,
/// negative values in log-transformed columns, or a batch with fewer
/// than 2 distinct feature vectors. Zero-variance columns are not an
/// error: they standardize to zero and are pinned to weight 0.
pub fn compute_qol_scores(rows: &[ListingFeatures]) -> Result<QolBatch, ScoreError> {
    if rows.is_empty() {
        return Ok(QolBatch {
            weights: QolWeights::from_array([0.0; FEATURE_COUNT]),
            scores: Vec::new(),
            degenerate_features: Vec::new(),
        });
    }

    let mut seen_ids = HashSet::new();
    for row in rows {
        if !seen_ids.insert(row.listing_id) {
            return Err(ScoreError::DuplicateListing { listing_id: row.listing_id });
        }
    }

    let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(rows.len()); FEATURE_COUNT];
    let mut distinct_rows = HashSet::new();
    for row in rows {
        let vector = row.to_vector();
        for (index, value) in vector.iter().enumerate() {
            if !value.is_finite() {
                return Err(ScoreError::NonFiniteValue {
                    listing_id: row.listing_id,
                    feature: FEATURE_NAMES[index],
                });
            }
            columns[index].push(*value);
        }
        distinct_rows.insert(vector.map(f64::to_bits));
    }

    if distinct_rows.len() < 2 {
        return Err(ScoreError::InsufficientData { rows: rows.len() });
    }

    for &index in &LOG_COLUMNS {
        for (value, row) in columns[index].iter_mut().zip(rows) {
            if *value < 0.0 {
                return Err(ScoreError::NegativeValue {
                    listing_id: row.listing_id,
                    feature: FEATURE_NAMES[index],
                    value: *value,
                });
            }
            *value = value.ln_1p();
        }
    }

    let mut degenerate_features = Vec::new();
    for (index, column) in columns.iter_mut().enumerate() {
        if !standardize_column(column) {
            degenerate_features.push(FEATURE_NAMES[index]);
        }
    }
    if !degenerate_features.is_empty() {
        warn!(features = ?degenerate_features, "zero-variance features contribute no weight");
    }

    for &index in &INVERTED_COLUMNS {
        for value in columns[index].iter_mut() {
            *value = -*value;
        }
    }

    let loadings = first_component(&columns);

    let mut weights = [0.0_f64; FEATURE_COUNT];
    for (index, loading) in loadings.iter().enumerate() {
        if !degenerate_features.contains(&FEATURE_NAMES[index]) {
            weights[index] = loading.abs();
        }
    }
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        for weight in weights.iter_mut() {
            *weight /= total;
        }
    }
    debug!(?weights, "derived first-component weights");

    let raw_scores: Vec<f64> = (0..rows.len())
        .map(|r| {
            columns
                .iter()
                .zip(&weights)
                .map(|(column, weight)| column[r] * weight)
                .sum()
        })
        .collect();

    let normalized = min_max_scale(&raw_scores, 100.0);

    let scores = rows
        .iter()
        .zip(raw_scores.iter().zip(&normalized))
        .map(|(row, (raw, norm))| QolScore {
            listing_id: row.listing_id,
            raw_score: *raw,
            normalized_score: *norm,
        })
        .collect();

    Ok(QolBatch {
        weights: QolWeights::from_array(weights),
        scores,
        degenerate_features,
    })
}
