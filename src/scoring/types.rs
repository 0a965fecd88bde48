//! Data types used by the scoring pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const FEATURE_COUNT: usize = 7;

/// Fixed column order shared by the feature matrix, the derived weights,
/// and the CSV input.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "price",
    "aqi",
    "nwi_score",
    "nearest_bus_stop_distance",
    "nearby_bus_stop_count",
    "nearby_park_count",
    "nearest_park_distance",
];

/// One row of the dense feature table handed to the scoring engine.
///
/// The external aggregator produces this table (spatial joins against bus
/// stop and park layers plus the persisted AQI output); every field must
/// be present and finite before the engine runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingFeatures {
    pub listing_id: i64,
    pub price: f64,
    pub aqi: f64,
    /// National Walkability Index score.
    pub nwi_score: f64,
    pub nearest_bus_stop_distance: f64,
    pub nearby_bus_stop_count: f64,
    pub nearby_park_count: f64,
    pub nearest_park_distance: f64,
}

impl ListingFeatures {
    /// Feature values in [`FEATURE_NAMES`] order.
    pub(crate) fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.price,
            self.aqi,
            self.nwi_score,
            self.nearest_bus_stop_distance,
            self.nearby_bus_stop_count,
            self.nearby_park_count,
            self.nearest_park_distance,
        ]
    }
}

/// Per-feature weights derived from the first principal component's
/// absolute loadings, normalized to sum 1.0. Weights are batch-relative:
/// recomputing over a differently composed batch yields different values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QolWeights {
    pub price: f64,
    pub aqi: f64,
    pub nwi_score: f64,
    pub nearest_bus_stop_distance: f64,
    pub nearby_bus_stop_count: f64,
    pub nearby_park_count: f64,
    pub nearest_park_distance: f64,
}

impl QolWeights {
    pub(crate) fn from_array(w: [f64; FEATURE_COUNT]) -> Self {
        QolWeights {
            price: w[0],
            aqi: w[1],
            nwi_score: w[2],
            nearest_bus_stop_distance: w[3],
            nearby_bus_stop_count: w[4],
            nearby_park_count: w[5],
            nearest_park_distance: w[6],
        }
    }

    /// Weight values in [`FEATURE_NAMES`] order.
    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.price,
            self.aqi,
            self.nwi_score,
            self.nearest_bus_stop_distance,
            self.nearby_bus_stop_count,
            self.nearby_park_count,
            self.nearest_park_distance,
        ]
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

/// Composite score for one listing.
///
/// `normalized_score` min-max rescales `raw_score` over the batch it was
/// computed from; it carries no meaning across batches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QolScore {
    pub listing_id: i64,
    pub raw_score: f64,
    pub normalized_score: f64,
}

/// Output of one scoring run: the derived weights plus one score per
/// input row, in input order.
#[derive(Debug, Clone)]
pub struct QolBatch {
    pub weights: QolWeights,
    pub scores: Vec<QolScore>,
    /// Zero-variance feature columns that were pinned to weight 0.
    pub degenerate_features: Vec<&'static str>,
}

/// JSON artifact handed to downstream publishers.
#[derive(Debug, Serialize)]
pub struct ScoreReport {
    pub generated_at: DateTime<Utc>,
    pub listings: usize,
    pub weights: QolWeights,
    pub scores: Vec<QolScore>,
}

impl ScoreReport {
    pub fn from_batch(batch: &QolBatch) -> Self {
        ScoreReport {
            generated_at: Utc::now(),
            listings: batch.scores.len(),
            weights: batch.weights,
            scores: batch.scores.clone(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    #[error("feature `{feature}` of listing {listing_id} is {value}; the log transform requires non-negative input")]
    NegativeValue { listing_id: i64, feature: &'static str, value: f64 },

    #[error("feature `{feature}` of listing {listing_id} is not finite")]
    NonFiniteValue { listing_id: i64, feature: &'static str },

    #[error("batch of {rows} rows has fewer than 2 distinct feature vectors; standardization is undefined")]
    InsufficientData { rows: usize },

    #[error("duplicate listing id {listing_id} in batch")]
    DuplicateListing { listing_id: i64 },
}
