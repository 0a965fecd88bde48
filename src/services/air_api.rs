//! Trait and types for the air pollution data provider.

use anyhow::Result;
use serde::Deserialize;

use rental_rater::parser::PollutionSample;

/// A rental cluster centroid to sample, one row of the centroid CSV
/// (`cluster_id,lat,lon`). Centroids come from the upstream clustering
/// job, which is not part of this tool.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterCentroid {
    pub cluster_id: i64,
    pub lat: f64,
    pub lon: f64,
}

/// Abstraction over a current-conditions air pollution provider.
#[async_trait::async_trait]
pub trait AirPollutionApi {
    /// Returns the latest pollutant concentrations (µg/m³) at a coordinate.
    async fn current_pollution(&self, lat: f64, lon: f64) -> Result<PollutionSample>;
}
