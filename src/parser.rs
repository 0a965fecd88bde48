//! JSON decoding for air pollution observations.
//!
//! Handles two shapes: the provider's `air_pollution` response, and the
//! observation batch file written by `fetch-air`. Component maps carry
//! keys the AQI engine does not recognize (`no`, `nh3`); those are
//! dropped during conversion to typed readings.

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::aqi::{Pollutant, PollutantReading};

/// Raw response from the provider's current-conditions endpoint.
#[derive(Debug, Deserialize)]
pub struct PollutionResponse {
    #[serde(default)]
    pub list: Vec<PollutionSample>,
}

/// One sampled set of pollutant concentrations (µg/m³).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollutionSample {
    /// Provider-side unix timestamp of the sample.
    #[serde(default)]
    pub dt: Option<i64>,
    pub components: HashMap<String, f64>,
}

/// One observation as written by `fetch-air`: a cluster id plus the raw
/// component map for its centroid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub cluster_id: i64,
    pub components: HashMap<String, f64>,
}

/// Converts a raw component map into typed readings in [`Pollutant::ORDER`],
/// dropping unrecognized keys.
fn readings_from_components(components: &HashMap<String, f64>) -> Vec<PollutantReading> {
    Pollutant::ORDER
        .iter()
        .filter_map(|p| components.get(p.key()).map(|c| PollutantReading::new(*p, *c)))
        .collect()
}

impl PollutionSample {
    pub fn readings(&self) -> Vec<PollutantReading> {
        readings_from_components(&self.components)
    }
}

impl Observation {
    pub fn readings(&self) -> Vec<PollutantReading> {
        readings_from_components(&self.components)
    }
}

/// Decodes a provider response from raw bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid JSON for the response shape.
pub fn parse_response(bytes: &[u8]) -> Result<PollutionResponse> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Decodes an observation batch file from raw bytes.
pub fn parse_observations(bytes: &[u8]) -> Result<Vec<Observation>> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"{
        "coord": {"lon": -77.03, "lat": 38.89},
        "list": [{
            "main": {"aqi": 2},
            "components": {
                "co": 230.31, "no": 0.02, "no2": 14.05, "o3": 68.66,
                "so2": 1.25, "pm2_5": 10.0, "pm10": 12.9, "nh3": 0.86
            },
            "dt": 1717929600
        }]
    }"#;

    #[test]
    fn test_parse_provider_response() {
        let response = parse_response(SAMPLE_RESPONSE.as_bytes()).unwrap();
        assert_eq!(response.list.len(), 1);
        let sample = &response.list[0];
        assert_eq!(sample.dt, Some(1717929600));
        assert_eq!(sample.components["pm2_5"], 10.0);
    }

    #[test]
    fn test_unrecognized_components_are_dropped() {
        let response = parse_response(SAMPLE_RESPONSE.as_bytes()).unwrap();
        let readings = response.list[0].readings();

        // no and nh3 are reported by the provider but not indexed
        assert_eq!(readings.len(), 6);
    }

    #[test]
    fn test_readings_follow_enumeration_order() {
        let response = parse_response(SAMPLE_RESPONSE.as_bytes()).unwrap();
        let readings = response.list[0].readings();
        let order: Vec<Pollutant> = readings.iter().map(|r| r.pollutant).collect();
        assert_eq!(order, Pollutant::ORDER.to_vec());
    }

    #[test]
    fn test_parse_invalid_bytes() {
        assert!(parse_response(&[0xFF, 0xFE, 0x00]).is_err());
    }

    #[test]
    fn test_parse_observation_batch_roundtrip() {
        let observations = vec![Observation {
            cluster_id: 12,
            components: HashMap::from([("pm2_5".to_string(), 8.4)]),
        }];
        let bytes = serde_json::to_vec(&observations).unwrap();

        let parsed = parse_observations(&bytes).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].cluster_id, 12);
        assert_eq!(parsed[0].readings(), vec![PollutantReading::new(Pollutant::Pm25, 8.4)]);
    }

    #[test]
    fn test_empty_component_map_yields_no_readings() {
        let observation = Observation { cluster_id: 1, components: HashMap::new() };
        assert!(observation.readings().is_empty());
    }
}
