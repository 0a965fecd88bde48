//! Air Quality Index computation per EPA methodology.
//!
//! [`compute_aqi`] converts raw pollutant concentrations (µg/m³) into a
//! single AQI value, its category band, and the dominant pollutant. The
//! computation is pure: no I/O, no state, deterministic for a given set
//! of readings.

mod breakpoints;

use breakpoints::sub_index;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The six pollutants the index recognizes. Declaration order doubles as
/// the tie-breaking order for dominant-pollutant selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    #[serde(rename = "pm2_5")]
    Pm25,
    Pm10,
    O3,
    Co,
    So2,
    No2,
}

impl Pollutant {
    /// Fixed enumeration order used when scanning sub-indices for the
    /// maximum; the first pollutant reaching the max wins ties.
    pub const ORDER: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::O3,
        Pollutant::Co,
        Pollutant::So2,
        Pollutant::No2,
    ];

    /// Parses a provider component key. Keys outside the six recognized
    /// pollutants (the API also reports `no` and `nh3`) return `None`.
    pub fn from_key(key: &str) -> Option<Pollutant> {
        match key {
            "pm2_5" => Some(Pollutant::Pm25),
            "pm10" => Some(Pollutant::Pm10),
            "o3" => Some(Pollutant::O3),
            "co" => Some(Pollutant::Co),
            "so2" => Some(Pollutant::So2),
            "no2" => Some(Pollutant::No2),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm2_5",
            Pollutant::Pm10 => "pm10",
            Pollutant::O3 => "o3",
            Pollutant::Co => "co",
            Pollutant::So2 => "so2",
            Pollutant::No2 => "no2",
        }
    }
}

impl std::fmt::Display for Pollutant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A single observed concentration in µg/m³.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollutantReading {
    pub pollutant: Pollutant,
    pub concentration: f64,
}

impl PollutantReading {
    pub fn new(pollutant: Pollutant, concentration: f64) -> Self {
        Self { pollutant, concentration }
    }
}

/// AQI category band.
///
/// | Index     | Category                       |
/// |-----------|--------------------------------|
/// | 0–50      | Good                           |
/// | 51–100    | Moderate                       |
/// | 101–150   | Unhealthy for Sensitive Groups |
/// | 151–200   | Unhealthy                      |
/// | 201–300   | Very Unhealthy                 |
/// | 301–500   | Hazardous                      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
    /// No recognized pollutant readings were available.
    Unknown,
}

impl AqiCategory {
    pub fn from_index(aqi: u16) -> Self {
        match aqi {
            0..=50 => AqiCategory::Good,
            51..=100 => AqiCategory::Moderate,
            101..=150 => AqiCategory::UnhealthySensitive,
            151..=200 => AqiCategory::Unhealthy,
            201..=300 => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Hazardous,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthySensitive => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
            AqiCategory::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one AQI computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AqiResult {
    /// Maximum of the per-pollutant sub-indices; `None` when no
    /// recognized pollutant was present in the observation.
    pub overall_aqi: Option<u16>,
    pub category: AqiCategory,
    /// Pollutant achieving the overall index, ties broken by
    /// [`Pollutant::ORDER`].
    pub dominant_pollutant: Option<Pollutant>,
    /// Set when any concentration converted above its top breakpoint
    /// band; the affected sub-index is clamped to the table's top value.
    pub exceeds_scale: bool,
}

impl AqiResult {
    /// The explicit no-data outcome for observations with no recognized
    /// pollutants. Distinct from a 0 ("Good") index.
    pub fn no_data() -> Self {
        AqiResult {
            overall_aqi: None,
            category: AqiCategory::Unknown,
            dominant_pollutant: None,
            exceeds_scale: false,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AqiError {
    #[error("negative concentration {concentration} µg/m³ for {pollutant}")]
    NegativeConcentration { pollutant: Pollutant, concentration: f64 },

    #[error("non-finite concentration for {pollutant}")]
    NonFiniteConcentration { pollutant: Pollutant },
}

/// Computes the overall AQI for one observation.
///
/// Each reading is converted to its table units, mapped to a sub-index by
/// linear interpolation within its breakpoint band, and rounded. The
/// overall index is the maximum sub-index; the dominant pollutant is the
/// first one reaching that maximum in [`Pollutant::ORDER`]. When the same
/// pollutant appears more than once the last reading wins.
///
/// An empty slice yields [`AqiResult::no_data`], not an error and not a
/// zero index.
///
/// # Errors
///
/// Returns [`AqiError`] when any concentration is negative or non-finite.
pub fn compute_aqi(readings: &[PollutantReading]) -> Result<AqiResult, AqiError> {
    for r in readings {
        if !r.concentration.is_finite() {
            return Err(AqiError::NonFiniteConcentration { pollutant: r.pollutant });
        }
        if r.concentration < 0.0 {
            return Err(AqiError::NegativeConcentration {
                pollutant: r.pollutant,
                concentration: r.concentration,
            });
        }
    }

    let mut sub_indices: [Option<u16>; 6] = [None; 6];
    let mut exceeds_scale = false;

    for r in readings {
        let (index, above) = sub_index(r.pollutant, r.concentration);
        exceeds_scale |= above;
        sub_indices[r.pollutant as usize] = Some(index);
    }

    let mut overall: Option<(Pollutant, u16)> = None;
    for pollutant in Pollutant::ORDER {
        if let Some(index) = sub_indices[pollutant as usize] {
            match overall {
                Some((_, best)) if index <= best => {}
                _ => overall = Some((pollutant, index)),
            }
        }
    }

    Ok(match overall {
        Some((pollutant, index)) => AqiResult {
            overall_aqi: Some(index),
            category: AqiCategory::from_index(index),
            dominant_pollutant: Some(pollutant),
            exceeds_scale,
        },
        None => AqiResult::no_data(),
    })
}

/// One persisted AQI row, appended to the output CSV per observation.
#[derive(Debug, Serialize, Deserialize)]
pub struct AqiRecord {
    pub timestamp: DateTime<Utc>,
    pub cluster_id: i64,
    pub aqi: Option<u16>,
    pub category: String,
    pub dominant_pollutant: Option<String>,
    pub exceeds_scale: bool,
}

impl AqiRecord {
    pub fn from_result(cluster_id: i64, result: &AqiResult) -> Self {
        AqiRecord {
            timestamp: Utc::now(),
            cluster_id,
            aqi: result.overall_aqi,
            category: result.category.label().to_string(),
            dominant_pollutant: result.dominant_pollutant.map(|p| p.key().to_string()),
            exceeds_scale: result.exceeds_scale,
        }
    }
}
