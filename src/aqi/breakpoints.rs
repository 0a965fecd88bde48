//! EPA breakpoint tables and unit conversion.
//!
//! Concentrations arrive in µg/m³. PM2.5 and PM10 are indexed in µg/m³
//! directly; O3, SO2 and NO2 are indexed in ppb and CO in ppm, so those
//! are converted first using the gas molecular weight.

use crate::aqi::Pollutant;

/// One concentration band mapped linearly onto an index range.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Band {
    pub c_lo: f64,
    pub c_hi: f64,
    pub i_lo: u16,
    pub i_hi: u16,
}

const fn band(c_lo: f64, c_hi: f64, i_lo: u16, i_hi: u16) -> Band {
    Band { c_lo, c_hi, i_lo, i_hi }
}

// µg/m³
const PM2_5: [Band; 6] = [
    band(0.0, 12.0, 0, 50),
    band(12.1, 35.4, 51, 100),
    band(35.5, 55.4, 101, 150),
    band(55.5, 150.4, 151, 200),
    band(150.5, 250.4, 201, 300),
    band(250.5, 500.4, 301, 500),
];

// µg/m³
const PM10: [Band; 6] = [
    band(0.0, 54.0, 0, 50),
    band(55.0, 154.0, 51, 100),
    band(155.0, 254.0, 101, 150),
    band(255.0, 354.0, 151, 200),
    band(355.0, 424.0, 201, 300),
    band(425.0, 604.0, 301, 500),
];

// ppb, 8-hour convention: the table stops at 300
const O3: [Band; 5] = [
    band(0.0, 54.0, 0, 50),
    band(55.0, 70.0, 51, 100),
    band(71.0, 85.0, 101, 150),
    band(86.0, 105.0, 151, 200),
    band(106.0, 200.0, 201, 300),
];

// ppm
const CO: [Band; 6] = [
    band(0.0, 4.4, 0, 50),
    band(4.5, 9.4, 51, 100),
    band(9.5, 12.4, 101, 150),
    band(12.5, 15.4, 151, 200),
    band(15.5, 30.4, 201, 300),
    band(30.5, 50.4, 301, 500),
];

// ppb
const SO2: [Band; 6] = [
    band(0.0, 35.0, 0, 50),
    band(36.0, 75.0, 51, 100),
    band(76.0, 185.0, 101, 150),
    band(186.0, 304.0, 151, 200),
    band(305.0, 604.0, 201, 300),
    band(605.0, 1004.0, 301, 500),
];

// ppb
const NO2: [Band; 6] = [
    band(0.0, 53.0, 0, 50),
    band(54.0, 100.0, 51, 100),
    band(101.0, 360.0, 101, 150),
    band(361.0, 649.0, 151, 200),
    band(650.0, 1249.0, 201, 300),
    band(1250.0, 2049.0, 301, 500),
];

pub(crate) fn bands(pollutant: Pollutant) -> &'static [Band] {
    match pollutant {
        Pollutant::Pm25 => &PM2_5,
        Pollutant::Pm10 => &PM10,
        Pollutant::O3 => &O3,
        Pollutant::Co => &CO,
        Pollutant::So2 => &SO2,
        Pollutant::No2 => &NO2,
    }
}

/// Converts µg/m³ to ppb for a gas with the given molecular weight (g/mol).
fn ugm3_to_ppb(ugm3: f64, molecular_weight: f64) -> f64 {
    ugm3 * 24.45 / molecular_weight
}

/// Converts µg/m³ to ppm for a gas with the given molecular weight (g/mol).
fn ugm3_to_ppm(ugm3: f64, molecular_weight: f64) -> f64 {
    ugm3_to_ppb(ugm3, molecular_weight) / 1000.0
}

/// Converts a µg/m³ concentration into the unit its breakpoint table is
/// expressed in. Particulates pass through unchanged.
pub(crate) fn to_table_units(pollutant: Pollutant, ugm3: f64) -> f64 {
    match pollutant {
        Pollutant::Pm25 | Pollutant::Pm10 => ugm3,
        Pollutant::O3 => ugm3_to_ppb(ugm3, 48.0),
        Pollutant::So2 => ugm3_to_ppb(ugm3, 64.0),
        Pollutant::No2 => ugm3_to_ppb(ugm3, 46.0),
        Pollutant::Co => ugm3_to_ppm(ugm3, 28.0),
    }
}

/// Computes the sub-index for a non-negative µg/m³ concentration.
///
/// Returns the rounded index and whether the concentration fell above the
/// pollutant's top band, in which case the index clamps to the table's top
/// value instead of silently underreporting. Concentrations in the gap
/// between two discrete bands clamp up to the next band's lower edge so
/// the index stays monotone in concentration.
pub(crate) fn sub_index(pollutant: Pollutant, ugm3: f64) -> (u16, bool) {
    let cp = to_table_units(pollutant, ugm3);
    let table = bands(pollutant);

    for b in table {
        if cp <= b.c_hi {
            let cp = cp.max(b.c_lo);
            let index =
                f64::from(b.i_lo) + f64::from(b.i_hi - b.i_lo) / (b.c_hi - b.c_lo) * (cp - b.c_lo);
            return (index.round() as u16, false);
        }
    }

    (table.last().map_or(500, |b| b.i_hi), true)
}
