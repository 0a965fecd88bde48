use rental_rater::aqi::{AqiCategory, Pollutant, compute_aqi};
use rental_rater::parser::parse_observations;
use rental_rater::scoring::{ListingFeatures, compute_qol_scores};

#[test]
fn test_observation_batch_to_aqi_records() {
    let bytes = include_bytes!("fixtures/observations.json");
    let observations = parse_observations(bytes).expect("Failed to parse observations");
    assert_eq!(observations.len(), 3);

    let results: Vec<_> = observations
        .iter()
        .map(|o| compute_aqi(&o.readings()).expect("Failed to compute AQI"))
        .collect();

    // Typical urban observation: PM2.5 dominates at index 42
    assert_eq!(results[0].overall_aqi, Some(42));
    assert_eq!(results[0].category, AqiCategory::Good);
    assert_eq!(results[0].dominant_pollutant, Some(Pollutant::Pm25));
    assert!(!results[0].exceeds_scale);

    // Wildfire-grade PM2.5 clamps to the top of the scale with a flag
    assert_eq!(results[1].overall_aqi, Some(500));
    assert_eq!(results[1].category, AqiCategory::Hazardous);
    assert!(results[1].exceeds_scale);

    // Only unrecognized components: explicit no-data outcome
    assert_eq!(results[2].overall_aqi, None);
    assert_eq!(results[2].category, AqiCategory::Unknown);
    assert_eq!(results[2].dominant_pollutant, None);
}

#[test]
fn test_feature_table_to_scored_batch() {
    let bytes: &[u8] = include_bytes!("fixtures/listings.csv");
    let mut reader = csv::Reader::from_reader(bytes);
    let rows: Vec<ListingFeatures> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .expect("Failed to read feature table");
    // The fixture carries an extra `state` column the engine ignores
    assert_eq!(rows.len(), 5);

    let batch = compute_qol_scores(&rows).expect("Failed to score batch");
    assert_eq!(batch.scores.len(), 5);
    assert!((batch.weights.sum() - 1.0).abs() < 1e-9);

    let min = batch
        .scores
        .iter()
        .map(|s| s.normalized_score)
        .fold(f64::INFINITY, f64::min);
    let max = batch
        .scores
        .iter()
        .map(|s| s.normalized_score)
        .fold(f64::NEG_INFINITY, f64::max);
    assert!(min.abs() < 1e-9);
    assert!((max - 100.0).abs() < 1e-9);

    // Scores come back in input order
    let ids: Vec<i64> = batch.scores.iter().map(|s| s.listing_id).collect();
    assert_eq!(ids, vec![101, 102, 103, 104, 105]);
}
