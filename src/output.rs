//! Tabular and JSON persistence for computed records.
//!
//! Supports CSV append (header written once), CSV batch reading, and
//! JSON artifact writing. File outputs are the persistence boundary of
//! this tool; loading them into a relational store happens elsewhere.

use anyhow::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use csv::WriterBuilder;
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Logs a record as pretty-printed JSON.
pub fn print_json<T: Serialize>(record: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

/// Appends a serializable record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record<T: Serialize>(path: &str, record: &T) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

/// Reads every row of a headered CSV file into `T`. Columns the type
/// does not name are ignored; a missing required column fails the row.
pub fn read_rows<T: DeserializeOwned>(path: &str) -> Result<Vec<T>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let record: T = result?;
        rows.push(record);
    }

    Ok(rows)
}

/// Serializes a value as pretty JSON to a file, replacing any existing
/// content.
pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aqi::{AqiRecord, AqiResult};
    use crate::scoring::QolScore;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_record() -> AqiRecord {
        AqiRecord::from_result(1, &AqiResult::no_data())
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&sample_record()).unwrap();
    }

    #[test]
    fn test_append_record_creates_file() {
        let path = temp_path("rental_rater_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        append_record(&path, &sample_record()).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.is_empty());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("rental_rater_test_header.csv");
        let _ = fs::remove_file(&path);

        append_record(&path, &sample_record()).unwrap();
        append_record(&path, &sample_record()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // Header line should appear exactly once
        let header_count = content.lines().filter(|l| l.contains("timestamp")).count();
        assert_eq!(header_count, 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_then_read_roundtrip() {
        let path = temp_path("rental_rater_test_roundtrip.csv");
        let _ = fs::remove_file(&path);

        let score = QolScore { listing_id: 42, raw_score: -0.25, normalized_score: 31.5 };
        append_record(&path, &score).unwrap();
        append_record(&path, &score).unwrap();

        let rows: Vec<QolScore> = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], score);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_json_replaces_content() {
        let path = temp_path("rental_rater_test_report.json");

        write_json(&path, &vec![1, 2, 3]).unwrap();
        write_json(&path, &vec![4]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: Vec<i32> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, vec![4]);

        fs::remove_file(&path).unwrap();
    }
}
