//! CSV loader for the local inventory snapshot
//!
//! Semicolon separated, header row required. Every field is kept as a string;
//! empty fields stay empty strings and never become a missing-value marker.
//!
//! A payload that does not parse is a [`Error::Format`] failure. On the
//! requester side [`load_local_csv`] reports the same problems as
//! [`Error::Request`], before anything is sent.

use std::path::Path;

use encoding_rs::UTF_8;
use fleetsheet_types::{Error, Record, Result, JOIN_KEY};
use serde_json::Value;

pub const DELIMITER: u8 = b';';

/// Parse a CSV payload into local records
pub fn parse_local_records(bytes: &[u8]) -> Result<Vec<Record>> {
    // Strips a UTF-8 BOM; invalid sequences are replaced
    let (decoded, _, had_errors) = UTF_8.decode(bytes);
    if had_errors {
        tracing::warn!("CSV payload contains invalid UTF-8, replacing undecodable bytes");
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(DELIMITER)
        .from_reader(decoded.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| Error::Format(format!("Failed to parse CSV header: {}", e)))?
        .clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(Error::Format("CSV file is empty".to_string()));
    }
    if !headers.iter().any(|h| h == JOIN_KEY) {
        return Err(Error::Format(format!(
            "Missing required column: {}",
            JOIN_KEY
        )));
    }

    let mut records = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let row_num = row_idx + 2; // header is row 1
        let row = result
            .map_err(|e| Error::Format(format!("Failed to parse CSV row {}: {}", row_num, e)))?;

        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(h, v)| (h.to_string(), Value::String(v.to_string())))
            .collect();
        records.push(record);
    }

    Ok(records)
}

/// Read the local CSV and check that it parses. Returns the raw payload.
pub fn load_local_csv<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        Error::Request(format!("Failed to read CSV file {}: {}", path.display(), e))
    })?;
    parse_local_records(&bytes).map_err(|e| match e {
        Error::Format(msg) => Error::Request(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;
    Ok(bytes)
}
