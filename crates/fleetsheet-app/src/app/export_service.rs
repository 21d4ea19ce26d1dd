//! Export Service - requester-side use case
//!
//! Submits the local CSV to the reconciliation service, assembles the report
//! from the returned rows and writes `vehicles-<date>.xlsx`.

use std::path::PathBuf;

use chrono::NaiveDate;
use fleetsheet_domain::model::RecencyBand;
use fleetsheet_domain::service::{assemble, report_file_name};
use fleetsheet_infra::csv_loader::load_local_csv;
use fleetsheet_infra::excel::write_report;
use fleetsheet_infra::reconcile_client::ReconcileClient;
use fleetsheet_types::{Error, Result};

#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub input: PathBuf,
    pub keys: Vec<String>,
    pub colored: bool,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub rows: usize,
    /// Rows per recency band; empty when not colored
    pub band_counts: Vec<(RecencyBand, usize)>,
}

/// Parse the `--colored` flag. Only `True` and `False` are accepted.
pub fn parse_colored_flag(value: &str) -> Result<bool> {
    match value {
        "True" => Ok(true),
        "False" => Ok(false),
        other => Err(Error::Usage(format!(
            "Invalid value for flag -c/--colored: '{}' (expected True or False)",
            other
        ))),
    }
}

/// Run the full export. Nothing is written unless every step succeeds.
pub fn export_report(
    client: &ReconcileClient,
    request: &ExportRequest,
    today: NaiveDate,
) -> Result<ExportOutcome> {
    if !request.input.is_file() {
        return Err(Error::Request(format!(
            "CSV file not found: {}",
            request.input.display()
        )));
    }
    let csv = load_local_csv(&request.input)?;
    let file_name = request
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("vehicles.csv")
        .to_string();

    let rows = client.process_csv(&file_name, csv, &request.keys, request.colored)?;
    tracing::debug!(rows = rows.len(), "received reconciled rows");

    let doc = assemble(rows, &request.keys, request.colored, today)?;

    std::fs::create_dir_all(&request.output_dir)?;
    let path = request.output_dir.join(report_file_name(today));
    write_report(&doc, &path)?;

    Ok(ExportOutcome {
        path,
        rows: doc.rows.len(),
        band_counts: doc.band_counts(),
    })
}
