//! Requester-side client for the reconciliation service
//!
//! Blocking reqwest client (no Tokio runtime required): uploads the CSV as a
//! multipart form and returns the reconciled records.

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use serde::Deserialize;

use fleetsheet_types::{Error, Record, Result};

pub const PROCESS_CSV_PATH: &str = "/process-csv/";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "Error")]
    error: String,
}

pub struct ReconcileClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl ReconcileClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("fleetsheet/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Upstream(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Submit the CSV with the requested columns and display mode
    pub fn process_csv(
        &self,
        file_name: &str,
        csv: Vec<u8>,
        keys: &[String],
        colored: bool,
    ) -> Result<Vec<Record>> {
        let mut form = Form::new().part(
            "csv_file",
            Part::bytes(csv).file_name(file_name.to_string()),
        );
        for key in keys {
            form = form.text("keys", key.clone());
        }
        form = form.text("colored", if colored { "True" } else { "False" });

        let url = format!("{}{}", self.base_url, PROCESS_CSV_PATH);
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| Error::Upstream(format!("reconciliation service unreachable: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| Error::Upstream(format!("failed to read service response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(Error::Upstream(format!(
                "reconciliation failed (HTTP {}): {}",
                status.as_u16(),
                message
            )));
        }

        serde_json::from_str::<Vec<Record>>(&body).map_err(|e| {
            Error::Upstream(format!("reconciliation service returned invalid records: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_process_csv_returns_records() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/process-csv/")
                .body_includes("name=\"csv_file\"")
                .body_includes("kurzname;foo")
                .body_includes("name=\"keys\"")
                .body_includes("True");
            then.status(200)
                .json_body(json!([{"rnr": "1", "kurzname": "V1", "hu": "2024-01-01"}]));
        });

        let client = ReconcileClient::new(&server.base_url(), Duration::from_secs(5)).unwrap();
        let records = client
            .process_csv(
                "vehicles.csv",
                b"kurzname;foo\nV1;x\n".to_vec(),
                &["gruppe".to_string()],
                true,
            )
            .unwrap();

        mock.assert();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["kurzname"], json!("V1"));
    }

    #[test]
    fn test_service_error_body_is_surfaced() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/process-csv/");
            then.status(500)
                .json_body(json!({"Error": "fleet API unreachable"}));
        });

        let client = ReconcileClient::new(&server.base_url(), Duration::from_secs(5)).unwrap();
        let err = client
            .process_csv("vehicles.csv", b"kurzname\nV1\n".to_vec(), &[], false)
            .unwrap_err();

        assert!(
            matches!(&err, Error::Upstream(msg) if msg.contains("fleet API unreachable") && msg.contains("500")),
            "unexpected: {}",
            err
        );
    }

    #[test]
    fn test_non_array_response_is_upstream_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/process-csv/");
            then.status(200).json_body(json!({"rnr": {"0": "1"}}));
        });

        let client = ReconcileClient::new(&server.base_url(), Duration::from_secs(5)).unwrap();
        let err = client
            .process_csv("vehicles.csv", b"kurzname\nV1\n".to_vec(), &[], false)
            .unwrap_err();

        assert!(matches!(err, Error::Upstream(_)));
    }
}
