//! Reconciliation service HTTP surface
//!
//! `POST /process-csv/` takes a multipart upload (`csv_file`, repeated `keys`,
//! `colored`) and answers with the reconciled records as a JSON array, or
//! `{"Error": ...}` with 400 (no file) / 500 (anything else).

#![forbid(unsafe_code)]

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::{error, info};

use fleetsheet_app::app::ReconciliationService;
use fleetsheet_types::Error;

const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    service: Arc<ReconciliationService>,
}

impl AppState {
    pub fn new(service: ReconciliationService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/process-csv/", post(process_csv_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

fn error_response(err: &Error) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "Error": err.message() }))).into_response()
}

async fn healthz_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Fields of the reconciliation upload
#[derive(Debug, Default)]
struct Upload {
    csv_file: Option<Vec<u8>>,
    keys: Vec<String>,
    colored: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, Error> {
    let mut upload = Upload::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Request(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "csv_file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| Error::Request(format!("Failed to read csv_file: {}", e)))?;
                upload.csv_file = Some(bytes.to_vec());
            }
            "keys" | "colored" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| Error::Request(format!("Failed to read {}: {}", name, e)))?;
                if name == "keys" {
                    upload.keys.push(text);
                } else {
                    upload.colored = Some(text);
                }
            }
            _ => {}
        }
    }
    Ok(upload)
}

async fn process_csv_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let upload = match multipart {
        Ok(multipart) => read_upload(multipart).await,
        Err(rejection) => Err(Error::Request(rejection.body_text())),
    };
    let upload = match upload {
        Ok(upload) => upload,
        Err(err) => {
            error!(error = %err, "rejected reconciliation upload");
            return error_response(&err);
        }
    };

    let Some(csv) = upload.csv_file else {
        let err = Error::Request("No csv file was provided in the request.".to_string());
        error!(error = %err, "rejected reconciliation upload");
        return error_response(&err);
    };

    tracing::debug!(
        bytes = csv.len(),
        keys = ?upload.keys,
        colored = ?upload.colored,
        "reconciliation requested"
    );

    match state.service.reconcile(&csv).await {
        Ok(rows) => {
            info!(rows = rows.len(), "reconciliation served");
            (StatusCode::OK, Json(rows)).into_response()
        }
        Err(err) => {
            error!(error = %err, "reconciliation failed");
            error_response(&err)
        }
    }
}
