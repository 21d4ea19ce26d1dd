//! Reconciliation Service - service-side use case
//!
//! 1. Parse the uploaded CSV (semicolon separated)
//! 2. Fetch the active vehicle inventory
//! 3. Inner join on `kurzname`, remote values win
//! 4. Drop rows without an inspection-due date
//! 5. Resolve label colors
//! 6. Return the enriched rows

use std::sync::Arc;

use fleetsheet_domain::repository::{LabelColorResolver, VehicleSource};
use fleetsheet_domain::service::{enrich_label_colors, merge_inventory, CachingResolver};
use fleetsheet_infra::csv_loader::parse_local_records;
use fleetsheet_infra::fleet_api::{http_client, Credentials, FleetApiClient, Session};
use fleetsheet_types::{Record, Result};

use crate::config::ServiceConfig;

#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Concurrent label lookups; 1 keeps them sequential
    pub label_workers: usize,
    /// Wrap the resolver in a per-request cache
    pub dedupe_labels: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            label_workers: 1,
            dedupe_labels: false,
        }
    }
}

pub struct ReconciliationService {
    vehicles: Arc<dyn VehicleSource>,
    labels: Arc<dyn LabelColorResolver>,
    options: ReconcileOptions,
}

impl ReconciliationService {
    pub fn new(
        vehicles: Arc<dyn VehicleSource>,
        labels: Arc<dyn LabelColorResolver>,
        options: ReconcileOptions,
    ) -> Self {
        Self {
            vehicles,
            labels,
            options,
        }
    }

    /// Wire the service to the fleet API and acquire the bearer token.
    /// Fails if the login does not succeed.
    pub async fn connect(config: &ServiceConfig) -> Result<Self> {
        let http = http_client(config.http_timeout)?;
        let session = Arc::new(Session::new(
            http.clone(),
            &config.auth_base_url,
            Credentials {
                username: config.username.clone(),
                password: config.password.clone(),
                login_authorization: config.login_authorization.clone(),
            },
        ));
        session.acquire().await?;

        let client = Arc::new(FleetApiClient::new(http, &config.data_base_url, session));
        Ok(Self::new(
            client.clone(),
            client,
            ReconcileOptions {
                label_workers: config.label_workers,
                dedupe_labels: config.dedupe_labels,
            },
        ))
    }

    /// Reconcile one CSV payload. Any failure aborts the whole request.
    pub async fn reconcile(&self, csv_payload: &[u8]) -> Result<Vec<Record>> {
        let local = parse_local_records(csv_payload)?;
        tracing::debug!(rows = local.len(), "parsed local snapshot");

        let remote = self.vehicles.fetch_active_vehicles().await?;
        tracing::debug!(vehicles = remote.len(), "fetched active vehicles");

        let mut merged = merge_inventory(&remote, &local);

        let resolver: Arc<dyn LabelColorResolver> = if self.options.dedupe_labels {
            Arc::new(CachingResolver::new(Arc::clone(&self.labels)))
        } else {
            Arc::clone(&self.labels)
        };
        enrich_label_colors(&mut merged, resolver, self.options.label_workers).await?;

        tracing::info!(
            local = local.len(),
            remote = remote.len(),
            reconciled = merged.len(),
            "reconciliation complete"
        );
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fleetsheet_types::Error;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticFleet {
        vehicles: Value,
        label_calls: AtomicUsize,
    }

    #[async_trait]
    impl VehicleSource for StaticFleet {
        async fn fetch_active_vehicles(&self) -> Result<Vec<Record>> {
            Ok(self
                .vehicles
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v.as_object().cloned().unwrap())
                .collect())
        }
    }

    #[async_trait]
    impl LabelColorResolver for StaticFleet {
        async fn resolve_color(&self, label_id: &str) -> Result<Option<String>> {
            self.label_calls.fetch_add(1, Ordering::SeqCst);
            match label_id {
                "7" => Ok(Some("#007500".to_string())),
                "8" => Ok(None),
                other => Err(Error::Upstream(format!("no label {}", other))),
            }
        }
    }

    fn service(vehicles: Value, options: ReconcileOptions) -> (ReconciliationService, Arc<StaticFleet>) {
        let fleet = Arc::new(StaticFleet {
            vehicles,
            label_calls: AtomicUsize::new(0),
        });
        (
            ReconciliationService::new(fleet.clone(), fleet.clone(), options),
            fleet,
        )
    }

    #[tokio::test]
    async fn test_reconcile_end_to_end() {
        let (svc, _) = service(
            json!([
                {"kurzname": "V1", "rnr": "1", "hu": "2026-09-01", "gruppe": "A", "labelIds": 7},
                {"kurzname": "V2", "rnr": "2", "hu": "", "gruppe": "B", "labelIds": null}
            ]),
            ReconcileOptions::default(),
        );

        let rows = svc
            .reconcile(b"kurzname;foo\nV1;x\nV2;y\n")
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["kurzname"], json!("V1"));
        assert_eq!(rows[0]["foo"], json!("x"));
        assert_eq!(rows[0]["colorCode"], json!("007500"));
    }

    #[tokio::test]
    async fn test_reconcile_twice_is_identical() {
        let (svc, _) = service(
            json!([
                {"kurzname": "V1", "rnr": "1", "hu": "2026-09-01", "gruppe": "A", "labelIds": 8},
                {"kurzname": "V3", "rnr": "3", "hu": "2020-01-01", "gruppe": "A", "labelIds": ""}
            ]),
            ReconcileOptions::default(),
        );
        let csv = b"kurzname;gruppe\nV1;local\nV3;local\n";

        let first = serde_json::to_vec(&svc.reconcile(csv).await.unwrap()).unwrap();
        let second = serde_json::to_vec(&svc.reconcile(csv).await.unwrap()).unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_dedupe_option_collapses_lookups() {
        let vehicles = json!([
            {"kurzname": "V1", "hu": "2026-09-01", "labelIds": 7},
            {"kurzname": "V2", "hu": "2026-09-01", "labelIds": 7}
        ]);
        let csv = b"kurzname\nV1\nV2\n";

        let (per_row, fleet) = service(vehicles.clone(), ReconcileOptions::default());
        per_row.reconcile(csv).await.unwrap();
        assert_eq!(fleet.label_calls.load(Ordering::SeqCst), 2);

        let (deduped, fleet) = service(
            vehicles,
            ReconcileOptions {
                label_workers: 1,
                dedupe_labels: true,
            },
        );
        deduped.reconcile(csv).await.unwrap();
        assert_eq!(fleet.label_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_label_failure_yields_no_partial_result() {
        let (svc, _) = service(
            json!([
                {"kurzname": "V1", "hu": "2026-09-01", "labelIds": 7},
                {"kurzname": "V2", "hu": "2026-09-01", "labelIds": 99}
            ]),
            ReconcileOptions::default(),
        );

        let err = svc.reconcile(b"kurzname\nV1\nV2\n").await.unwrap_err();

        assert!(matches!(err, Error::Upstream(_)));
    }

    #[tokio::test]
    async fn test_bad_csv_is_server_side_failure() {
        let (svc, fleet) = service(json!([]), ReconcileOptions::default());

        let err = svc.reconcile(b"name;foo\nV1;x\n").await.unwrap_err();

        assert!(matches!(err, Error::Format(_)));
        assert_eq!(err.status_code(), 500);
        assert_eq!(fleet.label_calls.load(Ordering::SeqCst), 0);
    }
}
