//! Fleet API client
//!
//! Async reqwest client for the vehicle inventory and the label resource.
//! Implements the domain ports [`VehicleSource`] and [`LabelColorResolver`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use fleetsheet_domain::repository::{LabelColorResolver, VehicleSource};
use fleetsheet_types::{Error, Record, Result, COLOR_COLUMN};

use super::session::Session;

const ACTIVE_VEHICLES_PATH: &str = "/v1/vehicles/select/active";
const LABELS_PATH: &str = "/v1/labels";

/// Build the shared HTTP client with an explicit timeout
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(format!("fleetsheet/{}", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Upstream(format!("failed to build HTTP client: {}", e)))
}

pub struct FleetApiClient {
    http: reqwest::Client,
    data_base_url: String,
    session: Arc<Session>,
}

impl FleetApiClient {
    pub fn new(http: reqwest::Client, data_base_url: &str, session: Arc<Session>) -> Self {
        Self {
            http,
            data_base_url: data_base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    /// Authorized GET returning parsed JSON.
    /// A 401 triggers one token refresh and one repeat of the call.
    async fn get_json(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.data_base_url, path);

        let token = self.session.acquire().await?;
        let mut response = self.send_get(&url, &token).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(url = %url, "fleet API rejected token, refreshing");
            let token = self.session.refresh(&token).await?;
            response = self.send_get(&url, &token).await?;
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "GET {} failed (HTTP {}): {}",
                path,
                status.as_u16(),
                body
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| Error::Upstream(format!("GET {} returned invalid JSON: {}", path, e)))
    }

    async fn send_get(&self, url: &str, token: &str) -> Result<reqwest::Response> {
        self.http
            .get(url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("GET {} failed: {}", url, e)))
    }
}

#[async_trait]
impl VehicleSource for FleetApiClient {
    async fn fetch_active_vehicles(&self) -> Result<Vec<Record>> {
        let body = self.get_json(ACTIVE_VEHICLES_PATH).await?;
        let items = match body {
            Value::Array(items) => items,
            _ => {
                return Err(Error::Upstream(
                    "vehicle inventory is not a JSON array".to_string(),
                ))
            }
        };

        items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| match item {
                Value::Object(record) => Ok(record),
                _ => Err(Error::Upstream(format!(
                    "vehicle inventory entry {} is not an object",
                    idx
                ))),
            })
            .collect()
    }
}

#[async_trait]
impl LabelColorResolver for FleetApiClient {
    async fn resolve_color(&self, label_id: &str) -> Result<Option<String>> {
        let body = self.get_json(&format!("{}/{}", LABELS_PATH, label_id)).await?;
        parse_label_color(label_id, &body)
    }
}

/// Extract the color code from a label response: an array whose first
/// element may carry `colorCode`. Any other shape is rejected.
fn parse_label_color(label_id: &str, body: &Value) -> Result<Option<String>> {
    let first = body
        .as_array()
        .and_then(|items| items.first())
        .and_then(Value::as_object)
        .ok_or_else(|| {
            Error::Upstream(format!("label {} response is malformed", label_id))
        })?;

    match first.get(COLOR_COLUMN) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(code)) if code.is_empty() => Ok(None),
        Some(Value::String(code)) => Ok(Some(code.clone())),
        Some(other) => Err(Error::Upstream(format!(
            "label {} has a non-string color code: {}",
            label_id, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet_api::session::Credentials;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> FleetApiClient {
        let http = http_client(Duration::from_secs(5)).unwrap();
        let session = Arc::new(Session::new(
            http.clone(),
            &server.base_url(),
            Credentials {
                username: "365".into(),
                password: "1".into(),
                login_authorization: None,
            },
        ));
        FleetApiClient::new(http, &server.base_url(), session)
    }

    async fn mock_login(server: &MockServer, token: &str) {
        let token = token.to_string();
        server
            .mock_async(move |when, then| {
                when.method(POST).path("/login");
                then.status(200)
                    .json_body(json!({"oauth": {"access_token": token}}));
            })
            .await;
    }

    #[test]
    fn test_parse_label_color() {
        assert_eq!(
            parse_label_color("7", &json!([{"colorCode": "#AABBCC"}])).unwrap(),
            Some("#AABBCC".to_string())
        );
        assert_eq!(parse_label_color("7", &json!([{"colorCode": ""}])).unwrap(), None);
        assert_eq!(parse_label_color("7", &json!([{"title": "x"}])).unwrap(), None);
        assert!(parse_label_color("7", &json!([])).is_err());
        assert!(parse_label_color("7", &json!({"colorCode": "#fff"})).is_err());
        assert!(parse_label_color("7", &json!([{"colorCode": 12}])).is_err());
    }

    #[tokio::test]
    async fn test_fetch_active_vehicles_with_bearer() {
        let server = MockServer::start_async().await;
        mock_login(&server, "tok-1").await;
        let vehicles = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/vehicles/select/active")
                    .header("authorization", "Bearer tok-1");
                then.status(200).json_body(json!([
                    {"kurzname": "V1", "hu": "2024-01-01", "gruppe": "A", "labelIds": 7},
                    {"kurzname": "V2", "hu": "", "gruppe": "B", "labelIds": null}
                ]));
            })
            .await;

        let client = client_for(&server);
        let records = client.fetch_active_vehicles().await.unwrap();

        vehicles.assert_async().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["labelIds"], json!(7));
    }

    #[tokio::test]
    async fn test_inventory_failure_is_upstream_error() {
        let server = MockServer::start_async().await;
        mock_login(&server, "tok-1").await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/vehicles/select/active");
                then.status(503).body("maintenance");
            })
            .await;

        let err = client_for(&server).fetch_active_vehicles().await.unwrap_err();

        assert!(matches!(err, Error::Upstream(msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn test_unauthorized_refreshes_token_once() {
        let server = MockServer::start_async().await;
        let login = server
            .mock_async(|when, then| {
                when.method(POST).path("/login");
                then.status(200)
                    .json_body(json!({"oauth": {"access_token": "tok"}}));
            })
            .await;
        let labels = server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/labels/7");
                then.status(401).body("expired");
            })
            .await;

        let err = client_for(&server).resolve_color("7").await.unwrap_err();

        assert!(matches!(err, Error::Upstream(msg) if msg.contains("401")));
        login.assert_hits_async(2).await;
        labels.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn test_resolve_color() {
        let server = MockServer::start_async().await;
        mock_login(&server, "tok-1").await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/labels/7");
                then.status(200)
                    .json_body(json!([{"id": 7, "colorCode": "#007500"}]));
            })
            .await;

        let color = client_for(&server).resolve_color("7").await.unwrap();

        assert_eq!(color.as_deref(), Some("#007500"));
    }
}
