//! Bearer-token session against the fleet API
//!
//! The token is acquired once and reused until a data call is rejected with
//! 401, at which point the client asks for a [`Session::refresh`].

use serde::Deserialize;
use tokio::sync::RwLock;

use fleetsheet_types::{Error, Result};

/// Fixed login credentials for the fleet API
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// Value for the `Authorization` header of the login call
    /// (e.g. `Basic …`), if the API requires one
    pub login_authorization: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    oauth: OAuth,
}

#[derive(Debug, Deserialize)]
struct OAuth {
    access_token: String,
}

pub struct Session {
    http: reqwest::Client,
    login_url: String,
    credentials: Credentials,
    token: RwLock<Option<String>>,
}

impl Session {
    pub fn new(http: reqwest::Client, auth_base_url: &str, credentials: Credentials) -> Self {
        Self {
            http,
            login_url: format!("{}/login", auth_base_url.trim_end_matches('/')),
            credentials,
            token: RwLock::new(None),
        }
    }

    /// Current token, logging in first if there is none yet
    pub async fn acquire(&self) -> Result<String> {
        if let Some(token) = self.token.read().await.as_ref() {
            return Ok(token.clone());
        }
        self.renew(None).await
    }

    /// Replace a token the fleet API rejected.
    ///
    /// If another caller already replaced `rejected`, its token is returned
    /// without logging in again.
    pub async fn refresh(&self, rejected: &str) -> Result<String> {
        self.renew(Some(rejected)).await
    }

    async fn renew(&self, rejected: Option<&str>) -> Result<String> {
        let mut slot = self.token.write().await;
        if let Some(current) = slot.as_deref() {
            if rejected != Some(current) {
                return Ok(current.to_string());
            }
        }
        let token = self.login().await?;
        *slot = Some(token.clone());
        tracing::info!("fleet API token acquired");
        Ok(token)
    }

    async fn login(&self) -> Result<String> {
        let body = serde_json::json!({
            "username": self.credentials.username,
            "password": self.credentials.password,
        });

        let mut request = self.http.post(&self.login_url).json(&body);
        if let Some(ref authorization) = self.credentials.login_authorization {
            request = request.header(reqwest::header::AUTHORIZATION, authorization);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("login request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "login rejected (HTTP {}): {}",
                status.as_u16(),
                text
            )));
        }

        let parsed: LoginResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("login response malformed: {}", e)))?;
        Ok(parsed.oauth.access_token)
    }
}
