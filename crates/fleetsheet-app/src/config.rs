//! Configuration management for fleetsheet
//!
//! Requester config stored at: ~/.config/fleetsheet/config.json
//! Service config is read from `FLEETSHEET_*` environment variables.

use fleetsheet_types::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Requester (CLI) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the reconciliation service
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Local inventory snapshot to submit
    #[serde(default = "default_input_csv")]
    pub input_csv: PathBuf,

    /// Directory the report is written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Timeout for the reconciliation request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_server_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_input_csv() -> PathBuf {
    PathBuf::from("vehicles.csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            input_csv: default_input_csv(),
            output_dir: default_output_dir(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("fleetsheet");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Fleetsheet Configuration")?;
        writeln!(f, "========================")?;
        writeln!(f)?;
        writeln!(f, "Server URL:      {}", self.server_url)?;
        writeln!(f, "Input CSV:       {}", self.input_csv.display())?;
        writeln!(f, "Output dir:      {}", self.output_dir.display())?;
        writeln!(f, "Request timeout: {}s", self.request_timeout_secs)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:     {}", path.display())?;
        }

        Ok(())
    }
}

/// Reconciliation service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: String,
    pub auth_base_url: String,
    pub data_base_url: String,
    pub username: String,
    pub password: String,
    /// `Authorization` header sent with the login call
    pub login_authorization: Option<String>,
    pub http_timeout: Duration,
    /// Concurrent label lookups; 1 keeps them sequential
    pub label_workers: usize,
    /// Resolve each distinct label id once per request
    pub dedupe_labels: bool,
}

const DEFAULT_LOGIN_AUTHORIZATION: &str = "Basic QVBJX0V4cGxvcmVyOjEyMzQ1NmlzQUxhbWVQYXNz";

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            auth_base_url: "https://api.baubuddy.de/index.php".to_string(),
            data_base_url: "https://api.baubuddy.de/dev/index.php".to_string(),
            username: "365".to_string(),
            password: "1".to_string(),
            login_authorization: Some(DEFAULT_LOGIN_AUTHORIZATION.to_string()),
            http_timeout: Duration::from_secs(30),
            label_workers: 1,
            dedupe_labels: false,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; unset variables keep defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("FLEETSHEET_BIND") {
            config.bind_addr = v;
        }
        if let Some(v) = var("FLEETSHEET_AUTH_URL") {
            config.auth_base_url = v;
        }
        if let Some(v) = var("FLEETSHEET_DATA_URL") {
            config.data_base_url = v;
        }
        if let Some(v) = var("FLEETSHEET_USERNAME") {
            config.username = v;
        }
        if let Some(v) = var("FLEETSHEET_PASSWORD") {
            config.password = v;
        }
        if let Some(v) = lookup("FLEETSHEET_LOGIN_AUTHORIZATION") {
            config.login_authorization = if v.trim().is_empty() { None } else { Some(v) };
        }
        if let Some(v) = var("FLEETSHEET_HTTP_TIMEOUT_SECS") {
            config.http_timeout = Duration::from_secs(parse_number("FLEETSHEET_HTTP_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = var("FLEETSHEET_LABEL_WORKERS") {
            let workers = parse_number("FLEETSHEET_LABEL_WORKERS", &v)?;
            config.label_workers = workers.max(1) as usize;
        }
        if let Some(v) = var("FLEETSHEET_DEDUPE_LABELS") {
            config.dedupe_labels = parse_bool("FLEETSHEET_DEDUPE_LABELS", &v)?;
        }

        Ok(config)
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value.trim().parse::<u64>().map_err(|_| {
        ConfigError::Invalid {
            key: key.to_string(),
            value: value.to_string(),
        }
        .into()
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Ok(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key: key.to_string(),
            value: value.to_string(),
        }
        .into()),
    }
}
