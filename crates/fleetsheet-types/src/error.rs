//! Error types for fleetsheet

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration value for {key}: {value}")]
    Invalid { key: String, value: String },
}

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed input file; raised before any remote call.
    #[error("Request error: {0}")]
    Request(String),

    /// Fleet API, label API or reconciliation service failed.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// A value broke the format contract needed downstream.
    #[error("Format error: {0}")]
    Format(String),

    /// Invalid command-line usage.
    #[error("Usage error: {0}")]
    Usage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Excel export error: {0}")]
    Excel(String),
}

impl Error {
    /// HTTP status used when this error crosses the service boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Request(_) => 400,
            _ => 500,
        }
    }

    /// Message without the category prefix, as sent in `{"Error": ...}` bodies.
    pub fn message(&self) -> String {
        match self {
            Error::Request(msg)
            | Error::Upstream(msg)
            | Error::Format(msg)
            | Error::Usage(msg)
            | Error::Excel(msg) => msg.clone(),
            Error::Io(e) => e.to_string(),
            Error::Json(e) => e.to_string(),
            Error::Config(e) => e.to_string(),
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
