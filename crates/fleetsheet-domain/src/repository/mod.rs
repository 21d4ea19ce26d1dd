//! Ports to the remote fleet service

use async_trait::async_trait;
use fleetsheet_types::{Record, Result};

/// Source of the authoritative vehicle list
#[async_trait]
pub trait VehicleSource: Send + Sync {
    /// Fetch every active vehicle. Called once per reconciliation, never cached.
    async fn fetch_active_vehicles(&self) -> Result<Vec<Record>>;
}

/// Resolves a label identifier to its color code
#[async_trait]
pub trait LabelColorResolver: Send + Sync {
    /// Raw color code as delivered by the label resource (marker included),
    /// or `None` when the label carries no color.
    async fn resolve_color(&self, label_id: &str) -> Result<Option<String>>;
}
