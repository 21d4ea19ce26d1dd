//! Infrastructure layer
//!
//! Adapters around the pure domain: the semicolon CSV loader, the fleet API
//! client with its auth session, the requester-side reconciliation client and
//! the XLSX writer.

pub mod csv_loader;
pub mod excel;
pub mod fleet_api;
pub mod reconcile_client;
