//! Use cases
//!
//! * [`reconciliation_service`]: service side, CSV in, enriched records out
//! * [`export_service`]: requester side, CSV in, XLSX report out

pub mod export_service;
pub mod reconciliation_service;

pub use export_service::{export_report, parse_colored_flag, ExportOutcome, ExportRequest};
pub use reconciliation_service::{ReconcileOptions, ReconciliationService};
