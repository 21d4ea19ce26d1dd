//! Domain model types

pub mod fields;
pub mod recency;
pub mod report;

pub use fields::{field_kind, CellValue, FieldKind};
pub use recency::RecencyBand;
pub use report::{ReportCell, ReportColumn, ReportDocument, ReportRow};
