//! Report document model
//!
//! The assembled, presentation-ready form of a reconciled dataset. The XLSX
//! writer in the infra layer turns this into a file without making any
//! decisions of its own.

use super::fields::CellValue;
use super::recency::RecencyBand;

/// Header background
pub const HEADER_FILL: &str = "F2F2F2";
/// Upper bound for a column width
pub const MAX_COLUMN_WIDTH: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportColumn {
    pub name: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportCell {
    pub value: CellValue,
    /// Font color override (hex, no marker)
    pub font_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Set only in colored mode; every cell of the row is filled with it
    pub band: Option<RecencyBand>,
    pub cells: Vec<ReportCell>,
}

impl ReportRow {
    pub fn fill_color(&self) -> Option<&'static str> {
        self.band.map(|b| b.color())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub columns: Vec<ReportColumn>,
    pub rows: Vec<ReportRow>,
}

impl ReportDocument {
    /// Column width from the longest rendered value plus padding, capped
    pub fn column_width(max_len: usize) -> f64 {
        ((max_len as f64 + 2.0) * 1.2).min(MAX_COLUMN_WIDTH)
    }

    /// Number of rows per recency band (empty when not colored)
    pub fn band_counts(&self) -> Vec<(RecencyBand, usize)> {
        if self.rows.iter().all(|r| r.band.is_none()) {
            return Vec::new();
        }
        RecencyBand::ALL
            .iter()
            .map(|band| {
                let count = self.rows.iter().filter(|r| r.band == Some(*band)).count();
                (*band, count)
            })
            .collect()
    }
}
