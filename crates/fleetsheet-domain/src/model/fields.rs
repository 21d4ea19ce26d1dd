//! Field registry
//!
//! Column names are shared as plain strings between the CSV, the fleet API
//! and the report request. The registry pins the semantic kind of the fields
//! the pipeline relies on, so a malformed value is rejected when the cell is
//! built instead of producing a broken spreadsheet.

use chrono::NaiveDate;
use fleetsheet_types::{
    Error, Result, COLOR_COLUMN, GROUP_COLUMN, HU_COLUMN, ID_COLUMN, JOIN_KEY, LABEL_COLUMN,
};
use serde_json::Value;

/// Date format used by the fleet API for `hu`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, rendered as-is
    Text,
    /// ISO calendar date (`YYYY-MM-DD`)
    Date,
    /// Foreign key into the label resource
    LabelRef,
    /// Six-digit hex color without marker
    Color,
}

const KNOWN_FIELDS: &[(&str, FieldKind)] = &[
    (JOIN_KEY, FieldKind::Text),
    (ID_COLUMN, FieldKind::Text),
    (GROUP_COLUMN, FieldKind::Text),
    (HU_COLUMN, FieldKind::Date),
    (LABEL_COLUMN, FieldKind::LabelRef),
    (COLOR_COLUMN, FieldKind::Color),
];

/// Kind of a named field. Unknown columns are treated as [`FieldKind::Text`].
pub fn field_kind(name: &str) -> FieldKind {
    KNOWN_FIELDS
        .iter()
        .find(|(field, _)| *field == name)
        .map(|(_, kind)| *kind)
        .unwrap_or(FieldKind::Text)
}

/// Typed spreadsheet cell content
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Blank,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Length of the text shown in the cell, used for column sizing
    pub fn display_len(&self) -> usize {
        match self {
            CellValue::Blank => 0,
            CellValue::Text(s) => s.chars().count(),
            CellValue::Number(n) => n.to_string().len(),
            CellValue::Bool(b) => b.to_string().len(),
        }
    }
}

impl FieldKind {
    /// Convert a JSON value into a cell, enforcing the kind's format rule.
    /// Empty values are always accepted and become blank cells.
    pub fn render(&self, column: &str, value: &Value) -> Result<CellValue> {
        let cell = match value {
            Value::Null => return Ok(CellValue::Blank),
            Value::String(s) if s.is_empty() => return Ok(CellValue::Blank),
            Value::String(s) => CellValue::Text(s.clone()),
            Value::Number(n) => match n.as_f64() {
                Some(f) => CellValue::Number(f),
                None => CellValue::Text(n.to_string()),
            },
            Value::Bool(b) => CellValue::Bool(*b),
            other => CellValue::Text(other.to_string()),
        };

        match (self, &cell) {
            (FieldKind::Date, CellValue::Text(s)) => {
                parse_date(s).map_err(|_| {
                    Error::Format(format!("column '{}': '{}' is not a valid date", column, s))
                })?;
            }
            (FieldKind::Date, _) => {
                return Err(Error::Format(format!(
                    "column '{}': expected a date string",
                    column
                )));
            }
            (FieldKind::Color, CellValue::Text(s)) if !is_hex_color(s) => {
                return Err(Error::Format(format!(
                    "column '{}': '{}' is not a hex color",
                    column, s
                )));
            }
            _ => {}
        }

        Ok(cell)
    }
}

pub fn parse_date(s: &str) -> std::result::Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
}

/// Six hex digits, no marker
pub fn is_hex_color(s: &str) -> bool {
    s.len() == 6 && s.chars().all(|c| c.is_ascii_hexdigit())
}
