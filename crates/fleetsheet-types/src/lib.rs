//! Core types shared by the fleetsheet service and requester

mod error;

pub use error::*;

use serde_json::{Map, Value};

/// One field-name/value map. Field order is preserved end to end.
pub type Record = Map<String, Value>;

/// Join key shared by the local CSV and the fleet inventory.
pub const JOIN_KEY: &str = "kurzname";
/// Identifier column, always first in a report.
pub const ID_COLUMN: &str = "rnr";
/// Inspection-due date.
pub const HU_COLUMN: &str = "hu";
/// Group column used for row ordering.
pub const GROUP_COLUMN: &str = "gruppe";
/// Label reference resolved to a color.
pub const LABEL_COLUMN: &str = "labelIds";
/// Column added by enrichment with the stripped label color.
pub const COLOR_COLUMN: &str = "colorCode";

/// Fallback label color.
pub const NEUTRAL_COLOR: &str = "000000";

/// Render a JSON value the way it shows up in a spreadsheet cell.
///
/// Strings are returned verbatim, null renders as an empty string.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Truthiness of an optional field: null, empty strings, zero, false and
/// empty containers count as unset.
pub fn is_set(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}
