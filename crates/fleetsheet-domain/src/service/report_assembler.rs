//! Report assembly
//!
//! Turns reconciled rows into a [`ReportDocument`]: rows sorted by group,
//! columns normalized with the identifier first, label cells tinted with
//! their label color, and (in colored mode) rows filled by due-date recency.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use fleetsheet_types::{
    is_set, value_text, Error, Record, Result, COLOR_COLUMN, GROUP_COLUMN, HU_COLUMN, ID_COLUMN,
    LABEL_COLUMN, NEUTRAL_COLOR,
};
use serde_json::Value;

use crate::model::fields::field_kind;
use crate::model::{ReportCell, ReportColumn, ReportDocument, ReportRow};
use crate::service::recency::classify_at;

/// Output file name for a report generated on `today`
pub fn report_file_name(today: NaiveDate) -> String {
    format!("vehicles-{}.xlsx", today.format("%Y-%m-%d"))
}

/// Identifier first, then the requested columns in order, duplicates removed
pub fn normalize_columns(requested: &[String]) -> Vec<String> {
    let mut columns = vec![ID_COLUMN.to_string()];
    for column in requested {
        if !columns.contains(column) {
            columns.push(column.clone());
        }
    }
    columns
}

/// Stable ascending sort by group. Numbers compare numerically, nulls last.
pub fn sort_by_group(rows: &mut [Record]) {
    rows.sort_by(|a, b| compare_values(a.get(GROUP_COLUMN), b.get(GROUP_COLUMN)));
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(x), Some(y)) => value_text(x).cmp(&value_text(y)),
    }
}

/// Label id → color, first row wins per id
fn label_colors(rows: &[Record]) -> HashMap<String, String> {
    let mut colors = HashMap::new();
    for row in rows {
        if !is_set(row.get(LABEL_COLUMN)) {
            continue;
        }
        let label_id = row.get(LABEL_COLUMN).map(value_text).unwrap_or_default();
        let color = match row.get(COLOR_COLUMN) {
            Some(v) if is_set(Some(v)) => value_text(v),
            _ => NEUTRAL_COLOR.to_string(),
        };
        colors.entry(label_id).or_insert(color);
    }
    colors
}

/// Row identifier → inspection-due date
fn due_dates(rows: &[Record]) -> HashMap<String, String> {
    rows.iter()
        .filter(|row| is_set(row.get(HU_COLUMN)))
        .map(|row| {
            let id = row.get(ID_COLUMN).map(value_text).unwrap_or_default();
            let hu = row.get(HU_COLUMN).map(value_text).unwrap_or_default();
            (id, hu)
        })
        .collect()
}

/// Build the report document.
///
/// Fails with [`Error::Format`] when a requested column is absent from the
/// data, when a value breaks its field format, or (colored mode) when a row
/// has no usable due date.
pub fn assemble(
    mut rows: Vec<Record>,
    requested: &[String],
    colored: bool,
    today: NaiveDate,
) -> Result<ReportDocument> {
    sort_by_group(&mut rows);
    let columns = normalize_columns(requested);

    let colors = label_colors(&rows);
    let hu_values = if colored { due_dates(&rows) } else { HashMap::new() };

    let label_idx = columns.iter().position(|c| c == LABEL_COLUMN);
    let mut max_lens = vec![0usize; columns.len()];
    let mut report_rows = Vec::with_capacity(rows.len());

    for row in &rows {
        let id = row.get(ID_COLUMN).map(value_text).unwrap_or_default();

        let band = if colored {
            let hu = hu_values.get(&id).ok_or_else(|| {
                Error::Format(format!("row '{}' has no inspection-due date", id))
            })?;
            Some(classify_at(hu, today)?)
        } else {
            None
        };

        let mut cells = Vec::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            let value = row.get(column).ok_or_else(|| {
                Error::Format(format!("column '{}' is not present in the reconciled data", column))
            })?;
            let cell_value = field_kind(column).render(column, value)?;
            max_lens[idx] = max_lens[idx].max(cell_value.display_len());

            let font_color = if Some(idx) == label_idx && is_set(Some(value)) {
                Some(
                    colors
                        .get(&value_text(value))
                        .cloned()
                        .unwrap_or_else(|| NEUTRAL_COLOR.to_string()),
                )
            } else {
                None
            };

            cells.push(ReportCell {
                value: cell_value,
                font_color,
            });
        }

        report_rows.push(ReportRow { band, cells });
    }

    let report_columns = columns
        .into_iter()
        .zip(max_lens)
        .map(|(name, max_len)| ReportColumn {
            name,
            width: ReportDocument::column_width(max_len),
        })
        .collect();

    Ok(ReportDocument {
        columns: report_columns,
        rows: report_rows,
    })
}
