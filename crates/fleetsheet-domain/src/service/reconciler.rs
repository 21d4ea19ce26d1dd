//! Inner join of the local snapshot against the fleet inventory

use std::collections::{HashMap, HashSet};

use fleetsheet_types::{value_text, Record, HU_COLUMN, JOIN_KEY};
use serde_json::Value;

/// Join local rows onto remote vehicles by [`JOIN_KEY`].
///
/// * Only keys present on both sides survive, in remote order. Rows with a
///   null or empty key never match.
/// * The remote side defines the shape: every remote column appears in every
///   row (null when a vehicle lacks it), followed by local-only columns.
/// * A column defined by both sides keeps the remote value.
/// * Rows without an inspection-due date are dropped.
pub fn merge_inventory(remote: &[Record], local: &[Record]) -> Vec<Record> {
    let remote_columns = column_union(remote);
    let remote_set: HashSet<&str> = remote_columns.iter().map(String::as_str).collect();
    let local_columns: Vec<String> = column_union(local)
        .into_iter()
        .filter(|c| !remote_set.contains(c.as_str()))
        .collect();

    let mut local_by_key: HashMap<String, &Record> = HashMap::new();
    for row in local {
        let Some(key) = join_key(row) else {
            continue;
        };
        if local_by_key.contains_key(&key) {
            tracing::warn!(key = %key, "duplicate join key in local snapshot, keeping first row");
            continue;
        }
        local_by_key.insert(key, row);
    }

    remote
        .iter()
        .filter_map(|vehicle| {
            let key = join_key(vehicle)?;
            let local_row = local_by_key.get(&key)?;

            let mut merged = Record::new();
            for column in &remote_columns {
                let value = vehicle.get(column).cloned().unwrap_or(Value::Null);
                merged.insert(column.clone(), value);
            }
            for column in &local_columns {
                let value = local_row
                    .get(column)
                    .cloned()
                    .unwrap_or_else(|| Value::String(String::new()));
                merged.insert(column.clone(), value);
            }
            Some(merged)
        })
        .filter(has_due_date)
        .collect()
}

/// Join key of a row; null, missing and empty identifiers have none
fn join_key(row: &Record) -> Option<String> {
    match row.get(JOIN_KEY) {
        None | Some(Value::Null) => None,
        Some(value) => Some(value_text(value)).filter(|key| !key.is_empty()),
    }
}

/// A row is reportable only with a non-empty `hu`
pub fn has_due_date(row: &Record) -> bool {
    match row.get(HU_COLUMN) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Ordered union of field names over all rows
fn column_union(rows: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for row in rows {
        for key in row.keys() {
            if seen.insert(key.as_str()) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_inner_join_keeps_only_shared_keys() {
        let remote = vec![
            record(json!({"kurzname": "V1", "hu": "2024-01-01", "gruppe": "A"})),
            record(json!({"kurzname": "R-ONLY", "hu": "2024-01-01", "gruppe": "B"})),
        ];
        let local = vec![
            record(json!({"kurzname": "V1", "foo": "x"})),
            record(json!({"kurzname": "L-ONLY", "foo": "y"})),
        ];

        let merged = merge_inventory(&remote, &local);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0]["kurzname"], json!("V1"));
        assert_eq!(merged[0]["foo"], json!("x"));
    }

    #[test]
    fn test_missing_key_never_matches_empty_key() {
        let remote = vec![
            record(json!({"kurzname": null, "hu": "2026-01-01", "rnr": "GHOST"})),
            record(json!({"hu": "2026-01-01", "rnr": "NO-KEY"})),
            record(json!({"kurzname": "V1", "hu": "2026-01-01", "rnr": "1"})),
        ];
        let local = vec![
            record(json!({"kurzname": "", "foo": "x"})),
            record(json!({"kurzname": "V1", "foo": "y"})),
        ];

        let merged = merge_inventory(&remote, &local);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0]["rnr"], json!("1"));
        assert_eq!(merged[0]["foo"], json!("y"));
    }

    #[test]
    fn test_remote_value_wins_on_shared_column() {
        let remote = vec![record(json!({"kurzname": "V1", "hu": "2024-01-01", "gruppe": "remote"}))];
        let local = vec![record(json!({"kurzname": "V1", "gruppe": "local"}))];

        let merged = merge_inventory(&remote, &local);

        assert_eq!(merged[0]["gruppe"], json!("remote"));
        assert!(!merged[0].contains_key("gruppe_y"));
        assert_eq!(merged[0].len(), 3);
    }

    #[test]
    fn test_shared_column_missing_on_one_vehicle_stays_remote() {
        let remote = vec![
            record(json!({"kurzname": "V1", "hu": "2024-01-01", "gruppe": "A"})),
            record(json!({"kurzname": "V2", "hu": "2024-01-01"})),
        ];
        let local = vec![
            record(json!({"kurzname": "V1", "gruppe": "local"})),
            record(json!({"kurzname": "V2", "gruppe": "local"})),
        ];

        let merged = merge_inventory(&remote, &local);

        assert_eq!(merged[1]["gruppe"], Value::Null);
    }

    #[test]
    fn test_rows_without_due_date_are_dropped() {
        let remote = vec![
            record(json!({"kurzname": "V1", "hu": "2024-01-01"})),
            record(json!({"kurzname": "V2", "hu": ""})),
            record(json!({"kurzname": "V3", "hu": null})),
            record(json!({"kurzname": "V4"})),
        ];
        let local: Vec<Record> = ["V1", "V2", "V3", "V4"]
            .iter()
            .map(|k| record(json!({"kurzname": k})))
            .collect();

        let merged = merge_inventory(&remote, &local);

        let keys: Vec<&Value> = merged.iter().map(|r| &r["kurzname"]).collect();
        assert_eq!(keys, vec![&json!("V1")]);
    }

    #[test]
    fn test_column_order_remote_then_local() {
        let remote = vec![record(json!({"kurzname": "V1", "hu": "2024-01-01", "rnr": "1"}))];
        let local = vec![record(json!({"kurzname": "V1", "foo": "x", "bar": "y"}))];

        let merged = merge_inventory(&remote, &local);

        let columns: Vec<&str> = merged[0].keys().map(String::as_str).collect();
        assert_eq!(columns, vec!["kurzname", "hu", "rnr", "foo", "bar"]);
    }

    #[test]
    fn test_merge_is_deterministic() {
        let remote = vec![
            record(json!({"kurzname": "V1", "hu": "2024-01-01", "labelIds": 7})),
            record(json!({"kurzname": "V2", "hu": "2023-01-01", "labelIds": null})),
        ];
        let local = vec![
            record(json!({"kurzname": "V2", "foo": "y"})),
            record(json!({"kurzname": "V1", "foo": "x"})),
        ];

        let first = serde_json::to_string(&merge_inventory(&remote, &local)).unwrap();
        let second = serde_json::to_string(&merge_inventory(&remote, &local)).unwrap();
        assert_eq!(first, second);
    }
}
