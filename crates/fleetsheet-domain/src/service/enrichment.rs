//! Label color enrichment
//!
//! Every row with a label reference gets its color resolved through a
//! [`LabelColorResolver`]. The default strategy issues one lookup per row;
//! [`CachingResolver`] collapses repeated identifiers within one request.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use fleetsheet_types::{is_set, value_text, Error, Record, Result, COLOR_COLUMN, LABEL_COLUMN, NEUTRAL_COLOR};
use serde_json::Value;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;

use crate::repository::LabelColorResolver;

/// Drop the leading marker from a raw color code.
/// Absent or empty codes resolve to [`NEUTRAL_COLOR`].
pub fn normalize_color(raw: Option<&str>) -> String {
    let code = raw.map(str::trim).unwrap_or("");
    let code = code.strip_prefix('#').unwrap_or(code);
    if code.is_empty() {
        NEUTRAL_COLOR.to_string()
    } else {
        code.to_string()
    }
}

/// Add [`COLOR_COLUMN`] to every row.
///
/// Rows without a label get an empty color. With `workers > 1` lookups run
/// concurrently, bounded by `workers`; results are written back by row index
/// so ordering is unaffected. The first failed lookup aborts the whole call.
pub async fn enrich_label_colors(
    rows: &mut [Record],
    resolver: Arc<dyn LabelColorResolver>,
    workers: usize,
) -> Result<()> {
    let pending: Vec<(usize, String)> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| is_set(row.get(LABEL_COLUMN)))
        .map(|(idx, row)| (idx, row.get(LABEL_COLUMN).map(value_text).unwrap_or_default()))
        .collect();

    let mut colors: Vec<Option<String>> = vec![None; rows.len()];

    if workers <= 1 {
        for (idx, label_id) in pending {
            let raw = resolver.resolve_color(&label_id).await?;
            colors[idx] = Some(normalize_color(raw.as_deref()));
        }
    } else {
        let semaphore = Arc::new(Semaphore::new(workers));
        let mut tasks = JoinSet::new();
        for (idx, label_id) in pending {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| Error::Upstream(format!("label lookup pool closed: {}", e)))?;
            let resolver = Arc::clone(&resolver);
            tasks.spawn(async move {
                let _permit = permit;
                (idx, resolver.resolve_color(&label_id).await)
            });
        }
        while let Some(joined) = tasks.join_next().await {
            let (idx, raw) =
                joined.map_err(|e| Error::Upstream(format!("label lookup task failed: {}", e)))?;
            colors[idx] = Some(normalize_color(raw?.as_deref()));
        }
    }

    for (row, color) in rows.iter_mut().zip(colors) {
        row.insert(
            COLOR_COLUMN.to_string(),
            Value::String(color.unwrap_or_default()),
        );
    }

    Ok(())
}

/// Resolver wrapper that remembers answers for the lifetime of one request
pub struct CachingResolver {
    inner: Arc<dyn LabelColorResolver>,
    cache: Mutex<HashMap<String, Option<String>>>,
}

impl CachingResolver {
    pub fn new(inner: Arc<dyn LabelColorResolver>) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl LabelColorResolver for CachingResolver {
    async fn resolve_color(&self, label_id: &str) -> Result<Option<String>> {
        if let Some(hit) = self.cache.lock().await.get(label_id) {
            return Ok(hit.clone());
        }
        let resolved = self.inner.resolve_color(label_id).await?;
        self.cache
            .lock()
            .await
            .insert(label_id.to_string(), resolved.clone());
        Ok(resolved)
    }
}
