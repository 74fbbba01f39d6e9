use anyhow::{anyhow, Result};
use std::collections::HashMap;

use crate::data::Dataset;
use crate::ir::{AggregatedEntry, Partition};

/// How a group of rows reduces to one metric value.
#[derive(Debug, Clone, PartialEq)]
pub enum ReducerKind {
    /// Number of rows in the group
    Count,
    /// Arithmetic sum of a numeric column; absent/non-numeric cells add 0
    Sum(String),
    /// Pass-through of an already-aggregated column (one row per key
    /// expected; with duplicate keys the last row wins)
    Value(String),
}

/// A named reduction producing one output metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Reducer {
    pub name: String,
    pub kind: ReducerKind,
}

impl Reducer {
    pub fn count(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ReducerKind::Count,
        }
    }

    pub fn sum(field: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ReducerKind::Sum(field.to_string()),
        }
    }

    pub fn value(field: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ReducerKind::Value(field.to_string()),
        }
    }
}

/// Group rows by the key column and reduce each group with the given
/// reducers. Output order follows first occurrence of each key. An empty
/// dataset yields an empty result, not an error. Numeric columns named by a
/// reducer but missing from the header reduce to 0 for every group.
pub fn aggregate(
    data: &Dataset,
    key_col: &str,
    reducers: &[Reducer],
) -> Result<Vec<AggregatedEntry>> {
    let key_idx = data
        .column(key_col)
        .ok_or_else(|| anyhow!("Key column '{}' not found", key_col))?;

    // Resolve reducer field columns up front. A missing measure column is
    // not an error: every cell of it reads as 0.
    let field_cols: Vec<Option<usize>> = reducers
        .iter()
        .map(|r| match &r.kind {
            ReducerKind::Count => None,
            ReducerKind::Sum(field) | ReducerKind::Value(field) => data.column(field),
        })
        .collect();

    let mut entries: Vec<AggregatedEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in &data.rows {
        let key = match row.get(key_idx) {
            Some(k) => k.clone(),
            None => continue, // short row without a key cell
        };

        let slot = *index.entry(key.clone()).or_insert_with(|| {
            entries.push(AggregatedEntry::new(key));
            entries.len() - 1
        });
        let entry = &mut entries[slot];

        for (reducer, field_col) in reducers.iter().zip(&field_cols) {
            match &reducer.kind {
                ReducerKind::Count => {
                    *entry.metrics.entry(reducer.name.clone()).or_insert(0.0) += 1.0;
                }
                ReducerKind::Sum(_) => {
                    let v = field_col.map(|c| data.numeric(row, c)).unwrap_or(0.0);
                    *entry.metrics.entry(reducer.name.clone()).or_insert(0.0) += v;
                }
                ReducerKind::Value(_) => {
                    let v = field_col.map(|c| data.numeric(row, c)).unwrap_or(0.0);
                    entry.metrics.insert(reducer.name.clone(), v);
                }
            }
        }
    }

    Ok(entries)
}

/// Value at quantile `q` of pre-sorted (ascending) observations, using
/// linear interpolation between the two nearest ranks (the R-7 estimator).
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted[0];
    }

    let rank = q * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = rank.ceil() as usize;

    if lower_idx == upper_idx {
        sorted[lower_idx]
    } else {
        let weight = rank - lower_idx as f64;
        sorted[lower_idx] * (1.0 - weight) + sorted[upper_idx] * weight
    }
}

/// Split entries at the `q` quantile of `metric`: entries strictly above the
/// threshold become outliers, the rest stay normal. Both halves come back
/// sorted by the metric, descending.
pub fn partition_by_quantile(
    entries: Vec<AggregatedEntry>,
    metric: &str,
    q: f64,
) -> Partition {
    let mut values: Vec<f64> = entries.iter().map(|e| e.metric(metric)).collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let threshold = quantile_sorted(&values, q);

    let (outliers, normal): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|e| e.metric(metric) > threshold);

    let descending = |a: &AggregatedEntry, b: &AggregatedEntry| {
        b.metric(metric)
            .partial_cmp(&a.metric(metric))
            .unwrap_or(std::cmp::Ordering::Equal)
    };

    let mut normal = normal;
    let mut outliers = outliers;
    normal.sort_by(descending);
    outliers.sort_by(descending);

    Partition {
        normal,
        outliers,
        threshold,
    }
}
