//! One registry row per identifier.
//!
//! Identifiers that occur once keep their row. Identifiers with several
//! snapshots keep the snapshot with the latest effective date; equal dates
//! keep the earliest row in fetch order, and rows without a usable date rank
//! below every dated row. A final first-row-wins pass guarantees uniqueness.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use fiscal_common::{any_to_datetime, any_to_string_non_empty, column_value, parse_i64};
use polars::prelude::*;
use tracing::{debug, warn};

/// Row selection produced by [`latest_per_key`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Surviving row positions: unique keys first, then duplicate winners.
    pub rows: Vec<usize>,
    /// Keys that had more than one row.
    pub duplicated_keys: usize,
    /// Rows dropped because their key was missing.
    pub missing_keys: usize,
}

/// Pick one row per key.
///
/// `keys` and `dates` are parallel, one entry per fetched row.
pub fn latest_per_key(keys: &[Option<String>], dates: &[Option<NaiveDateTime>]) -> Selection {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut missing_keys = 0;
    for key in keys {
        match key {
            Some(key) => *counts.entry(key.as_str()).or_default() += 1,
            None => missing_keys += 1,
        }
    }

    let mut unique = Vec::new();
    let mut group_order: Vec<&str> = Vec::new();
    let mut best: HashMap<&str, usize> = HashMap::new();
    for (idx, key) in keys.iter().enumerate() {
        let Some(key) = key.as_deref() else {
            continue;
        };
        if counts[key] == 1 {
            unique.push(idx);
            continue;
        }
        match best.get(key).copied() {
            None => {
                group_order.push(key);
                best.insert(key, idx);
            }
            // Option orders None below Some, so undated rows never win.
            Some(current) if date_at(dates, idx) > date_at(dates, current) => {
                best.insert(key, idx);
            }
            Some(_) => {}
        }
    }

    let mut combined = unique;
    combined.extend(group_order.iter().map(|key| best[key]));

    let mut seen = HashSet::new();
    let rows = combined
        .into_iter()
        .filter(|&idx| keys[idx].as_deref().is_some_and(|key| seen.insert(key)))
        .collect();

    Selection {
        rows,
        duplicated_keys: group_order.len(),
        missing_keys,
    }
}

fn date_at(dates: &[Option<NaiveDateTime>], idx: usize) -> Option<NaiveDateTime> {
    dates.get(idx).copied().flatten()
}

/// Identifier text used for matching.
///
/// Integral values collapse to their integer form, so `800`, `800.0` and the
/// zero-padded text `"0800"` all compare equal. Other values are trimmed text.
///
/// # Examples
///
/// ```
/// use fiscal_registry::canonical_key;
/// use polars::prelude::AnyValue;
///
/// assert_eq!(canonical_key(AnyValue::String(" 0800 ")).as_deref(), Some("800"));
/// assert_eq!(canonical_key(AnyValue::Float64(800.0)).as_deref(), Some("800"));
/// assert_eq!(canonical_key(AnyValue::String("CE-0800")).as_deref(), Some("CE-0800"));
/// assert_eq!(canonical_key(AnyValue::Null), None);
/// ```
pub fn canonical_key(value: AnyValue<'_>) -> Option<String> {
    let text = any_to_string_non_empty(value)?;
    match parse_i64(&text) {
        Some(number) => Some(number.to_string()),
        None => Some(text),
    }
}

/// Canonical identifier text for every row of `column`.
pub(crate) fn key_values(df: &DataFrame, column: &str) -> Vec<Option<String>> {
    (0..df.height())
        .map(|idx| canonical_key(column_value(df, column, idx)))
        .collect()
}

/// Reduce fetched registry rows to one row per identifier.
pub fn dedupe_registry(
    df: &DataFrame,
    key_column: &str,
    date_column: &str,
) -> PolarsResult<DataFrame> {
    let keys = key_values(df, key_column);
    let dates: Vec<Option<NaiveDateTime>> = (0..df.height())
        .map(|idx| any_to_datetime(column_value(df, date_column, idx)))
        .collect();
    let selection = latest_per_key(&keys, &dates);
    if selection.missing_keys > 0 {
        warn!(
            rows = selection.missing_keys,
            "registry rows without identifier dropped"
        );
    }
    debug!(
        fetched = df.height(),
        kept = selection.rows.len(),
        duplicated_keys = selection.duplicated_keys,
        "deduplicated registry rows"
    );
    let indices: Vec<IdxSize> = selection.rows.iter().map(|&idx| idx as IdxSize).collect();
    df.take(&IdxCa::from_vec("rows".into(), indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiscal_common::parse_datetime;

    fn keys(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    fn dates(values: &[Option<&str>]) -> Vec<Option<NaiveDateTime>> {
        values.iter().map(|v| v.and_then(parse_datetime)).collect()
    }

    #[test]
    fn unique_rows_come_before_duplicate_winners() {
        let selection = latest_per_key(
            &keys(&[Some("1"), Some("2"), Some("1"), Some("3")]),
            &dates(&[
                Some("2020-01-01"),
                Some("2020-01-01"),
                Some("2022-06-30"),
                Some("2019-01-01"),
            ]),
        );
        assert_eq!(selection.rows, vec![1, 3, 2]);
        assert_eq!(selection.duplicated_keys, 1);
    }

    #[test]
    fn equal_dates_keep_first_row() {
        let selection = latest_per_key(
            &keys(&[Some("1"), Some("1"), Some("1")]),
            &dates(&[Some("2020-01-01"), Some("2021-01-01"), Some("2021-01-01")]),
        );
        assert_eq!(selection.rows, vec![1]);
    }

    #[test]
    fn undated_rows_rank_last() {
        let selection = latest_per_key(
            &keys(&[Some("1"), Some("1"), Some("1")]),
            &dates(&[None, Some("2001-01-01"), Some("not a date")]),
        );
        assert_eq!(selection.rows, vec![1]);

        let all_undated = latest_per_key(&keys(&[Some("1"), Some("1")]), &dates(&[None, None]));
        assert_eq!(all_undated.rows, vec![0]);
    }

    #[test]
    fn offset_timestamps_pick_the_latest_snapshot() {
        let selection = latest_per_key(
            &keys(&[Some("10"), Some("10"), Some("10")]),
            &dates(&[
                Some("2021-01-01T00:00:00.000Z"),
                Some("2023-07-15T00:00:00.000Z"),
                Some("2022-03-01T00:00:00+00:00"),
            ]),
        );
        assert_eq!(selection.rows, vec![1]);
    }

    #[test]
    fn zero_padded_and_integer_keys_share_a_group() {
        let df = DataFrame::new(vec![
            Series::new("NUM_NIT".into(), vec!["0800", "800", "CE-0800"]).into_column(),
        ])
        .unwrap();
        assert_eq!(
            key_values(&df, "NUM_NIT"),
            vec![
                Some("800".to_string()),
                Some("800".to_string()),
                Some("CE-0800".to_string())
            ]
        );
    }

    #[test]
    fn missing_keys_are_dropped() {
        let selection = latest_per_key(
            &keys(&[None, Some("1"), None]),
            &dates(&[None, None, None]),
        );
        assert_eq!(selection.rows, vec![1]);
        assert_eq!(selection.missing_keys, 2);
    }

    #[test]
    fn dedupe_registry_takes_latest_snapshot() {
        let df = DataFrame::new(vec![
            Series::new("NUM_NIT".into(), vec![10i64, 10, 20]).into_column(),
            Series::new(
                "FEC_CAMBIO".into(),
                vec!["2021-03-01", "2023-03-01", "2020-01-01"],
            )
            .into_column(),
            Series::new("NUM_ESTABLECIMIENTOS".into(), vec![1i64, 4, 2]).into_column(),
        ])
        .unwrap();

        let out = dedupe_registry(&df, "NUM_NIT", "FEC_CAMBIO").unwrap();

        let nits = out.column("NUM_NIT").unwrap().i64().unwrap();
        let count = out.column("NUM_ESTABLECIMIENTOS").unwrap().i64().unwrap();
        assert_eq!(out.height(), 2);
        assert_eq!((nits.get(0), count.get(0)), (Some(20), Some(2)));
        assert_eq!((nits.get(1), count.get(1)), (Some(10), Some(4)));
    }
}
