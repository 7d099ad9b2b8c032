//! Access to the taxpayer registry.
//!
//! The registry lives outside this workspace; resolvers only see it through
//! [`RegistryStore`]. [`FrameRegistryStore`] serves a snapshot that is
//! already in memory (tests, CSV extracts).

use std::collections::HashSet;
use std::path::Path;

use fiscal_common::{any_to_string, column_value};
use fiscal_ingest::{CsvLoadOptions, read_csv_frame};
use fiscal_model::CaseInsensitiveSet;
use polars::prelude::*;
use tracing::debug;

use crate::dedupe::canonical_key;
use crate::error::StoreError;

/// A bulk "key in set" request against one registry table.
#[derive(Debug, Clone, Copy)]
pub struct RegistryQuery<'a> {
    pub table: &'a str,
    pub key_column: &'a str,
    /// Projection, returned under exactly these names.
    pub columns: &'a [String],
    /// Distinct identifiers in [`canonical_key`] form.
    pub keys: &'a [String],
}

impl RegistryQuery<'_> {
    /// Render the query as `SELECT DISTINCT` SQL for SQL-backed stores.
    ///
    /// Identifiers are emitted as quoted literals; an empty key set renders a
    /// predicate that matches nothing.
    pub fn to_sql(&self) -> String {
        let projection = self.columns.join(", ");
        let predicate = if self.keys.is_empty() {
            "1 = 0".to_string()
        } else {
            let literals: Vec<String> = self
                .keys
                .iter()
                .map(|key| format!("'{}'", key.replace('\'', "''")))
                .collect();
            format!("{} IN ({})", self.key_column, literals.join(", "))
        };
        format!(
            "SELECT DISTINCT {projection} FROM {} WHERE {predicate}",
            self.table
        )
    }
}

/// Source of registry rows.
///
/// Implementations return every row of `query.table` whose key column is in
/// `query.keys`, projected to `query.columns`. Removing exact duplicate rows
/// is expected but callers do not rely on it.
pub trait RegistryStore {
    fn fetch(&self, query: &RegistryQuery<'_>) -> Result<DataFrame, StoreError>;
}

impl<S: RegistryStore + ?Sized> RegistryStore for &S {
    fn fetch(&self, query: &RegistryQuery<'_>) -> Result<DataFrame, StoreError> {
        (**self).fetch(query)
    }
}

/// Registry snapshot held in memory.
#[derive(Debug, Clone)]
pub struct FrameRegistryStore {
    table: String,
    frame: DataFrame,
}

impl FrameRegistryStore {
    pub fn new(table: impl Into<String>, frame: DataFrame) -> Self {
        Self {
            table: table.into(),
            frame,
        }
    }

    /// Load a registry extract from CSV, inferring column types so flags
    /// arrive as booleans and dates as text.
    pub fn from_csv(table: impl Into<String>, path: &Path) -> Result<Self, StoreError> {
        let frame = read_csv_frame(path, CsvLoadOptions::default())?;
        Ok(Self::new(table, frame))
    }
}

impl RegistryStore for FrameRegistryStore {
    fn fetch(&self, query: &RegistryQuery<'_>) -> Result<DataFrame, StoreError> {
        if !query.table.eq_ignore_ascii_case(&self.table) {
            return Err(StoreError::UnknownTable(query.table.to_string()));
        }
        let lookup = CaseInsensitiveSet::new(self.frame.get_column_names_owned());
        let resolve = |name: &str| {
            lookup
                .get(name)
                .map(str::to_string)
                .ok_or_else(|| StoreError::MissingColumn {
                    table: self.table.clone(),
                    column: name.to_string(),
                })
        };
        let key_column = resolve(query.key_column)?;

        let wanted: HashSet<&str> = query.keys.iter().map(String::as_str).collect();
        let mask: Vec<bool> = (0..self.frame.height())
            .map(|idx| {
                canonical_key(column_value(&self.frame, &key_column, idx))
                    .is_some_and(|key| wanted.contains(key.as_str()))
            })
            .collect();
        let matched = self
            .frame
            .filter(&BooleanChunked::from_slice("keys".into(), &mask))?;

        let mut columns = Vec::with_capacity(query.columns.len());
        for requested in query.columns {
            let source = resolve(requested)?;
            let column = matched.column(&source)?.clone();
            columns.push(column.with_name(requested.as_str().into()));
        }
        let projected = DataFrame::new(columns)?;
        let distinct = distinct_rows(&projected)?;
        debug!(
            table = %self.table,
            requested_keys = query.keys.len(),
            rows = distinct.height(),
            "fetched registry rows"
        );
        Ok(distinct)
    }
}

/// Drop rows that repeat an earlier row in every column.
fn distinct_rows(df: &DataFrame) -> PolarsResult<DataFrame> {
    let names = df.get_column_names_owned();
    let mut seen = HashSet::new();
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let mut composite = String::new();
        for name in &names {
            match column_value(df, name, idx) {
                AnyValue::Null => composite.push('\u{0}'),
                value => composite.push_str(&any_to_string(value)),
            }
            composite.push('\u{1f}');
        }
        keep.push(seen.insert(composite));
    }
    df.filter(&BooleanChunked::from_slice("distinct".into(), &keep))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query<'a>(columns: &'a [String], keys: &'a [String]) -> RegistryQuery<'a> {
        RegistryQuery {
            table: "int_personas",
            key_column: "NUM_NIT",
            columns,
            keys,
        }
    }

    #[test]
    fn sql_quotes_keys() {
        let columns = vec!["NUM_NIT".to_string(), "FEC_CAMBIO".to_string()];
        let keys = vec!["900123".to_string(), "80'0".to_string()];
        assert_eq!(
            query(&columns, &keys).to_sql(),
            "SELECT DISTINCT NUM_NIT, FEC_CAMBIO FROM int_personas \
             WHERE NUM_NIT IN ('900123', '80''0')"
        );
    }

    #[test]
    fn sql_with_no_keys_matches_nothing() {
        let columns = vec!["NUM_NIT".to_string()];
        assert_eq!(
            query(&columns, &[]).to_sql(),
            "SELECT DISTINCT NUM_NIT FROM int_personas WHERE 1 = 0"
        );
    }

    #[test]
    fn fetch_filters_projects_and_removes_exact_duplicates() {
        let frame = DataFrame::new(vec![
            Series::new("num_nit".into(), vec![900123i64, 900123, 800200, 700100]).into_column(),
            Series::new("FEC_CAMBIO".into(), vec!["2024-01-01", "2024-01-01", "2023-01-01", "2022-01-01"])
                .into_column(),
            Series::new("OTRA".into(), vec!["a", "b", "c", "d"]).into_column(),
        ])
        .unwrap();
        let store = FrameRegistryStore::new("int_personas", frame);
        let columns = vec!["NUM_NIT".to_string(), "FEC_CAMBIO".to_string()];
        let keys = vec!["900123".to_string(), "800200".to_string()];

        let rows = store.fetch(&query(&columns, &keys)).unwrap();

        assert_eq!(rows.height(), 2);
        let names: Vec<&str> = rows.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["NUM_NIT", "FEC_CAMBIO"]);
    }

    #[test]
    fn fetch_matches_zero_padded_text_keys() {
        let frame = DataFrame::new(vec![
            Series::new("NUM_NIT".into(), vec!["0800", "800", "0900"]).into_column(),
        ])
        .unwrap();
        let store = FrameRegistryStore::new("int_personas", frame);
        let columns = vec!["NUM_NIT".to_string()];
        let keys = vec!["800".to_string()];

        let rows = store.fetch(&query(&columns, &keys)).unwrap();

        let nits: Vec<Option<&str>> = rows
            .column("NUM_NIT")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(nits, vec![Some("0800"), Some("800")]);
    }

    #[test]
    fn fetch_reports_missing_column() {
        let frame = DataFrame::new(vec![
            Series::new("NUM_NIT".into(), vec![1i64]).into_column(),
        ])
        .unwrap();
        let store = FrameRegistryStore::new("int_personas", frame);
        let columns = vec!["NUM_NIT".to_string(), "FEC_CAMBIO".to_string()];
        let keys = vec!["1".to_string()];
        let err = store.fetch(&query(&columns, &keys)).unwrap_err();
        assert!(matches!(err, StoreError::MissingColumn { column, .. } if column == "FEC_CAMBIO"));
    }

    #[test]
    fn fetch_rejects_other_tables() {
        let store = FrameRegistryStore::new("int_personas", DataFrame::empty());
        let err = store
            .fetch(&RegistryQuery {
                table: "otra_tabla",
                key_column: "NUM_NIT",
                columns: &[],
                keys: &[],
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownTable(_)));
    }
}
