//! The variable metadata table.
//!
//! Loaded once at startup and shared by reference; nothing here mutates the
//! frame after construction. Year and code columns are coerced per read, so
//! malformed cells degrade to "missing" instead of failing the lookup.

use std::path::Path;

use fiscal_common::{any_to_i64, column_value};
use fiscal_ingest::{CsvLoadOptions, read_csv_frame};
use fiscal_model::{CaseInsensitiveSet, MetadataLayout};
use polars::prelude::{AnyValue, DataFrame};
use tracing::info;

use crate::error::MetadataError;

/// Validity-end marker for windows that are still in effect.
pub const VIGENTE: &str = "Vigente";

/// Coerce a validity-end cell: `Vigente` (any case) becomes `current_year`,
/// numbers become integers, anything else is missing.
///
/// # Examples
///
/// ```
/// use fiscal_variables::normalize_valid_to;
/// use polars::prelude::AnyValue;
///
/// assert_eq!(normalize_valid_to(AnyValue::String(" vigente "), 2024), Some(2024));
/// assert_eq!(normalize_valid_to(AnyValue::String("2021"), 2024), Some(2021));
/// assert_eq!(normalize_valid_to(AnyValue::String("n/a"), 2024), None);
/// ```
pub fn normalize_valid_to(value: AnyValue<'_>, current_year: i64) -> Option<i64> {
    let is_vigente = match &value {
        AnyValue::String(s) => s.trim().eq_ignore_ascii_case(VIGENTE),
        AnyValue::StringOwned(s) => s.trim().eq_ignore_ascii_case(VIGENTE),
        _ => false,
    };
    if is_vigente {
        Some(current_year)
    } else {
        any_to_i64(value)
    }
}

/// One metadata row after coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Window {
    pub format_id: Option<i64>,
    pub variable_number: Option<i64>,
    pub valid_from: Option<i64>,
    pub valid_to: Option<i64>,
}

impl Window {
    /// Inclusive containment; a missing end is open-ended.
    pub fn contains(&self, tax_year: i64) -> bool {
        match self.valid_from {
            Some(from) if from <= tax_year => self.valid_to.is_none_or(|to| tax_year <= to),
            _ => false,
        }
    }
}

/// Column names as they appear in the loaded frame.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedColumns {
    pub format_id: String,
    pub variable_number: String,
    pub valid_from: String,
    pub valid_to: String,
    pub description: Option<String>,
}

/// Immutable fiscal variable metadata.
#[derive(Debug, Clone)]
pub struct MetadataTable {
    frame: DataFrame,
    columns: ResolvedColumns,
    lookup: CaseInsensitiveSet,
}

impl MetadataTable {
    /// Wrap a frame using the default column layout.
    pub fn new(frame: DataFrame) -> Result<Self, MetadataError> {
        Self::with_layout(frame, MetadataLayout::default())
    }

    /// Wrap a frame; column names are matched without regard to ASCII case.
    ///
    /// The description column is optional (its absence yields `name_var =
    /// None`); the code and year columns are required.
    pub fn with_layout(frame: DataFrame, layout: MetadataLayout) -> Result<Self, MetadataError> {
        let lookup = CaseInsensitiveSet::new(frame.get_column_names_owned());
        let require = |name: &str| {
            lookup
                .get(name)
                .map(str::to_string)
                .ok_or_else(|| MetadataError::MissingColumn(name.to_string()))
        };
        let columns = ResolvedColumns {
            format_id: require(&layout.format_id)?,
            variable_number: require(&layout.variable_number)?,
            valid_from: require(&layout.valid_from)?,
            valid_to: require(&layout.valid_to)?,
            description: lookup.get(&layout.description).map(str::to_string),
        };
        Ok(Self {
            frame,
            columns,
            lookup,
        })
    }

    /// Load the reference table from CSV, reading every cell as text.
    pub fn load_csv(path: &Path, layout: MetadataLayout) -> Result<Self, MetadataError> {
        let frame = read_csv_frame(path, CsvLoadOptions::text())?;
        let table = Self::with_layout(frame, layout)?;
        info!(
            path = %path.display(),
            rows = table.len(),
            "loaded variable metadata"
        );
        Ok(table)
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub(crate) fn window(&self, idx: usize, current_year: i64) -> Window {
        let cols = &self.columns;
        Window {
            format_id: any_to_i64(column_value(&self.frame, &cols.format_id, idx)),
            variable_number: any_to_i64(column_value(&self.frame, &cols.variable_number, idx)),
            valid_from: any_to_i64(column_value(&self.frame, &cols.valid_from, idx)),
            valid_to: normalize_valid_to(
                column_value(&self.frame, &cols.valid_to, idx),
                current_year,
            ),
        }
    }

    pub(crate) fn description(&self, idx: usize) -> AnyValue<'_> {
        match &self.columns.description {
            Some(name) => column_value(&self.frame, name, idx),
            None => AnyValue::Null,
        }
    }

    /// Value of `field` at `idx` as the resolver sees it: the coerced value
    /// for the variable number and validity columns, the raw cell otherwise.
    pub(crate) fn composed_value(&self, field: &str, idx: usize, window: &Window) -> FieldValue<'_> {
        let Some(actual) = self.lookup.get(field) else {
            return FieldValue::Missing;
        };
        let cols = &self.columns;
        let coerced = if actual == cols.variable_number {
            Some(window.variable_number)
        } else if actual == cols.valid_from {
            Some(window.valid_from)
        } else if actual == cols.valid_to {
            Some(window.valid_to)
        } else {
            None
        };
        match coerced {
            Some(Some(v)) => FieldValue::Integer(v),
            Some(None) => FieldValue::Missing,
            None => FieldValue::Raw(column_value(&self.frame, actual, idx)),
        }
    }
}

/// A compose-field value before stringification.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FieldValue<'a> {
    Missing,
    Integer(i64),
    Raw(AnyValue<'a>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    fn window(from: Option<i64>, to: Option<i64>) -> Window {
        Window {
            format_id: Some(210),
            variable_number: Some(33),
            valid_from: from,
            valid_to: to,
        }
    }

    #[test]
    fn containment_is_inclusive() {
        let w = window(Some(2020), Some(2022));
        assert!(w.contains(2020));
        assert!(w.contains(2022));
        assert!(!w.contains(2019));
        assert!(!w.contains(2023));
    }

    #[test]
    fn missing_end_is_open() {
        assert!(window(Some(2020), None).contains(2099));
        assert!(!window(Some(2020), None).contains(2019));
    }

    #[test]
    fn missing_start_never_matches() {
        assert!(!window(None, None).contains(2020));
        assert!(!window(None, Some(2030)).contains(2020));
    }

    #[test]
    fn vigente_only_applies_to_text() {
        assert_eq!(normalize_valid_to(AnyValue::String("VIGENTE"), 2030), Some(2030));
        assert_eq!(normalize_valid_to(AnyValue::Int64(2019), 2030), Some(2019));
        assert_eq!(normalize_valid_to(AnyValue::Float64(2019.0), 2030), Some(2019));
        assert_eq!(normalize_valid_to(AnyValue::Null, 2030), None);
    }

    #[test]
    fn required_columns_are_checked() {
        let frame = DataFrame::new(vec![
            Series::new("Código del Formato".into(), vec!["210"]).into_column(),
        ])
        .unwrap();
        let err = MetadataTable::new(frame).unwrap_err();
        assert!(matches!(err, MetadataError::MissingColumn(name) if name == "Código de la Variable"));
    }
}
