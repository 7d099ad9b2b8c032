//! Heuristic typing of text cells.
//!
//! Query exports frequently come back with every column as text, including
//! scientific-notation zeros and whole numbers written as `123.000`. These
//! helpers turn such cells back into numbers while leaving identifier-like
//! codes alone.

use fiscal_common::format_numeric;
use polars::prelude::*;
use tracing::debug;

use crate::error::Result;

/// A single cleaned cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CleanedCell {
    Int(i64),
    Float(f64),
    Text(String),
}

impl CleanedCell {
    fn into_text(self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Float(v) => format_numeric(v),
            Self::Text(s) => s,
        }
    }
}

/// Clean one cell.
///
/// The value is trimmed first. `0E-10` becomes `0`. With
/// `keep_leading_zero_ids`, digit-only strings longer than one character that
/// start with `0` stay text. Other numeric text becomes an integer when whole
/// and a float otherwise; everything else is returned trimmed.
///
/// # Examples
///
/// ```
/// use fiscal_ingest::{CleanedCell, clean_cell};
///
/// assert_eq!(clean_cell(" 123.000 ", true), CleanedCell::Int(123));
/// assert_eq!(clean_cell("001234", true), CleanedCell::Text("001234".into()));
/// assert_eq!(clean_cell("001234", false), CleanedCell::Int(1234));
/// assert_eq!(clean_cell("0e-10", true), CleanedCell::Int(0));
/// ```
pub fn clean_cell(raw: &str, keep_leading_zero_ids: bool) -> CleanedCell {
    let s = raw.trim();

    if s.eq_ignore_ascii_case("0E-10") {
        return CleanedCell::Int(0);
    }

    if keep_leading_zero_ids
        && s.len() > 1
        && s.starts_with('0')
        && s.bytes().all(|b| b.is_ascii_digit())
    {
        return CleanedCell::Text(s.to_string());
    }

    if let Ok(v) = s.parse::<i64>() {
        return CleanedCell::Int(v);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => {
            if v.fract() == 0.0 && v.abs() < 9.0e15 {
                CleanedCell::Int(v as i64)
            } else {
                CleanedCell::Float(v)
            }
        }
        _ => CleanedCell::Text(s.to_string()),
    }
}

/// Clean every text column of a frame cell by cell.
///
/// Nulls are treated as empty strings. A column whose cleaned cells are all
/// integers becomes `Int64`; all numeric becomes `Float64`; anything else
/// stays text holding the cleaned representation of each cell. Non-text
/// columns are left untouched.
pub fn clean_frame_cells(df: &DataFrame, keep_leading_zero_ids: bool) -> Result<DataFrame> {
    let mut out = df.clone();
    for column in df.get_columns() {
        let Ok(values) = column.str() else {
            continue;
        };
        let cleaned: Vec<CleanedCell> = values
            .into_iter()
            .map(|value| clean_cell(value.unwrap_or(""), keep_leading_zero_ids))
            .collect();
        let name = column.name().clone();
        let all_int = cleaned.iter().all(|c| matches!(c, CleanedCell::Int(_)));
        let all_numeric = cleaned
            .iter()
            .all(|c| matches!(c, CleanedCell::Int(_) | CleanedCell::Float(_)));

        let replacement = if all_int && !cleaned.is_empty() {
            let data: Vec<i64> = cleaned
                .iter()
                .map(|c| match c {
                    CleanedCell::Int(v) => *v,
                    _ => 0,
                })
                .collect();
            Series::new(name, data).into_column()
        } else if all_numeric && !cleaned.is_empty() {
            let data: Vec<f64> = cleaned
                .iter()
                .map(|c| match c {
                    CleanedCell::Int(v) => *v as f64,
                    CleanedCell::Float(v) => *v,
                    CleanedCell::Text(_) => f64::NAN,
                })
                .collect();
            Series::new(name, data).into_column()
        } else {
            let data: Vec<String> = cleaned.into_iter().map(CleanedCell::into_text).collect();
            Series::new(name, data).into_column()
        };
        debug!(column = %column.name(), dtype = %replacement.dtype(), "cleaned column");
        out.with_column(replacement)?;
    }
    Ok(out)
}
