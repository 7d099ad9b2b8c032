//! Shared utilities for the fiscal resolver crates.
//!
//! This crate provides the Polars `AnyValue` helpers used by both the
//! registry enrichment and the fiscal variable resolvers, so that identifiers,
//! flags, dates and years are read the same way everywhere.

pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use polars::{
    any_to_bool, any_to_datetime, any_to_f64, any_to_i64, any_to_string,
    any_to_string_non_empty, column_value, format_numeric, parse_datetime, parse_f64, parse_i64,
};
