use std::path::PathBuf;

use fiscal_model::ResolvedVariable;
use polars::prelude::DataFrame;

#[derive(Debug)]
pub struct EnrichResult {
    pub input: PathBuf,
    pub id_field: String,
    pub input_rows: usize,
    /// Input identifiers with no registry snapshot; their rows were dropped.
    pub unmatched_ids: usize,
    pub output: Option<PathBuf>,
    pub frame: DataFrame,
}

#[derive(Debug)]
pub struct LookupResult {
    pub format_id: i64,
    pub var_code: String,
    pub year: i64,
    pub resolved: Option<ResolvedVariable>,
}

#[derive(Debug)]
pub struct CleanResult {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    /// Columns converted from text to a numeric type.
    pub retyped: Vec<String>,
    pub frame: DataFrame,
}
