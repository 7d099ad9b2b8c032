use fiscal_ingest::records_to_frame;
use polars::prelude::DataFrame;
use serde_json::Value;

use crate::error::{EnrichError, Result};

/// Taxpayer records accepted by the enrichment resolver.
#[derive(Debug, Clone)]
pub enum TaxpayerInput {
    /// A native columnar table.
    Frame(DataFrame),
    /// Row-oriented JSON objects, converted to a table on entry.
    Records(Vec<Value>),
}

impl TaxpayerInput {
    /// Resolve the input into a frame, rejecting records that cannot form a table.
    pub fn into_frame(self) -> Result<DataFrame> {
        match self {
            Self::Frame(df) => Ok(df),
            Self::Records(records) => {
                records_to_frame(&records).map_err(|err| EnrichError::InputShape(err.to_string()))
            }
        }
    }
}

impl From<DataFrame> for TaxpayerInput {
    fn from(df: DataFrame) -> Self {
        Self::Frame(df)
    }
}

impl From<&DataFrame> for TaxpayerInput {
    fn from(df: &DataFrame) -> Self {
        Self::Frame(df.clone())
    }
}

impl From<Vec<Value>> for TaxpayerInput {
    fn from(records: Vec<Value>) -> Self {
        Self::Records(records)
    }
}
