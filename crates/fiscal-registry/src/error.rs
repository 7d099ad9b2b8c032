use fiscal_ingest::IngestError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Failures reported by a [`RegistryStore`](crate::RegistryStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown registry table {0}")]
    UnknownTable(String),

    #[error("registry table {table} has no column {column}")]
    MissingColumn { table: String, column: String },

    #[error("failed to load registry snapshot: {0}")]
    Load(#[from] IngestError),

    #[error(transparent)]
    Frame(#[from] PolarsError),

    /// Error raised by an external backend, passed through untouched.
    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

/// Failures of [`RegistryResolver::enrich`](crate::RegistryResolver::enrich).
#[derive(Debug, Error)]
pub enum EnrichError {
    /// The input is not a taxpayer table and cannot be converted into one.
    #[error("input is not a taxpayer table: {0}")]
    InputShape(String),

    #[error("registry rows are missing column {0:?}")]
    MissingRegistryColumn(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Frame(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, EnrichError>;
