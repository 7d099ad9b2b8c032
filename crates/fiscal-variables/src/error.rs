use fiscal_ingest::IngestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata table is missing column {0:?}")]
    MissingColumn(String),

    #[error("failed to load metadata table: {0}")]
    Load(#[from] IngestError),
}
