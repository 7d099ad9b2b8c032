use std::fs::File;
use std::io::Write;
use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Options for loading a CSV file into a frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvLoadOptions {
    /// Read every column as text instead of inferring types.
    ///
    /// Reference tables need this so markers like `Vigente` and identifiers
    /// with leading zeros survive untouched.
    pub all_text: bool,
}

impl CsvLoadOptions {
    pub fn text() -> Self {
        Self { all_text: true }
    }
}

/// Read a CSV file with a header row into a `DataFrame`.
pub fn read_csv_frame(path: &Path, options: CsvLoadOptions) -> Result<DataFrame> {
    std::fs::metadata(path).map_err(|source| IngestError::io(path, source))?;
    let infer_length = if options.all_text { Some(0) } else { Some(100) };
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_length)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded CSV"
    );
    Ok(df)
}

/// Write a frame as CSV with a header row.
pub fn write_csv<W: Write>(df: &mut DataFrame, writer: W) -> Result<()> {
    CsvWriter::new(writer).include_header(true).finish(df)?;
    Ok(())
}

/// Write a frame to a CSV file, replacing any existing file.
pub fn write_csv_frame(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| IngestError::io(path, source))?;
    write_csv(df, file)?;
    debug!(path = %path.display(), rows = df.height(), "wrote CSV");
    Ok(())
}
