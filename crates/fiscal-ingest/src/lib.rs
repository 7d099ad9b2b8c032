//! Loading tabular inputs into Polars frames.
//!
//! - **csv**: CSV files to and from `DataFrame`
//! - **records**: row-oriented JSON records to `DataFrame`
//! - **clean**: heuristic cell-by-cell typing of text columns

pub mod clean;
pub mod csv;
pub mod error;
pub mod records;

pub use clean::{CleanedCell, clean_cell, clean_frame_cells};
pub use csv::{CsvLoadOptions, read_csv_frame, write_csv, write_csv_frame};
pub use error::{IngestError, Result};
pub use records::records_to_frame;
