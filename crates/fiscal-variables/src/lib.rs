//! Fiscal variable resolver.
//!
//! Resolves a form id, a `[prefix]VAR_<digits>` code and a tax year to the
//! canonical field name recorded in the variable metadata table, honouring
//! each row's validity window.

pub mod error;
pub mod options;
pub mod resolver;
pub mod table;

pub use error::MetadataError;
pub use options::LookupOptions;
pub use resolver::VariableResolver;
pub use table::{MetadataTable, VIGENTE, normalize_valid_to};
