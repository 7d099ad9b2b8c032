//! Shared data model for the fiscal resolvers: reference table layouts,
//! variable codes and lookup results.

pub mod error;
pub mod layout;
pub mod lookup;
pub mod variable;

pub use error::{ModelError, Result};
pub use layout::{
    DEFAULT_COMPOSE_FIELDS, DEFAULT_ID_FIELD, DEFAULT_REGISTRY_TABLE, MetadataLayout,
    RegistryLayout,
};
pub use lookup::CaseInsensitiveSet;
pub use variable::{ResolvedVariable, VariableCode, VariableMeta};
