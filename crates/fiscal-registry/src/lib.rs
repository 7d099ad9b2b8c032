//! Registry enrichment resolver.
//!
//! Given taxpayer records, fetches their RUT registry snapshots, keeps one
//! snapshot per identifier (latest effective date), derives the
//! responsibility-52 marker, normalizes the taxpayer type and inner-joins the
//! result back onto the records.
//!
//! - **store**: the [`RegistryStore`] seam and an in-memory implementation
//! - **dedupe**: recency-based selection of one row per identifier
//! - **normalize**: derived and normalized categorical fields
//! - **resolver**: [`RegistryResolver::enrich`]

pub mod dedupe;
pub mod error;
pub mod input;
pub mod normalize;
pub mod resolver;
pub mod store;

pub use dedupe::{Selection, canonical_key, dedupe_registry, latest_per_key};
pub use error::{EnrichError, Result, StoreError};
pub use input::TaxpayerInput;
pub use normalize::{
    FLAG_NO, FLAG_YES, PERSONA_JURIDICA, PERSONA_NATURAL, flag_label, normalize_taxpayer_type,
};
pub use resolver::{COLLISION_SUFFIX, RegistryResolver};
pub use store::{FrameRegistryStore, RegistryQuery, RegistryStore};
