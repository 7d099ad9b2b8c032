//! Registry enrichment.

use std::collections::{BTreeSet, HashMap, HashSet};

use fiscal_model::{CaseInsensitiveSet, RegistryLayout};
use polars::prelude::*;
use tracing::{debug, info, info_span};

use crate::dedupe::{dedupe_registry, key_values};
use crate::error::{EnrichError, Result};
use crate::input::TaxpayerInput;
use crate::normalize::{derived_flag_column, normalize_taxpayer_column};
use crate::store::{RegistryQuery, RegistryStore};

/// Suffix given to registry columns whose names already exist on the input.
pub const COLLISION_SUFFIX: &str = "_right";

/// Joins registry attributes onto taxpayer records.
#[derive(Debug, Clone)]
pub struct RegistryResolver<S> {
    store: S,
    layout: RegistryLayout,
}

impl<S: RegistryStore> RegistryResolver<S> {
    pub fn new(store: S) -> Self {
        Self::with_layout(store, RegistryLayout::default())
    }

    pub fn with_layout(store: S, layout: RegistryLayout) -> Self {
        Self { store, layout }
    }

    /// Enrich taxpayer records with one registry row per identifier.
    ///
    /// Issues a single store fetch for the distinct identifiers in
    /// `id_field`, keeps the latest snapshot per identifier, derives the
    /// responsibility-52 marker, and inner-joins on `id_field == nit`.
    /// Records without a registry match are dropped; input order is kept.
    ///
    /// # Errors
    ///
    /// [`EnrichError::InputShape`] when the input cannot be read as a table or
    /// lacks `id_field`; store errors are passed through unchanged.
    pub fn enrich(&self, input: impl Into<TaxpayerInput>, id_field: &str) -> Result<DataFrame> {
        let span = info_span!("enrich", id_field);
        let _guard = span.enter();

        let records = input.into().into_frame()?;
        let input_columns = CaseInsensitiveSet::new(records.get_column_names_owned());
        let id_column = input_columns
            .get(id_field)
            .ok_or_else(|| {
                EnrichError::InputShape(format!("missing identifier column {id_field:?}"))
            })?
            .to_string();

        let record_keys = key_values(&records, &id_column);
        let distinct: Vec<String> = record_keys
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let columns = self.layout.selected_columns();
        let query = RegistryQuery {
            table: &self.layout.table,
            key_column: &self.layout.nit,
            columns: &columns,
            keys: &distinct,
        };
        let fetched = self.store.fetch(&query)?;

        let fetched_columns = CaseInsensitiveSet::new(fetched.get_column_names_owned());
        let registry_column = |name: &str| {
            fetched_columns
                .get(name)
                .map(str::to_string)
                .ok_or_else(|| EnrichError::MissingRegistryColumn(name.to_string()))
        };
        let nit_column = registry_column(&self.layout.nit)?;
        let date_column = registry_column(&self.layout.effective_date)?;
        let flag_column = registry_column(&self.layout.flag_52)?;

        let mut registry = dedupe_registry(&fetched, &nit_column, &date_column)?;
        let derived = derived_flag_column(&registry, &flag_column, &self.layout.derived_flag);
        registry.with_column(derived)?;

        let registry_rows: HashMap<String, usize> = key_values(&registry, &nit_column)
            .into_iter()
            .enumerate()
            .filter_map(|(idx, key)| key.map(|key| (key, idx)))
            .collect();

        let mut left = Vec::new();
        let mut right = Vec::new();
        for (idx, key) in record_keys.iter().enumerate() {
            if let Some(&row) = key.as_ref().and_then(|key| registry_rows.get(key)) {
                left.push(idx as IdxSize);
                right.push(row as IdxSize);
            }
        }

        let mut joined = records.take(&IdxCa::from_vec("left".into(), left))?;
        let matched = registry.take(&IdxCa::from_vec("right".into(), right))?;

        let taken: HashSet<String> = joined
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let mut taxpayer_column = registry_column(&self.layout.taxpayer_type).ok();
        let mut extra = Vec::with_capacity(matched.width());
        for column in matched.get_columns() {
            let name = column.name().to_string();
            if taken.contains(&name) {
                let renamed = format!("{name}{COLLISION_SUFFIX}");
                if taxpayer_column.as_deref() == Some(name.as_str()) {
                    taxpayer_column = Some(renamed.clone());
                }
                extra.push(column.clone().with_name(renamed.into()));
            } else {
                extra.push(column.clone());
            }
        }
        joined.hstack_mut(&extra)?;

        if let Some(name) = taxpayer_column {
            let changed = normalize_taxpayer_column(&mut joined, &name)?;
            debug!(changed, "normalized taxpayer types");
        }

        info!(
            input_rows = records.height(),
            distinct_ids = distinct.len(),
            fetched_rows = fetched.height(),
            registry_rows = registry.height(),
            output_rows = joined.height(),
            "enriched taxpayer records"
        );
        Ok(joined)
    }
}
