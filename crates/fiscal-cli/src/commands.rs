use std::collections::BTreeSet;
use std::time::Instant;

use anyhow::{Context, Result};
use fiscal_common::column_value;
use fiscal_ingest::{CsvLoadOptions, clean_frame_cells, read_csv_frame, write_csv_frame};
use fiscal_model::CaseInsensitiveSet;
use fiscal_registry::{FrameRegistryStore, RegistryResolver, canonical_key};
use fiscal_variables::{MetadataTable, VariableResolver};
use polars::prelude::{DataFrame, DataType};
use tracing::{info, info_span, trace};

use crate::cli::{CleanArgs, EnrichArgs, LookupArgs};
use crate::types::{CleanResult, EnrichResult, LookupResult};
use fiscal_cli::config::{FileConfig, LookupOverrides};
use fiscal_cli::logging::redact_value;

pub fn run_enrich(args: &EnrichArgs, config: &FileConfig) -> Result<EnrichResult> {
    let span = info_span!("enrich_command", input = %args.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let layout = config.registry.layout.clone();
    let id_field = config.id_field(args.id_field.as_deref());

    let records = read_csv_frame(&args.input, CsvLoadOptions::default())
        .with_context(|| format!("load taxpayer records {}", args.input.display()))?;
    let store = FrameRegistryStore::from_csv(layout.table.clone(), &args.registry)
        .with_context(|| format!("load registry extract {}", args.registry.display()))?;

    let resolver = RegistryResolver::with_layout(store, layout);
    let mut enriched = resolver
        .enrich(&records, &id_field)
        .context("enrich taxpayer records")?;

    let unmatched = unmatched_ids(&records, &enriched, &id_field);
    for id in &unmatched {
        trace!(id = redact_value(id), "no registry snapshot for identifier");
    }

    if let Some(path) = &args.output {
        write_csv_frame(&mut enriched, path)
            .with_context(|| format!("write enriched table {}", path.display()))?;
    }
    info!(
        rows = enriched.height(),
        unmatched = unmatched.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "enrich finished"
    );

    Ok(EnrichResult {
        input: args.input.clone(),
        id_field,
        input_rows: records.height(),
        unmatched_ids: unmatched.len(),
        output: args.output.clone(),
        frame: enriched,
    })
}

pub fn run_lookup(args: &LookupArgs, config: &FileConfig) -> Result<LookupResult> {
    let table = MetadataTable::load_csv(&args.metadata, config.variables.layout.clone())
        .with_context(|| format!("load variable metadata {}", args.metadata.display()))?;
    let options = config.lookup_options(&LookupOverrides {
        compose_fields: &args.compose,
        separator: args.separator.as_deref(),
        current_year: args.current_year,
    });

    let resolved =
        VariableResolver::new(&table).resolve(args.format_id, &args.var_code, args.year, &options);
    Ok(LookupResult {
        format_id: args.format_id,
        var_code: args.var_code.clone(),
        year: args.year,
        resolved,
    })
}

pub fn run_clean(args: &CleanArgs) -> Result<CleanResult> {
    let raw = read_csv_frame(&args.input, CsvLoadOptions::text())
        .with_context(|| format!("load {}", args.input.display()))?;
    let mut cleaned = clean_frame_cells(&raw, !args.no_keep_leading_zero_ids)
        .context("clean cells")?;

    let retyped: Vec<String> = cleaned
        .get_columns()
        .iter()
        .filter(|column| column.dtype() != &DataType::String)
        .map(|column| column.name().to_string())
        .collect();

    if let Some(path) = &args.output {
        write_csv_frame(&mut cleaned, path)
            .with_context(|| format!("write cleaned table {}", path.display()))?;
    }
    info!(
        rows = cleaned.height(),
        retyped = retyped.len(),
        "clean finished"
    );

    Ok(CleanResult {
        input: args.input.clone(),
        output: args.output.clone(),
        retyped,
        frame: cleaned,
    })
}

/// Distinct input identifiers that did not survive the inner join.
fn unmatched_ids(records: &DataFrame, enriched: &DataFrame, id_field: &str) -> Vec<String> {
    let distinct = |df: &DataFrame| -> BTreeSet<String> {
        let lookup = CaseInsensitiveSet::new(df.get_column_names_owned());
        let Some(name) = lookup.get(id_field) else {
            return BTreeSet::new();
        };
        (0..df.height())
            .filter_map(|idx| canonical_key(column_value(df, name, idx)))
            .collect()
    };
    let matched = distinct(enriched);
    distinct(records)
        .into_iter()
        .filter(|id| !matched.contains(id))
        .collect()
}
