//! Fiscal variable lookup.

use fiscal_common::any_to_string;
use fiscal_model::{ResolvedVariable, VariableCode, VariableMeta};
use polars::prelude::AnyValue;
use tracing::{debug, trace};

use crate::options::LookupOptions;
use crate::table::{FieldValue, MetadataTable};

/// Read-only lookups against a shared [`MetadataTable`].
#[derive(Debug, Clone, Copy)]
pub struct VariableResolver<'a> {
    table: &'a MetadataTable,
}

impl<'a> VariableResolver<'a> {
    pub fn new(table: &'a MetadataTable) -> Self {
        Self { table }
    }

    /// Resolve `var_code` on form `format_id` for `tax_year`.
    ///
    /// Returns `None` when the code is not of the form `[prefix]VAR_<digits>`
    /// or when no metadata row covers the year. When several rows do, the
    /// first in table order wins.
    pub fn resolve(
        &self,
        format_id: i64,
        var_code: &str,
        tax_year: i64,
        options: &LookupOptions,
    ) -> Option<ResolvedVariable> {
        let Some(code) = VariableCode::parse(var_code) else {
            debug!(var_code, "variable code does not match [prefix]VAR_<digits>");
            return None;
        };

        let matches = self.matching_rows(format_id, code.number, tax_year, options.current_year);
        let Some(&idx) = matches.first() else {
            debug!(
                format_id,
                var_number = code.number,
                tax_year,
                "no metadata row covers the requested year"
            );
            return None;
        };
        if matches.len() > 1 {
            debug!(
                format_id,
                var_number = code.number,
                tax_year,
                candidates = matches.len(),
                "overlapping validity windows, taking the first row"
            );
        }

        let name_var = description_text(self.table.description(idx));
        let composed_name = self.compose(idx, options);
        trace!(row = idx, ?name_var, ?composed_name, "resolved variable");
        Some(ResolvedVariable {
            name_var,
            composed_name,
            meta: VariableMeta::from(code),
        })
    }

    /// Row indices whose form, variable number and validity window all match,
    /// in table order.
    pub fn matching_rows(
        &self,
        format_id: i64,
        var_number: i64,
        tax_year: i64,
        current_year: i64,
    ) -> Vec<usize> {
        (0..self.table.len())
            .filter(|&idx| {
                let window = self.table.window(idx, current_year);
                window.format_id == Some(format_id)
                    && window.variable_number == Some(var_number)
                    && window.contains(tax_year)
            })
            .collect()
    }

    fn compose(&self, idx: usize, options: &LookupOptions) -> Option<String> {
        let window = self.table.window(idx, options.current_year);
        let parts: Vec<String> = options
            .compose_fields
            .iter()
            .filter_map(|field| match self.table.composed_value(field, idx, &window) {
                FieldValue::Missing => None,
                FieldValue::Integer(v) => Some(v.to_string()),
                FieldValue::Raw(value) => present_text(value),
            })
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(&options.separator))
        }
    }
}

/// Trimmed text for a present cell; null and NaN are absent.
fn present_text(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::Float32(v) if v.is_nan() => None,
        AnyValue::Float64(v) if v.is_nan() => None,
        other => Some(any_to_string(other).trim().to_string()),
    }
}

fn description_text(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::Float32(v) if v.is_nan() => None,
        AnyValue::Float64(v) if v.is_nan() => None,
        other => Some(any_to_string(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_text_skips_null_and_nan() {
        assert_eq!(present_text(AnyValue::Null), None);
        assert_eq!(present_text(AnyValue::Float64(f64::NAN)), None);
        assert_eq!(present_text(AnyValue::Float64(12.0)), Some("12".to_string()));
        assert_eq!(present_text(AnyValue::String("  Renta ")), Some("Renta".to_string()));
        assert_eq!(present_text(AnyValue::String("")), Some(String::new()));
    }

    #[test]
    fn description_is_not_trimmed() {
        assert_eq!(
            description_text(AnyValue::String(" Patrimonio ")),
            Some(" Patrimonio ".to_string())
        );
        assert_eq!(description_text(AnyValue::Null), None);
    }
}
