//! Categorical fields derived from registry rows.

use std::borrow::Cow;

use fiscal_common::{any_to_bool, column_value};
use polars::prelude::*;

pub const PERSONA_NATURAL: &str = "Persona Natural";
pub const PERSONA_JURIDICA: &str = "Persona Jurídica";

pub const FLAG_YES: &str = "SÍ";
pub const FLAG_NO: &str = "No";

/// Collapse free-text taxpayer types into the two canonical categories.
///
/// Matching is a case-insensitive substring test; unmatched values are
/// returned unchanged, so the function is idempotent.
///
/// # Examples
///
/// ```
/// use fiscal_registry::normalize_taxpayer_type;
///
/// assert_eq!(normalize_taxpayer_type("PERSONA NATURAL RESIDENTE"), "Persona Natural");
/// assert_eq!(normalize_taxpayer_type("persona jurídica"), "Persona Jurídica");
/// assert_eq!(normalize_taxpayer_type("Sucesión ilíquida"), "Sucesión ilíquida");
/// ```
pub fn normalize_taxpayer_type(value: &str) -> Cow<'_, str> {
    let lower = value.to_lowercase();
    if lower.contains("persona nat") {
        Cow::Borrowed(PERSONA_NATURAL)
    } else if lower.contains("persona jur") {
        Cow::Borrowed(PERSONA_JURIDICA)
    } else {
        Cow::Borrowed(value)
    }
}

/// Label for the derived responsibility-52 marker.
pub fn flag_label(value: AnyValue<'_>) -> &'static str {
    if any_to_bool(value) == Some(true) {
        FLAG_YES
    } else {
        FLAG_NO
    }
}

/// Build the `SÍ`/`No` column from a boolean-like source column.
pub(crate) fn derived_flag_column(df: &DataFrame, source: &str, name: &str) -> Column {
    let labels: Vec<&str> = (0..df.height())
        .map(|idx| flag_label(column_value(df, source, idx)))
        .collect();
    Series::new(name.into(), labels).into_column()
}

/// Rewrite a text column with [`normalize_taxpayer_type`]; returns how many
/// values changed. Non-text columns are left alone.
pub(crate) fn normalize_taxpayer_column(df: &mut DataFrame, name: &str) -> PolarsResult<usize> {
    let Ok(column) = df.column(name) else {
        return Ok(0);
    };
    let Ok(values) = column.str() else {
        return Ok(0);
    };
    let mut changed = 0usize;
    let normalized: Vec<Option<String>> = values
        .into_iter()
        .map(|value| {
            value.map(|text| {
                let normalized = normalize_taxpayer_type(text);
                if normalized != text {
                    changed += 1;
                }
                normalized.into_owned()
            })
        })
        .collect();
    if changed > 0 {
        df.with_column(Series::new(name.into(), normalized).into_column())?;
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_is_idempotent_for_canonical_values() {
        for value in ["Persona Natural", "Persona Jurídica", "Otro"] {
            let once = normalize_taxpayer_type(value).into_owned();
            let twice = normalize_taxpayer_type(&once).into_owned();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn natural_wins_when_both_fragments_appear() {
        assert_eq!(
            normalize_taxpayer_type("persona natural / persona jurídica"),
            PERSONA_NATURAL
        );
    }

    #[test]
    fn flag_labels() {
        assert_eq!(flag_label(AnyValue::Boolean(true)), "SÍ");
        assert_eq!(flag_label(AnyValue::Boolean(false)), "No");
        assert_eq!(flag_label(AnyValue::Int32(1)), "SÍ");
        assert_eq!(flag_label(AnyValue::Int32(0)), "No");
        assert_eq!(flag_label(AnyValue::Null), "No");
    }

    #[test]
    fn taxpayer_column_is_rewritten_in_place() {
        let mut df = DataFrame::new(vec![
            Series::new(
                "NOM_TIPO_CONTRIBUYENTE".into(),
                vec![Some("PERSONA NATURAL"), None, Some("Persona Natural"), Some("Otro")],
            )
            .into_column(),
        ])
        .unwrap();

        let changed = normalize_taxpayer_column(&mut df, "NOM_TIPO_CONTRIBUYENTE").unwrap();

        assert_eq!(changed, 1);
        let values = df.column("NOM_TIPO_CONTRIBUYENTE").unwrap().str().unwrap();
        assert_eq!(values.get(0), Some("Persona Natural"));
        assert_eq!(values.get(1), None);
        assert_eq!(values.get(3), Some("Otro"));
    }
}
