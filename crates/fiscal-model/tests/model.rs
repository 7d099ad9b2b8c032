//! Tests for fiscal-model types.

use fiscal_model::{
    MetadataLayout, RegistryLayout, ResolvedVariable, VariableCode, VariableMeta,
};
use proptest::prelude::*;

#[test]
fn resolved_variable_serializes_with_nulls() {
    let resolved = ResolvedVariable {
        name_var: Some("Patrimonio bruto".to_string()),
        composed_name: None,
        meta: VariableMeta {
            prefix: String::new(),
            var_number: 33,
        },
    };
    let json = serde_json::to_value(&resolved).expect("serialize resolved");
    assert_eq!(
        json,
        serde_json::json!({
            "name_var": "Patrimonio bruto",
            "composed_name": null,
            "meta": { "prefix": "", "var_number": 33 }
        })
    );
}

#[test]
fn layouts_fill_missing_fields_with_defaults() {
    let layout: RegistryLayout =
        serde_json::from_str(r#"{"nit": "NIT"}"#).expect("deserialize layout");
    assert_eq!(layout.nit, "NIT");
    assert_eq!(layout.effective_date, "FEC_CAMBIO");
    assert_eq!(layout.responsibility_flags.len(), 4);

    let metadata: MetadataLayout = serde_json::from_str("{}").expect("deserialize layout");
    assert_eq!(metadata, MetadataLayout::default());
}

#[test]
fn meta_from_code() {
    let meta = VariableMeta::from(VariableCode::parse("FE_VAR_0007").unwrap());
    assert_eq!(meta.prefix, "FE");
    assert_eq!(meta.var_number, 7);
}

proptest! {
    #[test]
    fn any_prefix_and_number_parse(prefix in "[A-Za-z0-9]{0,6}", number in 0u32..1_000_000, upper in any::<bool>()) {
        let marker = if upper { "VAR_" } else { "var_" };
        let separator = if prefix.is_empty() { "" } else { "_" };
        let raw = format!("{prefix}{separator}{marker}{number:04}");
        let code = VariableCode::parse(&raw).expect("generated code parses");
        prop_assert_eq!(code.number, i64::from(number));
        prop_assert_eq!(code.prefix, prefix);
    }

    #[test]
    fn codes_without_marker_never_parse(raw in "[A-UW-Za-uw-z0-9_]{0,12}") {
        prop_assert!(VariableCode::parse(&raw).is_none());
    }
}
