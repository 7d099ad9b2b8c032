//! Column layouts of the reference tables.
//!
//! The registry and metadata tables come from outside this workspace, so
//! every column the resolvers touch is named here rather than hard-coded at
//! the call sites. Defaults match the production tables.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Default identifier column on taxpayer records.
pub const DEFAULT_ID_FIELD: &str = "numero_identificacion";

/// Default fully-qualified name of the registry table.
pub const DEFAULT_REGISTRY_TABLE: &str = "cat_prod.sq_silver_negocio_transversal.int_personas";

/// Columns joined into `composed_name` when the caller does not pick any.
pub const DEFAULT_COMPOSE_FIELDS: [&str; 4] = [
    "Descripción de la Variable",
    "Número Casilla",
    "Año Gravable Desde",
    "Año Gravable Hasta",
];

/// Columns of the taxpayer registry (one snapshot per row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryLayout {
    pub table: String,
    pub nit: String,
    pub effective_date: String,
    /// Independent responsibility indicators copied through as-is.
    pub responsibility_flags: Vec<String>,
    /// Indicator surfaced through [`RegistryLayout::derived_flag`].
    pub flag_52: String,
    pub taxpayer_type: String,
    pub establishments: String,
    /// Name of the derived `SÍ`/`No` column.
    pub derived_flag: String,
}

impl Default for RegistryLayout {
    fn default() -> Self {
        Self {
            table: DEFAULT_REGISTRY_TABLE.to_string(),
            nit: "NUM_NIT".to_string(),
            effective_date: "FEC_CAMBIO".to_string(),
            responsibility_flags: vec![
                "IND_TIENE_RESP_47".to_string(),
                "IND_TIENE_RESP_48".to_string(),
                "IND_TIENE_RESP_33".to_string(),
                "IND_TIENE_RESP_16".to_string(),
            ],
            flag_52: "IND_TIENE_RESP_52".to_string(),
            taxpayer_type: "NOM_TIPO_CONTRIBUYENTE".to_string(),
            establishments: "NUM_ESTABLECIMIENTOS".to_string(),
            derived_flag: "marca_resp_52".to_string(),
        }
    }
}

impl RegistryLayout {
    /// Columns requested from the registry store, in projection order.
    pub fn selected_columns(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(self.responsibility_flags.len() + 6);
        columns.push(self.nit.clone());
        columns.push(self.effective_date.clone());
        columns.extend(self.responsibility_flags.iter().cloned());
        columns.push(self.flag_52.clone());
        columns.push(self.taxpayer_type.clone());
        columns.push(self.establishments.clone());
        columns
    }

    pub fn validate(&self) -> Result<()> {
        non_empty("registry.table", &self.table)?;
        non_empty("registry.nit", &self.nit)?;
        non_empty("registry.effective_date", &self.effective_date)?;
        for flag in &self.responsibility_flags {
            non_empty("registry.responsibility_flags", flag)?;
        }
        non_empty("registry.flag_52", &self.flag_52)?;
        non_empty("registry.taxpayer_type", &self.taxpayer_type)?;
        non_empty("registry.establishments", &self.establishments)?;
        non_empty("registry.derived_flag", &self.derived_flag)
    }
}

/// Columns of the fiscal variable metadata table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataLayout {
    pub format_id: String,
    pub variable_number: String,
    pub valid_from: String,
    /// May hold `Vigente` or be empty for open-ended windows.
    pub valid_to: String,
    /// Source of `name_var`.
    pub description: String,
}

impl Default for MetadataLayout {
    fn default() -> Self {
        Self {
            format_id: "Código del Formato".to_string(),
            variable_number: "Código de la Variable".to_string(),
            valid_from: "Año Gravable Desde".to_string(),
            valid_to: "Año Gravable Hasta".to_string(),
            description: "Descripción de la Casilla".to_string(),
        }
    }
}

impl MetadataLayout {
    pub fn validate(&self) -> Result<()> {
        non_empty("variables.format_id", &self.format_id)?;
        non_empty("variables.variable_number", &self.variable_number)?;
        non_empty("variables.valid_from", &self.valid_from)?;
        non_empty("variables.valid_to", &self.valid_to)?;
        non_empty("variables.description", &self.description)
    }
}

fn non_empty(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(ModelError::EmptyColumnName { field })
    } else {
        Ok(())
    }
}
