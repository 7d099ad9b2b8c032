//! Optional TOML configuration.
//!
//! ```toml
//! [registry]
//! id_field = "nit_declarante"
//! table = "cat_prod.sq_silver_negocio_transversal.int_personas"
//! effective_date = "FEC_CAMBIO"
//!
//! [variables]
//! compose_fields = ["Descripción de la Variable", "Número Casilla"]
//! separator = "-"
//! current_year = 2025
//! ```
//!
//! Command line flags override these values, which override built-in defaults.

use std::path::{Path, PathBuf};

use fiscal_model::{DEFAULT_ID_FIELD, MetadataLayout, ModelError, RegistryLayout};
use fiscal_variables::LookupOptions;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Invalid(#[from] ModelError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub registry: RegistrySection,
    pub variables: VariablesSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistrySection {
    /// Identifier column on the taxpayer records.
    pub id_field: Option<String>,
    #[serde(flatten)]
    pub layout: RegistryLayout,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VariablesSection {
    pub compose_fields: Option<Vec<String>>,
    pub separator: Option<String>,
    pub current_year: Option<i64>,
    #[serde(flatten)]
    pub layout: MetadataLayout,
}

/// Per-invocation overrides for a variable lookup.
#[derive(Debug, Clone, Default)]
pub struct LookupOverrides<'a> {
    pub compose_fields: &'a [String],
    pub separator: Option<&'a str>,
    pub current_year: Option<i64>,
}

impl FileConfig {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` when given, otherwise use built-in defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        self.registry.layout.validate()?;
        self.variables.layout.validate()
    }

    pub fn id_field(&self, flag: Option<&str>) -> String {
        flag.or(self.registry.id_field.as_deref())
            .unwrap_or(DEFAULT_ID_FIELD)
            .to_string()
    }

    pub fn lookup_options(&self, overrides: &LookupOverrides<'_>) -> LookupOptions {
        let vars = &self.variables;
        let mut options = match overrides.current_year.or(vars.current_year) {
            Some(year) => LookupOptions::new(year),
            None => LookupOptions::for_current_year(),
        };
        if !overrides.compose_fields.is_empty() {
            options = options.with_compose_fields(overrides.compose_fields.iter().cloned());
        } else if let Some(fields) = &vars.compose_fields {
            options = options.with_compose_fields(fields.iter().cloned());
        }
        if let Some(separator) = overrides.separator.or(vars.separator.as_deref()) {
            options = options.with_separator(separator);
        }
        options
    }
}
