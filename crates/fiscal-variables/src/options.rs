use chrono::{Datelike, Local};
use fiscal_model::DEFAULT_COMPOSE_FIELDS;

/// Per-call settings for [`VariableResolver::resolve`](crate::VariableResolver::resolve).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOptions {
    /// Columns joined into `composed_name`, in order.
    pub compose_fields: Vec<String>,
    pub separator: String,
    /// Year substituted for `Vigente` validity ends.
    pub current_year: i64,
}

impl LookupOptions {
    pub fn new(current_year: i64) -> Self {
        Self {
            compose_fields: DEFAULT_COMPOSE_FIELDS.iter().map(|f| f.to_string()).collect(),
            separator: "_".to_string(),
            current_year,
        }
    }

    /// Options pinned to the local calendar year.
    pub fn for_current_year() -> Self {
        Self::new(i64::from(Local::now().year()))
    }

    pub fn with_compose_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compose_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_metadata_layout() {
        let options = LookupOptions::new(2024);
        assert_eq!(options.separator, "_");
        assert_eq!(options.current_year, 2024);
        assert_eq!(options.compose_fields.len(), 4);
        assert_eq!(options.compose_fields[0], "Descripción de la Variable");
    }

    #[test]
    fn builders_replace_fields_and_separator() {
        let options = LookupOptions::new(2024)
            .with_compose_fields(["Número Casilla"])
            .with_separator("|");
        assert_eq!(options.compose_fields, vec!["Número Casilla".to_string()]);
        assert_eq!(options.separator, "|");
    }
}
