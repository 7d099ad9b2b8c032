//! Fiscal variable codes and lookup results.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

static VARIABLE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.*)VAR_([0-9]+)$").expect("variable code pattern is valid")
});

/// A parsed `[prefix]VAR_<digits>` code such as `FE_VAR_0007`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableCode {
    /// Text before `VAR_` with trailing `_` separators removed; may be empty.
    pub prefix: String,
    pub number: i64,
}

impl VariableCode {
    /// Parses a code, returning `None` when it does not end in `VAR_<digits>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fiscal_model::VariableCode;
    ///
    /// let code = VariableCode::parse("FE_VAR_0007").unwrap();
    /// assert_eq!(code.prefix, "FE");
    /// assert_eq!(code.number, 7);
    /// assert!(VariableCode::parse("VARX_5").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let captures = VARIABLE_CODE.captures(raw.trim())?;
        let prefix = captures
            .get(1)
            .map_or("", |m| m.as_str())
            .trim_end_matches('_')
            .to_string();
        let number = captures.get(2)?.as_str().parse::<i64>().ok()?;
        Some(Self { prefix, number })
    }
}

impl FromStr for VariableCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ModelError::InvalidVariableCode(s.to_string()))
    }
}

impl fmt::Display for VariableCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix.is_empty() {
            write!(f, "VAR_{}", self.number)
        } else {
            write!(f, "{}_VAR_{}", self.prefix, self.number)
        }
    }
}

/// Code details carried alongside a resolved name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableMeta {
    pub prefix: String,
    pub var_number: i64,
}

impl From<VariableCode> for VariableMeta {
    fn from(code: VariableCode) -> Self {
        Self {
            prefix: code.prefix,
            var_number: code.number,
        }
    }
}

/// Result of a successful fiscal variable lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVariable {
    /// Field description of the matched metadata row.
    pub name_var: Option<String>,
    /// Selected fields joined by the separator; `None` when none were present.
    pub composed_name: Option<String>,
    pub meta: VariableMeta,
}
