use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("variable code {0:?} does not match [prefix]VAR_<digits>")]
    InvalidVariableCode(String),
    #[error("column name for {field} must not be empty")]
    EmptyColumnName { field: &'static str },
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
