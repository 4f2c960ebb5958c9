use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),

    #[error("value {actual} out of range: must be >= {min}")]
    OutOfRange { min: i64, actual: i64 },

    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

/// Result alias for type operations.
pub type TypeResult<T> = Result<T, TypeError>;
