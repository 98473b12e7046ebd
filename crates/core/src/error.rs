use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Parse and validation failures of game primitives.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),

    /// Not a decimal snowflake.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("invalid list type: {0:?}")]
    InvalidListType(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
