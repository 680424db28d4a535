use thiserror::Error;

/// Errors produced by record model operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown record kind: {0}")]
    UnknownKind(String),

    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),

    #[error("invalid store key {0:?}")]
    InvalidKey(String),

    #[error("field {0:?} is reserved")]
    ReservedField(String),
}
