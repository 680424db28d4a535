use std::fmt;

/// An entry of the backing file that could not be rebuilt into a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReloadFailure {
    /// The entry's key as written in the file.
    pub key: String,
    /// Why the entry was rejected.
    pub reason: String,
}

impl fmt::Display for ReloadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.reason)
    }
}

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error reading or writing the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a JSON object, or the collection could not be
    /// encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// One or more entries of the backing file are malformed. Nothing was
    /// loaded.
    #[error("reload failed for {}", summarize(.failures))]
    Reload { failures: Vec<ReloadFailure> },
}

fn summarize(failures: &[ReloadFailure]) -> String {
    let entries = failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    format!("{} entries: {entries}", failures.len())
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
