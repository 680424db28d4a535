use std::path::PathBuf;

use hbnb_store::StoreError;
use thiserror::Error;

/// Errors that stop the interpreter.
///
/// Mistakes in user input are not errors at this level; they are reported
/// to the output as a [`UsageError`](crate::parse::UsageError) and the loop
/// continues.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Flushing the store failed. Carrying on would silently lose data.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Reading input or writing output failed.
    #[error("console I/O error: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors loading the console configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
