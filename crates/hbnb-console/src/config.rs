use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How `update` turns a raw token into a field value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CoercionMode {
    /// Quoted text is a string, text with a `.` is a float, anything else an
    /// integer. The field's declared type is not consulted.
    #[default]
    Syntactic,
    /// Declared fields are parsed according to their declared type and
    /// mismatches are rejected. Undeclared fields fall back to syntactic.
    Schema,
}

/// Console settings, loadable from a TOML file. Every key is optional.
///
/// ```toml
/// file_path = "file.json"
/// prompt = "(hbnb) "
/// coercion = "schema"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub file_path: PathBuf,
    pub prompt: String,
    pub coercion: CoercionMode,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from("file.json"),
            prompt: "(hbnb) ".into(),
            coercion: CoercionMode::Syntactic,
        }
    }
}

impl ConsoleConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parse from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}
