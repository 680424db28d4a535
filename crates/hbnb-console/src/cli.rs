use std::path::PathBuf;

use clap::Parser;

use crate::config::{CoercionMode, ConsoleConfig};
use crate::error::ConfigError;

#[derive(Parser, Debug)]
#[command(
    name = "hbnb",
    about = "HBNB console: create, show, update, and destroy stored records",
    version,
)]
pub struct Cli {
    /// JSON file backing the store
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// How `update` interprets raw values
    #[arg(long)]
    pub coercion: Option<CoercionMode>,

    /// Prompt printed before each line
    #[arg(long)]
    pub prompt: Option<String>,

    /// Log store activity to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Defaults, then the config file, then flags.
    pub fn resolve_config(&self) -> Result<ConsoleConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ConsoleConfig::load(path)?,
            None => ConsoleConfig::default(),
        };
        if let Some(file) = &self.file {
            config.file_path = file.clone();
        }
        if let Some(coercion) = self.coercion {
            config.coercion = coercion;
        }
        if let Some(prompt) = &self.prompt {
            config.prompt = prompt.clone();
        }
        Ok(config)
    }
}
