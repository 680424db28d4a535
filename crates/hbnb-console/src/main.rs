use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use hbnb_store::{FileStorage, ObjectStore, StoreError};
use tracing::Level;

mod cli;
mod coerce;
mod commands;
mod config;
mod error;
mod help;
mod parse;
mod translate;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let config = cli.resolve_config()?;
    let mut store = FileStorage::new(&config.file_path);
    match store.reload() {
        Ok(report) => {
            if cli.verbose {
                eprintln!(
                    "{} loaded {} records from {}",
                    "✓".green().bold(),
                    report.loaded,
                    config.file_path.display().to_string().bold()
                );
            }
        }
        Err(StoreError::Reload { failures }) => {
            for failure in &failures {
                eprintln!("  {} {}", "✗".red(), failure);
            }
            let err = StoreError::Reload { failures };
            return Err(err).with_context(|| format!("cannot load {}", config.file_path.display()));
        }
        Err(e) => {
            return Err(e).with_context(|| format!("cannot load {}", config.file_path.display()));
        }
    }

    let mut console = commands::Console::new(store, io::stdout().lock(), &config);
    if let Err(e) = console.run(io::stdin().lock()) {
        if let error::ConsoleError::Store(_) = e {
            eprintln!(
                "  {} the last change may not be saved to {}",
                "✗".red(),
                config.file_path.display()
            );
        }
        return Err(e).context("console stopped");
    }
    console.output_mut().flush()?;
    tracing::debug!(records = console.store().all().len(), "session ended");
    Ok(())
}
