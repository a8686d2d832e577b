//! CLI Module for snipbox
//! Command-line arguments and the non-interactive subcommands that read the
//! snippet file without launching the TUI.

pub mod commands;

use crate::config::Config;
use crate::models::{SnippetPersistence, StorageManager};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "snipbox")]
#[command(author, version, about = "Collect, copy and paste code snippets in the terminal", long_about = None)]
pub struct Cli {
    /// Snippet file to use instead of the configured one
    #[arg(long, value_name = "FILE")]
    pub data_file: Option<PathBuf>,

    /// Config file to read instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write debug output to the log file
    #[arg(short, long)]
    pub verbose: bool,

    /// Run without a command to start the interactive interface
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List saved snippets
    #[command(alias = "ls")]
    List,
    /// Print one snippet by list number or id
    #[command(alias = "cat")]
    Show {
        /// 1-based list number or snippet id
        target: String,
    },
    /// Print the data and config file locations
    Path,
}

impl Cli {
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Config::default_path)
    }

    /// Command-line flag first, then the config file, then the default.
    pub fn data_file(&self, config: &Config) -> Result<PathBuf> {
        match &self.data_file {
            Some(path) => Ok(path.clone()),
            None => config.resolve_data_file(),
        }
    }
}

/// Executes a subcommand against the snippet file.
pub fn execute(
    command: &Commands,
    storage: &StorageManager,
    config_path: Option<&Path>,
) -> Result<()> {
    match command {
        Commands::List => {
            let snippets = storage.load()?;
            commands::list_snippets(&snippets);
        }
        Commands::Show { target } => {
            let snippets = storage.load()?;
            commands::show_snippet(&snippets, target);
        }
        Commands::Path => commands::print_paths(storage.data_file(), config_path),
    }

    Ok(())
}
