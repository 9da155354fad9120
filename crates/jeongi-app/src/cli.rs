//! CLI argument definitions for the jeongi client.
//!
//! Uses `clap` with derive macros. Priority resolution: CLI args > env vars >
//! config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// jeongi — terminal client for the electrical engineering study assistant.
#[derive(Parser, Debug)]
#[command(name = "jeongi", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Base URL of the assistant backend.
    #[arg(short = 's', long = "server")]
    pub server: Option<String>,

    /// Data directory for the transcript snapshot database.
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open-ended chat session (persists across runs; /reset starts over).
    Chat,
    /// Question-answering session against one document.
    Doc {
        /// Document to bind the session to.
        file: PathBuf,
    },
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > JEONGI_CONFIG env var > ~/.jeongi/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("JEONGI_CONFIG") {
            return PathBuf::from(p);
        }
        home_dir().join(".jeongi").join("config.toml")
    }

    /// Resolve the data directory for the snapshot database.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(ref p) = self.data_dir {
            return p.clone();
        }
        home_dir().join(".jeongi")
    }

    /// Resolve the backend base URL; `config_url` comes from the config file.
    pub fn resolve_server(&self, config_url: &str) -> String {
        if let Some(ref s) = self.server {
            return s.clone();
        }
        if let Ok(s) = std::env::var("JEONGI_SERVER") {
            return s;
        }
        config_url.to_string()
    }
}

fn home_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
    #[cfg(not(target_os = "windows"))]
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
}
