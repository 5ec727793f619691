//! Configuration and CLI argument handling

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "workout-session")]
#[command(about = "Headless set and rest timer backend for a workout widget")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory holding the exercise list and unit preference
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Rest duration between sets in seconds
    #[arg(short, long, default_value = "90")]
    pub rest: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Resolve the data directory, defaulting to the platform config dir
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join("workout-session"))
                .ok_or_else(|| anyhow!("No config directory on this platform; pass --data-dir")),
        }
    }
}
