//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Exposure using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Exposure - patient exposure event tracking service
#[derive(Parser, Debug)]
#[command(name = "exposure")]
#[command(version, about, long_about = None)]
#[command(author = "Exposure Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "exposure.toml", env = "EXPOSURE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "EXPOSURE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
