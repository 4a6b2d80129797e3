//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for speaking text with saved voice preferences.
#[derive(Parser)]
#[command(name = "parlance")]
#[command(about = "Speak text with per-user voice, pitch and rate preferences")]
#[command(version)]
pub struct Cli {
    /// Path to the preferences database
    #[arg(long = "db", env = "PARLANCE_DB", global = true)]
    pub db_path: Option<PathBuf>,

    /// User whose preferences are loaded and saved
    #[arg(short = 'u', long = "user", env = "PARLANCE_USER", global = true)]
    pub user: Option<String>,

    /// Host platform name; some platforms need the engine primed
    #[arg(long, env = "PARLANCE_PLATFORM", global = true, default_value = "generic")]
    pub platform: String,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
