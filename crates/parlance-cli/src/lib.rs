//! CLI adapter for parlance.
//!
//! The binary in `main.rs` is the composition root; everything it wires
//! together lives here so it can be tested without spawning a process.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used only by the binary entry point
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod engine;
pub mod handlers;
pub mod parser;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::{Commands, SettingsCommand};
pub use engine::LogSpeechEngine;
pub use parser::Cli;
