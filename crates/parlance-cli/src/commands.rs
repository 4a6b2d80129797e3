//! Subcommand definitions.

use clap::Subcommand;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List the voices available for speaking
    Voices,

    /// Speak text with the user's saved preferences
    Speak {
        /// Text to speak
        text: String,
        /// Catalog index of the voice to use for this utterance
        #[arg(long)]
        voice: Option<usize>,
        /// Pitch override (0-2)
        #[arg(long)]
        pitch: Option<f64>,
        /// Rate override (0.1-10)
        #[arg(long)]
        rate: Option<f64>,
        /// Persist the overrides as the user's new preferences
        #[arg(long)]
        save: bool,
    },

    /// View or change the user's speech preferences
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

/// Settings command variants.
#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show the user's saved preferences
    Show,
    /// Create a preference record with default values
    Init {
        /// Overwrite an existing record
        #[arg(long)]
        force: bool,
    },
    /// Update saved preferences
    Set {
        /// Pitch (0-2)
        #[arg(long)]
        pitch: Option<f64>,
        /// Rate (0.1-10)
        #[arg(long)]
        rate: Option<f64>,
        /// Catalog index of the preferred voice
        #[arg(long)]
        voice: Option<usize>,
    },
}
