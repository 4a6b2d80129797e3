//! CLI bootstrap - the composition root.
//!
//! This module is the only place where infrastructure is wired together
//! for the CLI adapter:
//! - Preference store over the `SQLite` database (via parlance-db)
//! - Logging speech engine (see [`crate::engine`])
//! - The speak service (via parlance-voice)
//!
//! Command handlers receive the composed [`CliContext`].

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use parlance_core::{IdentityProvider, PlatformProfile, SpeechEngine, StaticIdentity};
use parlance_db::{SqlitePreferenceStore, setup_database};
use parlance_voice::{SpeakEvent, SpeakService, SpeakServiceConfig, SpeakServiceDeps};
use tokio::sync::mpsc;

use crate::engine::LogSpeechEngine;
use crate::parser::Cli;

/// Platforms whose engines stay silent until primed.
const PRIMING_PLATFORMS: &[&str] = &["safari", "ios-safari", "ios"];

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Path to the preferences database.
    pub db_path: PathBuf,
    /// Signed-in user, if any.
    pub user: Option<String>,
    /// Host platform quirks.
    pub platform: PlatformProfile,
}

impl CliConfig {
    /// Create config with the default database path and no user.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self {
            db_path: default_database_path()?,
            user: None,
            platform: PlatformProfile::default(),
        })
    }

    /// Resolve config from parsed arguments (flags and environment).
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let db_path = match &cli.db_path {
            Some(path) => path.clone(),
            None => default_database_path()?,
        };

        Ok(Self {
            db_path,
            user: cli.user.clone().filter(|u| !u.trim().is_empty()),
            platform: platform_profile(&cli.platform),
        })
    }
}

/// `<data dir>/parlance/parlance.db`.
pub fn default_database_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().context("Could not determine the user data directory")?;
    Ok(data_dir.join("parlance").join("parlance.db"))
}

/// Map a platform name to its profile.
pub fn platform_profile(name: &str) -> PlatformProfile {
    let name = name.trim().to_ascii_lowercase();
    if PRIMING_PLATFORMS.contains(&name.as_str()) {
        PlatformProfile::with_priming(name)
    } else {
        PlatformProfile {
            name,
            ..PlatformProfile::default()
        }
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    /// The speech core.
    pub speak: SpeakService,
    /// Events from the speech core.
    pub events: mpsc::UnboundedReceiver<SpeakEvent>,
    /// Direct store access, used to seed new preference records.
    pub store: Arc<SqlitePreferenceStore>,
    /// Signed-in user, if any.
    pub user: Option<String>,
}

impl CliContext {
    /// Drain pending speech events, logging each at debug level.
    pub fn drain_events(&mut self) -> Vec<SpeakEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            tracing::debug!(?event, "Speak event");
            events.push(event);
        }
        events
    }
}

/// Bootstrap the CLI application.
///
/// Opens (or creates) the database and wires the logging engine into a
/// new speak service.
pub async fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let pool = setup_database(&config.db_path)
        .await
        .with_context(|| format!("Failed to open database at {}", config.db_path.display()))?;
    let store = Arc::new(SqlitePreferenceStore::new(pool));
    let engine: Arc<dyn SpeechEngine> = Arc::new(LogSpeechEngine::with_builtin_voices());

    Ok(bootstrap_with(store, engine, config))
}

/// Bootstrap with an injected store and engine (for testing).
pub fn bootstrap_with(
    store: Arc<SqlitePreferenceStore>,
    engine: Arc<dyn SpeechEngine>,
    config: CliConfig,
) -> CliContext {
    let identity: Arc<dyn IdentityProvider> = match &config.user {
        Some(user) => Arc::new(StaticIdentity::new(user.clone())),
        None => Arc::new(StaticIdentity::anonymous()),
    };

    let (speak, events) = SpeakService::new(
        SpeakServiceDeps {
            engine,
            store: store.clone(),
            identity,
        },
        SpeakServiceConfig {
            platform: config.platform,
            ..SpeakServiceConfig::default()
        },
    );

    CliContext {
        speak,
        events,
        store,
        user: config.user,
    }
}
