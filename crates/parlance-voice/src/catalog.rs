//! Voice catalog resolver.
//!
//! Platform engines often enumerate voices in the background, so the first
//! [`SpeechEngine::list_voices`] call can come back empty. The resolver
//! polls with a bounded backoff until voices appear and publishes readiness
//! on a [`watch`] channel:
//!
//! ```text
//!   yield → refresh ─ empty ─→ sleep(delay) → refresh ─ … ─→ give up (logged)
//!              │                                  │
//!              └──────── voices ──────────────────┴──→ ready = true
//! ```

use std::sync::Arc;
use std::time::Duration;

use parlance_core::{IndexedVoice, SpeechEngine, Voice, index_voices};
use tokio::sync::watch;

/// Catalog polling configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Primary language subtag to keep (e.g. `"en"`).
    pub language: String,

    /// Maximum number of `list_voices` calls per wait.
    pub max_attempts: u32,

    /// Delay after the first empty result; doubles after each retry.
    pub initial_delay: Duration,

    /// Upper bound on the retry delay.
    pub max_delay: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            max_attempts: 10,
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(1),
        }
    }
}

/// Filtered, indexed view of the engine's voices.
pub struct VoiceCatalog {
    engine: Arc<dyn SpeechEngine>,
    config: CatalogConfig,
    voices: Vec<IndexedVoice>,
    ready_tx: watch::Sender<bool>,
}

impl VoiceCatalog {
    pub fn new(engine: Arc<dyn SpeechEngine>, config: CatalogConfig) -> Self {
        let (ready_tx, _) = watch::channel(false);
        Self {
            engine,
            config,
            voices: Vec::new(),
            ready_tx,
        }
    }

    /// Query the engine once and republish the filtered list.
    ///
    /// Returns the number of voices published. An empty result replaces the
    /// previous list and clears readiness.
    pub fn refresh(&mut self) -> usize {
        let filtered: Vec<Voice> = self
            .engine
            .list_voices()
            .into_iter()
            .filter(|v| v.matches_language(&self.config.language))
            .collect();

        self.voices = index_voices(&filtered);
        let count = self.voices.len();
        self.ready_tx.send_replace(count > 0);

        tracing::debug!(
            language = %self.config.language,
            count,
            "Voice catalog refreshed"
        );
        count
    }

    /// Poll the engine until the catalog is non-empty or attempts run out.
    ///
    /// The first query is deferred by one scheduler turn so that an engine
    /// which populates voices on the same task gets a chance to run.
    /// Returns whether voices are available; exhaustion is not an error.
    pub async fn wait_until_ready(&mut self) -> bool {
        tokio::task::yield_now().await;

        let attempts = self.config.max_attempts.max(1);
        let mut delay = self.config.initial_delay;

        for attempt in 1..=attempts {
            if self.refresh() > 0 {
                return true;
            }
            if attempt == attempts {
                break;
            }

            tracing::debug!(attempt, delay_ms = delay.as_millis(), "Voice catalog empty, retrying");
            tokio::time::sleep(delay).await;
            delay = (delay * 2).min(self.config.max_delay);
        }

        tracing::warn!(
            attempts,
            language = %self.config.language,
            "No voices available after polling, will retry on next refresh"
        );
        false
    }

    /// Current indexed list.
    pub fn voices(&self) -> &[IndexedVoice] {
        &self.voices
    }

    /// Fallback selection: the last entry of the indexed list.
    pub fn default_voice(&self) -> Option<&IndexedVoice> {
        self.voices.last()
    }

    /// Resolve a catalog index to the engine voice.
    pub fn voice_at(&self, index: usize) -> Option<&Voice> {
        self.voices.get(index).map(|v| &v.voice)
    }

    /// Whether the last refresh found any voices.
    pub fn is_ready(&self) -> bool {
        *self.ready_tx.borrow()
    }

    /// Observe catalog readiness.
    pub fn subscribe_ready(&self) -> watch::Receiver<bool> {
        self.ready_tx.subscribe()
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}
