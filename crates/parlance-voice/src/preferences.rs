//! Preference synchronizer: cached user preferences backed by the remote store.
//!
//! The cache is the source of truth for the next utterance and the next
//! save. The remote record is only as fresh as the last explicit
//! [`load`](PreferenceSynchronizer::load) / [`save`](PreferenceSynchronizer::save).
//! There is no optimistic concurrency: one session writes one record.

use std::sync::Arc;

use parlance_core::{
    Document, IndexedVoice, PITCH_RANGE, PreferenceError, PreferenceStore, PreferenceStoreError,
    RATE_RANGE, SETTINGS_COLLECTION, UserPreferences, VoiceSelection, validate_preferences,
};

use crate::error::SpeechError;

/// Location of a loaded preference record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRef {
    pub collection: String,
    pub key: String,
}

/// Loads and saves [`UserPreferences`] through a [`PreferenceStore`].
pub struct PreferenceSynchronizer {
    store: Arc<dyn PreferenceStore>,
    prefs: UserPreferences,

    /// Set by the first successful `load`; required by `save`.
    record: Option<RecordRef>,
}

impl PreferenceSynchronizer {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            store,
            prefs: UserPreferences::default(),
            record: None,
        }
    }

    pub const fn preferences(&self) -> &UserPreferences {
        &self.prefs
    }

    pub const fn record(&self) -> Option<&RecordRef> {
        self.record.as_ref()
    }

    /// Fetch the user's record and replace the cache with it.
    ///
    /// A record with out-of-range pitch or rate is rejected as
    /// `InvalidRecord`. On any failure the cache and record handle are left
    /// untouched.
    pub async fn load(&mut self, user_id: &str) -> Result<&UserPreferences, SpeechError> {
        let doc = self.store.get_document(SETTINGS_COLLECTION, user_id).await?;

        let prefs: UserPreferences = serde_json::from_value(serde_json::Value::Object(doc))
            .map_err(|e| PreferenceStoreError::InvalidRecord(e.to_string()))?;
        validate_preferences(&prefs)
            .map_err(|e| PreferenceStoreError::InvalidRecord(e.to_string()))?;

        tracing::info!(
            user = user_id,
            pitch = prefs.pitch,
            rate = prefs.rate,
            voice = prefs.selected_voice_index(),
            "Loaded speech preferences"
        );

        self.prefs = prefs;
        self.record = Some(RecordRef {
            collection: SETTINGS_COLLECTION.to_string(),
            key: user_id.to_string(),
        });
        Ok(&self.prefs)
    }

    /// Write pitch, rate and the selected voice back to the loaded record.
    pub async fn save(&self) -> Result<(), SpeechError> {
        let record = self.record.as_ref().ok_or(SpeechError::NoRecordLoaded)?;
        validate_preferences(&self.prefs)?;

        let fields = preference_fields(&self.prefs)?;
        self.store
            .update_document(&record.collection, &record.key, fields)
            .await?;

        tracing::info!(user = %record.key, "Saved speech preferences");
        Ok(())
    }

    // ── Cache mutation ─────────────────────────────────────────────

    pub fn set_pitch(&mut self, pitch: f64) -> Result<(), SpeechError> {
        if !PITCH_RANGE.contains(&pitch) {
            return Err(PreferenceError::InvalidPitch(pitch).into());
        }
        self.prefs.pitch = pitch;
        Ok(())
    }

    pub fn set_rate(&mut self, rate: f64) -> Result<(), SpeechError> {
        if !RATE_RANGE.contains(&rate) {
            return Err(PreferenceError::InvalidRate(rate).into());
        }
        self.prefs.rate = rate;
        Ok(())
    }

    pub fn select_voice(&mut self, selection: Option<VoiceSelection>) {
        self.prefs.current_voice = selection;
    }

    /// Select `fallback` if no voice is selected yet.
    ///
    /// Returns whether the selection changed.
    pub fn ensure_voice_selected(&mut self, fallback: Option<&IndexedVoice>) -> bool {
        if self.prefs.current_voice.is_some() {
            return false;
        }
        let Some(voice) = fallback else {
            return false;
        };
        tracing::debug!(index = voice.index, voice = %voice.label, "Defaulting to last catalog voice");
        self.prefs.current_voice = Some(voice.to_selection());
        true
    }
}

/// The three stored fields, with an unset voice written as `null`.
fn preference_fields(prefs: &UserPreferences) -> Result<Document, PreferenceStoreError> {
    match serde_json::to_value(prefs) {
        Ok(serde_json::Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(PreferenceStoreError::InvalidRecord(format!(
            "preferences serialized to {other}"
        ))),
        Err(e) => Err(PreferenceStoreError::InvalidRecord(e.to_string())),
    }
}
