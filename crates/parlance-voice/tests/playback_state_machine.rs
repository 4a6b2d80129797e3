//! Integration tests for the `SpeakService` state machine.
//!
//! These tests drive the service through its transitions using a fake
//! engine and an in-memory document store. No audio hardware or network
//! access is required; the fakes answer instantly.
//!
//! # What is tested
//!
//! - Toggle-off when the same text is spoken twice
//! - Resume (not restart) when speaking while paused
//! - Voice defaulting after the catalog settles
//! - Platform-gated priming utterance
//! - Loading and saving preferences through the store
//! - Event channel emits `StateChanged` on transitions

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use parlance_core::{
    Document, EngineError, EngineStatus, PlatformProfile, PreferenceStore, PreferenceStoreError,
    SETTINGS_COLLECTION, SpeechEngine, StaticIdentity, StatusStream, UtteranceRequest, Voice,
};
use parlance_voice::{
    PlaybackState, SpeakEvent, SpeakOutcome, SpeakService, SpeakServiceConfig, SpeakServiceDeps,
    SpeechError,
};
use serde_json::json;
use tokio::sync::mpsc;

// ── Fakes ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum EngineCall {
    Start(UtteranceRequest),
    Pause,
    Resume,
    Cancel,
}

/// Engine that confirms every request on the active status stream.
#[derive(Default)]
struct FakeEngine {
    voices: Mutex<Vec<Voice>>,
    calls: Mutex<Vec<EngineCall>>,
    active: Mutex<Option<mpsc::UnboundedSender<EngineStatus>>>,
    refuse: bool,
}

impl FakeEngine {
    fn with_voices(voices: Vec<Voice>) -> Self {
        Self {
            voices: Mutex::new(voices),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    fn starts(&self) -> Vec<UtteranceRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                EngineCall::Start(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    fn report(&self, status: EngineStatus) {
        if let Some(tx) = self.active.lock().unwrap().as_ref() {
            let _ = tx.send(status);
        }
    }
}

impl SpeechEngine for FakeEngine {
    fn list_voices(&self) -> Vec<Voice> {
        self.voices.lock().unwrap().clone()
    }

    fn start_utterance(&self, request: &UtteranceRequest) -> Result<StatusStream, EngineError> {
        if self.refuse {
            return Err(EngineError::Unavailable("no speech support".to_string()));
        }
        self.calls
            .lock()
            .unwrap()
            .push(EngineCall::Start(request.clone()));

        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(EngineStatus::Started);
        *self.active.lock().unwrap() = Some(tx);
        Ok(rx)
    }

    fn pause_active(&self) {
        self.calls.lock().unwrap().push(EngineCall::Pause);
        self.report(EngineStatus::Paused);
    }

    fn resume_active(&self) {
        self.calls.lock().unwrap().push(EngineCall::Resume);
        self.report(EngineStatus::Playing);
    }

    fn cancel_active(&self) {
        self.calls.lock().unwrap().push(EngineCall::Cancel);
        if let Some(tx) = self.active.lock().unwrap().take() {
            let _ = tx.send(EngineStatus::Cancelled);
        }
    }
}

/// Document store backed by a map, recording every update.
#[derive(Default)]
struct MemoryStore {
    docs: Mutex<HashMap<(String, String), Document>>,
    updates: Mutex<Vec<Document>>,
}

impl MemoryStore {
    fn with_record(key: &str, value: serde_json::Value) -> Self {
        let store = Self::default();
        let serde_json::Value::Object(doc) = value else {
            panic!("record must be an object");
        };
        store
            .docs
            .lock()
            .unwrap()
            .insert((SETTINGS_COLLECTION.to_string(), key.to_string()), doc);
        store
    }

    fn record(&self, key: &str) -> Option<Document> {
        self.docs
            .lock()
            .unwrap()
            .get(&(SETTINGS_COLLECTION.to_string(), key.to_string()))
            .cloned()
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn get_document(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Document, PreferenceStoreError> {
        self.docs
            .lock()
            .unwrap()
            .get(&(collection.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| PreferenceStoreError::not_found(collection, key))
    }

    async fn update_document(
        &self,
        collection: &str,
        key: &str,
        fields: Document,
    ) -> Result<(), PreferenceStoreError> {
        let mut docs = self.docs.lock().unwrap();
        let doc = docs
            .get_mut(&(collection.to_string(), key.to_string()))
            .ok_or_else(|| PreferenceStoreError::not_found(collection, key))?;
        self.updates.lock().unwrap().push(fields.clone());
        doc.extend(fields);
        Ok(())
    }
}

// ── Helpers ────────────────────────────────────────────────────────

const USER: &str = "ada@example.com";

fn english_voices() -> Vec<Voice> {
    vec![Voice::new("A", "en-US"), Voice::new("B", "en-GB")]
}

fn service_with(
    engine: &Arc<FakeEngine>,
    store: &Arc<MemoryStore>,
    platform: PlatformProfile,
) -> (SpeakService, mpsc::UnboundedReceiver<SpeakEvent>) {
    let deps = SpeakServiceDeps {
        engine: Arc::clone(engine) as Arc<dyn SpeechEngine>,
        store: Arc::clone(store) as Arc<dyn PreferenceStore>,
        identity: Arc::new(StaticIdentity::new(USER)),
    };
    let config = SpeakServiceConfig {
        platform,
        ..SpeakServiceConfig::default()
    };
    SpeakService::new(deps, config)
}

fn service(engine: &Arc<FakeEngine>) -> (SpeakService, mpsc::UnboundedReceiver<SpeakEvent>) {
    service_with(
        engine,
        &Arc::new(MemoryStore::default()),
        PlatformProfile::default(),
    )
}

/// Drain all pending events from the event receiver and return them.
fn drain_events(rx: &mut mpsc::UnboundedReceiver<SpeakEvent>) -> Vec<SpeakEvent> {
    let mut events = Vec::new();
    while let Ok(e) = rx.try_recv() {
        events.push(e);
    }
    events
}

/// Collect only the PlaybackState values from StateChanged events.
fn states_from(events: &[SpeakEvent]) -> Vec<PlaybackState> {
    events
        .iter()
        .filter_map(|e| {
            if let SpeakEvent::StateChanged(s) = e {
                Some(*s)
            } else {
                None
            }
        })
        .collect()
}

// ── Playback ───────────────────────────────────────────────────────

#[test]
fn initial_state_is_idle() {
    let engine = Arc::new(FakeEngine::default());
    let (speak, _rx) = service(&engine);

    assert_eq!(speak.state(), PlaybackState::Idle);
    assert!(!speak.is_speaking());
    assert!(speak.speaking_text().is_none());
    assert!((speak.pitch() - 1.0).abs() < f64::EPSILON);
    assert!((speak.rate() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn speaking_same_text_twice_toggles_off() {
    let engine = Arc::new(FakeEngine::default());
    let (mut speak, mut rx) = service(&engine);

    assert_eq!(speak.speak("hello").unwrap(), SpeakOutcome::Started);
    speak.poll_status();
    assert!(speak.is_speaking());

    assert_eq!(speak.speak("hello").unwrap(), SpeakOutcome::Stopped);
    assert_eq!(speak.state(), PlaybackState::Idle);
    assert!(speak.speaking_text().is_none());
    assert_eq!(engine.starts().len(), 1);
    assert_eq!(engine.calls().last(), Some(&EngineCall::Cancel));

    let states = states_from(&drain_events(&mut rx));
    assert_eq!(states, vec![PlaybackState::Speaking, PlaybackState::Idle]);
}

#[test]
fn different_text_supersedes_with_cancel_between_starts() {
    let engine = Arc::new(FakeEngine::default());
    let (mut speak, _rx) = service(&engine);

    speak.speak("first").unwrap();
    assert_eq!(speak.speak("second").unwrap(), SpeakOutcome::Started);

    let calls = engine.calls();
    assert!(matches!(&calls[0], EngineCall::Start(r) if r.text == "first"));
    assert_eq!(calls[1], EngineCall::Cancel);
    assert!(matches!(&calls[2], EngineCall::Start(r) if r.text == "second"));
    assert_eq!(speak.speaking_text(), Some("second"));
}

#[test]
fn speak_while_paused_resumes_instead_of_starting() {
    let engine = Arc::new(FakeEngine::default());
    let (mut speak, _rx) = service(&engine);

    speak.speak("chapter one").unwrap();
    assert!(speak.pause());
    speak.poll_status();
    assert_eq!(speak.state(), PlaybackState::Paused);
    assert!(!speak.is_speaking());

    assert_eq!(speak.speak("chapter two").unwrap(), SpeakOutcome::Resumed);
    assert_eq!(engine.starts().len(), 1);
    assert_eq!(engine.calls().last(), Some(&EngineCall::Resume));

    speak.poll_status();
    assert!(speak.is_speaking());
    assert_eq!(speak.speaking_text(), Some("chapter one"));
}

#[test]
fn pause_when_idle_does_nothing() {
    let engine = Arc::new(FakeEngine::default());
    let (mut speak, _rx) = service(&engine);

    assert!(!speak.pause());
    assert!(engine.calls().is_empty());
}

#[test]
fn stop_goes_idle_from_paused() {
    let engine = Arc::new(FakeEngine::default());
    let (mut speak, _rx) = service(&engine);

    speak.speak("hello").unwrap();
    speak.pause();
    speak.poll_status();
    speak.stop_speak();

    assert_eq!(speak.state(), PlaybackState::Idle);
    assert!(speak.speaking_text().is_none());

    // A fresh speak after stop starts over instead of resuming.
    assert_eq!(speak.speak("hello").unwrap(), SpeakOutcome::Started);
}

#[test]
fn utterance_uses_cached_voice_pitch_and_rate() {
    let engine = Arc::new(FakeEngine::with_voices(english_voices()));
    let (mut speak, _rx) = service(&engine);

    tokio_test::block_on(speak.set_speech_synthesis());
    speak.select_voice(0).unwrap();
    speak.set_pitch(1.5).unwrap();
    speak.set_rate(0.8).unwrap();
    speak.speak("hello").unwrap();

    let request = engine.starts().pop().unwrap();
    assert_eq!(request.voice.map(|v| v.name), Some("A".to_string()));
    assert!((request.pitch - 1.5).abs() < f64::EPSILON);
    assert!((request.rate - 0.8).abs() < f64::EPSILON);
}

#[test]
fn selecting_unknown_voice_is_rejected() {
    let engine = Arc::new(FakeEngine::with_voices(english_voices()));
    let (mut speak, _rx) = service(&engine);

    tokio_test::block_on(speak.set_speech_synthesis());
    let err = speak.select_voice(5).unwrap_err();
    assert!(matches!(err, SpeechError::UnknownVoice(5)));
}

// ── Catalog & priming ──────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn catalog_defaults_to_last_voice() {
    let engine = Arc::new(FakeEngine::with_voices(english_voices()));
    let (mut speak, mut rx) = service(&engine);

    speak.set_speech_synthesis().await;

    let voice = speak.current_voice().unwrap();
    assert_eq!(voice.index, 1);
    assert_eq!(voice.name.as_deref(), Some("B"));
    assert_eq!(speak.voices().len(), 2);
    assert!(*speak.catalog_ready().borrow());
    assert!(
        drain_events(&mut rx).contains(&SpeakEvent::CatalogUpdated { count: 2 }),
        "expected CatalogUpdated event"
    );
}

#[tokio::test(start_paused = true)]
async fn catalog_keeps_loaded_voice() {
    let engine = Arc::new(FakeEngine::with_voices(english_voices()));
    let store = Arc::new(MemoryStore::with_record(
        USER,
        json!({ "pitch": 1.0, "rate": 1.0, "currentVoice": { "index": 0 } }),
    ));
    let (mut speak, _rx) = service_with(&engine, &store, PlatformProfile::default());

    speak.init_user_settings().await.unwrap();
    speak.set_speech_synthesis().await;

    assert_eq!(speak.current_voice().map(|v| v.index), Some(0));
}

#[tokio::test(start_paused = true)]
async fn empty_catalog_is_not_an_error() {
    let engine = Arc::new(FakeEngine::default());
    let (mut speak, _rx) = service(&engine);

    speak.set_speech_synthesis().await;

    assert!(speak.voices().is_empty());
    assert!(speak.current_voice().is_none());
    assert!(engine.starts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn priming_runs_once_on_platforms_that_need_it() {
    let engine = Arc::new(FakeEngine::with_voices(english_voices()));
    let store = Arc::new(MemoryStore::default());
    let (mut speak, _rx) = service_with(&engine, &store, PlatformProfile::with_priming("safari"));

    speak.set_speech_synthesis().await;
    engine.report(EngineStatus::Done);
    speak.wait_until_finished().await;
    assert_eq!(speak.state(), PlaybackState::Idle);

    speak.set_speech_synthesis().await;

    let starts = engine.starts();
    assert_eq!(starts.len(), 1);
    assert_eq!(starts[0].text, " ");
}

#[tokio::test(start_paused = true)]
async fn priming_waits_until_engine_is_free() {
    let engine = Arc::new(FakeEngine::with_voices(english_voices()));
    let store = Arc::new(MemoryStore::default());
    let (mut speak, _rx) = service_with(&engine, &store, PlatformProfile::with_priming("safari"));

    speak.speak("hello").unwrap();
    speak.poll_status();
    assert!(speak.is_speaking());

    speak.set_speech_synthesis().await;
    assert_eq!(engine.starts().len(), 1);
    assert_eq!(speak.speaking_text(), Some("hello"));

    engine.report(EngineStatus::Done);
    speak.wait_until_finished().await;
    speak.set_speech_synthesis().await;

    let starts = engine.starts();
    assert_eq!(starts.len(), 2);
    assert_eq!(starts[1].text, " ");
}

#[tokio::test(start_paused = true)]
async fn no_priming_on_other_platforms() {
    let engine = Arc::new(FakeEngine::with_voices(english_voices()));
    let (mut speak, _rx) = service(&engine);

    speak.set_speech_synthesis().await;
    assert!(engine.starts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn priming_failure_is_ignored() {
    let engine = Arc::new(FakeEngine {
        refuse: true,
        ..FakeEngine::with_voices(english_voices())
    });
    let store = Arc::new(MemoryStore::default());
    let (mut speak, _rx) = service_with(&engine, &store, PlatformProfile::with_priming("safari"));

    speak.set_speech_synthesis().await;

    assert_eq!(speak.state(), PlaybackState::Idle);
    assert_eq!(speak.current_voice().map(|v| v.index), Some(1));
}

// ── Preferences ────────────────────────────────────────────────────

#[tokio::test]
async fn init_without_user_fails() {
    let engine = Arc::new(FakeEngine::default());
    let deps = SpeakServiceDeps {
        engine: engine as Arc<dyn SpeechEngine>,
        store: Arc::new(MemoryStore::default()),
        identity: Arc::new(StaticIdentity::anonymous()),
    };
    let (mut speak, _rx) = SpeakService::new(deps, SpeakServiceConfig::default());

    let err = speak.init_user_settings().await.unwrap_err();
    assert!(matches!(err, SpeechError::NotSignedIn));
}

#[tokio::test]
async fn init_for_unknown_user_leaves_defaults() {
    let engine = Arc::new(FakeEngine::default());
    let (mut speak, _rx) = service(&engine);

    let err = speak.init_user_settings().await.unwrap_err();
    assert!(matches!(
        err,
        SpeechError::Store(PreferenceStoreError::NotFound { .. })
    ));
    assert!((speak.pitch() - 1.0).abs() < f64::EPSILON);
    assert!(speak.current_voice().is_none());
}

#[tokio::test]
async fn save_before_init_is_a_precondition_error() {
    let engine = Arc::new(FakeEngine::default());
    let store = Arc::new(MemoryStore::with_record(USER, json!({})));
    let (mut speak, _rx) = service_with(&engine, &store, PlatformProfile::default());

    let err = speak.save_user_settings().await.unwrap_err();
    assert!(matches!(err, SpeechError::NoRecordLoaded));
    assert!(store.updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn edits_are_saved_to_the_loaded_record() {
    let engine = Arc::new(FakeEngine::with_voices(english_voices()));
    let store = Arc::new(MemoryStore::with_record(
        USER,
        json!({ "pitch": 1.2, "rate": 0.9, "currentVoice": { "index": 3 }, "theme": "dark" }),
    ));
    let (mut speak, mut rx) = service_with(&engine, &store, PlatformProfile::default());

    speak.init_user_settings().await.unwrap();
    assert!((speak.pitch() - 1.2).abs() < f64::EPSILON);
    assert_eq!(speak.current_voice().map(|v| v.index), Some(3));

    speak.set_rate(1.4).unwrap();
    speak.save_user_settings().await.unwrap();

    let record = store.record(USER).unwrap();
    assert_eq!(record["rate"], json!(1.4));
    assert_eq!(record["pitch"], json!(1.2));
    assert_eq!(record["currentVoice"], json!({ "index": 3 }));
    assert_eq!(record["theme"], json!("dark"));

    let events = drain_events(&mut rx);
    assert!(events.contains(&SpeakEvent::PreferencesLoaded {
        user_id: USER.to_string()
    }));
    assert!(events.contains(&SpeakEvent::PreferencesSaved));
}

#[tokio::test]
async fn invalid_edits_never_reach_the_store() {
    let engine = Arc::new(FakeEngine::default());
    let store = Arc::new(MemoryStore::with_record(USER, json!({})));
    let (mut speak, _rx) = service_with(&engine, &store, PlatformProfile::default());

    speak.init_user_settings().await.unwrap();
    assert!(matches!(
        speak.set_pitch(9.0),
        Err(SpeechError::InvalidPreference(_))
    ));
    speak.save_user_settings().await.unwrap();

    let record = store.record(USER).unwrap();
    assert_eq!(record["pitch"], json!(1.0));
}
