//! Voice catalog types.

use serde::{Deserialize, Serialize};

/// A synthesis voice as reported by the platform engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    /// Human-readable display name.
    pub name: String,

    /// BCP 47 style language tag (e.g. `"en-US"`).
    pub lang: String,

    /// Engine-specific voice identifier.
    #[serde(default)]
    pub uri: String,

    /// Whether the engine marks this voice as its default.
    #[serde(default)]
    pub default: bool,
}

impl Voice {
    /// Convenience constructor for a voice with no engine URI.
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
            uri: String::new(),
            default: false,
        }
    }

    /// Check whether this voice belongs to a language family.
    ///
    /// Compares the primary subtag case-insensitively, so `"en"` matches
    /// `"en-US"`, `"en_GB"` and `"EN"` but not `"ven"`.
    #[must_use]
    pub fn matches_language(&self, family: &str) -> bool {
        let primary = self.lang.split(['-', '_']).next().unwrap_or_default();
        primary.eq_ignore_ascii_case(family)
    }

    /// Display label used by voice pickers: `"{name} ({lang})"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.lang)
    }
}

/// A voice paired with its position in the filtered catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedVoice {
    /// Position in the filtered catalog.
    pub index: usize,

    /// Display label, see [`Voice::label`].
    pub label: String,

    /// The underlying engine voice.
    #[serde(flatten)]
    pub voice: Voice,
}

impl IndexedVoice {
    /// Build the persisted selection that points at this entry.
    #[must_use]
    pub fn to_selection(&self) -> VoiceSelection {
        VoiceSelection {
            index: self.index,
            name: Some(self.voice.name.clone()),
            lang: Some(self.voice.lang.clone()),
            label: Some(self.label.clone()),
            extra: serde_json::Map::new(),
        }
    }
}

/// Index a filtered voice list in catalog order.
pub fn index_voices(voices: &[Voice]) -> Vec<IndexedVoice> {
    voices
        .iter()
        .enumerate()
        .map(|(index, voice)| IndexedVoice {
            index,
            label: voice.label(),
            voice: voice.clone(),
        })
        .collect()
}

/// The user's selected voice, as stored in the preference record.
///
/// Only `index` is authoritative. The descriptive fields are carried along
/// so a record stays readable after the catalog changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSelection {
    pub index: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Stored fields this type does not model (`voiceURI`, `localService`,
    /// ...). Written back unchanged.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl VoiceSelection {
    /// Selection that carries only a catalog index.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self {
            index,
            name: None,
            lang: None,
            label: None,
            extra: serde_json::Map::new(),
        }
    }
}
