//! Platform capability profile.

use std::time::Duration;

/// Delay between the catalog settling and the priming utterance.
pub const DEFAULT_PRIMING_DELAY: Duration = Duration::from_millis(100);

/// Capabilities and quirks of the platform hosting the speech engine.
///
/// Detection happens outside the core; the result is injected into the
/// service at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformProfile {
    /// Short platform name, used only for logging.
    pub name: String,

    /// Whether the engine needs a throwaway utterance before real speech
    /// plays. Some mobile browser engines stay silent until one has been
    /// issued.
    pub requires_priming: bool,

    /// How long to wait after the catalog settles before priming.
    pub priming_delay: Duration,
}

impl Default for PlatformProfile {
    fn default() -> Self {
        Self {
            name: "generic".to_string(),
            requires_priming: false,
            priming_delay: DEFAULT_PRIMING_DELAY,
        }
    }
}

impl PlatformProfile {
    /// Profile for engines that need the priming workaround.
    pub fn with_priming(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires_priming: true,
            ..Self::default()
        }
    }
}
