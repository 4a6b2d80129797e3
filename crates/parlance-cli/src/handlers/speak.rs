//! Speak command handler.

use anyhow::{Result, bail};
use parlance_voice::SpeakOutcome;

use crate::bootstrap::CliContext;
use crate::handlers::{load_user_settings, require_user};

/// Per-invocation overrides for the speak command.
#[derive(Debug, Clone, Default)]
pub struct SpeakOptions {
    pub voice: Option<usize>,
    pub pitch: Option<f64>,
    pub rate: Option<f64>,
    /// Persist the overrides after speaking.
    pub save: bool,
}

/// Execute the speak command.
///
/// Loads the user's settings (defaults when signed out or unsaved),
/// applies the overrides, speaks the text and waits for it to finish.
///
/// # Errors
///
/// Returns an error if an override is out of range, the voice index is not
/// in the catalog, or `--save` is used without a saved record.
pub async fn execute(ctx: &mut CliContext, text: String, options: SpeakOptions) -> Result<()> {
    let loaded = load_user_settings(ctx).await?;
    if options.save && !loaded {
        let user = require_user(ctx)?;
        bail!("No saved settings for {user}. Run 'parlance settings init' first.");
    }

    ctx.speak.set_speech_synthesis().await;

    if let Some(index) = options.voice {
        ctx.speak.select_voice(index)?;
    }
    if let Some(pitch) = options.pitch {
        ctx.speak.set_pitch(pitch)?;
    }
    if let Some(rate) = options.rate {
        ctx.speak.set_rate(rate)?;
    }

    match ctx.speak.speak(text)? {
        SpeakOutcome::Started => ctx.speak.wait_until_finished().await,
        outcome => tracing::debug!(?outcome, "Nothing new to speak"),
    }
    ctx.drain_events();

    if options.save {
        ctx.speak.save_user_settings().await?;
        println!("✓ Preferences saved.");
    }

    Ok(())
}
