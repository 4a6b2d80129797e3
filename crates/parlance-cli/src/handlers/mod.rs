//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Signature: `pub async fn execute(ctx: &mut CliContext, ...) -> Result<()>`
//! - Thin wrappers that parse CLI input, call the speak service, and
//!   format output for the terminal.

pub mod settings;
pub mod speak;
pub mod voices;

use anyhow::{Result, bail};
use parlance_core::PreferenceStoreError;
use parlance_voice::SpeechError;

use crate::bootstrap::CliContext;

/// The signed-in user, or an error telling how to sign in.
pub(crate) fn require_user(ctx: &CliContext) -> Result<String> {
    match &ctx.user {
        Some(user) => Ok(user.clone()),
        None => bail!("No user selected. Pass --user or set PARLANCE_USER."),
    }
}

/// Load the signed-in user's saved settings.
///
/// Returns `false` when nobody is signed in or the user has no record yet;
/// the service keeps its defaults in that case.
pub(crate) async fn load_user_settings(ctx: &mut CliContext) -> Result<bool> {
    match ctx.speak.init_user_settings().await {
        Ok(()) => Ok(true),
        Err(SpeechError::NotSignedIn) => Ok(false),
        Err(SpeechError::Store(PreferenceStoreError::NotFound { key, .. })) => {
            tracing::debug!(user = %key, "No saved settings");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}
