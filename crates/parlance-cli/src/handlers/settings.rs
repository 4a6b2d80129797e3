//! Settings command handler.
//!
//! Shows, seeds and edits the signed-in user's preference record.

use anyhow::{Result, anyhow, bail};
use parlance_core::{PreferenceStore, SETTINGS_COLLECTION, UserPreferences};

use crate::bootstrap::CliContext;
use crate::commands::SettingsCommand;
use crate::handlers::{load_user_settings, require_user};

/// Execute the settings command.
pub async fn execute(ctx: &mut CliContext, command: SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::Show => handle_show(ctx).await,
        SettingsCommand::Init { force } => handle_init(ctx, force).await,
        SettingsCommand::Set { pitch, rate, voice } => handle_set(ctx, pitch, rate, voice).await,
    }
}

async fn handle_show(ctx: &mut CliContext) -> Result<()> {
    let user = require_user(ctx)?;
    if !load_user_settings(ctx).await? {
        println!("No settings saved for {user}.");
        println!("Use 'parlance settings init' to create them.");
        return Ok(());
    }

    let prefs = ctx.speak.preferences();
    println!("Settings for {user}:");
    println!("  Pitch: {}", prefs.pitch);
    println!("  Rate:  {}", prefs.rate);
    match &prefs.current_voice {
        Some(voice) => println!(
            "  Voice: {} (index {})",
            voice.label.as_deref().unwrap_or("unnamed"),
            voice.index
        ),
        None => println!("  Voice: (not set)"),
    }

    Ok(())
}

/// Seed a record with default values and the catalog's default voice.
async fn handle_init(ctx: &mut CliContext, force: bool) -> Result<()> {
    let user = require_user(ctx)?;

    let exists = ctx
        .store
        .get_document(SETTINGS_COLLECTION, &user)
        .await
        .is_ok();
    if exists && !force {
        println!("Settings for {user} already exist. Use --force to reset them.");
        return Ok(());
    }

    let defaults = match serde_json::to_value(UserPreferences::default())? {
        serde_json::Value::Object(doc) => doc,
        _ => return Err(anyhow!("Preferences did not serialize to an object")),
    };
    ctx.store
        .put_document(SETTINGS_COLLECTION, &user, &defaults)
        .await?;

    // Persist the default voice the catalog picks
    ctx.speak.init_user_settings().await?;
    ctx.speak.set_speech_synthesis().await;
    ctx.speak.save_user_settings().await?;
    ctx.drain_events();

    println!("✓ Settings initialized for {user}.");
    Ok(())
}

async fn handle_set(
    ctx: &mut CliContext,
    pitch: Option<f64>,
    rate: Option<f64>,
    voice: Option<usize>,
) -> Result<()> {
    if pitch.is_none() && rate.is_none() && voice.is_none() {
        println!("No settings specified. Use --pitch, --rate or --voice.");
        return Ok(());
    }

    let user = require_user(ctx)?;
    if !load_user_settings(ctx).await? {
        bail!("No settings saved for {user}. Run 'parlance settings init' first.");
    }

    if let Some(index) = voice {
        ctx.speak.set_speech_synthesis().await;
        ctx.speak.select_voice(index)?;
    }
    if let Some(pitch) = pitch {
        ctx.speak.set_pitch(pitch)?;
    }
    if let Some(rate) = rate {
        ctx.speak.set_rate(rate)?;
    }

    ctx.speak.save_user_settings().await?;
    ctx.drain_events();

    println!("✓ Settings updated.");
    Ok(())
}
