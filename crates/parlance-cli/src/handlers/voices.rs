//! Voices command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::handlers::load_user_settings;

/// Execute the voices command.
///
/// Lists the catalog voices with their indices and marks the user's
/// selected voice.
pub async fn execute(ctx: &mut CliContext) -> Result<()> {
    load_user_settings(ctx).await?;
    ctx.speak.set_speech_synthesis().await;
    ctx.drain_events();

    let voices = ctx.speak.voices();
    if voices.is_empty() {
        println!("No voices available.");
        return Ok(());
    }

    let selected = ctx.speak.preferences().selected_voice_index();

    println!("Found {} voice(s):\n", voices.len());
    println!("    {:<5} {:<20} {:<8} URI", "Index", "Name", "Lang");
    for voice in voices {
        let marker = if Some(voice.index) == selected { "*" } else { " " };
        println!(
            "{marker:<3} {:<5} {:<20} {:<8} {}",
            voice.index, voice.voice.name, voice.voice.lang, voice.voice.uri
        );
    }

    Ok(())
}
