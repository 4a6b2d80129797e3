//! CLI entry point.
//!
//! Parses arguments, bootstraps the context and routes each command to
//! its handler.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use parlance_cli::handlers::speak::SpeakOptions;
use parlance_cli::{Cli, CliConfig, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads PARLANCE_* variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let config = CliConfig::from_cli(&cli)?;
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut ctx = bootstrap(config).await?;

    match command {
        Commands::Voices => handlers::voices::execute(&mut ctx).await?,
        Commands::Speak {
            text,
            voice,
            pitch,
            rate,
            save,
        } => {
            let options = SpeakOptions {
                voice,
                pitch,
                rate,
                save,
            };
            handlers::speak::execute(&mut ctx, text, options).await?;
        }
        Commands::Settings { command } => handlers::settings::execute(&mut ctx, command).await?,
    }

    Ok(())
}
