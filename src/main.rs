mod chat;
mod cli;
mod commands;
mod config;
mod services;
mod shows;
#[cfg(test)]
mod test_helpers;

use anyhow::Result;
use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use chat::{ConsoleChat, DiscordBot};
use cli::{Cli, Commands};
use commands::{CommandHandler, CommandParser};
use config::Config;
use services::{FigletRenderer, HttpImageService, JikanClient};
use shows::ShowRegistry;

/// The main entry point for the application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default subscriber");

    match &cli.command {
        Some(Commands::GenEnv { path }) => generate_env_file(path),
        None => start_bot(&cli).await,
    }
}

/// Load configuration, build the command handler and run the chosen front end
///
/// Any configuration failure is returned before a single message is read.
async fn start_bot(cli: &Cli) -> Result<()> {
    info!("Loading configuration");
    let config = Config::from_env(cli.env_file.as_deref())?;

    // Checked up front so a missing token fails before the assets load
    let token = if cli.online {
        Some(config.require_discord_token()?.to_string())
    } else {
        None
    };

    info!("Loading greeting template from {}", config.greeting_template.display());
    let images = Arc::new(HttpImageService::new(
        &config.greeting_template,
        config.http_timeout,
    )?);
    let search = Arc::new(JikanClient::new(config.http_timeout)?);
    let renderer = Arc::new(FigletRenderer::new()?);

    let parser = CommandParser::new(cli.prefix.clone(), renderer)
        .with_endpoints(&config.search_endpoint, &config.cat_endpoint);
    let shows = Arc::new(ShowRegistry::new());
    let handler = Arc::new(CommandHandler::new(parser, shows, search, images));

    match token {
        Some(token) => {
            info!("Starting rabbot on Discord with prefix '{}'", cli.prefix);
            DiscordBot::new(handler, config.greeting_channel.clone())
                .run(&token)
                .await
        }
        None => {
            info!("Starting rabbot offline with prefix '{}'", cli.prefix);
            ConsoleChat::new(handler).run().await
        }
    }
}

/// Generate a sample .env file
fn generate_env_file(path: &str) -> Result<()> {
    info!("Generating sample .env file at {}", path);

    let contents = r#"# Your Discord bot token (only needed with --online)
DISCORD_BOT_TOKEN=your_bot_token_here
# Optional: art the welcome card is drawn on
# GREETING_TEMPLATE=./media/tuturu.png
# Optional: text channel new members are greeted in
# GREETING_CHANNEL=general
# Optional: override the anime search and cat picture services
# SEARCH_ENDPOINT=https://api.jikan.moe/v4/anime
# CAT_ENDPOINT=https://cataas.com/cat
# Optional: timeout for outgoing HTTP requests, in seconds
# HTTP_TIMEOUT_SECS=10
"#;

    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;

    info!("Sample .env file generated successfully!");

    Ok(())
}
