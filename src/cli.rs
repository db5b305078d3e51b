use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// A Discord command bot that tracks shows, finds anime and hands out gacha balls
#[derive(Parser, Debug)]
#[command(name = "rabbot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A Discord command bot", long_about = None)]
pub struct Cli {
    /// Read configuration from this .env file instead of ./.env
    #[arg(short, long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Enable debug mode
    #[arg(short, long)]
    pub debug: bool,

    /// Connect to Discord instead of reading commands from the console
    #[arg(long)]
    pub online: bool,

    /// The command prefix for the bot
    #[arg(short, long, default_value = "!")]
    pub prefix: String,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a sample .env file
    GenEnv {
        /// Path to output the sample .env file
        #[arg(default_value = ".env.example")]
        path: String,
    },
}
