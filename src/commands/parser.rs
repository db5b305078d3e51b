use std::sync::Arc;
use tracing::{debug, warn};

use crate::commands::Command;
use crate::services::TextArt;

/// Default anime search endpoint (Jikan v4)
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.jikan.moe/v4/anime";
/// Default cat picture endpoint
pub const DEFAULT_CAT_ENDPOINT: &str = "https://cataas.com/cat";

/// Turns raw chat text into a `Command`
pub struct CommandParser {
    prefix: String,
    search_endpoint: String,
    cat_endpoint: String,
    renderer: Arc<dyn TextArt>,
}

impl CommandParser {
    /// Create a new parser using the default endpoints
    ///
    /// # Arguments
    /// * `prefix` - The command prefix (e.g., "!")
    /// * `renderer` - Renders the text for `ascii`/`figlet`
    pub fn new(prefix: String, renderer: Arc<dyn TextArt>) -> Self {
        CommandParser {
            prefix,
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            cat_endpoint: DEFAULT_CAT_ENDPOINT.to_string(),
            renderer,
        }
    }

    /// Point the parser at different search and cat endpoints
    pub fn with_endpoints(mut self, search_endpoint: &str, cat_endpoint: &str) -> Self {
        self.search_endpoint = search_endpoint.trim_end_matches('/').to_string();
        self.cat_endpoint = cat_endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Decide which command a message corresponds to
    ///
    /// # Arguments
    /// * `content` - The raw message text
    /// * `sender_id` - Who sent the message
    /// * `bot_id` - The bot's own identity; its messages are always ignored
    ///
    /// # Returns
    /// The parsed command, or `Command::NotACommand`
    pub fn parse(&self, content: &str, sender_id: &str, bot_id: &str) -> Command {
        let Some(input) = content.strip_prefix(self.prefix.as_str()) else {
            return Command::NotACommand;
        };
        if sender_id == bot_id {
            return Command::NotACommand;
        }

        debug!("Command: {}", content);

        // Arguments are everything after the first space, kept verbatim
        let (name, args) = input.split_once(' ').unwrap_or((input, ""));

        match name {
            "watch" => Command::Watch {
                title: args.to_string(),
            },
            "list" => Command::List,
            "search" => {
                let query = format!(
                    "{}?q={}&page=1",
                    self.search_endpoint,
                    urlencoding::encode(args)
                );
                debug!("Search query: {}", query);
                Command::Search {
                    input: args.to_string(),
                    query,
                }
            }
            "cat" => {
                let url = if args.is_empty() {
                    self.cat_endpoint.clone()
                } else {
                    format!("{}/says/{}", self.cat_endpoint, urlencoding::encode(args))
                };
                Command::Cat { url }
            }
            "ascii" | "figlet" => Command::Ascii {
                text: self.render_block(args),
            },
            "join" => Command::Join,
            "ping" => Command::Ping,
            "gacha" => Command::Gacha,
            "help" => Command::Help,
            "about" => Command::About,
            _ => Command::NotACommand,
        }
    }

    /// Render text art wrapped in a code block so it stays monospace
    fn render_block(&self, text: &str) -> String {
        let art = match self.renderer.render(text) {
            Ok(art) => art.trim().to_string(),
            Err(e) => {
                warn!("Falling back to plain text for ascii art: {}", e);
                text.to_string()
            }
        };
        format!("```\n{}\n```", art)
    }
}
