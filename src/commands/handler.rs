use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::chat::{Attachment, Channel, Preview, Sender};
use crate::commands::{Command, CommandParser, GachaMachine, about_text, help_text};
use crate::services::{ImageService, SearchResult, SearchService};
use crate::shows::ShowRegistry;

/// Most search results shown for one `!search`
const MAX_SEARCH_RESULTS: usize = 3;
/// Longest preview description, in characters
const MAX_DESCRIPTION_CHARS: usize = 350;

/// Handler for processing incoming chat messages and executing commands
pub struct CommandHandler {
    parser: CommandParser,
    shows: Arc<ShowRegistry>,
    gacha: GachaMachine,
    search: Arc<dyn SearchService>,
    images: Arc<dyn ImageService>,
}

impl CommandHandler {
    /// Create a new command handler
    ///
    /// # Arguments
    /// * `parser` - Classifies incoming messages
    /// * `shows` - The shared show registry
    /// * `search` - Anime search backend
    /// * `images` - Picture downloads and greeting cards
    ///
    /// # Returns
    /// A new CommandHandler instance with the default gacha catalog
    pub fn new(
        parser: CommandParser,
        shows: Arc<ShowRegistry>,
        search: Arc<dyn SearchService>,
        images: Arc<dyn ImageService>,
    ) -> Self {
        CommandHandler {
            parser,
            shows,
            gacha: GachaMachine::new(),
            search,
            images,
        }
    }

    /// Replace the gacha machine
    pub fn with_gacha(mut self, gacha: GachaMachine) -> Self {
        self.gacha = gacha;
        self
    }

    /// Process an incoming chat message
    ///
    /// # Arguments
    /// * `content` - The message text
    /// * `sender` - Who sent it
    /// * `bot_id` - The bot's own identity
    /// * `channel` - Where replies go
    pub async fn handle_message(
        &self,
        content: &str,
        sender: &Sender,
        bot_id: &str,
        channel: &dyn Channel,
    ) {
        let command = self.parser.parse(content, &sender.id, bot_id);
        self.dispatch(&command, sender, channel).await;
    }

    /// Run a parsed command
    ///
    /// Failures are logged and swallowed so one bad command never stops the
    /// message loop.
    pub async fn dispatch(&self, command: &Command, sender: &Sender, channel: &dyn Channel) {
        if *command == Command::NotACommand {
            return;
        }

        info!("Executing command: {} from {}", command.kind(), sender.name);
        if let Err(e) = self.execute(command, sender, channel).await {
            error!("Command {} failed for {}: {:#}", command.kind(), sender.name, e);
        }
    }

    /// Send the greeting card for a user, as done when someone joins the server
    ///
    /// # Arguments
    /// * `user` - The user to greet
    /// * `channel` - Where the greeting goes
    pub async fn greet(&self, user: &Sender, channel: &dyn Channel) -> Result<()> {
        let card = self.images.greeting_image(&user.avatar_url).await?;
        channel
            .send_attachment(
                &format!("Tuturu, {}!", user.name),
                Attachment::png("hello", card),
            )
            .await
    }

    async fn execute(&self, command: &Command, sender: &Sender, channel: &dyn Channel) -> Result<()> {
        match command {
            Command::Watch { title } => {
                self.shows.add(title).await;
                channel
                    .reply(&format!("OK! You want to watch {}~", title))
                    .await
            }
            Command::List => {
                channel.reply("Here's what I know~").await?;
                let shows = self.shows.list().await;
                channel.send(&shows.join("\n")).await
            }
            Command::Search { input, query } => self.search(input, query, channel).await,
            Command::Cat { url } => {
                let picture = self.images.fetch_image(url).await?;
                channel
                    .send_attachment("Meow~", Attachment::png("cat", picture))
                    .await
            }
            Command::Ascii { text } => channel.send(text).await,
            Command::Join => self.greet(sender, channel).await,
            Command::Ping => channel.send("Pong!").await,
            Command::Gacha => {
                let ball = self.gacha.crank()?;

                channel.send("Crank~ Pon!").await?;
                channel
                    .send(&format!("{}'s gacha ball contained:", sender.name))
                    .await?;
                channel.send(&format!("{} gold pieces", ball.gold)).await?;
                channel.send(&format!("{} XP", ball.xp)).await?;
                for item in &ball.items {
                    debug!("Drew {}", item);
                    channel.send(item.title).await?;
                }
                Ok(())
            }
            Command::Help => channel.send(&help_text(self.parser.prefix())).await,
            Command::About => channel.send(about_text()).await,
            Command::NotACommand => Ok(()),
        }
    }

    async fn search(&self, input: &str, query: &str, channel: &dyn Channel) -> Result<()> {
        debug!("Search for {}", input);
        let results = self.search.search(query).await?;

        let results: Vec<SearchResult> = results.into_iter().take(MAX_SEARCH_RESULTS).collect();
        for result in &results {
            debug!("Found: {} ({})", result.title, result.external_id);
        }

        if results.is_empty() {
            return channel.send("I couldn't find anything~").await;
        }

        channel.send("I found this~").await?;
        for result in results {
            channel.send_preview(&preview_for(result)).await?;
        }
        Ok(())
    }
}

fn preview_for(result: SearchResult) -> Preview {
    Preview {
        title: result.title,
        description: truncate(&result.description, MAX_DESCRIPTION_CHARS),
        url: result.url,
        thumbnail: result.image_url,
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", text[..end].trim_end()),
        None => text.to_string(),
    }
}
