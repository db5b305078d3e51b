mod basic;
mod gacha;
mod handler;
mod parser;

pub use basic::{about_text, help_text};
pub use gacha::{GachaItem, GachaMachine};
pub use handler::CommandHandler;
pub use parser::{CommandParser, DEFAULT_CAT_ENDPOINT, DEFAULT_SEARCH_ENDPOINT};

/// A chat message classified into one of the commands the bot understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Record a show to watch
    Watch { title: String },
    /// List recorded shows
    List,
    /// Find a show
    Search {
        /// What the user typed after the command name
        input: String,
        /// The lookup URL derived from `input`
        query: String,
    },
    /// Show a picture of a cat with optional text
    Cat { url: String },
    /// Print some fancy ascii text, already rendered into a code block
    Ascii { text: String },
    /// Simulate joining the server for the first time
    Join,
    Ping,
    /// Crank the gacha machine
    Gacha,
    Help,
    About,
    /// Not a recognized command, or a message that must be ignored
    NotACommand,
}

impl Command {
    /// Short name of the command kind, used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Watch { .. } => "watch",
            Command::List => "list",
            Command::Search { .. } => "search",
            Command::Cat { .. } => "cat",
            Command::Ascii { .. } => "ascii",
            Command::Join => "join",
            Command::Ping => "ping",
            Command::Gacha => "gacha",
            Command::Help => "help",
            Command::About => "about",
            Command::NotACommand => "not-a-command",
        }
    }
}
