//! Chat front ends and the channel abstraction the command handler talks to

mod console;
mod discord;

use anyhow::Result;
use async_trait::async_trait;

pub use console::ConsoleChat;
pub use discord::DiscordBot;

/// The person who sent a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
}

/// A rich link preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub title: String,
    pub description: String,
    pub url: String,
    pub thumbnail: String,
}

/// A file attached to an outgoing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn png(name: &str, data: Vec<u8>) -> Self {
        Attachment {
            filename: format!("{}.png", name),
            data,
        }
    }
}

/// Where command output goes: the channel a message came from
#[async_trait]
pub trait Channel: Send + Sync {
    /// Reply directly to the message that triggered the command
    async fn reply(&self, text: &str) -> Result<()>;

    /// Post a plain message to the channel
    async fn send(&self, text: &str) -> Result<()>;

    /// Post a rich preview to the channel
    async fn send_preview(&self, preview: &Preview) -> Result<()>;

    /// Post a message with a file attached
    async fn send_attachment(&self, caption: &str, attachment: Attachment) -> Result<()>;
}
