//! Offline mode: commands typed on stdin, output printed to the terminal

use anyhow::Result;
use async_trait::async_trait;
use colored::Colorize;
use image::DynamicImage;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::chat::{Attachment, Channel, Preview, Sender};
use crate::commands::CommandHandler;

/// Width, in terminal cells, of pictures drawn by the console
const PICTURE_WIDTH: u32 = 60;

/// Identity the bot uses when running offline
pub const OFFLINE_BOT_ID: &str = "rabbot";

/// The user typing at the console
pub fn offline_user() -> Sender {
    Sender {
        id: "offline-user".to_string(),
        name: "OFFLINE-USER".to_string(),
        avatar_url: "https://cataas.com/cat".to_string(),
    }
}

/// Line-oriented console front end
pub struct ConsoleChat {
    handler: Arc<CommandHandler>,
    user: Sender,
}

impl ConsoleChat {
    pub fn new(handler: Arc<CommandHandler>) -> Self {
        ConsoleChat {
            handler,
            user: offline_user(),
        }
    }

    /// Read commands from stdin until EOF or Ctrl+C
    pub async fn run(&self) -> Result<()> {
        info!("Running offline. Type commands, Ctrl+D or Ctrl+C to quit.");
        let stdin = BufReader::new(tokio::io::stdin());

        tokio::select! {
            result = self.run_with(stdin, &ConsolePrinter) => result,
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down...");
                Ok(())
            }
        }
    }

    /// Handle every line from `reader`, sending output to `channel`
    pub async fn run_with<R>(&self, reader: R, channel: &dyn Channel) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            self.handler
                .handle_message(&line, &self.user, OFFLINE_BOT_ID, channel)
                .await;
        }
        Ok(())
    }
}

/// Channel that prints to stdout
pub struct ConsolePrinter;

#[async_trait]
impl Channel for ConsolePrinter {
    async fn reply(&self, text: &str) -> Result<()> {
        println!("{} {}", "rabbot (reply)>".cyan().bold(), text);
        Ok(())
    }

    async fn send(&self, text: &str) -> Result<()> {
        println!("{} {}", "rabbot>".cyan().bold(), text);
        Ok(())
    }

    async fn send_preview(&self, preview: &Preview) -> Result<()> {
        println!("{} {}", "rabbot>".cyan().bold(), preview.title.bold());
        if !preview.description.is_empty() {
            println!("    {}", preview.description);
        }
        println!("    {}", preview.url.underline());
        Ok(())
    }

    async fn send_attachment(&self, caption: &str, attachment: Attachment) -> Result<()> {
        println!("{} {}", "rabbot>".cyan().bold(), caption);

        if let Some(picture) = terminal_picture(&attachment.data) {
            let config = viuer::Config {
                width: Some(PICTURE_WIDTH),
                absolute_offset: false,
                ..Default::default()
            };
            match viuer::print(&picture, &config) {
                Ok(_) => return Ok(()),
                Err(e) => warn!("Could not draw {}: {}", attachment.filename, e),
            }
        }

        println!(
            "    {}",
            format!(
                "[attachment {} ({} bytes)]",
                attachment.filename,
                attachment.data.len()
            )
            .yellow()
        );
        Ok(())
    }
}

/// Decode attachment bytes into something the terminal can draw
fn terminal_picture(data: &[u8]) -> Option<DynamicImage> {
    image::load_from_memory(data).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{
        Outgoing, RecordingChannel, StubImages, StubSearch, create_test_handler,
    };

    #[tokio::test]
    async fn test_console_handles_each_line() -> Result<()> {
        let handler = Arc::new(create_test_handler(StubSearch::empty(), StubImages::new()));
        let console = ConsoleChat::new(handler);
        let channel = RecordingChannel::new();

        let input: &[u8] = b"hello there\n!watch Foo\n!watch Foo\n!list\n!frobnicate\n";
        console.run_with(input, &channel).await?;

        assert_eq!(
            channel.outgoing(),
            vec![
                Outgoing::Reply("OK! You want to watch Foo~".to_string()),
                Outgoing::Reply("OK! You want to watch Foo~".to_string()),
                Outgoing::Reply("Here's what I know~".to_string()),
                Outgoing::Send("Foo".to_string()),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_console_greets_offline_user() -> Result<()> {
        let images = StubImages::new();
        let handler = Arc::new(create_test_handler(StubSearch::empty(), images.clone()));
        let console = ConsoleChat::new(handler);
        let channel = RecordingChannel::new();

        console.run_with(&b"!join"[..], &channel).await?;

        assert_eq!(
            channel.outgoing(),
            vec![Outgoing::Attachment {
                caption: "Tuturu, OFFLINE-USER!".to_string(),
                filename: "hello.png".to_string(),
            }]
        );
        assert_eq!(images.greeted(), vec!["https://cataas.com/cat".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_printer_accepts_everything() -> Result<()> {
        let printer = ConsolePrinter;
        printer.reply("hi").await?;
        printer.send("").await?;
        printer
            .send_preview(&Preview {
                title: "Title".to_string(),
                description: String::new(),
                url: "https://example.com".to_string(),
                thumbnail: String::new(),
            })
            .await?;
        printer
            .send_attachment("Meow~", Attachment::png("cat", vec![1, 2, 3]))
            .await
    }

    #[test]
    fn test_terminal_picture_decodes_png_only() {
        let mut png = Vec::new();
        DynamicImage::new_rgba8(4, 2)
            .write_to(
                &mut std::io::Cursor::new(&mut png),
                image::ImageOutputFormat::Png,
            )
            .unwrap();

        let picture = terminal_picture(&png).expect("png should decode");
        assert_eq!(picture.to_rgba8().dimensions(), (4, 2));
        assert!(terminal_picture(b"not an image").is_none());
    }
}
