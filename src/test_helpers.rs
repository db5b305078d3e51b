#![allow(dead_code)]
/// Test helpers for unit tests
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::chat::{Attachment, Channel, Preview, Sender};
use crate::commands::{CommandHandler, CommandParser};
use crate::services::{ImageService, SearchResult, SearchService, TextArt};
use crate::shows::ShowRegistry;

/// Something the handler sent to a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    Reply(String),
    Send(String),
    Preview(Preview),
    Attachment { caption: String, filename: String },
}

/// Channel that records everything sent to it
#[derive(Default)]
pub struct RecordingChannel {
    outgoing: Mutex<Vec<Outgoing>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outgoing(&self) -> Vec<Outgoing> {
        self.outgoing.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.outgoing.lock().unwrap().clear();
    }

    fn push(&self, message: Outgoing) {
        self.outgoing.lock().unwrap().push(message);
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    async fn reply(&self, text: &str) -> Result<()> {
        self.push(Outgoing::Reply(text.to_string()));
        Ok(())
    }

    async fn send(&self, text: &str) -> Result<()> {
        self.push(Outgoing::Send(text.to_string()));
        Ok(())
    }

    async fn send_preview(&self, preview: &Preview) -> Result<()> {
        self.push(Outgoing::Preview(preview.clone()));
        Ok(())
    }

    async fn send_attachment(&self, caption: &str, attachment: Attachment) -> Result<()> {
        self.push(Outgoing::Attachment {
            caption: caption.to_string(),
            filename: attachment.filename,
        });
        Ok(())
    }
}

/// Search service returning canned results
pub struct StubSearch {
    results: Vec<SearchResult>,
    queries: Mutex<Vec<String>>,
    latency: Duration,
}

impl StubSearch {
    pub fn new(results: Vec<SearchResult>) -> Arc<Self> {
        Self::delayed(results, Duration::ZERO)
    }

    /// Canned results that take `latency` to arrive
    pub fn delayed(results: Vec<SearchResult>, latency: Duration) -> Arc<Self> {
        Arc::new(StubSearch {
            results,
            queries: Mutex::new(Vec::new()),
            latency,
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::new(Vec::new())
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchService for StubSearch {
    async fn search(&self, url: &str) -> Result<Vec<SearchResult>> {
        self.queries.lock().unwrap().push(url.to_string());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.results.clone())
    }
}

/// Search service simulating a network failure
pub struct FailingSearch;

#[async_trait]
impl SearchService for FailingSearch {
    async fn search(&self, _url: &str) -> Result<Vec<SearchResult>> {
        Err(anyhow!("connection reset by peer"))
    }
}

/// Image service returning a fixed byte string
#[derive(Default)]
pub struct StubImages {
    fetched: Mutex<Vec<String>>,
    greeted: Mutex<Vec<String>>,
}

impl StubImages {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn greeted(&self) -> Vec<String> {
        self.greeted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageService for StubImages {
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        self.fetched.lock().unwrap().push(url.to_string());
        Ok(b"png".to_vec())
    }

    async fn greeting_image(&self, avatar_url: &str) -> Result<Vec<u8>> {
        self.greeted.lock().unwrap().push(avatar_url.to_string());
        Ok(b"png".to_vec())
    }
}

/// Image service whose downloads always fail
pub struct FailingImages;

#[async_trait]
impl ImageService for FailingImages {
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        Err(anyhow!("HTTP error 500 fetching {}", url))
    }

    async fn greeting_image(&self, avatar_url: &str) -> Result<Vec<u8>> {
        Err(anyhow!("HTTP error 500 fetching {}", avatar_url))
    }
}

/// Text art that just shouts the text back
pub struct ShoutArt;

impl TextArt for ShoutArt {
    fn render(&self, text: &str) -> Result<String> {
        Ok(text.to_uppercase())
    }
}

/// Text art that always fails
pub struct BrokenArt;

impl TextArt for BrokenArt {
    fn render(&self, _text: &str) -> Result<String> {
        Err(anyhow!("font missing"))
    }
}

/// Create a search result with predictable fields
pub fn search_result(title: &str, id: u64) -> SearchResult {
    SearchResult {
        title: title.to_string(),
        description: format!("About {}", title),
        url: format!("https://example.com/anime/{}", id),
        image_url: format!("https://example.com/{}.jpg", id),
        external_id: id,
    }
}

/// Create a test sender
pub fn create_test_sender() -> Sender {
    Sender {
        id: "123".to_string(),
        name: "Test_User".to_string(),
        avatar_url: "https://example.com/avatar.png".to_string(),
    }
}

/// Create a command handler with the "!" prefix and the given collaborators
pub fn create_test_handler<S, I>(search: Arc<S>, images: Arc<I>) -> CommandHandler
where
    S: SearchService + 'static,
    I: ImageService + 'static,
{
    let parser = CommandParser::new("!".to_string(), Arc::new(ShoutArt));
    CommandHandler::new(parser, Arc::new(ShowRegistry::new()), search, images)
}
