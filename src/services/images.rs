//! Image fetching and greeting card compositing

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageOutputFormat, RgbaImage};
use reqwest::Client as HttpClient;
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Width and height the avatar and template art are scaled to fit in
const ART_SIZE: u32 = 150;
/// Greeting card dimensions
const CARD_WIDTH: u32 = 300;
const CARD_HEIGHT: u32 = 150;

/// Fetches pictures and builds greeting cards
#[async_trait]
pub trait ImageService: Send + Sync {
    /// Download the image at `url`, returning it as PNG bytes
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>>;

    /// Composite the avatar at `avatar_url` onto the greeting card, returning PNG bytes
    async fn greeting_image(&self, avatar_url: &str) -> Result<Vec<u8>>;
}

/// Image service backed by HTTP downloads and an in-memory greeting template
pub struct HttpImageService {
    http_client: HttpClient,
    template: RgbaImage,
}

impl HttpImageService {
    /// Create a new image service
    ///
    /// # Arguments
    /// * `template_path` - Path to the greeting card art
    /// * `timeout` - Per-request timeout for downloads
    ///
    /// # Returns
    /// The service, or an error if the template cannot be read or decoded
    pub fn new(template_path: &Path, timeout: Duration) -> Result<Self> {
        let art = image::open(template_path).with_context(|| {
            format!(
                "Failed to load greeting template {}",
                template_path.display()
            )
        })?;

        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(HttpImageService {
            http_client,
            template: prepare_template(&art),
        })
    }

    async fn download(&self, url: &str) -> Result<DynamicImage> {
        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error {} fetching {}", response.status(), url));
        }

        let bytes = response.bytes().await?;
        debug!("Downloaded {} bytes from {}", bytes.len(), url);

        image::load_from_memory(&bytes).with_context(|| format!("{} is not an image", url))
    }
}

#[async_trait]
impl ImageService for HttpImageService {
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        let picture = self.download(url).await?;
        encode_png(&picture)
    }

    async fn greeting_image(&self, avatar_url: &str) -> Result<Vec<u8>> {
        let avatar = self.download(avatar_url).await?;
        let card = compose_greeting(&self.template, &avatar);
        encode_png(&DynamicImage::ImageRgba8(card))
    }
}

/// Scale the template art to fit the art box and pin it to the right of a
/// transparent card, vertically centred
fn prepare_template(art: &DynamicImage) -> RgbaImage {
    let scaled = art.resize(ART_SIZE, ART_SIZE, FilterType::Triangle).to_rgba8();
    let mut card = RgbaImage::new(CARD_WIDTH, CARD_HEIGHT);

    let x = CARD_WIDTH.saturating_sub(scaled.width());
    let y = CARD_HEIGHT.saturating_sub(scaled.height()) / 2;
    imageops::overlay(&mut card, &scaled, x as i64, y as i64);

    card
}

/// Draw the avatar, scaled to fit the art box, in the top left corner of a copy of the template
fn compose_greeting(template: &RgbaImage, avatar: &DynamicImage) -> RgbaImage {
    let avatar = avatar.resize(ART_SIZE, ART_SIZE, FilterType::Triangle).to_rgba8();
    let mut card = template.clone();
    imageops::overlay(&mut card, &avatar, 0, 0);
    card
}

fn encode_png(picture: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    picture.write_to(&mut buffer, ImageOutputFormat::Png)?;
    Ok(buffer.into_inner())
}
