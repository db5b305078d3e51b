use anyhow::{Result, anyhow};
use figlet_rs::FIGfont;

/// Renders text as monospace ascii art
pub trait TextArt: Send + Sync {
    fn render(&self, text: &str) -> Result<String>;
}

/// FIGlet renderer using the bundled standard font
pub struct FigletRenderer {
    font: FIGfont,
}

impl FigletRenderer {
    /// Load the standard FIGlet font
    ///
    /// # Returns
    /// A renderer, or an error if the bundled font cannot be parsed
    pub fn new() -> Result<Self> {
        let font = FIGfont::standard()
            .map_err(|e| anyhow!("Failed to load standard FIGlet font: {}", e))?;
        Ok(FigletRenderer { font })
    }
}

impl TextArt for FigletRenderer {
    fn render(&self, text: &str) -> Result<String> {
        let figure = self
            .font
            .convert(text)
            .ok_or_else(|| anyhow!("FIGlet could not render {:?}", text))?;
        Ok(figure.to_string().trim_end().to_string())
    }
}
