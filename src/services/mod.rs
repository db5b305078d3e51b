mod images;
mod search;
mod text_art;

pub use images::{HttpImageService, ImageService};
pub use search::{JikanClient, SearchResult, SearchService};
pub use text_art::{FigletRenderer, TextArt};
