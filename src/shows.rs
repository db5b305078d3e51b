use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::debug;

/// Shows people in chat want to watch
///
/// Lives for as long as the bot process; nothing is written to disk.
#[derive(Default)]
pub struct ShowRegistry {
    shows: RwLock<HashSet<String>>,
}

impl ShowRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        ShowRegistry {
            shows: RwLock::new(HashSet::new()),
        }
    }

    /// Record a show
    ///
    /// # Arguments
    /// * `title` - The show title, stored exactly as given
    ///
    /// # Returns
    /// true if the title was new, false if it was already recorded
    pub async fn add(&self, title: &str) -> bool {
        let added = self.shows.write().await.insert(title.to_string());
        debug!("Show {:?} recorded (new: {})", title, added);
        added
    }

    /// Snapshot of every recorded show, sorted for stable output
    pub async fn list(&self) -> Vec<String> {
        let mut shows: Vec<String> = self.shows.read().await.iter().cloned().collect();
        shows.sort();
        shows
    }
}
