use anyhow::{Context, Result, anyhow};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::commands::{DEFAULT_CAT_ENDPOINT, DEFAULT_SEARCH_ENDPOINT};

/// Configuration for the bot
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token, only needed when running online
    pub discord_token: Option<String>,
    /// Art the greeting card is built on
    pub greeting_template: PathBuf,
    /// Name of the guild channel new members are greeted in
    pub greeting_channel: String,
    /// Anime search endpoint
    pub search_endpoint: String,
    /// Cat picture endpoint
    pub cat_endpoint: String,
    /// Timeout for every outgoing HTTP request
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    /// * `env_file` - Optional .env file to read first; without it a `.env`
    ///   in the working directory is used if present
    ///
    /// # Returns
    /// A Result containing the Config if successful, or an error if a value is invalid
    pub fn from_env(env_file: Option<&Path>) -> Result<Self> {
        match env_file {
            Some(path) => {
                dotenv::from_path(path)
                    .with_context(|| format!("Failed to read env file {}", path.display()))?;
            }
            None => {
                dotenv::dotenv().ok();
            }
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_BOT_TOKEN").filter(|token| !token.trim().is_empty());

        let greeting_template = lookup("GREETING_TEMPLATE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./media/tuturu.png"));

        let greeting_channel =
            lookup("GREETING_CHANNEL").unwrap_or_else(|| "general".to_string());

        let search_endpoint =
            lookup("SEARCH_ENDPOINT").unwrap_or_else(|| DEFAULT_SEARCH_ENDPOINT.to_string());

        let cat_endpoint =
            lookup("CAT_ENDPOINT").unwrap_or_else(|| DEFAULT_CAT_ENDPOINT.to_string());

        let http_timeout = match lookup("HTTP_TIMEOUT_SECS") {
            Some(value) => {
                let secs: u64 = value.trim().parse().map_err(|_| {
                    anyhow!("HTTP_TIMEOUT_SECS must be a whole number of seconds, got {:?}", value)
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(10),
        };

        Ok(Config {
            discord_token,
            greeting_template,
            greeting_channel,
            search_endpoint,
            cat_endpoint,
            http_timeout,
        })
    }

    /// The Discord token, or an error if it was not configured
    pub fn require_discord_token(&self) -> Result<&str> {
        self.discord_token
            .as_deref()
            .ok_or_else(|| anyhow!("DISCORD_BOT_TOKEN environment variable not set"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.discord_token, None);
        assert_eq!(config.greeting_template, PathBuf::from("./media/tuturu.png"));
        assert_eq!(config.greeting_channel, "general");
        assert_eq!(config.search_endpoint, "https://api.jikan.moe/v4/anime");
        assert_eq!(config.cat_endpoint, "https://cataas.com/cat");
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert!(config.require_discord_token().is_err());
    }

    #[test]
    fn test_values_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("DISCORD_BOT_TOKEN", "secret"),
            ("GREETING_TEMPLATE", "/tmp/card.png"),
            ("GREETING_CHANNEL", "welcome"),
            ("SEARCH_ENDPOINT", "http://localhost/anime"),
            ("CAT_ENDPOINT", "http://localhost/cat"),
            ("HTTP_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.require_discord_token().unwrap(), "secret");
        assert_eq!(config.greeting_template, PathBuf::from("/tmp/card.png"));
        assert_eq!(config.greeting_channel, "welcome");
        assert_eq!(config.search_endpoint, "http://localhost/anime");
        assert_eq!(config.cat_endpoint, "http://localhost/cat");
        assert_eq!(config.http_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_blank_token_counts_as_missing() {
        let config = Config::from_lookup(lookup_from(&[("DISCORD_BOT_TOKEN", "  ")])).unwrap();
        assert!(config.require_discord_token().is_err());
    }

    #[test]
    fn test_invalid_timeout_is_an_error() {
        let result = Config::from_lookup(lookup_from(&[("HTTP_TIMEOUT_SECS", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_env_file_is_read() {
        // Only sets a variable the rest of the suite never reads
        let mut env_file = NamedTempFile::new().unwrap();
        writeln!(env_file, "GREETING_CHANNEL=from-env-file").unwrap();

        let config = Config::from_env(Some(env_file.path())).unwrap();
        assert_eq!(config.greeting_channel, "from-env-file");
    }

    #[test]
    fn test_missing_env_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::from_env(Some(&dir.path().join("missing.env"))).is_err());
    }
}
