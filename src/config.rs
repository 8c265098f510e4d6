use std::env;
use std::path::PathBuf;

use log::{debug, error, info};

use crate::error::{BotError, Result};

/// Registry file used when `DB_PATH` is not set.
pub const DEFAULT_DB_PATH: &str = "db.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub db_path: PathBuf,
}

impl Config {
    /// Load configuration from the environment (and a `.env` file, if any).
    ///
    /// # Errors
    ///
    /// Returns an error if `BOT_TOKEN` is missing or blank.
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        let bot_token = env::var("BOT_TOKEN").map_err(|e| {
            error!("Failed to load BOT_TOKEN from environment: {}", e);
            e
        })?;

        let db_path = env::var("DB_PATH").ok();

        let config = Self::from_values(bot_token, db_path)?;

        info!("Configuration loaded successfully");
        debug!("Bot token length: {} characters", config.bot_token.len());
        debug!("Registry path: {}", config.db_path.display());

        Ok(config)
    }

    fn from_values(bot_token: String, db_path: Option<String>) -> Result<Self> {
        let bot_token = bot_token.trim().to_string();
        if bot_token.is_empty() {
            error!("BOT_TOKEN is set but empty");
            return Err(BotError::Config("BOT_TOKEN must not be empty".to_string()));
        }

        let db_path = db_path
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DB_PATH), PathBuf::from);

        Ok(Self { bot_token, db_path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_token_is_rejected() {
        let err = Config::from_values("   ".to_string(), None).unwrap_err();
        assert!(matches!(err, BotError::Config(_)));
    }

    #[test]
    fn db_path_defaults_when_unset_or_blank() {
        let config = Config::from_values("123:abc".to_string(), None).unwrap();
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));

        let config = Config::from_values("123:abc".to_string(), Some(" ".to_string())).unwrap();
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
    }

    #[test]
    fn token_and_path_are_trimmed() {
        let config =
            Config::from_values(" 123:abc\n".to_string(), Some("/data/db.json".to_string()))
                .unwrap();
        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.db_path, PathBuf::from("/data/db.json"));
    }
}
