use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Telegram error: {0}")]
    Telegram(Box<teloxide::RequestError>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Storage unavailable at {}: {source}", .path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage at {} is not a valid registry: {source}", .path.display())]
    StorageFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Page size must be greater than zero")]
    InvalidPageSize,
}

impl From<teloxide::RequestError> for BotError {
    fn from(err: teloxide::RequestError) -> Self {
        BotError::Telegram(Box::new(err))
    }
}

impl BotError {
    /// Returns true for failures of the durable registry.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            BotError::StorageUnavailable { .. } | BotError::StorageFormat { .. }
        )
    }

    /// Returns a user-friendly error message suitable for displaying in a chat
    pub fn user_message(&self) -> String {
        match self {
            BotError::Telegram(_) => {
                "Sorry, I'm having trouble talking to Telegram right now. Please try again later.".to_string()
            }
            BotError::Config(_) | BotError::EnvVar(_) => {
                "Sorry, there's a configuration issue on my end. Please contact the bot administrator.".to_string()
            }
            BotError::StorageUnavailable { .. } | BotError::StorageFormat { .. } => {
                "Sorry, I can't reach the member list right now. Please try again later.".to_string()
            }
            BotError::InvalidPageSize => {
                "Sorry, I couldn't split the member list into messages.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
