//! Durable chat → opted-in members registry.

mod formatter;
mod json_file;
mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    types::{ChatKey, Members},
};

pub use formatter::{EscapingFormatter, to_registry_json};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
#[cfg(test)]
pub(crate) use memory::FailingStore;

/// Full chat → members mapping, as persisted.
///
/// Serializes as `{ "<chatId>": [userId, ...] }`. Members are a set, so
/// duplicate ids in a stored list collapse on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry(BTreeMap<String, Members>);

impl Registry {
    /// Members of `chat`, empty if the chat has never been seen.
    #[must_use]
    pub fn members(&self, chat: &ChatKey) -> Members {
        self.0.get(chat.as_str()).cloned().unwrap_or_default()
    }

    /// Replace the member set of `chat`. An empty set keeps the chat key.
    pub fn set_members(&mut self, chat: &ChatKey, members: Members) {
        self.0.insert(chat.as_str().to_string(), members);
    }

    #[must_use]
    pub fn chat_count(&self) -> usize {
        self.0.len()
    }
}

/// Load/save capability over the whole registry.
///
/// Implementations never cache: every `load` reads the backing medium and
/// every `save` replaces its full content.
#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// Read the full registry.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the medium cannot be read or parsed.
    async fn load(&self) -> Result<Registry>;

    /// Replace the stored registry with `registry`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the medium cannot be written.
    async fn save(&self, registry: &Registry) -> Result<()>;

    /// Read the full registry together with the member set of one chat.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the medium cannot be read or parsed.
    async fn load_chat(&self, chat: &ChatKey) -> Result<(Registry, Members)> {
        let registry = self.load().await?;
        let members = registry.members(chat);
        Ok((registry, members))
    }
}
