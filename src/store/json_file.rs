//! Registry persisted as a single JSON file.

use std::{
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use log::{debug, info};
use tokio::fs;

use crate::error::{BotError, Result};

use super::{Registry, RegistryStore, formatter::to_registry_json};

/// Registry stored as one JSON document on disk.
///
/// Saves write a sibling `.tmp` file and rename it over the target, so a
/// concurrent `load` sees either the previous or the new document, never a
/// truncated one. A missing file loads as an empty registry and is created by
/// the first save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn unavailable(&self, source: std::io::Error) -> BotError {
        BotError::StorageUnavailable {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl RegistryStore for JsonFileStore {
    async fn load(&self) -> Result<Registry> {
        let contents = match fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(
                    "Registry file {} does not exist yet, starting empty",
                    self.path.display()
                );
                return Ok(Registry::default());
            }
            Err(e) => return Err(self.unavailable(e)),
        };

        serde_json::from_slice(&contents).map_err(|source| BotError::StorageFormat {
            path: self.path.clone(),
            source,
        })
    }

    async fn save(&self, registry: &Registry) -> Result<()> {
        let json = to_registry_json(registry).map_err(|source| BotError::StorageFormat {
            path: self.path.clone(),
            source,
        })?;

        let temp_path = self.temp_path();
        fs::write(&temp_path, &json)
            .await
            .map_err(|e| self.unavailable(e))?;
        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.unavailable(e))?;

        info!(
            "Saved registry with {} chats to {}",
            registry.chat_count(),
            self.path.display()
        );
        Ok(())
    }
}
