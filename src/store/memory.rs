//! In-memory registry store.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
#[cfg(test)]
use crate::error::BotError;

use super::{Registry, RegistryStore};

/// Registry held in memory, with a counter of completed saves.
///
/// Loads and saves yield to the runtime first, the way file I/O would, so
/// concurrent callers interleave between load and save.
#[derive(Debug, Default)]
pub struct MemoryStore {
    registry: RwLock<Registry>,
    saves: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry: RwLock::new(registry),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of `save` calls completed so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegistryStore for MemoryStore {
    async fn load(&self) -> Result<Registry> {
        tokio::task::yield_now().await;
        Ok(self.registry.read().await.clone())
    }

    async fn save(&self, registry: &Registry) -> Result<()> {
        tokio::task::yield_now().await;
        *self.registry.write().await = registry.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Store whose medium is never readable; counts attempted saves.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FailingStore {
    saves: AtomicUsize,
}

#[cfg(test)]
impl FailingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn unavailable() -> BotError {
        BotError::StorageUnavailable {
            path: std::path::PathBuf::from("db.json"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl RegistryStore for FailingStore {
    async fn load(&self) -> Result<Registry> {
        Err(Self::unavailable())
    }

    async fn save(&self, _registry: &Registry) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Err(Self::unavailable())
    }
}
