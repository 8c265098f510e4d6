//! Opt-in/opt-out operations over the registry store.

use std::sync::Arc;

use log::{debug, info};
use tokio::sync::Mutex;

use crate::{
    error::Result,
    store::RegistryStore,
    types::{ChatKey, MemberId, Members},
};

/// Outcome of a membership operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipStatus {
    Added,
    AlreadyMember,
    Removed,
    NotMember,
}

impl MembershipStatus {
    /// Status text with a single `{}` placeholder for the user's mention.
    #[must_use]
    pub fn template(self) -> &'static str {
        match self {
            MembershipStatus::Added => "{} was added to the mention list",
            MembershipStatus::AlreadyMember => "{} is already on the mention list",
            MembershipStatus::Removed => "{} was removed from the mention list",
            MembershipStatus::NotMember => "{} is not on the mention list",
        }
    }

    /// Fill the template with `mention`.
    #[must_use]
    pub fn render(self, mention: &str) -> String {
        self.template().replacen("{}", mention, 1)
    }
}

/// Membership operations on top of a [`RegistryStore`].
///
/// Every save rewrites the whole registry, so mutations of any two chats
/// conflict. They are serialized behind one lock.
pub struct MembershipService {
    store: Arc<dyn RegistryStore>,
    write_lock: Mutex<()>,
}

impl MembershipService {
    pub fn new(store: Arc<dyn RegistryStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Add `member` to `chat`. Saves only when the member was absent.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the registry cannot be read or written.
    pub async fn opt_in(&self, chat: &ChatKey, member: MemberId) -> Result<MembershipStatus> {
        let _guard = self.write_lock.lock().await;
        let (mut registry, mut members) = self.store.load_chat(chat).await?;

        if !members.insert(member) {
            debug!("User {member} already opted in to chat {chat}");
            return Ok(MembershipStatus::AlreadyMember);
        }

        registry.set_members(chat, members);
        self.store.save(&registry).await?;
        info!("User {member} opted in to chat {chat}");
        Ok(MembershipStatus::Added)
    }

    /// Remove `member` from `chat`. Saves only when the member was present.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the registry cannot be read or written.
    pub async fn opt_out(&self, chat: &ChatKey, member: MemberId) -> Result<MembershipStatus> {
        let _guard = self.write_lock.lock().await;
        let (mut registry, mut members) = self.store.load_chat(chat).await?;

        if !members.remove(&member) {
            debug!("User {member} is not opted in to chat {chat}");
            return Ok(MembershipStatus::NotMember);
        }

        registry.set_members(chat, members);
        self.store.save(&registry).await?;
        info!("User {member} opted out of chat {chat}");
        Ok(MembershipStatus::Removed)
    }

    /// Current members of `chat`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the registry cannot be read.
    pub async fn members(&self, chat: &ChatKey) -> Result<Members> {
        let (_, members) = self.store.load_chat(chat).await?;
        Ok(members)
    }
}
