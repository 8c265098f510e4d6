//! Paginated "mention everyone" broadcast.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use log::{debug, info};

use crate::{
    error::Result,
    membership::MembershipService,
    mention::MentionRenderer,
    pagination::paginate,
    types::ChatKey,
};

/// Mentions per message.
pub const PAGE_SIZE: usize = 4;

/// Pause between two page messages.
pub const PAGE_DELAY: Duration = Duration::from_millis(300);

pub const PAGE_SEPARATOR: &str = " | ";

pub const NOBODY_TEXT: &str = "Nobody is on the mention list yet, there is no one to mention";

pub const DONE_TEXT: &str = "All members have been mentioned";

/// Outbound side of a chat.
#[async_trait]
pub trait ChatSink: Send + Sync {
    /// Send `text` (Telegram HTML) to the chat, optionally without a
    /// notification sound.
    async fn send(&self, text: String, silent: bool) -> Result<()>;
}

/// What a finished broadcast did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastReport {
    /// Nobody was opted in; only the notice was sent.
    Empty,
    Mentioned { members: usize, pages: usize },
}

pub struct Broadcaster {
    membership: Arc<MembershipService>,
    renderer: Arc<dyn MentionRenderer>,
    page_size: usize,
    page_delay: Duration,
}

impl Broadcaster {
    pub fn new(membership: Arc<MembershipService>, renderer: Arc<dyn MentionRenderer>) -> Self {
        Self {
            membership,
            renderer,
            page_size: PAGE_SIZE,
            page_delay: PAGE_DELAY,
        }
    }

    #[must_use]
    pub fn with_pacing(mut self, page_size: usize, page_delay: Duration) -> Self {
        self.page_size = page_size;
        self.page_delay = page_delay;
        self
    }

    /// Mention every opted-in member of `chat` through `sink`.
    ///
    /// Pages go out strictly in order with the page delay between them,
    /// followed by a silent confirmation. Dropping the future mid-way leaves
    /// the pages already sent as they are.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the members cannot be read, or the first
    /// delivery error from `sink`. A delivery error stops the remaining pages
    /// and the confirmation.
    pub async fn broadcast(&self, chat: &ChatKey, sink: &dyn ChatSink) -> Result<BroadcastReport> {
        let members = self.membership.members(chat).await?;
        if members.is_empty() {
            debug!("No members to mention in chat {chat}");
            sink.send(NOBODY_TEXT.to_string(), true).await?;
            return Ok(BroadcastReport::Empty);
        }

        let mentions: Vec<String> = members
            .iter()
            .map(|&member| self.renderer.render(member))
            .collect();
        let pages = paginate(&mentions, self.page_size)?;

        for (index, page) in pages.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.page_delay).await;
            }
            sink.send(page.join(PAGE_SEPARATOR), false).await?;
            debug!("Sent page {}/{} to chat {chat}", index + 1, pages.len());
        }

        sink.send(DONE_TEXT.to_string(), true).await?;
        info!(
            "Mentioned {} members in {} pages in chat {chat}",
            members.len(),
            pages.len()
        );

        Ok(BroadcastReport::Mentioned {
            members: members.len(),
            pages: pages.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use teloxide::{RequestError, types::Seconds};
    use tokio::time::Instant;

    use super::*;
    use crate::{
        error::BotError,
        mention::LabelMention,
        store::{FailingStore, MemoryStore},
        types::MemberId,
    };

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<(Instant, String, bool)>>,
        fail_on: Option<usize>,
    }

    impl RecordingSink {
        fn failing_on(attempt: usize) -> Self {
            Self {
                sent: Mutex::default(),
                fail_on: Some(attempt),
            }
        }

        fn texts(&self) -> Vec<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|(_, text, _)| text.clone())
                .collect()
        }
    }

    #[async_trait]
    impl ChatSink for RecordingSink {
        async fn send(&self, text: String, silent: bool) -> Result<()> {
            let mut sent = self.sent.lock().unwrap();
            if self.fail_on == Some(sent.len()) {
                return Err(RequestError::RetryAfter(Seconds::from_seconds(1)).into());
            }
            sent.push((Instant::now(), text, silent));
            Ok(())
        }
    }

    async fn broadcaster_with(members: impl IntoIterator<Item = MemberId>) -> Broadcaster {
        let membership = Arc::new(MembershipService::new(Arc::new(MemoryStore::new())));
        let chat = ChatKey::new("-100");
        for member in members {
            membership.opt_in(&chat, member).await.unwrap();
        }
        Broadcaster::new(membership, Arc::new(LabelMention::new("@")))
    }

    fn mention(member: MemberId) -> String {
        LabelMention::new("@").render(member)
    }

    #[tokio::test(start_paused = true)]
    async fn empty_chat_sends_single_notice() {
        let broadcaster = broadcaster_with(Vec::new()).await;
        let sink = RecordingSink::default();

        let report = broadcaster
            .broadcast(&ChatKey::new("-100"), &sink)
            .await
            .unwrap();

        assert_eq!(report, BroadcastReport::Empty);
        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, NOBODY_TEXT);
        assert!(sent[0].2);
    }

    #[tokio::test(start_paused = true)]
    async fn nine_members_make_three_paced_pages() {
        let broadcaster = broadcaster_with(1..=9).await;
        let sink = RecordingSink::default();

        let report = broadcaster
            .broadcast(&ChatKey::new("-100"), &sink)
            .await
            .unwrap();

        assert_eq!(
            report,
            BroadcastReport::Mentioned {
                members: 9,
                pages: 3
            }
        );

        let mut expected: Vec<String> = [&[1, 2, 3, 4][..], &[5, 6, 7, 8][..], &[9][..]]
            .iter()
            .map(|page| {
                page.iter()
                    .map(|&member| mention(member))
                    .collect::<Vec<_>>()
                    .join(PAGE_SEPARATOR)
            })
            .collect();
        expected.push(DONE_TEXT.to_string());
        assert_eq!(sink.texts(), expected);

        let sent = sink.sent.lock().unwrap();
        for pair in sent[..3].windows(2) {
            assert!(pair[1].0 - pair[0].0 >= PAGE_DELAY);
        }
        assert!(sent[..3].iter().all(|(_, _, silent)| !silent));
        assert!(sent[3].2);
    }

    #[tokio::test(start_paused = true)]
    async fn delivery_failure_stops_remaining_pages() {
        let broadcaster = broadcaster_with(1..=9).await;
        let sink = RecordingSink::failing_on(1);

        let err = broadcaster
            .broadcast(&ChatKey::new("-100"), &sink)
            .await
            .unwrap_err();

        assert!(matches!(err, BotError::Telegram(_)));
        let texts = sink.texts();
        assert_eq!(texts.len(), 1);
        assert!(!texts.contains(&DONE_TEXT.to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn aborting_during_delay_keeps_sent_pages() {
        let broadcaster = broadcaster_with(1..=9).await;
        let sink = RecordingSink::default();

        let result = tokio::time::timeout(
            PAGE_DELAY / 2,
            broadcaster.broadcast(&ChatKey::new("-100"), &sink),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(sink.texts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn storage_failure_sends_nothing() {
        let membership = Arc::new(MembershipService::new(Arc::new(FailingStore::new())));
        let broadcaster = Broadcaster::new(membership, Arc::new(LabelMention::new("@")));
        let sink = RecordingSink::default();

        let err = broadcaster
            .broadcast(&ChatKey::new("-100"), &sink)
            .await
            .unwrap_err();

        assert!(err.is_storage());
        assert!(sink.texts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_page_size_is_reported() {
        let broadcaster = broadcaster_with(vec![1])
            .await
            .with_pacing(0, Duration::ZERO);
        let sink = RecordingSink::default();

        let err = broadcaster
            .broadcast(&ChatKey::new("-100"), &sink)
            .await
            .unwrap_err();

        assert!(matches!(err, BotError::InvalidPageSize));
        assert!(sink.texts().is_empty());
    }
}
