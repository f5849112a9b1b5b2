//! In-memory [`MessageStore`] for tests. Enabled by the `test-util` feature.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use streams_core::{Announcement, ChannelError, CoreError, MessageStore, StoredMessage};

/// A successful write, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Create(Announcement),
    Edit(u64, Announcement),
    Delete(u64),
}

#[derive(Debug, Default)]
struct Inner {
    messages: Vec<StoredMessage>,
    next_id: u64,
    writes: Vec<StoreOp>,
    rejected_ids: HashSet<u64>,
    rejected_urls: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(messages: Vec<StoredMessage>) -> Self {
        let next_id = messages.iter().map(|m| m.id).max().unwrap_or(0);
        Self {
            inner: Mutex::new(Inner {
                messages,
                next_id,
                ..Inner::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // a panicking test thread must not hide the store's contents
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn messages(&self) -> Vec<StoredMessage> {
        self.lock().messages.clone()
    }

    pub fn writes(&self) -> Vec<StoreOp> {
        self.lock().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.lock().writes.clear();
    }

    /// Edits and deletes of this message will fail.
    pub fn reject_message(&self, id: u64) {
        self.lock().rejected_ids.insert(id);
    }

    /// Creating an announcement whose link is `url` will fail.
    pub fn reject_creates_for(&self, url: &str) {
        self.lock().rejected_urls.insert(url.to_string());
    }

    fn rejected(operation: &str, target: impl ToString) -> CoreError {
        CoreError::Channel(ChannelError::WriteRejected {
            operation: operation.to_string(),
            target: target.to_string(),
            reason: "rejected by memory store".to_string(),
        })
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn list(&self) -> Result<Vec<StoredMessage>, CoreError> {
        Ok(self.messages())
    }

    async fn create(&self, announcement: &Announcement) -> Result<u64, CoreError> {
        let mut inner = self.lock();
        if let Some(url) = announcement.url.as_ref() {
            if inner.rejected_urls.contains(url) {
                return Err(Self::rejected("create", url));
            }
        }

        inner.next_id += 1;
        let id = inner.next_id;
        inner.messages.push(StoredMessage {
            id,
            authored_by_self: true,
            embeds: vec![announcement.clone()],
        });
        inner.writes.push(StoreOp::Create(announcement.clone()));
        Ok(id)
    }

    async fn edit(&self, message_id: u64, announcement: &Announcement) -> Result<(), CoreError> {
        let mut inner = self.lock();
        if inner.rejected_ids.contains(&message_id) {
            return Err(Self::rejected("edit", message_id));
        }

        let message = inner
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or_else(|| Self::rejected("edit", message_id))?;
        message.embeds = vec![announcement.clone()];
        inner
            .writes
            .push(StoreOp::Edit(message_id, announcement.clone()));
        Ok(())
    }

    async fn delete(&self, message_id: u64) -> Result<(), CoreError> {
        let mut inner = self.lock();
        if inner.rejected_ids.contains(&message_id) {
            return Err(Self::rejected("delete", message_id));
        }

        let before = inner.messages.len();
        inner.messages.retain(|m| m.id != message_id);
        if inner.messages.len() == before {
            return Err(Self::rejected("delete", message_id));
        }
        inner.writes.push(StoreOp::Delete(message_id));
        Ok(())
    }
}
