//! Seams between the sync loop and the outside world.
//!
//! The channel's own message history is the only record of earlier cycles,
//! so everything the reconciler knows comes through [`MessageStore::list`].

use crate::error::CoreError;
use crate::types::{Announcement, StoredMessage, StreamMap};
use async_trait::async_trait;

/// Produces the set of streams that are live right now.
#[async_trait]
pub trait StreamSource: Send + Sync {
    async fn fetch_streams(&self) -> Result<StreamMap, CoreError>;
}

/// Message operations on one resolved channel.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Every retrievable message, in the order the platform yields them.
    async fn list(&self) -> Result<Vec<StoredMessage>, CoreError>;

    async fn create(&self, announcement: &Announcement) -> Result<u64, CoreError>;

    async fn edit(&self, message_id: u64, announcement: &Announcement) -> Result<(), CoreError>;

    async fn delete(&self, message_id: u64) -> Result<(), CoreError>;
}

/// Looks up the configured channel at the start of each cycle.
#[async_trait]
pub trait ChannelResolver: Send + Sync {
    type Store: MessageStore;

    async fn resolve(&self) -> Result<Self::Store, CoreError>;
}

#[async_trait]
impl<T: MessageStore + ?Sized> MessageStore for std::sync::Arc<T> {
    async fn list(&self) -> Result<Vec<StoredMessage>, CoreError> {
        (**self).list().await
    }

    async fn create(&self, announcement: &Announcement) -> Result<u64, CoreError> {
        (**self).create(announcement).await
    }

    async fn edit(&self, message_id: u64, announcement: &Announcement) -> Result<(), CoreError> {
        (**self).edit(message_id, announcement).await
    }

    async fn delete(&self, message_id: u64) -> Result<(), CoreError> {
        (**self).delete(message_id).await
    }
}
