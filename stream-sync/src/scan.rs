use crate::reconcile::WriteFailurePolicy;
use crate::render::is_announcement_author;
use std::collections::BTreeMap;
use streams_core::{Announcement, CoreError, MessageStore, StoredMessage};
use tracing::{debug, info};

/// A message we posted for one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementMessage {
    pub id: u64,
    pub announcement: Announcement,
}

/// Existing announcements keyed by canonical stream URL.
pub type MessageMap = BTreeMap<String, AnnouncementMessage>;

#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub messages: MessageMap,
    pub duplicates_removed: usize,
    pub failed_writes: usize,
}

/// Returns the stream URL if `message` is one of our announcements.
fn announcement_url(message: &StoredMessage) -> Option<&str> {
    if !message.authored_by_self {
        return None;
    }
    let [embed] = message.embeds.as_slice() else {
        return None;
    };
    let author = embed.author.as_ref()?;
    if !is_announcement_author(&author.name) {
        return None;
    }
    author.url.as_deref()
}

/// Collects our announcements from the channel history.
///
/// When two messages carry the same URL, the one encountered first in
/// history order is deleted right away and the later one is kept.
pub async fn scan_channel<S>(store: &S, policy: WriteFailurePolicy) -> Result<ScanOutcome, CoreError>
where
    S: MessageStore + ?Sized,
{
    let history = store.list().await?;
    debug!("Scanning {} messages", history.len());

    let mut outcome = ScanOutcome::default();
    for message in history {
        let Some(url) = announcement_url(&message).map(str::to_owned) else {
            continue;
        };
        let Some(announcement) = message.embeds.into_iter().next() else {
            continue;
        };

        let current = AnnouncementMessage {
            id: message.id,
            announcement,
        };
        if let Some(duplicate) = outcome.messages.insert(url.clone(), current) {
            info!(
                url = %url,
                message_id = duplicate.id,
                "Removing duplicate announcement for {}",
                url
            );
            if policy.absorb(store.delete(duplicate.id).await, &mut outcome.failed_writes)? {
                outcome.duplicates_removed += 1;
            }
        }
    }

    Ok(outcome)
}
