use crate::render::{contents_changed, render};
use crate::scan::MessageMap;
use chrono::{DateTime, Utc};
use streams_core::{CoreError, MessageStore, StreamMap};
use tracing::{info, warn};

/// What to do when the platform rejects a single create, edit or delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteFailurePolicy {
    /// Log it, count it, and keep going with the remaining streams.
    #[default]
    Continue,
    /// Stop the cycle at the first rejected write.
    Abort,
}

impl WriteFailurePolicy {
    /// Applies the policy to one write result. `Ok(false)` means the write
    /// failed but the cycle should carry on.
    pub(crate) fn absorb<T>(
        self,
        result: Result<T, CoreError>,
        failed_writes: &mut usize,
    ) -> Result<bool, CoreError> {
        match result {
            Ok(_) => Ok(true),
            Err(e) if self == WriteFailurePolicy::Continue => {
                warn!("Message write failed, continuing: {}", e);
                *failed_writes += 1;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

/// Outcome of one reconciliation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// When the cycle began, before the channel was resolved.
    pub started_at: DateTime<Utc>,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub removed: usize,
    pub duplicates_removed: usize,
    pub failed_writes: usize,
}

impl SyncReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            created: 0,
            updated: 0,
            unchanged: 0,
            removed: 0,
            duplicates_removed: 0,
            failed_writes: 0,
        }
    }

    /// Successful channel writes performed this cycle.
    pub fn writes(&self) -> usize {
        self.created + self.updated + self.removed + self.duplicates_removed
    }
}

impl Default for SyncReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Brings the channel in line with `records`.
///
/// Streams without a message get one, messages whose game or title drifted
/// are edited in place, and messages left over afterwards are deleted.
pub async fn reconcile<S>(
    records: &StreamMap,
    mut messages: MessageMap,
    store: &S,
    policy: WriteFailurePolicy,
) -> Result<SyncReport, CoreError>
where
    S: MessageStore + ?Sized,
{
    let mut report = SyncReport::new();

    for (url, record) in records {
        match messages.remove(url) {
            None => {
                info!(url = %url, "Added new stream for {}", url);
                if policy.absorb(store.create(&render(record)).await, &mut report.failed_writes)? {
                    report.created += 1;
                }
            }
            Some(existing) if contents_changed(record, &existing.announcement) => {
                info!(url = %url, message_id = existing.id, "Updating stream info for {}", url);
                let result = store.edit(existing.id, &render(record)).await;
                if policy.absorb(result, &mut report.failed_writes)? {
                    report.updated += 1;
                }
            }
            Some(_) => report.unchanged += 1,
        }
    }

    for (url, message) in messages {
        info!(
            url = %url,
            message_id = message.id,
            "Streamer {} stopped streaming. Removing message.",
            url
        );
        if policy.absorb(store.delete(message.id).await, &mut report.failed_writes)? {
            report.removed += 1;
        }
    }

    Ok(report)
}
