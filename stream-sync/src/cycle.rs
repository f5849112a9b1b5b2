use crate::reconcile::{reconcile, SyncReport, WriteFailurePolicy};
use crate::scan::scan_channel;
use chrono::Utc;
use streams_core::{ChannelResolver, CoreError, StreamSource};
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

/// One fetch, scan, reconcile pass against a single channel.
pub struct StreamSync<S, R> {
    source: S,
    resolver: R,
    policy: WriteFailurePolicy,
}

impl<S, R> StreamSync<S, R>
where
    S: StreamSource,
    R: ChannelResolver,
{
    pub fn new(source: S, resolver: R) -> Self {
        Self {
            source,
            resolver,
            policy: WriteFailurePolicy::default(),
        }
    }

    pub fn with_write_failure_policy(mut self, policy: WriteFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn write_failure_policy(&self) -> WriteFailurePolicy {
        self.policy
    }

    /// Runs one cycle.
    ///
    /// The channel is resolved and the stream list fetched before anything
    /// in the channel is touched, so a failure in either leaves it as is.
    pub async fn run_cycle(&self) -> Result<SyncReport, CoreError> {
        let cycle_id = Uuid::new_v4();
        let span = info_span!("sync_cycle", %cycle_id);

        async move {
            let started_at = Utc::now();
            let store = self.resolver.resolve().await?;
            let records = self.source.fetch_streams().await?;
            debug!("Fetched {} live streams", records.len());

            let scanned = scan_channel(&store, self.policy).await?;
            let mut report = reconcile(&records, scanned.messages, &store, self.policy).await?;
            report.started_at = started_at;
            report.duplicates_removed = scanned.duplicates_removed;
            report.failed_writes += scanned.failed_writes;

            info!(
                created = report.created,
                updated = report.updated,
                unchanged = report.unchanged,
                removed = report.removed,
                duplicates_removed = report.duplicates_removed,
                failed_writes = report.failed_writes,
                "Sync cycle finished"
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }
}
