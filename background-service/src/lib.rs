use async_trait::async_trait;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use stream_sync::{StreamSync, SyncReport};
use streams_core::{ChannelResolver, CoreError, ErrorReporter, StreamSource};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const SYNC_INTERVAL: Duration = Duration::from_secs(60);

/// One unit of periodic work.
#[async_trait]
pub trait SyncTask: Send + Sync + 'static {
    async fn run_cycle(&self) -> Result<SyncReport, CoreError>;
}

#[async_trait]
impl<S, R> SyncTask for StreamSync<S, R>
where
    S: StreamSource + 'static,
    R: ChannelResolver + 'static,
{
    async fn run_cycle(&self) -> Result<SyncReport, CoreError> {
        StreamSync::run_cycle(self).await
    }
}

/// Runs a [`SyncTask`] on a fixed period once the chat connection is ready.
///
/// Cycles never overlap: the next tick is not taken until the running cycle
/// returns. Stopping only takes effect between cycles.
pub struct BackgroundService {
    polling_interval: Duration,
    shutdown: CancellationToken,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl BackgroundService {
    pub fn new(polling_interval: Duration) -> Self {
        Self {
            polling_interval,
            shutdown: CancellationToken::new(),
            worker: Mutex::new(None),
        }
    }

    pub fn polling_interval(&self) -> Duration {
        self.polling_interval
    }

    /// Spawns the loop. `ready` resolves with the task once the connection is
    /// established, or with `None` if it never will be.
    pub fn start<T, F>(&self, ready: F) -> Result<(), CoreError>
    where
        T: SyncTask,
        F: Future<Output = Option<T>> + Send + 'static,
    {
        let mut worker = self.lock_worker()?;
        if worker.is_some() {
            return Err(CoreError::Internal {
                message: "background service already started".to_string(),
            });
        }

        let shutdown = self.shutdown.clone();
        let interval = self.polling_interval;
        *worker = Some(tokio::spawn(async move {
            let task = tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Sync loop stopped before the bot was ready");
                    return;
                }
                task = ready => task,
            };

            match task {
                Some(task) => run_loop(task, interval, shutdown).await,
                None => warn!("Connection closed before ready, sync loop not started"),
            }
        }));

        info!("Background service started, polling every {:?}", interval);
        Ok(())
    }

    /// Signals the loop to stop and waits for any cycle in flight to finish.
    pub async fn stop(&self) -> Result<(), CoreError> {
        self.shutdown.cancel();

        let handle = self.lock_worker()?.take();
        if let Some(handle) = handle {
            handle.await.map_err(|e| CoreError::Internal {
                message: format!("sync loop panicked: {e}"),
            })?;
        }

        info!("Background service stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.lock_worker()
            .map(|worker| worker.as_ref().is_some_and(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }

    fn lock_worker(&self) -> Result<std::sync::MutexGuard<'_, Option<JoinHandle<()>>>, CoreError> {
        self.worker.lock().map_err(|_| CoreError::Internal {
            message: "background service state poisoned".to_string(),
        })
    }
}

impl Default for BackgroundService {
    fn default() -> Self {
        Self::new(SYNC_INTERVAL)
    }
}

async fn run_loop<T: SyncTask>(task: T, interval: Duration, shutdown: CancellationToken) {
    let reporter = ErrorReporter::new();
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                info!("Sync loop stopped (shutdown)");
                return;
            }
            _ = ticker.tick() => {}
        }

        match task.run_cycle().await {
            Ok(report) => debug!(
                writes = report.writes(),
                failed_writes = report.failed_writes,
                "Sync cycle started at {} completed",
                report.started_at
            ),
            Err(e) => reporter.report_warning(&e),
        }
    }
}
