use async_trait::async_trait;
use background_service::{BackgroundService, SyncTask, SYNC_INTERVAL};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use stream_sync::SyncReport;
use streams_core::{ChannelError, CoreError};
use tokio::sync::oneshot;

#[derive(Clone, Default)]
struct Counters {
    started: Arc<AtomicUsize>,
    completed: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

struct CountingTask {
    counters: Counters,
    work: Duration,
    fail: bool,
}

#[async_trait]
impl SyncTask for CountingTask {
    async fn run_cycle(&self) -> Result<SyncReport, CoreError> {
        let c = &self.counters;
        c.started.fetch_add(1, Ordering::SeqCst);
        let now = c.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        c.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.work.is_zero() {
            tokio::time::sleep(self.work).await;
        }

        c.in_flight.fetch_sub(1, Ordering::SeqCst);
        c.completed.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            Err(CoreError::Channel(ChannelError::NotFound { channel_id: 1 }))
        } else {
            Ok(SyncReport::new())
        }
    }
}

fn task(counters: &Counters, work: Duration, fail: bool) -> CountingTask {
    CountingTask {
        counters: counters.clone(),
        work,
        fail,
    }
}

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

#[test]
fn default_interval_is_one_minute() {
    assert_eq!(SYNC_INTERVAL, secs(60));
    assert_eq!(BackgroundService::default().polling_interval(), secs(60));
}

#[tokio::test(start_paused = true)]
async fn waits_for_ready_before_first_cycle() {
    let counters = Counters::default();
    let (ready_tx, ready_rx) = oneshot::channel::<CountingTask>();
    let service = BackgroundService::new(SYNC_INTERVAL);
    service
        .start(async move { ready_rx.await.ok() })
        .unwrap();

    tokio::time::sleep(secs(300)).await;
    assert_eq!(counters.started.load(Ordering::SeqCst), 0);

    assert!(ready_tx.send(task(&counters, Duration::ZERO, false)).is_ok());
    tokio::time::sleep(secs(30)).await;
    assert_eq!(counters.started.load(Ordering::SeqCst), 1);

    tokio::time::sleep(secs(60)).await;
    assert_eq!(counters.started.load(Ordering::SeqCst), 2);

    service.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn failed_cycles_keep_schedule() {
    let counters = Counters::default();
    let service = BackgroundService::new(SYNC_INTERVAL);
    let failing = task(&counters, Duration::ZERO, true);
    service.start(async move { Some(failing) }).unwrap();

    tokio::time::sleep(secs(150)).await;
    assert_eq!(counters.completed.load(Ordering::SeqCst), 3);
    assert!(service.is_running());

    service.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn slow_cycles_never_overlap() {
    let counters = Counters::default();
    let service = BackgroundService::new(SYNC_INTERVAL);
    let slow = task(&counters, secs(90), false);
    service.start(async move { Some(slow) }).unwrap();

    tokio::time::sleep(secs(600)).await;
    assert!(counters.completed.load(Ordering::SeqCst) >= 3);
    assert_eq!(counters.max_in_flight.load(Ordering::SeqCst), 1);

    service.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn stop_lets_running_cycle_finish() {
    let counters = Counters::default();
    let service = BackgroundService::new(SYNC_INTERVAL);
    let slow = task(&counters, secs(10), false);
    service.start(async move { Some(slow) }).unwrap();

    tokio::time::sleep(secs(1)).await;
    assert_eq!(counters.started.load(Ordering::SeqCst), 1);
    assert_eq!(counters.completed.load(Ordering::SeqCst), 0);

    service.stop().await.unwrap();
    assert_eq!(counters.completed.load(Ordering::SeqCst), 1);
    assert!(!service.is_running());

    tokio::time::sleep(secs(300)).await;
    assert_eq!(counters.started.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn stop_before_ready() {
    let (_ready_tx, ready_rx) = oneshot::channel::<CountingTask>();
    let service = BackgroundService::new(SYNC_INTERVAL);
    service
        .start(async move { ready_rx.await.ok() })
        .unwrap();

    service.stop().await.unwrap();
    assert!(!service.is_running());
}

#[tokio::test(start_paused = true)]
async fn never_ready_exits_quietly() {
    let service = BackgroundService::new(SYNC_INTERVAL);
    service
        .start(async { None::<CountingTask> })
        .unwrap();

    tokio::time::sleep(secs(1)).await;
    assert!(!service.is_running());
    service.stop().await.unwrap();
}

#[tokio::test]
async fn start_twice_is_rejected() {
    let counters = Counters::default();
    let service = BackgroundService::new(SYNC_INTERVAL);
    let first = task(&counters, Duration::ZERO, false);
    let second = task(&counters, Duration::ZERO, false);

    service.start(async move { Some(first) }).unwrap();
    let err = service.start(async move { Some(second) }).unwrap_err();
    assert!(matches!(err, CoreError::Internal { .. }));

    service.stop().await.unwrap();
}
