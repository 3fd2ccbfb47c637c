//! Scheduler actor tests
//!
//! Time is paused, so the tokio clock only advances once every task is idle.

use std::sync::Arc;
use std::time::Duration;

use rxwatch::actors::scheduler::SchedulerHandle;

use crate::helpers::*;

#[tokio::test(start_paused = true)]
async fn test_first_cycle_runs_at_startup() {
    let connector = Arc::new(MockConnector::new(&[("a", Behavior::Output(vec![TWO_PORTS]))]));
    let notifier = Arc::new(RecordingNotifier::default());
    let poller = poller(connector, notifier, &["a"], -10.0);

    let scheduler = SchedulerHandle::spawn(poller.clone(), Duration::from_secs(300));
    tokio::time::sleep(Duration::from_secs(1)).await;

    let snapshot = poller.store().get().await;
    assert_eq!(snapshot.cycle, 1);
    assert_eq!(snapshot.readings.len(), 2);

    scheduler.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_cycles_repeat_every_period() {
    let connector = Arc::new(MockConnector::new(&[("a", Behavior::Output(vec![TWO_PORTS]))]));
    let notifier = Arc::new(RecordingNotifier::default());
    let poller = poller(connector.clone(), notifier, &["a"], -10.0);

    let scheduler = SchedulerHandle::spawn(poller.clone(), Duration::from_secs(60));

    // ticks at 0s, 60s and 120s
    tokio::time::sleep(Duration::from_secs(150)).await;

    assert_eq!(poller.store().get().await.cycle, 3);
    assert_eq!(connector.opened(), 3);
    assert_eq!(connector.closed(), 3);

    scheduler.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_no_cycles_after_shutdown() {
    let connector = Arc::new(MockConnector::new(&[("a", Behavior::Output(vec![TWO_PORTS]))]));
    let notifier = Arc::new(RecordingNotifier::default());
    let poller = poller(connector.clone(), notifier, &["a"], -10.0);

    let scheduler = SchedulerHandle::spawn(poller.clone(), Duration::from_secs(60));
    tokio::time::sleep(Duration::from_secs(1)).await;
    scheduler.shutdown().await.unwrap();

    tokio::time::sleep(Duration::from_secs(600)).await;

    assert_eq!(poller.store().get().await.cycle, 1);
    assert_eq!(connector.opened(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_crashing_switch_does_not_stop_scheduler() {
    let connector = Arc::new(MockConnector::new(&[
        ("crash", Behavior::Panic),
        ("ok", Behavior::Output(vec![TWO_PORTS])),
    ]));
    let notifier = Arc::new(RecordingNotifier::default());
    let poller = poller(connector, notifier, &["crash", "ok"], -10.0);

    let scheduler = SchedulerHandle::spawn(poller.clone(), Duration::from_secs(60));
    tokio::time::sleep(Duration::from_secs(90)).await;

    let snapshot = poller.store().get().await;
    assert_eq!(snapshot.cycle, 2);
    assert!(snapshot.readings.iter().all(|r| r.host == "ok"));
    assert_eq!(snapshot.readings.len(), 2);

    scheduler.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_twice_fails() {
    let connector = Arc::new(MockConnector::new(&[]));
    let notifier = Arc::new(RecordingNotifier::default());
    let poller = poller(connector, notifier, &["a"], -10.0);

    let scheduler = SchedulerHandle::spawn(poller, Duration::from_secs(3600));
    scheduler.shutdown().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(scheduler.shutdown().await.is_err());
}
