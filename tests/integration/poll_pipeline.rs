//! End-to-end poll cycles against scripted switches
//!
//! These tests verify that:
//! - Readings flow from raw output to classified, indexed readings
//! - One switch failing never costs another switch its readings
//! - Sessions are released on every exit path
//! - Cycles replace the snapshot instead of appending to it

use std::sync::Arc;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use rxwatch::{
    ReadingStatus,
    actors::messages::AlertEvent,
    aggregator::{HostOutcome, OutcomeKind},
    error::PollError,
};

use crate::helpers::*;

#[tokio::test]
async fn test_two_ports_one_low() {
    let connector = Arc::new(MockConnector::new(&[(
        "10.0.0.1",
        Behavior::Output(vec![TWO_PORTS]),
    )]));
    let notifier = Arc::new(RecordingNotifier::default());

    let report = aggregator(connector, notifier.clone())
        .run(&switches(&["10.0.0.1"]), -10.0)
        .await;

    let summary: Vec<_> = report
        .readings
        .iter()
        .map(|r| (r.interface, r.rx_power, r.status))
        .collect();
    assert_eq!(
        summary,
        vec![(1, -5.0, ReadingStatus::Ok), (2, -40.0, ReadingStatus::Low)]
    );
    assert!(report.outcomes.is_empty());

    assert_eq!(
        notifier.events(),
        vec![AlertEvent::LowPower {
            host: "10.0.0.1".to_string(),
            interface: 2,
            rx_power: -40.0,
        }]
    );
}

#[tokio::test]
async fn test_output_split_across_chunks() {
    let connector = Arc::new(MockConnector::new(&[(
        "sw1",
        Behavior::Output(vec!["Gi0/1 Rx Pow", "er -3.5", "0 dBm\nGi0/2 Rx Power -2.25 dBm\n"]),
    )]));
    let notifier = Arc::new(RecordingNotifier::default());

    let report = aggregator(connector, notifier.clone())
        .run(&switches(&["sw1"]), -10.0)
        .await;

    let powers: Vec<_> = report.readings.iter().map(|r| r.rx_power).collect();
    assert_eq!(powers, vec![-3.5, -2.25]);
    assert!(notifier.events().is_empty());
}

#[tokio::test]
async fn test_failures_are_isolated() {
    let connector = Arc::new(MockConnector::new(&[
        ("ok", Behavior::Output(vec![TWO_PORTS])),
        ("refused", Behavior::Refuse),
        ("broken", Behavior::BrokenInput),
        ("dropped", Behavior::DropAfter(vec!["Rx Power -1.00 dBm\n"])),
        ("empty", Behavior::Output(vec![NO_OPTICS])),
        ("crash", Behavior::Panic),
    ]));
    let notifier = Arc::new(RecordingNotifier::default());

    let report = aggregator(connector.clone(), notifier.clone())
        .run(
            &switches(&["ok", "refused", "broken", "dropped", "empty", "crash"]),
            -10.0,
        )
        .await;

    let hosts: Vec<_> = report.readings.iter().map(|r| r.host.as_str()).collect();
    assert_eq!(hosts, vec!["ok", "ok", "dropped"]);

    assert_eq!(report.outcomes.len(), 5);
    let outcome = |host: &str| -> OutcomeKind {
        report
            .outcomes
            .iter()
            .find(|o| o.host == host)
            .map(|o| o.kind.clone())
            .unwrap()
    };
    assert_matches!(outcome("refused"), OutcomeKind::Failed(PollError::Connection(_)));
    assert_matches!(outcome("broken"), OutcomeKind::Failed(PollError::Command(_)));
    assert_matches!(outcome("dropped"), OutcomeKind::Failed(PollError::Read(_)));
    assert_matches!(outcome("empty"), OutcomeKind::NotFound);
    assert_matches!(outcome("crash"), OutcomeKind::Failed(PollError::Task(_)));

    assert_eq!(connector.opened(), 4);
    assert_eq!(connector.closed(), 4);

    let events = notifier.events();
    assert!(events.contains(&AlertEvent::NoData {
        host: "empty".to_string()
    }));
    assert!(events.contains(&AlertEvent::LowPower {
        host: "ok".to_string(),
        interface: 2,
        rx_power: -40.0,
    }));
    assert_eq!(events.len(), 2);
}

#[tokio::test]
async fn test_partial_output_without_readings_is_not_no_data() {
    let connector = Arc::new(MockConnector::new(&[(
        "flaky",
        Behavior::DropAfter(vec!["switch#show interface * trans"]),
    )]));
    let notifier = Arc::new(RecordingNotifier::default());

    let report = aggregator(connector, notifier.clone())
        .run(&switches(&["flaky"]), -10.0)
        .await;

    assert!(report.readings.is_empty());
    assert_eq!(
        report.outcomes,
        vec![HostOutcome {
            host: "flaky".to_string(),
            kind: OutcomeKind::Failed(PollError::Read("connection reset by peer".to_string())),
        }]
    );
    assert!(notifier.events().is_empty());
}

#[tokio::test]
async fn test_comment_is_copied_onto_readings() {
    let connector = Arc::new(MockConnector::new(&[(
        "core",
        Behavior::Output(vec![TWO_PORTS]),
    )]));
    let notifier = Arc::new(RecordingNotifier::default());

    let mut core = switch("core");
    core.comment = "DC1 row 4".to_string();

    let report = aggregator(connector, notifier).run(&[core], -50.0).await;

    assert!(report.readings.iter().all(|r| r.comment == "DC1 row 4"));
    assert!(report.readings.iter().all(|r| r.status == ReadingStatus::Ok));
}

#[tokio::test]
async fn test_cycle_publishes_even_when_everything_fails() {
    let connector = Arc::new(MockConnector::new(&[]));
    let notifier = Arc::new(RecordingNotifier::default());
    let poller = poller(connector, notifier, &["a", "b"], -10.0);

    let report = poller.poll_cycle().await;
    assert!(report.readings.is_empty());
    assert_eq!(report.outcomes.len(), 2);

    let snapshot = poller.store().get().await;
    assert_eq!(snapshot.cycle, 1);
    assert!(snapshot.readings.is_empty());
    assert!(snapshot.completed_at.is_some());
}

#[tokio::test]
async fn test_second_cycle_replaces_snapshot() {
    let connector = Arc::new(MockConnector::new(&[
        ("a", Behavior::Output(vec![TWO_PORTS])),
        ("b", Behavior::Output(vec![TWO_PORTS])),
    ]));
    let notifier = Arc::new(RecordingNotifier::default());
    let poller = poller(connector.clone(), notifier, &["a", "b"], -10.0);

    poller.poll_cycle().await;
    assert_eq!(poller.store().get().await.readings.len(), 4);

    connector.set("a", Behavior::Refuse);
    connector.set("b", Behavior::Output(vec!["Rx Power -2.00 dBm\n"]));
    poller.poll_cycle().await;

    let snapshot = poller.store().get().await;
    assert_eq!(snapshot.cycle, 2);
    assert_eq!(snapshot.readings.len(), 1);
    assert_eq!(snapshot.readings[0].host, "b");
    assert_eq!(snapshot.readings[0].interface, 1);
}

#[tokio::test]
async fn test_low_alert_repeats_every_cycle() {
    let connector = Arc::new(MockConnector::new(&[(
        "a",
        Behavior::Output(vec!["Rx Power -30.00 dBm\n"]),
    )]));
    let notifier = Arc::new(RecordingNotifier::default());
    let poller = poller(connector, notifier.clone(), &["a"], -10.0);

    poller.poll_cycle().await;
    poller.poll_cycle().await;

    assert_eq!(notifier.events().len(), 2);
}
