use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tracing_test::traced_test;

use super::*;
use crate::ParameterEvent;
use crate::QosConfig;

fn recording_handler() -> (EventHandler, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = seen.clone();
    let handler: EventHandler = Arc::new(move |event: &ParameterEvent| s.lock().push(event.node.clone()));
    (handler, seen)
}

#[test]
fn publish_reaches_only_matching_topic() {
    let bus = LocalParameterEventBus::new();
    let (handler, seen) = recording_handler();
    let _sub = bus
        .subscribe("/parameter_events", &QosConfig::default(), handler)
        .unwrap();

    assert_eq!(bus.publish("/parameter_events", &ParameterEvent::new("/a")), 1);
    assert_eq!(bus.publish("/other", &ParameterEvent::new("/b")), 0);

    assert_eq!(*seen.lock(), vec!["/a"]);
}

#[test]
fn dropping_subscription_detaches_handler() {
    let bus = LocalParameterEventBus::new();
    let (handler, seen) = recording_handler();
    let sub = bus
        .subscribe("/parameter_events", &QosConfig::default(), handler)
        .unwrap();
    assert_eq!(sub.topic(), "/parameter_events");
    assert_eq!(bus.subscriber_count("/parameter_events"), 1);

    drop(sub);

    assert_eq!(bus.subscriber_count("/parameter_events"), 0);
    assert_eq!(bus.publish("/parameter_events", &ParameterEvent::new("/a")), 0);
    assert!(seen.lock().is_empty());
}

#[test]
fn subscription_ids_are_unique() {
    let bus = LocalParameterEventBus::new();
    let (h1, _) = recording_handler();
    let (h2, _) = recording_handler();

    let s1 = bus.subscribe("/t", &QosConfig::default(), h1).unwrap();
    let s2 = bus.subscribe("/t", &QosConfig::default(), h2).unwrap();

    assert_ne!(s1.id(), s2.id());
}

#[test]
fn subscription_outliving_bus_drops_cleanly() {
    let bus = LocalParameterEventBus::new();
    let (handler, _) = recording_handler();
    let sub = bus.subscribe("/t", &QosConfig::default(), handler).unwrap();

    drop(bus);
    drop(sub);
}

#[test]
fn handler_may_subscribe_while_publishing() {
    let bus = LocalParameterEventBus::new();
    let late = Arc::new(Mutex::new(Vec::new()));

    let inner_bus = bus.clone();
    let store = late.clone();
    let handler: EventHandler = Arc::new(move |_: &ParameterEvent| {
        let (h, _) = recording_handler();
        store
            .lock()
            .push(inner_bus.subscribe("/t", &QosConfig::default(), h).unwrap());
    });
    let _sub = bus.subscribe("/t", &QosConfig::default(), handler).unwrap();

    assert_eq!(bus.publish("/t", &ParameterEvent::new("/a")), 1);
    assert_eq!(bus.subscriber_count("/t"), 2);

    late.lock().clear();
}

#[tokio::test]
#[traced_test]
async fn run_pumps_events_until_channel_closes() {
    let bus = LocalParameterEventBus::new();
    let (handler, seen) = recording_handler();
    let _sub = bus.subscribe("/t", &QosConfig::default(), handler).unwrap();

    let (tx, rx) = mpsc::channel(8);
    let (_shutdown_tx, shutdown_rx) = watch::channel(());

    let pump_bus = bus.clone();
    let pump = tokio::spawn(async move {
        pump_bus.run("/t".to_string(), rx, shutdown_rx).await;
    });

    tx.send(ParameterEvent::new("/a")).await.unwrap();
    tx.send(ParameterEvent::new("/b")).await.unwrap();
    drop(tx);

    tokio::time::timeout(Duration::from_millis(500), pump)
        .await
        .expect("pump should exit when the channel closes")
        .expect("pump task should complete successfully");

    assert_eq!(*seen.lock(), vec!["/a", "/b"]);
    assert!(logs_contain("Parameter event pump stopped"));
}

#[tokio::test]
async fn run_stops_on_shutdown() {
    let bus = LocalParameterEventBus::new();
    let (_tx, rx) = mpsc::channel::<ParameterEvent>(8);
    let (shutdown_tx, shutdown_rx) = watch::channel(());

    let pump_bus = bus.clone();
    let pump = tokio::spawn(async move {
        pump_bus.run("/t".to_string(), rx, shutdown_rx).await;
    });

    shutdown_tx.send(()).unwrap();

    tokio::time::timeout(Duration::from_millis(500), pump)
        .await
        .expect("pump should exit on shutdown")
        .expect("pump task should complete successfully");
}
