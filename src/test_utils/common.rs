use std::sync::Arc;

use parking_lot::Mutex;

use crate::EventsConfig;
use crate::LocalParameterEventBus;
use crate::NodeName;
use crate::ParameterEventsSubscriber;
use crate::DEFAULT_PARAMETER_EVENTS_TOPIC;

/// Shared log of what callbacks observed, in call order
pub(crate) type Recorder<T> = Arc<Mutex<Vec<T>>>;

pub(crate) fn recorder<T>() -> Recorder<T> {
    Arc::new(Mutex::new(Vec::new()))
}

/// A subscriber for node `planner` in `namespace`, attached to a fresh bus.
pub(crate) fn mock_subscriber(namespace: &str) -> (LocalParameterEventBus, Arc<ParameterEventsSubscriber>) {
    let bus = LocalParameterEventBus::new();
    let node = NodeName::new("planner", namespace).expect("valid node name");
    let mut config = EventsConfig::default();
    config.enable_metrics = false;

    let subscriber =
        ParameterEventsSubscriber::new(Arc::new(node), &bus, config).expect("subscriber should attach");
    assert_eq!(bus.subscriber_count(DEFAULT_PARAMETER_EVENTS_TOPIC), 1);

    (bus, subscriber)
}
