use std::sync::Arc;

use param_events::EventsConfig;
use param_events::LocalParameterEventBus;
use param_events::NodeName;
use param_events::ParameterEventsSubscriber;

pub const TOPIC: &str = "/parameter_events";

pub fn attach(
    bus: &LocalParameterEventBus,
    name: &str,
    namespace: &str,
) -> Arc<ParameterEventsSubscriber> {
    let node = NodeName::new(name, namespace).expect("valid node name");
    let config = EventsConfig {
        enable_metrics: false,
        ..Default::default()
    };
    ParameterEventsSubscriber::new(Arc::new(node), bus, config).expect("subscriber should attach")
}
