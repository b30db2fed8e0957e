use lazy_static::lazy_static;
use prometheus::IntCounter;
use prometheus::IntCounterVec;
use prometheus::Opts;
use prometheus::Registry;

lazy_static! {
    pub static ref EVENTS_RECEIVED_METRIC: IntCounter = IntCounter::new(
        "param_events_received_total",
        "Parameter events delivered to the dispatcher"
    )
    .expect("metric can not be created");

    pub static ref CALLBACKS_INVOKED_METRIC: IntCounterVec = IntCounterVec::new(
        Opts::new("param_callbacks_invoked_total", "Callbacks invoked during dispatch"),
        &["kind"]
    )
    .expect("metric can not be created");

    pub static ref STALE_CALLBACKS_PRUNED_METRIC: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "param_stale_callbacks_pruned_total",
            "Entries whose handle was dropped, removed lazily during dispatch"
        ),
        &["kind"]
    )
    .expect("metric can not be created");
}

/// Adds the dispatcher collectors to `registry`.
pub fn register_custom_metrics(registry: &Registry) -> prometheus::Result<()> {
    registry.register(Box::new(EVENTS_RECEIVED_METRIC.clone()))?;
    registry.register(Box::new(CALLBACKS_INVOKED_METRIC.clone()))?;
    registry.register(Box::new(STALE_CALLBACKS_PRUNED_METRIC.clone()))?;
    Ok(())
}
