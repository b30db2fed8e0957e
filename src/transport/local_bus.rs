//! In-process parameter event bus
//!
//! Publishing is synchronous: `publish()` runs every handler attached to the
//! topic on the caller's thread, in subscription order. `run()` turns a
//! channel of events into a single driver that publishes them one at a time.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Weak;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tracing::debug;
use tracing::info;
use tracing::trace;

use super::EventHandler;
use super::ParameterEventFeed;
use super::Subscription;
use crate::ParameterEvent;
use crate::QosConfig;
use crate::Result;

struct Subscriber {
    id: u64,
    topic: String,
    handler: EventHandler,
}

#[derive(Default)]
struct BusInner {
    subscribers: RwLock<Vec<Subscriber>>,
    next_id: AtomicU64,
}

#[derive(Clone, Default)]
pub struct LocalParameterEventBus {
    inner: Arc<BusInner>,
}

impl LocalParameterEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to every handler on `topic`.
    ///
    /// Handlers are collected before any runs, so a handler may subscribe or
    /// unsubscribe without deadlocking. Returns the number of handlers run.
    pub fn publish(
        &self,
        topic: &str,
        event: &ParameterEvent,
    ) -> usize {
        let handlers: Vec<EventHandler> = self
            .inner
            .subscribers
            .read()
            .iter()
            .filter(|s| s.topic == topic)
            .map(|s| s.handler.clone())
            .collect();

        trace!(topic, node = %event.node, handlers = handlers.len(), "Publishing parameter event");

        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    pub fn subscriber_count(
        &self,
        topic: &str,
    ) -> usize {
        self.inner
            .subscribers
            .read()
            .iter()
            .filter(|s| s.topic == topic)
            .count()
    }

    /// Drains `events` onto `topic` until the channel closes or `shutdown` fires.
    pub async fn run(
        &self,
        topic: String,
        mut events: mpsc::Receiver<ParameterEvent>,
        mut shutdown: watch::Receiver<()>,
    ) {
        info!(topic = %topic, "Parameter event pump started");

        loop {
            tokio::select! {
                received = events.recv() => {
                    match received {
                        Some(event) => {
                            self.publish(&topic, &event);
                        }
                        None => {
                            debug!("Parameter event channel closed");
                            break;
                        }
                    }
                }

                _ = shutdown.changed() => {
                    info!("Parameter event pump shutting down");
                    break;
                }
            }
        }

        info!(topic = %topic, "Parameter event pump stopped");
    }
}

fn unsubscribe(
    inner: &Weak<BusInner>,
    id: u64,
) {
    if let Some(inner) = inner.upgrade() {
        inner.subscribers.write().retain(|s| s.id != id);
        trace!(subscription_id = id, "Subscription released");
    }
}

impl ParameterEventFeed for LocalParameterEventBus {
    fn subscribe(
        &self,
        topic: &str,
        qos: &QosConfig,
        handler: EventHandler,
    ) -> Result<Subscription> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.subscribers.write().push(Subscriber {
            id,
            topic: topic.to_string(),
            handler,
        });

        debug!(subscription_id = id, topic, qos = ?qos, "Subscribed to parameter events");

        let inner = Arc::downgrade(&self.inner);
        Ok(Subscription::new(id, topic, move || unsubscribe(&inner, id)))
    }
}
