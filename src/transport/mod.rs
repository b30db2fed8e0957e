//! Event feed abstraction the dispatcher subscribes to.
//!
//! The transport that actually moves [`ParameterEvent`]s between processes is
//! a collaborator; [`LocalParameterEventBus`] is the in-process implementation
//! used for embedding and tests.

mod local_bus;
pub use local_bus::*;

#[cfg(test)]
mod local_bus_test;

use std::fmt;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::ParameterEvent;
use crate::QosConfig;
use crate::Result;

/// Handler invoked by the transport for every event delivered on a topic
pub type EventHandler = Arc<dyn Fn(&ParameterEvent) + Send + Sync>;

#[cfg_attr(test, automock)]
pub trait ParameterEventFeed: Send + Sync + 'static {
    /// Attaches `handler` to `topic`. The handler stays attached until the
    /// returned [`Subscription`] is dropped.
    fn subscribe(
        &self,
        topic: &str,
        qos: &QosConfig,
        handler: EventHandler,
    ) -> Result<Subscription>;
}

/// Live attachment of a handler to a topic; detaches on drop.
pub struct Subscription {
    id: u64,
    topic: String,
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(
        id: u64,
        topic: impl Into<String>,
        unsubscribe: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            id,
            topic: topic.into(),
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// A subscription with nothing to release, for transports that manage
    /// handler lifetime themselves.
    pub fn detached(
        id: u64,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            id,
            topic: topic.into(),
            unsubscribe: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl fmt::Debug for Subscription {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .finish_non_exhaustive()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}
