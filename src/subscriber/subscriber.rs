//! Parameter event dispatcher
//!
//! The subscriber attaches once to the parameter event feed and fans each
//! event out to two registries:
//!
//! ```text
//! event feed ──> event_callback()
//!                  ├─> keyed:   (parameter, node) -> [newest .. oldest]   invoked with Parameter
//!                  └─> unkeyed: [newest .. oldest]                        invoked with ParameterEvent
//! ```
//!
//! Both registries hold `Weak` references. Dropping the last `Arc` to a handle
//! ends its registration; the stale entry is erased the next time dispatch
//! walks over it.
//!
//! All registry access happens under one re-entrant lock, so callbacks may
//! register or remove callbacks while an event is being dispatched.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use parking_lot::ReentrantMutex;
use tracing::debug;
use tracing::info;
use tracing::trace;

use super::callback_list::walk;
use super::callback_list::Registry;
use super::callback_list::Visit;
use super::ParameterCallbackHandle;
use super::ParameterEventCallbackHandle;
use super::RegistrationKey;
use crate::identity::join_path;
use crate::identity::PATH_SEPARATOR;
use crate::metrics::CALLBACKS_INVOKED_METRIC;
use crate::metrics::EVENTS_RECEIVED_METRIC;
use crate::metrics::STALE_CALLBACKS_PRUNED_METRIC;
use crate::CallbackKind;
use crate::Error;
use crate::EventHandler;
use crate::EventType;
use crate::EventsConfig;
use crate::NodeIdentity;
use crate::NotFoundError;
use crate::Parameter;
use crate::ParameterEvent;
use crate::ParameterEventFeed;
use crate::ParameterEventsFilter;
use crate::Result;
use crate::Subscription;

pub struct ParameterEventsSubscriber {
    identity: Arc<dyn NodeIdentity>,
    config: EventsConfig,
    registry: ReentrantMutex<RefCell<Registry>>,
    subscription: Mutex<Option<Subscription>>,
}

impl fmt::Debug for ParameterEventsSubscriber {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("ParameterEventsSubscriber")
            .field("node", &self.identity.fully_qualified_name())
            .field("topic", &self.config.subscription.topic)
            .finish_non_exhaustive()
    }
}

impl ParameterEventsSubscriber {
    /// Validates `config` and subscribes to its topic on `feed`.
    ///
    /// The feed only keeps a weak reference back to the subscriber: dropping
    /// the returned `Arc` releases the subscription.
    pub fn new(
        identity: Arc<dyn NodeIdentity>,
        feed: &dyn ParameterEventFeed,
        config: EventsConfig,
    ) -> Result<Arc<Self>> {
        let config = config.validate()?;

        let subscriber = Arc::new(Self {
            identity,
            config,
            registry: ReentrantMutex::new(RefCell::new(Registry::default())),
            subscription: Mutex::new(None),
        });

        let weak = Arc::downgrade(&subscriber);
        let handler: EventHandler = Arc::new(move |event: &ParameterEvent| {
            if let Some(subscriber) = weak.upgrade() {
                subscriber.event_callback(event);
            }
        });

        let topic = &subscriber.config.subscription.topic;
        let subscription = feed.subscribe(topic, &subscriber.config.subscription.qos, handler)?;

        info!(
            node = %subscriber.identity.fully_qualified_name(),
            topic = %topic,
            subscription_id = subscription.id(),
            "Parameter events subscriber attached"
        );

        *subscriber.subscription.lock() = Some(subscription);
        Ok(subscriber)
    }

    pub fn topic(&self) -> &str {
        &self.config.subscription.topic
    }

    /// Registers `callback` for every event, ahead of earlier event callbacks.
    pub fn add_parameter_event_callback(
        &self,
        callback: impl Fn(&ParameterEvent) + Send + Sync + 'static,
    ) -> Arc<ParameterEventCallbackHandle> {
        let guard = self.registry.lock();
        let handle = Arc::new(ParameterEventCallbackHandle::new(Box::new(callback)));
        guard.borrow_mut().unkeyed.push_front(&handle);

        trace!("Parameter event callback registered");
        handle
    }

    pub fn remove_parameter_event_callback(
        &self,
        handle: &ParameterEventCallbackHandle,
    ) -> Result<()> {
        let guard = self.registry.lock();
        let removed = guard.borrow_mut().unkeyed.remove(handle);
        if !removed {
            return Err(NotFoundError::CallbackNotFound {
                kind: CallbackKind::Event,
            }
            .into());
        }

        trace!("Parameter event callback removed");
        Ok(())
    }

    /// Registers `callback` for changes of `parameter_name` on `node_name`.
    ///
    /// An empty `node_name` means this subscriber's own node; a relative name
    /// is resolved against its namespace now, not at dispatch time. The newest
    /// callback for a key runs first.
    pub fn add_parameter_callback(
        &self,
        parameter_name: &str,
        callback: impl Fn(&Parameter) + Send + Sync + 'static,
        node_name: &str,
    ) -> Result<Arc<ParameterCallbackHandle>> {
        let guard = self.registry.lock();
        let key = RegistrationKey::new(parameter_name, self.resolve_path(node_name)?);

        let handle = Arc::new(ParameterCallbackHandle::new(key.clone(), Box::new(callback)));
        guard
            .borrow_mut()
            .keyed
            .entry(key)
            .or_default()
            .push_front(&handle);

        trace!(key = %handle.key, "Parameter callback registered");
        Ok(handle)
    }

    pub fn remove_parameter_callback(
        &self,
        handle: &ParameterCallbackHandle,
    ) -> Result<()> {
        let guard = self.registry.lock();
        let mut registry = guard.borrow_mut();

        let Some(list) = registry.keyed.get_mut(&handle.key) else {
            return Err(NotFoundError::CallbackNotFound {
                kind: CallbackKind::Parameter,
            }
            .into());
        };
        if !list.remove(handle) {
            return Err(NotFoundError::CallbackNotFound {
                kind: CallbackKind::Parameter,
            }
            .into());
        }
        if list.is_empty() {
            registry.keyed.remove(&handle.key);
        }

        trace!(key = %handle.key, "Parameter callback removed");
        Ok(())
    }

    /// Drops every callback registered for the key; a missing key is not an error.
    pub fn remove_parameter_callbacks(
        &self,
        parameter_name: &str,
        node_name: &str,
    ) -> Result<()> {
        let guard = self.registry.lock();
        let key = RegistrationKey::new(parameter_name, self.resolve_path(node_name)?);
        let removed = guard
            .borrow_mut()
            .keyed
            .remove(&key)
            .map(|list| list.retire_all())
            .unwrap_or(0);

        trace!(
            key = %key,
            callbacks = removed,
            "Parameter callbacks removed"
        );
        Ok(())
    }

    /// Returns the last NEW or CHANGED value of `parameter_name` in `event`,
    /// provided the event was published by `node_name` (fully qualified).
    pub fn try_get_parameter_from_event(
        event: &ParameterEvent,
        parameter_name: &str,
        node_name: &str,
    ) -> Option<Parameter> {
        if event.node != node_name {
            return None;
        }
        let filter = ParameterEventsFilter::new(
            event,
            &[parameter_name],
            &[EventType::New, EventType::Changed],
        );
        filter
            .get_events()
            .last()
            .map(|(_, msg)| Parameter::from_parameter_msg(msg))
    }

    pub fn get_parameter_from_event(
        event: &ParameterEvent,
        parameter_name: &str,
        node_name: &str,
    ) -> Result<Parameter> {
        Self::try_get_parameter_from_event(event, parameter_name, node_name).ok_or_else(|| {
            NotFoundError::ParameterNotInEvent {
                parameter: parameter_name.to_string(),
                node: node_name.to_string(),
            }
            .into()
        })
    }

    /// Dispatches one event from the feed.
    ///
    /// Keyed callbacks run first (key order unspecified), then event callbacks.
    /// Stale entries met on the way are erased, and buckets left empty are
    /// dropped before returning.
    pub fn event_callback(
        &self,
        event: &ParameterEvent,
    ) {
        let guard = self.registry.lock();
        let registry: &RefCell<Registry> = &guard;

        debug!(node = %event.node, "Parameter event received");

        let keys: Vec<RegistrationKey> = registry.borrow().keyed.keys().cloned().collect();
        let mut keyed = Visit::default();
        for key in keys {
            let Some(parameter) =
                Self::try_get_parameter_from_event(event, &key.parameter_name, &key.node_name)
            else {
                continue;
            };

            let visit = walk(
                registry,
                |reg| reg.keyed.get_mut(&key),
                |handle: &ParameterCallbackHandle| (handle.callback)(&parameter),
            );
            keyed.invoked += visit.invoked;
            keyed.pruned += visit.pruned;
        }

        let unkeyed = walk(
            registry,
            |reg| Some(&mut reg.unkeyed),
            |handle: &ParameterEventCallbackHandle| (handle.callback)(event),
        );

        registry.borrow_mut().reconcile();

        if keyed.pruned + unkeyed.pruned > 0 {
            trace!(
                parameter_entries = keyed.pruned,
                event_entries = unkeyed.pruned,
                "Pruned stale callback entries"
            );
        }
        if self.config.enable_metrics {
            self.record_metrics(keyed, unkeyed);
        }
    }

    fn record_metrics(
        &self,
        keyed: Visit,
        unkeyed: Visit,
    ) {
        EVENTS_RECEIVED_METRIC.inc();
        for (kind, visit) in [(CallbackKind::Parameter, keyed), (CallbackKind::Event, unkeyed)] {
            CALLBACKS_INVOKED_METRIC
                .with_label_values(&[kind.as_str()])
                .inc_by(visit.invoked);
            STALE_CALLBACKS_PRUNED_METRIC
                .with_label_values(&[kind.as_str()])
                .inc_by(visit.pruned);
        }
    }

    /// Resolves a node name against this subscriber's own node.
    ///
    /// - `""` resolves to the own fully-qualified name
    /// - `"/abs/name"` is returned unchanged
    /// - `"name"` resolves to `<own namespace>/name`
    pub fn resolve_path(
        &self,
        path: &str,
    ) -> Result<String> {
        if path.is_empty() {
            let full_name = self.identity.fully_qualified_name();
            if !full_name.starts_with(PATH_SEPARATOR) {
                return Err(Error::InvalidState(format!(
                    "fully-qualified node name '{full_name}' is not absolute"
                )));
            }
            return Ok(full_name);
        }

        if path.starts_with(PATH_SEPARATOR) {
            return Ok(path.to_string());
        }

        let namespace = self.identity.namespace();
        if !namespace.starts_with(PATH_SEPARATOR) {
            return Err(Error::InvalidState(format!(
                "namespace '{namespace}' is not absolute, cannot resolve '{path}'"
            )));
        }
        Ok(join_path(&namespace, path))
    }

    /// Entries registered under the key, stale ones included until pruned.
    pub fn parameter_callback_count(
        &self,
        parameter_name: &str,
        node_name: &str,
    ) -> Result<usize> {
        let guard = self.registry.lock();
        let key = RegistrationKey::new(parameter_name, self.resolve_path(node_name)?);
        let count = guard.borrow().keyed.get(&key).map(|list| list.len()).unwrap_or(0);
        Ok(count)
    }

    pub fn keyed_bucket_count(&self) -> usize {
        self.registry.lock().borrow().keyed.len()
    }

    /// Event callback entries, stale ones included until pruned.
    pub fn event_callback_count(&self) -> usize {
        self.registry.lock().borrow().unkeyed.len()
    }
}
