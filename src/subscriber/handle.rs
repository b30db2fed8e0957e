use std::fmt;
use std::sync::atomic::AtomicBool;

use crate::Parameter;
use crate::ParameterEvent;

/// Callback registered for one (parameter, node) pair
pub type ParameterCallbackType = Box<dyn Fn(&Parameter) + Send + Sync>;

/// Callback registered for the raw event stream
pub type ParameterEventCallbackType = Box<dyn Fn(&ParameterEvent) + Send + Sync>;

/// Registry key: parameter name plus the fully-qualified name of its node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistrationKey {
    pub parameter_name: String,
    pub node_name: String,
}

impl RegistrationKey {
    pub fn new(
        parameter_name: impl Into<String>,
        node_name: impl Into<String>,
    ) -> Self {
        Self {
            parameter_name: parameter_name.into(),
            node_name: node_name.into(),
        }
    }
}

impl fmt::Display for RegistrationKey {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}@{}", self.parameter_name, self.node_name)
    }
}

/// Registration token for a parameter callback.
///
/// The registration lives exactly as long as the caller keeps an `Arc` to this
/// handle; the dispatcher only holds a `Weak`.
pub struct ParameterCallbackHandle {
    pub(crate) key: RegistrationKey,
    pub(crate) callback: ParameterCallbackType,
    pub(crate) registered: AtomicBool,
}

impl ParameterCallbackHandle {
    pub(crate) fn new(
        key: RegistrationKey,
        callback: ParameterCallbackType,
    ) -> Self {
        Self {
            key,
            callback,
            registered: AtomicBool::new(true),
        }
    }

    pub fn parameter_name(&self) -> &str {
        &self.key.parameter_name
    }

    /// Node name as resolved at registration time
    pub fn node_name(&self) -> &str {
        &self.key.node_name
    }

    pub fn key(&self) -> &RegistrationKey {
        &self.key
    }
}

impl fmt::Debug for ParameterCallbackHandle {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("ParameterCallbackHandle")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Registration token for a whole-event callback.
pub struct ParameterEventCallbackHandle {
    pub(crate) callback: ParameterEventCallbackType,
    pub(crate) registered: AtomicBool,
}

impl ParameterEventCallbackHandle {
    pub(crate) fn new(callback: ParameterEventCallbackType) -> Self {
        Self {
            callback,
            registered: AtomicBool::new(true),
        }
    }
}

impl fmt::Debug for ParameterEventCallbackHandle {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("ParameterEventCallbackHandle").finish_non_exhaustive()
    }
}
