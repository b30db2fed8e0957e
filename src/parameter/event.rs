use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;

use super::ParameterMsg;
use super::ParameterValue;

/// A batch of parameter changes published by one node.
///
/// The three descriptor lists are disjoint by construction of the publisher;
/// this type does not enforce it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterEvent {
    /// Nanoseconds since the Unix epoch at publication time
    #[serde(default)]
    pub stamp: u64,

    /// Fully-qualified name of the node owning the parameters
    pub node: String,

    #[serde(default)]
    pub new_parameters: Vec<ParameterMsg>,

    #[serde(default)]
    pub changed_parameters: Vec<ParameterMsg>,

    #[serde(default)]
    pub deleted_parameters: Vec<ParameterMsg>,
}

impl ParameterEvent {
    pub fn new(node: impl Into<String>) -> Self {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(stamp_nanos)
            .unwrap_or_default();
        Self {
            stamp,
            node: node.into(),
            ..Default::default()
        }
    }

    pub fn with_new(
        mut self,
        name: impl Into<String>,
        value: impl Into<ParameterValue>,
    ) -> Self {
        self.new_parameters.push(ParameterMsg::new(name, value));
        self
    }

    pub fn with_changed(
        mut self,
        name: impl Into<String>,
        value: impl Into<ParameterValue>,
    ) -> Self {
        self.changed_parameters.push(ParameterMsg::new(name, value));
        self
    }

    /// Deleted descriptors carry no meaningful value.
    pub fn with_deleted(
        mut self,
        name: impl Into<String>,
    ) -> Self {
        self.deleted_parameters
            .push(ParameterMsg::new(name, ParameterValue::NotSet));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.new_parameters.is_empty()
            && self.changed_parameters.is_empty()
            && self.deleted_parameters.is_empty()
    }
}

/// Saturates at `u64::MAX`, roughly the year 2554.
pub(crate) fn stamp_nanos(since_epoch: Duration) -> u64 {
    u64::try_from(since_epoch.as_nanos()).unwrap_or(u64::MAX)
}
