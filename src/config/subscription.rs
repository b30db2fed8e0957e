use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

use crate::identity::PATH_SEPARATOR;
use crate::Error;
use crate::Result;

/// Topic every node publishes its parameter events on
pub const DEFAULT_PARAMETER_EVENTS_TOPIC: &str = "/parameter_events";

/// Settings of the single subscription to the parameter event feed
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubscriptionConfig {
    /// Absolute topic name of the event feed
    #[serde(default = "default_topic")]
    pub topic: String,

    /// Quality of service requested from the transport
    #[serde(default)]
    pub qos: QosConfig,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            topic: default_topic(),
            qos: QosConfig::default(),
        }
    }
}

impl SubscriptionConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.topic.starts_with(PATH_SEPARATOR) || self.topic.len() < 2 {
            warn!(topic = %self.topic, "rejecting parameter event topic");
            return Err(Error::InvalidState(format!(
                "subscription.topic '{}' must be an absolute topic name",
                self.topic
            )));
        }
        self.qos.validate()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum History {
    #[default]
    KeepLast,
    KeepAll,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Reliability {
    #[default]
    Reliable,
    BestEffort,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Durability {
    #[default]
    Volatile,
    TransientLocal,
}

/// Quality of service profile handed to the transport on subscribe
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct QosConfig {
    /// Queue depth; only meaningful with `keep_last`
    #[serde(default = "default_depth")]
    pub depth: usize,

    #[serde(default)]
    pub history: History,

    #[serde(default)]
    pub reliability: Reliability,

    #[serde(default)]
    pub durability: Durability,
}

impl Default for QosConfig {
    fn default() -> Self {
        Self {
            depth: default_depth(),
            history: History::default(),
            reliability: Reliability::default(),
            durability: Durability::default(),
        }
    }
}

impl QosConfig {
    pub fn keep_last(depth: usize) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.history == History::KeepLast && self.depth == 0 {
            warn!("rejecting keep_last QoS with zero depth");
            return Err(Error::InvalidState(
                "subscription.qos.depth must be > 0 with keep_last history".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_topic() -> String {
    DEFAULT_PARAMETER_EVENTS_TOPIC.to_string()
}
fn default_depth() -> usize {
    1000
}
