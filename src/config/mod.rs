//! Configuration management for the parameter event dispatcher.
//!
//! Sources are merged in the following order (later sources override earlier):
//! 1. Type defaults (lowest priority)
//! 2. Configuration file from `CONFIG_PATH` environment variable (if set)
//! 3. Environment variables with `PARAM_EVENTS__` prefix (highest priority)
//!

mod subscription;
pub use subscription::*;


//---
use std::env;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

pub(crate) const ENV_PREFIX: &str = "PARAM_EVENTS";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EventsConfig {
    /// Event feed subscription settings
    #[serde(default)]
    pub subscription: SubscriptionConfig,

    /// Update the prometheus counters on every dispatch
    #[serde(default = "default_enable_metrics")]
    pub enable_metrics: bool,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            subscription: SubscriptionConfig::default(),
            enable_metrics: default_enable_metrics(),
        }
    }
}

impl EventsConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// # Note
    /// Validation is deferred to allow further overrides via
    /// `with_override_config()`. Callers MUST call `validate()` before using
    /// the configuration.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("PARAM_EVENTS__SUBSCRIPTION__QOS__DEPTH", "10");
    /// let cfg = EventsConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(environment());

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Layers the file at `path` over `self`; environment variables still win.
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates configuration and returns validated instance.
    pub fn validate(self) -> Result<Self> {
        self.subscription.validate()?;
        Ok(self)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}

fn default_enable_metrics() -> bool {
    true
}
