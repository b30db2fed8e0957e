//! Parameter-change notification dispatcher.
//!
//! A [`ParameterEventsSubscriber`] subscribes once to the process-wide
//! parameter event feed and fans each change out to callbacks registered
//! either for a (parameter, node) pair or for the raw event stream.
//!
//! ```ignore
//! let bus = LocalParameterEventBus::new();
//! let node = Arc::new(NodeName::new("planner", "/robot1")?);
//! let subscriber = ParameterEventsSubscriber::new(node, &bus, EventsConfig::default())?;
//!
//! let _speed = subscriber.add_parameter_callback(
//!     "speed",
//!     |p| println!("speed is now {}", p.value()),
//!     "driver",
//! )?;
//! ```
//!
//! Registrations stay alive only while the caller holds the returned handle.

mod config;
mod errors;
pub mod identity;
pub mod metrics;
mod parameter;
mod subscriber;
mod transport;

pub use crate::config::*;
pub use errors::*;
pub use identity::NodeIdentity;
pub use identity::NodeName;
pub use parameter::*;
pub use subscriber::*;
pub use transport::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
