//! Parameter values, descriptors and the change events that carry them.

mod event;
mod filter;
mod value;

pub use event::*;
pub use filter::*;
pub use value::*;
