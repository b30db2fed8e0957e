mod callback_list;
mod handle;
#[allow(clippy::module_inception)]
mod subscriber;

pub use handle::*;
pub use subscriber::*;

#[cfg(test)]
mod callback_list_test;
