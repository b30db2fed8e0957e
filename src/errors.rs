//! Parameter Event Dispatcher Error Hierarchy
//!
//! Every failure in this crate is a deterministic function of the caller's
//! arguments or configuration. Nothing here is transient and nothing is retried.

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Lookup of a callback, bucket or parameter that does not exist
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Unrecognized or corrupt configuration value reaching resolution logic
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Configuration source loading failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Typed accessor used on a parameter holding another type
    #[error("Parameter '{name}' has type {actual}, not {expected}")]
    ParameterType {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NotFoundError {
    /// Removal of a handle the registry does not hold
    #[error("{kind} callback doesn't exist")]
    CallbackNotFound { kind: CallbackKind },

    /// Extraction of a parameter the event does not carry
    #[error("Parameter '{parameter}' of node '{node}' is not part of parameter event")]
    ParameterNotInEvent { parameter: String, node: String },
}

/// Which of the two registries an operation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    Parameter,
    Event,
}

impl CallbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackKind::Parameter => "parameter",
            CallbackKind::Event => "event",
        }
    }
}

impl std::fmt::Display for CallbackKind {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Error::InvalidState(_))
    }
}
