//! Identity of the node that owns a [`crate::ParameterEventsSubscriber`].
//!
//! Relative node names given at registration time are resolved against this
//! identity's namespace.

#[cfg(test)]
use mockall::automock;

use crate::Error;
use crate::Result;

/// Separator and absolute-path marker of node names and namespaces
pub const PATH_SEPARATOR: char = '/';

#[cfg_attr(test, automock)]
pub trait NodeIdentity: Send + Sync + 'static {
    /// Bare node name, without namespace
    fn name(&self) -> String;

    /// Absolute namespace, `/` for the root namespace
    fn namespace(&self) -> String;

    /// Namespace joined with the node name, e.g. `/ns/node`
    fn fully_qualified_name(&self) -> String;
}

/// Validated node name and namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeName {
    name: String,
    namespace: String,
}

impl NodeName {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let mut namespace = namespace.into();

        if name.is_empty() || name.contains(PATH_SEPARATOR) {
            return Err(Error::InvalidState(format!("invalid node name '{name}'")));
        }
        if namespace.is_empty() {
            namespace.push(PATH_SEPARATOR);
        }
        if !namespace.starts_with(PATH_SEPARATOR) {
            return Err(Error::InvalidState(format!(
                "namespace '{namespace}' of node '{name}' is not absolute"
            )));
        }
        if namespace.len() > 1 && namespace.ends_with(PATH_SEPARATOR) {
            namespace.pop();
        }

        Ok(Self { name, namespace })
    }
}

impl NodeIdentity for NodeName {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn namespace(&self) -> String {
        self.namespace.clone()
    }

    fn fully_qualified_name(&self) -> String {
        join_path(&self.namespace, &self.name)
    }
}

/// Joins a namespace and a relative name with a single separator.
pub(crate) fn join_path(
    namespace: &str,
    name: &str,
) -> String {
    let namespace = namespace.trim_end_matches(PATH_SEPARATOR);
    format!("{namespace}{PATH_SEPARATOR}{name}")
}

#[cfg(test)]
mod identity_test;
