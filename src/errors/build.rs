use alloc::vec::Vec;
use core::fmt::{self, Display, Formatter};

use super::InstantiateErrorKind;
use crate::key::ServiceKey;

#[derive(thiserror::Error, Debug)]
pub enum BuildErrorKind {
    /// `path` runs from the first key of the cycle to the key that closed it, in traversal order.
    DependencyCycle { path: Vec<ServiceKey> },
    /// No definition exists for `key`, or its factory failed with `reason`.
    Unresolvable {
        key: ServiceKey,
        #[source]
        reason: Option<InstantiateErrorKind>,
    },
    /// An earlier build of the same container failed.
    AlreadyFailed,
    Disposed,
}

impl BuildErrorKind {
    /// Key of the registration to look at first.
    #[must_use]
    pub fn key(&self) -> Option<&ServiceKey> {
        match self {
            Self::DependencyCycle { path } => path.first(),
            Self::Unresolvable { key, .. } => Some(key),
            Self::AlreadyFailed | Self::Disposed => None,
        }
    }
}

impl Display for BuildErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::DependencyCycle { path } => {
                write!(f, "Dependency cycle detected: ")?;
                for key in path {
                    write!(f, "{key} -> ")?;
                }
                match path.first() {
                    Some(key) => write!(f, "{key}"),
                    None => Ok(()),
                }
            }
            Self::Unresolvable { key, reason: None } => {
                write!(f, "Service `{key}` is unresolvable: no instance or factory registered")
            }
            Self::Unresolvable { key, reason: Some(reason) } => {
                write!(f, "Service `{key}` is unresolvable: {reason}")
            }
            Self::AlreadyFailed => write!(f, "Container failed to build before and can't be built again"),
            Self::Disposed => write!(f, "Container is already disposed"),
        }
    }
}
