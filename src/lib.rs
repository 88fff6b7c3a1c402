#![no_std]

extern crate alloc;

pub(crate) mod any;
pub(crate) mod container;
pub(crate) mod dependency_resolver;
pub(crate) mod disposable;
pub(crate) mod errors;
pub(crate) mod instantiator;
pub(crate) mod key;
pub(crate) mod lifecycle;
pub(crate) mod observer;
pub(crate) mod registry;
pub(crate) mod service;
pub(crate) mod static_resolver;
pub(crate) mod utils;

pub use container::{Container, State};
pub use disposable::Disposable;
pub use errors::{BuildErrorKind, InstantiateErrorKind, RegisterErrorKind, ResolveErrorKind};
pub use instantiator::{Dependencies, Instantiator};
pub use key::ServiceKey;
pub use lifecycle::{DisposeFailure, DisposeReport};
pub use observer::{Event, Observer};
pub use static_resolver::StaticResolver;
