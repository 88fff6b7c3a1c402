use alloc::sync::Arc;
use core::future::Future;
use tracing::debug;

use crate::{
    any::{lookup, ServiceMap, ServiceValue},
    disposable::{boxed_disposer, BoxedDisposer, Disposable},
    errors::{InstantiateErrorKind, ResolveErrorKind},
    key::ServiceKey,
    service::{service_fn, BoxService},
};

/// Deferred constructor of a service.
///
/// Implemented for every `FnMut(Dependencies) -> Future<Output = Result<T, E>>` closure,
/// so factories are usually written as
/// `|deps: Dependencies| async move { Ok::<_, InstantiateErrorKind>(..) }`.
pub trait Instantiator: Clone + Send + Sync + 'static {
    type Provides: Send + Sync + 'static;
    type Error: Into<InstantiateErrorKind>;

    fn instantiate(&mut self, dependencies: Dependencies) -> impl Future<Output = Result<Self::Provides, Self::Error>> + Send;
}

impl<F, Fut, Response, Err> Instantiator for F
where
    F: FnMut(Dependencies) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Err>> + Send,
    Response: Send + Sync + 'static,
    Err: Into<InstantiateErrorKind>,
{
    type Provides = Response;
    type Error = Err;

    #[inline]
    fn instantiate(&mut self, dependencies: Dependencies) -> impl Future<Output = Result<Self::Provides, Self::Error>> + Send {
        self(dependencies)
    }
}

/// Already resolved dependencies handed to a factory, keyed by the declared keys.
#[derive(Clone, Default)]
#[cfg_attr(feature = "debug", derive(Debug))]
pub struct Dependencies {
    services: ServiceMap,
}

impl Dependencies {
    #[inline]
    #[must_use]
    pub(crate) const fn new(services: ServiceMap) -> Self {
        Self { services }
    }

    /// Returns the value of the declared dependency `key`.
    ///
    /// # Errors
    /// - [`ResolveErrorKind::NotDeclared`] if `key` isn't in the factory's dependency list
    /// - [`ResolveErrorKind::IncorrectType`] if the value isn't a `T`
    pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Result<Arc<T>, ResolveErrorKind> {
        lookup(&self.services, key, |key| ResolveErrorKind::NotDeclared { key })
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.services.contains_key(key)
    }

    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &ServiceKey> {
        self.services.keys()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

pub(crate) struct Provided {
    pub(crate) value: ServiceValue,
    pub(crate) disposer: Option<BoxedDisposer>,
}

pub(crate) type BoxedInstantiator = BoxService<Dependencies, Provided, InstantiateErrorKind>;

#[must_use]
pub(crate) fn boxed_instantiator<Inst: Instantiator>(instantiator: Inst) -> BoxedInstantiator {
    BoxService::new(service_fn(move |dependencies: Dependencies| {
        let mut instantiator = instantiator.clone();

        async move {
            let dependency = instantiator.instantiate(dependencies).await.map_err(Into::into)?;

            debug!("Instantiated");

            Ok(Provided {
                value: Arc::new(dependency) as _,
                disposer: None,
            })
        }
    }))
}

#[must_use]
pub(crate) fn boxed_disposable_instantiator<Inst>(instantiator: Inst) -> BoxedInstantiator
where
    Inst: Instantiator,
    Inst::Provides: Disposable,
{
    BoxService::new(service_fn(move |dependencies: Dependencies| {
        let mut instantiator = instantiator.clone();

        async move {
            let dependency = Arc::new(instantiator.instantiate(dependencies).await.map_err(Into::into)?);

            debug!("Instantiated with release capability");

            Ok(Provided {
                disposer: Some(boxed_disposer(dependency.clone())),
                value: dependency as _,
            })
        }
    }))
}
