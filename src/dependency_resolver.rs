use alloc::{boxed::Box, vec::Vec};
use async_recursion::async_recursion;
use tracing::{debug, debug_span, error, Instrument as _};

use crate::{
    any::{ServiceMap, ServiceValue},
    errors::BuildErrorKind,
    instantiator::{Dependencies, Provided},
    key::ServiceKey,
    lifecycle::Lifecycle,
    observer::{notify, Event, Observer},
    registry::Registry,
    service::Service as _,
};

/// Depth-first construction of every declared factory.
///
/// Lives for one build: the in-progress stack is never shared between builds.
pub(crate) struct DependencyResolver<'a> {
    registry: &'a mut Registry,
    lifecycle: &'a mut Lifecycle,
    observer: Option<&'a dyn Observer>,
    stack: Vec<ServiceKey>,
}

impl<'a> DependencyResolver<'a> {
    #[inline]
    #[must_use]
    pub(crate) fn new(registry: &'a mut Registry, lifecycle: &'a mut Lifecycle, observer: Option<&'a dyn Observer>) -> Self {
        Self {
            registry,
            lifecycle,
            observer,
            stack: Vec::new(),
        }
    }

    /// Resolves factories in registration order, stopping at the first error.
    ///
    /// Services constructed before the error stay in the service map.
    pub(crate) async fn resolve_all(&mut self) -> Result<(), BuildErrorKind> {
        let keys = self.registry.factory_keys().to_vec();
        for key in keys {
            if self.registry.get_service(key.as_str()).is_some() {
                continue;
            }
            self.resolve(key).await?;
        }
        Ok(())
    }

    #[async_recursion]
    pub(crate) async fn resolve(&mut self, key: ServiceKey) -> Result<ServiceValue, BuildErrorKind> {
        if let Some(service) = self.registry.get_service(key.as_str()) {
            debug!(service = %key, "Found in service map");
            return Ok(service);
        }

        if let Some(start) = self.stack.iter().position(|in_progress| *in_progress == key) {
            let err = BuildErrorKind::DependencyCycle {
                path: self.stack[start..].to_vec(),
            };
            error!("{}", err);
            return Err(err);
        }

        let Some(dependencies) = self.registry.get_dependencies(key.as_str()).map(<[_]>::to_vec) else {
            let err = BuildErrorKind::Unresolvable { key, reason: None };
            error!("{}", err);
            return Err(err);
        };

        self.stack.push(key.clone());

        let mut resolved = ServiceMap::new();
        for dependency in dependencies {
            let service = self.resolve(dependency.clone()).await?;
            resolved.insert(dependency, service);
        }

        let Some(instantiator) = self.registry.get_instantiator_mut(key.as_str()) else {
            let err = BuildErrorKind::Unresolvable { key, reason: None };
            error!("{}", err);
            return Err(err);
        };

        debug!(service = %key, dependencies = resolved.len(), "Instantiating");
        notify(self.observer, &Event::Instantiating { key: &key });

        let future = instantiator.call(Dependencies::new(resolved));
        let Provided { value, disposer } = match future.instrument(debug_span!("instantiate", service = %key)).await {
            Ok(provided) => provided,
            Err(reason) => {
                let err = BuildErrorKind::Unresolvable { key, reason: Some(reason) };
                error!("{}", err);
                return Err(err);
            }
        };

        self.registry.insert_service(key.clone(), value.clone());
        if let Some(disposer) = disposer {
            self.lifecycle.push(key.clone(), disposer);
        }
        self.stack.pop();

        notify(self.observer, &Event::Instantiated { key: &key });
        Ok(value)
    }
}
