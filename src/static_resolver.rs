use alloc::sync::Arc;

use crate::{
    any::{lookup, ServiceMap},
    errors::ResolveErrorKind,
    key::ServiceKey,
};

/// Read-only view of the services of a built container.
///
/// Cheap to clone and safe to share between tasks; it never disposes anything.
#[derive(Clone, Default)]
#[cfg_attr(feature = "debug", derive(Debug))]
pub struct StaticResolver {
    services: Arc<ServiceMap>,
}

impl StaticResolver {
    #[inline]
    #[must_use]
    pub(crate) fn new(services: ServiceMap) -> Self {
        Self {
            services: Arc::new(services),
        }
    }

    /// # Errors
    /// - [`ResolveErrorKind::NotFound`] if there is no service named `key`
    /// - [`ResolveErrorKind::IncorrectType`] if the service isn't a `T`
    pub fn resolve<T: Send + Sync + 'static>(&self, key: &str) -> Result<Arc<T>, ResolveErrorKind> {
        lookup(&self.services, key, |key| ResolveErrorKind::NotFound { key })
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
