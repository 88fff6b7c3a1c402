use alloc::{collections::BTreeMap, vec::Vec};
use tracing::debug;

use crate::{
    any::{ServiceMap, ServiceValue},
    errors::RegisterErrorKind,
    instantiator::BoxedInstantiator,
    key::ServiceKey,
};

pub(crate) enum ServiceDefinition {
    Instance,
    Factory {
        dependencies: Vec<ServiceKey>,
        instantiator: BoxedInstantiator,
    },
}

/// Declared definitions plus the map of constructed services.
///
/// Instances land in the service map at registration, factories during the build.
#[derive(Default)]
pub(crate) struct Registry {
    definitions: BTreeMap<ServiceKey, ServiceDefinition>,
    factories_order: Vec<ServiceKey>,
    services: ServiceMap,
}

impl Registry {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self {
            definitions: BTreeMap::new(),
            factories_order: Vec::new(),
            services: BTreeMap::new(),
        }
    }

    pub(crate) fn add_instance(&mut self, key: ServiceKey, value: ServiceValue) -> Result<(), RegisterErrorKind> {
        if self.definitions.contains_key(&key) {
            return Err(RegisterErrorKind::AlreadyRegistered { key });
        }

        self.definitions.insert(key.clone(), ServiceDefinition::Instance);
        self.services.insert(key, value);
        Ok(())
    }

    pub(crate) fn add_factory(
        &mut self,
        key: ServiceKey,
        dependencies: Vec<ServiceKey>,
        instantiator: BoxedInstantiator,
    ) -> Result<(), RegisterErrorKind> {
        match self.definitions.get(&key) {
            Some(ServiceDefinition::Factory { .. }) => return Err(RegisterErrorKind::FactoryAlreadyRegistered { key }),
            Some(ServiceDefinition::Instance) => return Err(RegisterErrorKind::AlreadyRegistered { key }),
            None => {}
        }

        self.factories_order.push(key.clone());
        self.definitions.insert(key, ServiceDefinition::Factory { dependencies, instantiator });
        Ok(())
    }

    /// Factory keys in registration order.
    #[inline]
    #[must_use]
    pub(crate) fn factory_keys(&self) -> &[ServiceKey] {
        &self.factories_order
    }

    #[inline]
    #[must_use]
    pub(crate) fn get_service(&self, key: &str) -> Option<ServiceValue> {
        self.services.get(key).cloned()
    }

    #[inline]
    pub(crate) fn insert_service(&mut self, key: ServiceKey, value: ServiceValue) {
        self.services.insert(key, value);
    }

    #[inline]
    #[must_use]
    pub(crate) const fn services(&self) -> &ServiceMap {
        &self.services
    }

    #[must_use]
    pub(crate) fn get_dependencies(&self, key: &str) -> Option<&[ServiceKey]> {
        match self.definitions.get(key) {
            Some(ServiceDefinition::Factory { dependencies, .. }) => Some(dependencies),
            _ => None,
        }
    }

    #[must_use]
    pub(crate) fn get_instantiator_mut(&mut self, key: &str) -> Option<&mut BoxedInstantiator> {
        match self.definitions.get_mut(key) {
            Some(ServiceDefinition::Factory { instantiator, .. }) => Some(instantiator),
            _ => None,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.definitions.clear();
        self.factories_order.clear();
        self.services.clear();
        debug!("Registry cleared");
    }
}
