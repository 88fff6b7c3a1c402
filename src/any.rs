use alloc::{collections::BTreeMap, sync::Arc};
use core::any::{type_name, Any};

use crate::{errors::ResolveErrorKind, key::ServiceKey};

pub(crate) type ServiceValue = Arc<dyn Any + Send + Sync>;
pub(crate) type ServiceMap = BTreeMap<ServiceKey, ServiceValue>;

pub(crate) fn downcast<T: Send + Sync + 'static>(key: &ServiceKey, value: ServiceValue) -> Result<Arc<T>, ResolveErrorKind> {
    value.downcast::<T>().map_err(|_| ResolveErrorKind::IncorrectType {
        key: key.clone(),
        expected: type_name::<T>(),
    })
}

/// Looks up `key` in `map` and downcasts the value, reporting a miss with `on_missing`.
pub(crate) fn lookup<T: Send + Sync + 'static>(
    map: &ServiceMap,
    key: &str,
    on_missing: impl FnOnce(ServiceKey) -> ResolveErrorKind,
) -> Result<Arc<T>, ResolveErrorKind> {
    match map.get_key_value(key) {
        Some((key, value)) => downcast(key, value.clone()),
        None => Err(on_missing(ServiceKey::from(alloc::string::String::from(key)))),
    }
}
