use alloc::{boxed::Box, string::String, sync::Arc, vec::Vec};
use core::future::Future;
use tracing::{debug, error, info, info_span, warn, Instrument as _};

use crate::{
    any::{lookup, ServiceValue},
    dependency_resolver::DependencyResolver,
    disposable::{boxed_disposer, BoxedDisposer, Disposable},
    errors::{BuildErrorKind, RegisterErrorKind, ResolveErrorKind},
    instantiator::{boxed_disposable_instantiator, boxed_instantiator, BoxedInstantiator, Instantiator},
    key::ServiceKey,
    lifecycle::{DisposeReport, Lifecycle},
    observer::{notify, Event, Observer},
    registry::Registry,
    static_resolver::StaticResolver,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Accepting registrations.
    Unbuilt,
    /// Every factory constructed; registrations closed, services resolvable.
    Built,
    /// Torn down. Terminal.
    Disposed,
}

/// Registry of named services, built once in dependency order and disposed in reverse.
///
/// ```ignore
/// let mut container = Container::new();
/// container
///     .register_instance("x", 1_i32)?
///     .register_factory("y", &["x"], |deps: Dependencies| async move {
///         Ok::<_, InstantiateErrorKind>(*deps.get::<i32>("x")? + 1)
///     })?;
/// container.build().await?;
///
/// assert_eq!(*container.resolve::<i32>("y")?, 2);
/// container.dispose().await;
/// ```
pub struct Container {
    registry: Registry,
    lifecycle: Lifecycle,
    observer: Option<Box<dyn Observer>>,
    state: State,
    /// Set by a failed build. The container stays `Unbuilt`, but can't be built again.
    build_failed: bool,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            registry: Registry::new(),
            lifecycle: Lifecycle::new(),
            observer: None,
            state: State::Unbuilt,
            build_failed: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_observer(observer: impl Observer + 'static) -> Self {
        Self {
            registry: Registry::new(),
            lifecycle: Lifecycle::new(),
            observer: Some(Box::new(observer)),
            state: State::Unbuilt,
            build_failed: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    /// Binds `key` to an already constructed value.
    ///
    /// # Errors
    /// - [`RegisterErrorKind::RegistrationClosed`] if the container is built or disposed
    /// - [`RegisterErrorKind::AlreadyRegistered`] if `key` is already bound
    pub fn register_instance<T>(&mut self, key: impl Into<ServiceKey>, value: T) -> Result<&mut Self, RegisterErrorKind>
    where
        T: Send + Sync + 'static,
    {
        self.add_instance(key.into(), Arc::new(value), None)
    }

    /// Same as [`Self::register_instance`], but the value is released on [`Self::dispose`].
    ///
    /// The value counts as constructed now, so it's released after everything built from it.
    ///
    /// # Errors
    /// See [`Self::register_instance`].
    pub fn register_disposable_instance<T>(&mut self, key: impl Into<ServiceKey>, value: T) -> Result<&mut Self, RegisterErrorKind>
    where
        T: Disposable,
    {
        let value = Arc::new(value);
        let disposer = boxed_disposer(value.clone());
        self.add_instance(key.into(), value, Some(disposer))
    }

    /// Binds `key` to a factory called once during [`Self::build`], after every key of `dependencies`.
    ///
    /// Repeated dependency keys are ignored.
    ///
    /// # Errors
    /// - [`RegisterErrorKind::RegistrationClosed`] if the container is built or disposed
    /// - [`RegisterErrorKind::FactoryAlreadyRegistered`] if a factory for `key` exists
    /// - [`RegisterErrorKind::AlreadyRegistered`] if an instance for `key` exists
    pub fn register_factory<Inst>(
        &mut self,
        key: impl Into<ServiceKey>,
        dependencies: &[&str],
        instantiator: Inst,
    ) -> Result<&mut Self, RegisterErrorKind>
    where
        Inst: Instantiator,
    {
        self.add_factory(key.into(), dependencies, boxed_instantiator(instantiator), false)
    }

    /// Same as [`Self::register_factory`], but the constructed value is released on [`Self::dispose`].
    ///
    /// # Errors
    /// See [`Self::register_factory`].
    pub fn register_disposable_factory<Inst>(
        &mut self,
        key: impl Into<ServiceKey>,
        dependencies: &[&str],
        instantiator: Inst,
    ) -> Result<&mut Self, RegisterErrorKind>
    where
        Inst: Instantiator,
        Inst::Provides: Disposable,
    {
        self.add_factory(key.into(), dependencies, boxed_disposable_instantiator(instantiator), true)
    }

    /// Constructs every registered factory in dependency order.
    ///
    /// # Warning
    /// A failed build isn't rolled back: services constructed before the error stay in the
    /// container and are still released by [`Self::dispose`]. Later builds of the same container
    /// are refused, dispose it and register into a new one.
    ///
    /// # Errors
    /// - [`BuildErrorKind::DependencyCycle`] if a factory depends on itself, directly or not
    /// - [`BuildErrorKind::Unresolvable`] if a dependency isn't registered or a factory failed
    /// - [`BuildErrorKind::AlreadyFailed`] if an earlier build of this container failed
    /// - [`BuildErrorKind::Disposed`] if the container is disposed
    pub async fn build(&mut self) -> Result<(), BuildErrorKind> {
        match self.state {
            State::Built => {
                debug!("Already built");
                return Ok(());
            }
            State::Disposed => return Err(self.reject_build(BuildErrorKind::Disposed)),
            State::Unbuilt if self.build_failed => return Err(self.reject_build(BuildErrorKind::AlreadyFailed)),
            State::Unbuilt => {}
        }

        let span = info_span!("build", factories = self.registry.factory_keys().len());
        let result = {
            let mut resolver = DependencyResolver::new(&mut self.registry, &mut self.lifecycle, self.observer.as_deref());
            resolver.resolve_all().instrument(span).await
        };

        match result {
            Ok(()) => {
                self.state = State::Built;
                info!(services = self.registry.services().len(), "Built");
                notify(self.observer.as_deref(), &Event::Built);
                Ok(())
            }
            Err(err) => {
                self.build_failed = true;
                Err(self.reject_build(err))
            }
        }
    }

    /// Returns the service bound to `key`.
    ///
    /// # Errors
    /// - [`ResolveErrorKind::NotBuilt`] if [`Self::build`] hasn't succeeded yet
    /// - [`ResolveErrorKind::NotFound`] if there is no service named `key`, or the container is disposed
    /// - [`ResolveErrorKind::IncorrectType`] if the service isn't a `T`
    pub fn resolve<T: Send + Sync + 'static>(&self, key: &str) -> Result<Arc<T>, ResolveErrorKind> {
        if self.state == State::Unbuilt {
            let err = ResolveErrorKind::NotBuilt;
            error!(service = key, "{}", err);
            return Err(err);
        }

        lookup(self.registry.services(), key, |key| ResolveErrorKind::NotFound { key }).inspect_err(|err| error!("{}", err))
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.state == State::Built && self.registry.services().contains_key(key)
    }

    /// Read-only view of the built services that outlives borrows of the container.
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::NotBuilt`] if [`Self::build`] hasn't succeeded yet.
    pub fn snapshot(&self) -> Result<StaticResolver, ResolveErrorKind> {
        match self.state {
            State::Unbuilt => Err(ResolveErrorKind::NotBuilt),
            State::Built | State::Disposed => Ok(StaticResolver::new(self.registry.services().clone())),
        }
    }

    /// Releases every disposable service in reverse construction order and clears the container.
    ///
    /// Valid in any state, also after a failed build. Only the first call does anything.
    /// Failed releases don't stop the teardown, they're listed in the returned report.
    pub async fn dispose(&mut self) -> DisposeReport {
        if self.state == State::Disposed {
            debug!("Already disposed");
            return DisposeReport::default();
        }

        info!(disposables = self.lifecycle.len(), "Disposing");

        let report = self.lifecycle.release_all(self.observer.as_deref()).await;
        self.registry.clear();
        self.state = State::Disposed;

        if report.is_ok() {
            info!("{}", report);
        } else {
            warn!("{}", report);
        }
        notify(self.observer.as_deref(), &Event::Disposed { report: &report });

        report
    }

    /// Builds the container, runs `f` with its services and disposes it afterwards.
    ///
    /// If the build fails, whatever was constructed is disposed before the error is returned.
    ///
    /// # Errors
    /// See [`Self::build`].
    pub async fn scoped<F, Fut, T>(mut self, f: F) -> Result<(T, DisposeReport), BuildErrorKind>
    where
        F: FnOnce(StaticResolver) -> Fut,
        Fut: Future<Output = T>,
    {
        if let Err(err) = self.build().await {
            self.dispose().await;
            return Err(err);
        }

        let output = f(StaticResolver::new(self.registry.services().clone())).await;
        let report = self.dispose().await;

        Ok((output, report))
    }
}

impl Container {
    fn ensure_open(&self, key: &ServiceKey) -> Result<(), RegisterErrorKind> {
        match self.state {
            State::Unbuilt => Ok(()),
            State::Built | State::Disposed => Err(self.registration_rejected(RegisterErrorKind::RegistrationClosed { key: key.clone() })),
        }
    }

    fn registration_rejected(&self, err: RegisterErrorKind) -> RegisterErrorKind {
        error!("{}", err);
        notify(self.observer.as_deref(), &Event::RegistrationRejected { error: &err });
        err
    }

    fn reject_build(&self, err: BuildErrorKind) -> BuildErrorKind {
        error!("Build failed: {}", err);
        notify(self.observer.as_deref(), &Event::BuildFailed { error: &err });
        err
    }

    fn add_instance(&mut self, key: ServiceKey, value: ServiceValue, disposer: Option<BoxedDisposer>) -> Result<&mut Self, RegisterErrorKind> {
        self.ensure_open(&key)?;
        if let Err(err) = self.registry.add_instance(key.clone(), value) {
            return Err(self.registration_rejected(err));
        }

        let disposable = disposer.is_some();
        if let Some(disposer) = disposer {
            self.lifecycle.push(key.clone(), disposer);
        }

        info!(service = %key, disposable, "Instance registered");
        notify(self.observer.as_deref(), &Event::InstanceRegistered { key: &key, disposable });
        Ok(self)
    }

    fn add_factory(
        &mut self,
        key: ServiceKey,
        dependencies: &[&str],
        instantiator: BoxedInstantiator,
        disposable: bool,
    ) -> Result<&mut Self, RegisterErrorKind> {
        self.ensure_open(&key)?;

        let mut keys: Vec<ServiceKey> = Vec::with_capacity(dependencies.len());
        for &dependency in dependencies {
            if !keys.iter().any(|key| key.as_str() == dependency) {
                keys.push(ServiceKey::from(String::from(dependency)));
            }
        }

        if let Err(err) = self.registry.add_factory(key.clone(), keys.clone(), instantiator) {
            return Err(self.registration_rejected(err));
        }

        info!(service = %key, dependencies = ?keys, disposable, "Factory registered");
        notify(
            self.observer.as_deref(),
            &Event::FactoryRegistered {
                key: &key,
                dependencies: &keys,
                disposable,
            },
        );
        Ok(self)
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        if !self.lifecycle.is_empty() {
            warn!(disposables = self.lifecycle.len(), "Container dropped without dispose, services weren't released");
        }
    }
}
