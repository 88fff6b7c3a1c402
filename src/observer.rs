use crate::{
    errors::{BuildErrorKind, RegisterErrorKind},
    key::ServiceKey,
    lifecycle::DisposeReport,
};

/// Progress and error notification emitted by a [`crate::Container`].
#[derive(Debug)]
#[non_exhaustive]
pub enum Event<'a> {
    InstanceRegistered { key: &'a ServiceKey, disposable: bool },
    FactoryRegistered { key: &'a ServiceKey, dependencies: &'a [ServiceKey], disposable: bool },
    RegistrationRejected { error: &'a RegisterErrorKind },
    Instantiating { key: &'a ServiceKey },
    Instantiated { key: &'a ServiceKey },
    Built,
    BuildFailed { error: &'a BuildErrorKind },
    Releasing { key: &'a ServiceKey },
    ReleaseFailed { key: &'a ServiceKey, error: &'a anyhow::Error },
    Disposed { report: &'a DisposeReport },
}

/// Logger-like collaborator of a container.
///
/// Only observes: nothing it does changes how services are built or released.
pub trait Observer: Send + Sync {
    fn notify(&self, event: &Event<'_>);
}

impl<F> Observer for F
where
    F: Fn(&Event<'_>) + Send + Sync,
{
    #[inline]
    fn notify(&self, event: &Event<'_>) {
        self(event);
    }
}

#[inline]
pub(crate) fn notify(observer: Option<&dyn Observer>, event: &Event<'_>) {
    if let Some(observer) = observer {
        observer.notify(event);
    }
}
