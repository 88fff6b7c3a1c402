use alloc::vec::Vec;
use core::fmt::{self, Display, Formatter};
use tracing::{debug, error};

use crate::{
    disposable::BoxedDisposer,
    key::ServiceKey,
    observer::{notify, Event, Observer},
    service::Service as _,
};

pub(crate) struct DisposableEntry {
    key: ServiceKey,
    disposer: BoxedDisposer,
}

/// Disposables in the order they were constructed (or registered, for instances).
#[derive(Default)]
pub(crate) struct Lifecycle {
    entries: Vec<DisposableEntry>,
}

impl Lifecycle {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    #[inline]
    pub(crate) fn push(&mut self, key: ServiceKey, disposer: BoxedDisposer) {
        debug!(service = %key, "Pushed to disposables");
        self.entries.push(DisposableEntry { key, disposer });
    }

    #[inline]
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Releases every recorded value in LIFO order, draining the list.
    ///
    /// A failed release is recorded and the teardown goes on with the next entry.
    pub(crate) async fn release_all(&mut self, observer: Option<&dyn Observer>) -> DisposeReport {
        let mut report = DisposeReport::default();

        while let Some(DisposableEntry { key, mut disposer }) = self.entries.pop() {
            notify(observer, &Event::Releasing { key: &key });

            match disposer.call(()).await {
                Ok(()) => debug!(service = %key, "Released"),
                Err(err) => {
                    error!(service = %key, "Release failed: {:#}", err);
                    notify(observer, &Event::ReleaseFailed { key: &key, error: &err });
                    report.failures.push(DisposeFailure { key, error: err });
                }
            }
        }

        report
    }
}

/// Release of one service that failed during teardown.
#[derive(Debug)]
pub struct DisposeFailure {
    key: ServiceKey,
    error: anyhow::Error,
}

impl DisposeFailure {
    #[inline]
    #[must_use]
    pub const fn key(&self) -> &ServiceKey {
        &self.key
    }

    #[inline]
    #[must_use]
    pub const fn error(&self) -> &anyhow::Error {
        &self.error
    }
}

/// Outcome of [`crate::Container::dispose`].
///
/// Teardown always completes; the report only lists the releases that failed.
#[derive(Debug, Default)]
pub struct DisposeReport {
    failures: Vec<DisposeFailure>,
}

impl DisposeReport {
    #[inline]
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn failures(&self) -> &[DisposeFailure] {
        &self.failures
    }

    #[inline]
    pub fn failed_keys(&self) -> impl Iterator<Item = &ServiceKey> {
        self.failures.iter().map(DisposeFailure::key)
    }
}

impl Display for DisposeReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            return write!(f, "All services released");
        }

        write!(f, "Some services failed to release: ")?;
        for (index, key) in self.failed_keys().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}
