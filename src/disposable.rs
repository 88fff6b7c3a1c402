use alloc::sync::Arc;
use core::future::Future;

use crate::service::{service_fn, BoxService};

/// Release capability of a service value.
///
/// The container calls [`Disposable::dispose`] exactly once per recorded value during
/// [`crate::Container::dispose`], in reverse construction order, so a service is always
/// released before the services it was built from.
///
/// A failed release doesn't stop the teardown; it's reported in [`crate::DisposeReport`].
pub trait Disposable: Send + Sync + 'static {
    fn dispose(&self) -> impl Future<Output = Result<(), anyhow::Error>> + Send;
}

pub(crate) type BoxedDisposer = BoxService<(), (), anyhow::Error>;

#[must_use]
pub(crate) fn boxed_disposer<Dep: Disposable>(dependency: Arc<Dep>) -> BoxedDisposer {
    BoxService::new(service_fn(move |()| {
        let dependency = dependency.clone();
        async move { dependency.dispose().await }
    }))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{boxed_disposer, Disposable};
    use crate::service::Service as _;

    use alloc::sync::Arc;
    use core::{
        future::Future,
        sync::atomic::{AtomicU8, Ordering},
    };

    struct Connection(Arc<AtomicU8>);

    impl Disposable for Connection {
        fn dispose(&self) -> impl Future<Output = Result<(), anyhow::Error>> + Send {
            let closed = self.0.clone();
            async move {
                if closed.fetch_add(1, Ordering::SeqCst) > 0 {
                    anyhow::bail!("connection already closed");
                }
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_boxed_disposer_keeps_value_alive() {
        let closed = Arc::new(AtomicU8::new(0));
        let mut disposer = boxed_disposer(Arc::new(Connection(closed.clone())));

        disposer.call(()).await.unwrap();
        assert_eq!(closed.load(Ordering::SeqCst), 1);

        let err = disposer.call(()).await.unwrap_err();
        assert_eq!(alloc::format!("{err}"), "connection already closed");
    }
}
