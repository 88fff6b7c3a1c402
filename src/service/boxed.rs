use alloc::boxed::Box;

use super::base::Service;
use crate::utils::future::BoxFuture;

type BoxServiceInner<Request, Response, Error> =
    Box<dyn Service<Request, Response = Response, Error = Error, Future = BoxFuture<'static, Result<Response, Error>>> + Send + Sync>;

/// Type-erased service whose futures are boxed and `'static`.
pub(crate) struct BoxService<Request, Response, Error>(BoxServiceInner<Request, Response, Error>);

impl<Request, Response, Error> BoxService<Request, Response, Error> {
    pub(crate) fn new<S>(inner: S) -> Self
    where
        S: Service<Request, Response = Response, Error = Error> + Send + Sync + 'static,
        S::Future: Send + 'static,
    {
        BoxService(Box::new(Pinned(inner)))
    }
}

/// Boxes the futures of the wrapped service so it fits behind `dyn Service`.
struct Pinned<S>(S);

impl<S, Request> Service<Request> for Pinned<S>
where
    S: Service<Request>,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<S::Response, S::Error>>;

    #[inline]
    fn call(&mut self, request: Request) -> Self::Future {
        Box::pin(self.0.call(request))
    }
}

impl<Request, Response, Error> Service<Request> for BoxService<Request, Response, Error> {
    type Response = Response;
    type Error = Error;
    type Future = BoxFuture<'static, Result<Response, Error>>;

    #[inline]
    fn call(&mut self, request: Request) -> Self::Future {
        self.0.call(request)
    }
}
