pub(crate) use futures_core::future::BoxFuture;
