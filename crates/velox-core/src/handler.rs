//! Handler and middleware callable types.
//!
//! A route binds a [`HandlerChain`]: ordered middleware followed by exactly
//! one terminal handler. Entries are boxed async callables over shared
//! request/response/context handles, so the chain is runtime-agnostic and can
//! suspend inside any entry without blocking other requests.

use crate::context::RouteContext;
use crate::dispatch::Next;
use crate::error::HandlerError;
use crate::request::Request;
use crate::response::ResponseHandle;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed, sendable future.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Outcome of a single chain entry. `Err` aborts the chain and degrades the
/// request to a 500 at the dispatch boundary.
pub type HandlerResult = Result<(), HandlerError>;

/// A boxed terminal handler.
pub type BoxHandler = Arc<
    dyn Fn(Arc<Request>, ResponseHandle, Arc<RouteContext>) -> BoxFuture<HandlerResult>
        + Send
        + Sync,
>;

/// A boxed middleware entry.
///
/// The [`Next`] argument is the continuation: invoking it advances the chain,
/// dropping it halts the chain with whatever response state stands. Halting
/// is a legitimate outcome (an auth middleware that already sent a 401), not
/// an error.
pub type BoxMiddleware = Arc<
    dyn Fn(Arc<Request>, ResponseHandle, Arc<RouteContext>, Next) -> BoxFuture<HandlerResult>
        + Send
        + Sync,
>;

/// Box a handler function.
pub fn handler_fn<F, Fut>(f: F) -> BoxHandler
where
    F: Fn(Arc<Request>, ResponseHandle, Arc<RouteContext>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(move |req, res, ctx| Box::pin(f(req, res, ctx)))
}

/// Box a middleware function.
pub fn middleware_fn<F, Fut>(f: F) -> BoxMiddleware
where
    F: Fn(Arc<Request>, ResponseHandle, Arc<RouteContext>, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(move |req, res, ctx, next| Box::pin(f(req, res, ctx, next)))
}

/// Ordered middleware plus exactly one terminal handler, bound to a method at
/// a trie node.
#[derive(Clone)]
pub struct HandlerChain {
    middleware: Vec<BoxMiddleware>,
    handler: BoxHandler,
}

impl HandlerChain {
    /// A chain with no middleware.
    #[must_use]
    pub fn new(handler: BoxHandler) -> Self {
        Self {
            middleware: Vec::new(),
            handler,
        }
    }

    /// A chain with middleware, preserving order.
    #[must_use]
    pub fn with_middleware(middleware: Vec<BoxMiddleware>, handler: BoxHandler) -> Self {
        Self { middleware, handler }
    }

    /// The middleware entries, in execution order.
    #[must_use]
    pub fn middleware(&self) -> &[BoxMiddleware] {
        &self.middleware
    }

    /// The terminal handler.
    #[must_use]
    pub fn handler(&self) -> &BoxHandler {
        &self.handler
    }

    /// Total number of entries, terminal handler included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.middleware.len() + 1
    }

    /// Always false — a chain has at least its terminal handler.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl std::fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerChain")
            .field("middleware", &self.middleware.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_handler() -> BoxHandler {
        handler_fn(|_req, _res, _ctx| async { Ok(()) })
    }

    #[test]
    fn chain_counts_terminal_handler() {
        let chain = HandlerChain::new(noop_handler());
        assert_eq!(chain.len(), 1);
        assert!(!chain.is_empty());

        let mw = middleware_fn(|_req, _res, _ctx, next| async move { next.run().await });
        let chain = HandlerChain::with_middleware(vec![mw.clone(), mw], noop_handler());
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.middleware().len(), 2);
    }
}
