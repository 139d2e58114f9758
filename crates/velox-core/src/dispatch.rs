//! The dispatch executor.
//!
//! Runs a matched [`HandlerChain`] in order via explicit continuation
//! passing: each middleware receives a [`Next`] and the chain only advances
//! when it is invoked. The executor owns the error boundary — an `Err` from
//! any entry is logged and degraded to a 500 — and guarantees idempotent
//! termination through the finalize-once [`ResponseHandle`].

use crate::context::RouteContext;
use crate::handler::{BoxFuture, HandlerChain, HandlerResult};
use crate::logging;
use crate::request::Request;
use crate::response::ResponseHandle;
use std::sync::Arc;

/// Continuation handed to each middleware entry.
///
/// Invoking [`Next::run`] executes the remainder of the chain and resolves
/// once it completes, so a middleware can do work on both sides of the await
/// (timing, response header stamping). Dropping it without invoking halts the
/// chain silently — whatever response state the middleware left stands.
pub struct Next {
    chain: Arc<HandlerChain>,
    index: usize,
    req: Arc<Request>,
    res: ResponseHandle,
    ctx: Arc<RouteContext>,
}

impl Next {
    /// Run the rest of the chain.
    pub async fn run(self) -> HandlerResult {
        advance(self.chain, self.index, self.req, self.res, self.ctx).await
    }
}

impl std::fmt::Debug for Next {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next")
            .field("index", &self.index)
            .field("remaining", &(self.chain.len() - self.index))
            .finish_non_exhaustive()
    }
}

fn advance(
    chain: Arc<HandlerChain>,
    index: usize,
    req: Arc<Request>,
    res: ResponseHandle,
    ctx: Arc<RouteContext>,
) -> BoxFuture<HandlerResult> {
    Box::pin(async move {
        if let Some(mw) = chain.middleware().get(index) {
            let mw = Arc::clone(mw);
            let next = Next {
                chain: Arc::clone(&chain),
                index: index + 1,
                req: Arc::clone(&req),
                res: res.clone(),
                ctx: Arc::clone(&ctx),
            };
            mw(req, res, ctx, next).await
        } else {
            let handler = Arc::clone(chain.handler());
            handler(req, res, ctx).await
        }
    })
}

/// Execute a chain for one request.
///
/// Any `Err` raised by an entry terminates the request with a 500 — unless an
/// earlier entry already finalized the response, in which case the transport
/// is not touched again.
pub async fn dispatch(
    chain: Arc<HandlerChain>,
    req: Arc<Request>,
    res: ResponseHandle,
    ctx: Arc<RouteContext>,
) {
    if let Err(err) = advance(chain, 0, req, res.clone(), ctx).await {
        logging::error(format!("handler chain failed: {err}"));
        if !res.is_finished() {
            res.send_server_error();
        }
    }
}
