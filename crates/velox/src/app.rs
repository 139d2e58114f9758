//! The application boundary.
//!
//! [`App`] glues a [`Router`] to a transport: the transport collaborator
//! parses a request off the wire, hands it in with a [`ResponseTransport`],
//! and [`App::handle`] guarantees a deterministic terminal response for every
//! lookup outcome.

use std::sync::Arc;
use velox_core::{
    Method, QueryParams, Request, ResponseHandle, ResponseTransport, RouteContext, StatusCode,
    dispatch, logging,
};
use velox_router::{RouteLookup, Router};

/// A routing application.
///
/// Owns the route table; request entry point for transports and the test
/// client.
#[derive(Debug, Default)]
pub struct App {
    router: Router,
}

impl App {
    /// An app with an empty route table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    /// The route table, for registration.
    pub fn router(&mut self) -> &mut Router {
        &mut self.router
    }

    /// Handle one request to completion.
    ///
    /// Boundary behavior:
    /// - no route — 404 with body `{"error":"Not found"}`
    /// - path bound but not for this method — 405 with an `Allow` header and
    ///   an empty body
    /// - unbound `OPTIONS` — synthesized 204 with `Allow`
    /// - `HEAD` — runs the `GET` chain when no explicit `HEAD` binding
    ///   exists; body bytes are suppressed at the response layer either way
    /// - a failed chain that never finalized — 500 with body
    ///   `{"error":"Internal Server Error"}`
    pub async fn handle(&self, request: Request, transport: impl ResponseTransport + 'static) {
        let suppress_body = request.method() == Method::Head;
        let res = ResponseHandle::new(transport, suppress_body);

        match self.router.lookup(request.method(), request.path()) {
            RouteLookup::Match(matched) => {
                let query = request
                    .query()
                    .map(QueryParams::parse)
                    .unwrap_or_default();
                let ctx = Arc::new(RouteContext::new(request.path(), matched.params, query));
                dispatch(matched.chain, Arc::new(request), res, ctx).await;
            }
            RouteLookup::Options { allowed } => {
                res.send(
                    StatusCode::NO_CONTENT,
                    &[("Allow".to_string(), allowed.header_value())],
                    &[],
                );
            }
            RouteLookup::MethodNotAllowed { allowed } => {
                res.send(
                    StatusCode::METHOD_NOT_ALLOWED,
                    &[("Allow".to_string(), allowed.header_value())],
                    &[],
                );
            }
            RouteLookup::NotFound => {
                logging::debug(format!(
                    "no route for {} {}",
                    request.method(),
                    request.path()
                ));
                res.send_not_found();
            }
        }
    }
}
