//! velox — a minimal routing and dispatch framework.
//!
//! One shared path trie maps method/path pairs to handler chains; dispatch
//! runs each chain under continuation-passing middleware with a fixed error
//! boundary. The framework never touches a socket: a transport collaborator
//! parses requests and implements [`ResponseTransport`], and [`App::handle`]
//! does the rest.
//!
//! ```
//! use velox::prelude::*;
//! use velox::testing::TestClient;
//!
//! let mut app = App::new();
//! app.router()
//!     .get("/hello/:name", |_req, res, ctx| async move {
//!         let name = ctx.param("name").unwrap_or("world").to_string();
//!         res.send_text(StatusCode::OK, &format!("hello {name}"));
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let client = TestClient::new(app);
//! assert_eq!(client.get("/hello/velox").text(), "hello velox");
//! ```

#![forbid(unsafe_code)]

mod app;
pub mod testing;

pub use app::App;
pub use velox_core::{
    Body, BoxFuture, BoxHandler, BoxMiddleware, HandlerChain, HandlerError, HandlerResult,
    Headers, LogEntry, LogLevel, Method, Next, QueryParams, Request, ResponseHandle,
    ResponseTransport, RouteContext, StatusCode, dispatch, handler_fn, logging, middleware_fn,
    percent_decode,
};
pub use velox_router::{
    AllowedMethods, RouteConflict, RouteConfig, RouteLookup, RouteMatch, Router, TrieNode,
};

/// The common imports for building an app.
pub mod prelude {
    pub use crate::app::App;
    pub use velox_core::{
        HandlerError, HandlerResult, Method, Next, Request, ResponseHandle, RouteContext,
        StatusCode, handler_fn, middleware_fn,
    };
    pub use velox_router::{RouteConfig, RouteConflict, Router};
}
