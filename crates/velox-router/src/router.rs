//! Route registration and lookup.

use crate::r#match::{AllowedMethods, RouteLookup, RouteMatch};
use crate::trie::{RouteConflict, TrieNode};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use velox_core::{
    BoxHandler, BoxMiddleware, HandlerChain, HandlerResult, Method, Request, ResponseHandle,
    RouteContext, handler_fn,
};

/// Per-route options supplied at registration.
#[derive(Default)]
pub struct RouteConfig {
    /// Middleware to run for this route only, after any group middleware.
    pub middleware: Vec<BoxMiddleware>,
}

impl RouteConfig {
    /// A config carrying only route-scoped middleware.
    #[must_use]
    pub fn with_middleware(middleware: Vec<BoxMiddleware>) -> Self {
        Self { middleware }
    }
}

impl std::fmt::Debug for RouteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteConfig")
            .field("middleware", &self.middleware.len())
            .finish()
    }
}

/// Trie-backed route table.
///
/// Registration binds a method and path pattern to a [`HandlerChain`]; lookup
/// resolves a concrete method and path to a [`RouteLookup`]. Group views
/// created by [`Router::group`] share the same trie, so routes registered
/// through a group are visible to the parent and vice versa.
pub struct Router {
    root: Arc<RwLock<TrieNode>>,
    prefix: String,
    middleware: Vec<BoxMiddleware>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! method_shorthand {
    ($(#[$doc:meta])* $name:ident, $with_name:ident, $method:expr) => {
        $(#[$doc])*
        ///
        /// # Errors
        ///
        /// Returns [`RouteConflict`] when the pattern declares a parameter
        /// name that contradicts one already bound at the same position.
        pub fn $name<F, Fut>(&mut self, path: &str, handler: F) -> Result<(), RouteConflict>
        where
            F: Fn(Arc<Request>, ResponseHandle, Arc<RouteContext>) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = HandlerResult> + Send + 'static,
        {
            self.route($method, path, handler_fn(handler), RouteConfig::default())
        }

        /// Same as the plain variant, with per-route [`RouteConfig`].
        ///
        /// # Errors
        ///
        /// Returns [`RouteConflict`] when the pattern declares a parameter
        /// name that contradicts one already bound at the same position.
        pub fn $with_name<F, Fut>(
            &mut self,
            path: &str,
            handler: F,
            config: RouteConfig,
        ) -> Result<(), RouteConflict>
        where
            F: Fn(Arc<Request>, ResponseHandle, Arc<RouteContext>) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = HandlerResult> + Send + 'static,
        {
            self.route($method, path, handler_fn(handler), config)
        }
    };
}

impl Router {
    /// An empty router with no prefix and no inherited middleware.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Arc::new(RwLock::new(TrieNode::new())),
            prefix: String::new(),
            middleware: Vec::new(),
        }
    }

    method_shorthand!(
        /// Register a `GET` route.
        get, get_with, Method::Get);
    method_shorthand!(
        /// Register a `POST` route.
        post, post_with, Method::Post);
    method_shorthand!(
        /// Register a `PUT` route.
        put, put_with, Method::Put);
    method_shorthand!(
        /// Register a `PATCH` route.
        patch, patch_with, Method::Patch);
    method_shorthand!(
        /// Register a `DELETE` route.
        delete, delete_with, Method::Delete);
    method_shorthand!(
        /// Register an explicit `HEAD` route, overriding the `GET` fallback.
        head, head_with, Method::Head);
    method_shorthand!(
        /// Register an explicit `OPTIONS` route, overriding the synthesized
        /// 204 response.
        options, options_with, Method::Options);

    /// Register a pre-boxed handler under an arbitrary method.
    ///
    /// The bound chain is the group middleware accumulated so far, then
    /// `config.middleware`, then `handler`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteConflict`] when the pattern declares a parameter name
    /// that contradicts one already bound at the same position.
    pub fn route(
        &mut self,
        method: Method,
        path: &str,
        handler: BoxHandler,
        config: RouteConfig,
    ) -> Result<(), RouteConflict> {
        let full = combine_paths(&self.prefix, path);
        let mut middleware = self.middleware.clone();
        middleware.extend(config.middleware);
        let chain = Arc::new(HandlerChain::with_middleware(middleware, handler));
        self.root.write().insert_chain(&full, method, chain)
    }

    /// Open a nested group.
    ///
    /// `init` receives a sub-router whose prefix is this router's prefix
    /// joined with `prefix` and whose middleware is this router's middleware
    /// followed by `middleware`. The sub-router writes into the same trie;
    /// only the view is scoped, and it ends when `init` returns.
    ///
    /// # Errors
    ///
    /// Propagates the first [`RouteConflict`] raised inside `init`.
    pub fn group<F>(
        &mut self,
        prefix: &str,
        middleware: Vec<BoxMiddleware>,
        init: F,
    ) -> Result<(), RouteConflict>
    where
        F: FnOnce(&mut Router) -> Result<(), RouteConflict>,
    {
        let mut scoped_middleware = self.middleware.clone();
        scoped_middleware.extend(middleware);
        let mut sub = Router {
            root: Arc::clone(&self.root),
            prefix: combine_paths(&self.prefix, prefix),
            middleware: scoped_middleware,
        };
        init(&mut sub)
    }

    /// Resolve a concrete method and path.
    ///
    /// Total and infallible: the trie walk prefers literal children, falls
    /// back to the parameter child, and dead-ends as
    /// [`RouteLookup::NotFound`]. A `HEAD` request with no explicit `HEAD`
    /// binding falls back to the `GET` chain; an `OPTIONS` request with no
    /// explicit binding yields [`RouteLookup::Options`] for the boundary to
    /// answer with a 204.
    #[must_use]
    pub fn lookup(&self, method: Method, path: &str) -> RouteLookup {
        let root = self.root.read();
        let mut params = HashMap::new();
        let Some(node) = root.find(path, &mut params) else {
            return RouteLookup::NotFound;
        };
        if !node.has_bindings() {
            return RouteLookup::NotFound;
        }
        if let Some(chain) = node.chain(method) {
            return RouteLookup::Match(RouteMatch {
                chain: Arc::clone(chain),
                params,
            });
        }
        if method == Method::Head {
            if let Some(chain) = node.chain(Method::Get) {
                return RouteLookup::Match(RouteMatch {
                    chain: Arc::clone(chain),
                    params,
                });
            }
        }
        let allowed = AllowedMethods::new(node.bound_methods());
        if method == Method::Options {
            RouteLookup::Options { allowed }
        } else {
            RouteLookup::MethodNotAllowed { allowed }
        }
    }

    /// The accumulated path prefix of this view.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("prefix", &self.prefix)
            .field("middleware", &self.middleware.len())
            .finish_non_exhaustive()
    }
}

/// Join two path fragments with exactly one slash, always producing a
/// leading-slash path. Empty fragments collapse; both empty yields `/`.
fn combine_paths(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_matches('/');
    let path = path.trim_matches('/');
    match (prefix.is_empty(), path.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{path}"),
        (false, true) => format!("/{prefix}"),
        (false, false) => format!("/{prefix}/{path}"),
    }
}
