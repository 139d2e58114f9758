//! Lookup results.
//!
//! [`Router::lookup`](crate::Router::lookup) is total: every method/path pair
//! maps to exactly one [`RouteLookup`] variant, which in turn fixes the
//! boundary response — 404 for [`RouteLookup::NotFound`], 405 with an `Allow`
//! header for [`RouteLookup::MethodNotAllowed`], a synthesized 204 for
//! [`RouteLookup::Options`].

use std::collections::HashMap;
use std::sync::Arc;
use velox_core::{HandlerChain, Method};

/// A successful lookup: the bound chain plus the parameter values captured
/// while walking the trie.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The chain registered for this method and path, group and per-route
    /// middleware already merged.
    pub chain: Arc<HandlerChain>,
    /// Captured `:param` values, keyed by parameter name.
    pub params: HashMap<String, String>,
}

/// Outcome of resolving a method and path against the route table.
#[derive(Debug)]
pub enum RouteLookup {
    /// A chain is bound for this method at this path.
    Match(RouteMatch),
    /// The path exists and has bindings, the request is `OPTIONS`, and no
    /// explicit `OPTIONS` chain is bound: answer with a synthesized 204.
    Options {
        /// The methods to advertise in `Allow`.
        allowed: AllowedMethods,
    },
    /// The path exists with bindings, but not for this method.
    MethodNotAllowed {
        /// The methods to advertise in `Allow`.
        allowed: AllowedMethods,
    },
    /// No node for this path, or a node without any method binding.
    NotFound,
}

/// The advertised method set for a path, normalized for the `Allow` header.
///
/// `HEAD` is implied by a `GET` binding and `OPTIONS` is always answerable,
/// so both are added when absent. Order is canonical and deterministic
/// regardless of registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedMethods {
    methods: Vec<Method>,
}

impl AllowedMethods {
    /// Normalize a set of explicitly bound methods.
    #[must_use]
    pub fn new(mut methods: Vec<Method>) -> Self {
        if methods.contains(&Method::Get) && !methods.contains(&Method::Head) {
            methods.push(Method::Head);
        }
        if !methods.contains(&Method::Options) {
            methods.push(Method::Options);
        }
        methods.sort_by_key(|m| method_order(*m));
        methods.dedup();
        Self { methods }
    }

    /// The normalized methods in canonical order.
    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Whether `method` is in the advertised set.
    #[must_use]
    pub fn contains(&self, method: Method) -> bool {
        self.methods.contains(&method)
    }

    /// The `Allow` header value, comma-space separated.
    #[must_use]
    pub fn header_value(&self) -> String {
        let tokens: Vec<&str> = self.methods.iter().map(|m| m.as_str()).collect();
        tokens.join(", ")
    }
}

fn method_order(method: Method) -> u8 {
    match method {
        Method::Get => 0,
        Method::Head => 1,
        Method::Post => 2,
        Method::Put => 3,
        Method::Delete => 4,
        Method::Patch => 5,
        Method::Options => 6,
    }
}
