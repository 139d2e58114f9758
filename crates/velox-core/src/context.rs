//! Per-request route context.

use crate::query::QueryParams;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Request-scoped data produced by route matching.
///
/// Created fresh for every matched request and dropped at request end; never
/// shared across requests. The whole handler chain sees one context through an
/// `Arc`, so the extension slot uses interior mutability: middleware may
/// deposit typed values (an authenticated user, say) for downstream entries to
/// read.
#[derive(Debug)]
pub struct RouteContext {
    path: String,
    params: HashMap<String, String>,
    query: QueryParams,
    extensions: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl RouteContext {
    /// Build a context from the matched path, extracted parameters, and
    /// parsed query string.
    #[must_use]
    pub fn new(path: impl Into<String>, params: HashMap<String, String>, query: QueryParams) -> Self {
        Self {
            path: path.into(),
            params,
            query,
            extensions: RwLock::new(HashMap::new()),
        }
    }

    /// The concrete request path this context was built for.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// A single path parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// All extracted path parameters.
    #[must_use]
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Parsed query parameters.
    #[must_use]
    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    /// Deposit a typed extension value, replacing any previous value of the
    /// same type.
    pub fn insert_extension<T: Any + Send + Sync>(&self, value: T) {
        self.extensions
            .write()
            .insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Read a typed extension value out of the context.
    ///
    /// Values are cloned out because the slot is shared across the chain; keep
    /// extension types cheap to clone (or wrap them in `Arc`).
    #[must_use]
    pub fn extension<T: Any + Send + Sync + Clone>(&self) -> Option<T> {
        self.extensions
            .read()
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
            .cloned()
    }

    /// Whether an extension of type `T` has been deposited.
    #[must_use]
    pub fn has_extension<T: Any + Send + Sync>(&self) -> bool {
        self.extensions.read().contains_key(&TypeId::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct User {
        id: u64,
        name: String,
    }

    fn ctx() -> RouteContext {
        let mut params = HashMap::new();
        params.insert("id".to_string(), "42".to_string());
        RouteContext::new("/users/42", params, QueryParams::parse("page=2"))
    }

    #[test]
    fn exposes_path_params_and_query() {
        let ctx = ctx();
        assert_eq!(ctx.path(), "/users/42");
        assert_eq!(ctx.param("id"), Some("42"));
        assert_eq!(ctx.param("missing"), None);
        assert_eq!(ctx.query().get("page"), Some("2"));
    }

    #[test]
    fn extensions_round_trip_by_type() {
        let ctx = ctx();
        assert!(!ctx.has_extension::<User>());
        assert_eq!(ctx.extension::<User>(), None);

        ctx.insert_extension(User {
            id: 42,
            name: "Bob".to_string(),
        });
        assert!(ctx.has_extension::<User>());
        assert_eq!(
            ctx.extension::<User>(),
            Some(User {
                id: 42,
                name: "Bob".to_string()
            })
        );
    }

    #[test]
    fn later_insert_replaces_earlier_value() {
        let ctx = ctx();
        ctx.insert_extension(7u64);
        ctx.insert_extension(9u64);
        assert_eq!(ctx.extension::<u64>(), Some(9));
    }
}
