//! Path trie nodes.
//!
//! One node per path position. Literal children are keyed by exact segment;
//! at most one parameter child may exist per node, and every pattern passing
//! through it must agree on the parameter's name — a second name at the same
//! position is a registration-time [`RouteConflict`]. Literal children always
//! win over the parameter child during a walk.

use std::collections::HashMap;
use std::sync::Arc;
use velox_core::{HandlerChain, Method};

/// Split a path into non-empty segments, dropping empties produced by
/// leading, trailing, or doubled slashes.
pub(crate) fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Fatal registration-time contradiction between two parameter names claimed
/// at the same trie position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConflict {
    path: String,
    conflicting: String,
    existing: String,
}

impl RouteConflict {
    fn new(path: &str, conflicting: &str, existing: &str) -> Self {
        Self {
            path: path.to_string(),
            conflicting: conflicting.to_string(),
            existing: existing.to_string(),
        }
    }

    /// The path whose registration triggered the conflict.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The parameter name the new registration tried to bind.
    #[must_use]
    pub fn conflicting_param(&self) -> &str {
        &self.conflicting
    }

    /// The parameter name already bound at that position.
    #[must_use]
    pub fn existing_param(&self) -> &str {
        &self.existing
    }
}

impl std::fmt::Display for RouteConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "route conflict: \"{}\" declares parameter \":{}\" where \":{}\" is already bound at the same position",
            self.path, self.conflicting, self.existing
        )
    }
}

impl std::error::Error for RouteConflict {}

/// A single position in the path tree.
#[derive(Debug, Default)]
pub struct TrieNode {
    children: HashMap<String, TrieNode>,
    param_name: Option<String>,
    param_child: Option<Box<TrieNode>>,
    handlers: HashMap<Method, Arc<HandlerChain>>,
}

impl TrieNode {
    /// An empty root node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk or create nodes along `path` and bind `chain` under `method` at
    /// the terminal node.
    ///
    /// A `:name` segment declares the parameter child; a bare `:` is treated
    /// as a literal segment. Re-binding a method at the same path replaces
    /// the previous chain.
    pub(crate) fn insert_chain(
        &mut self,
        path: &str,
        method: Method,
        chain: Arc<HandlerChain>,
    ) -> Result<(), RouteConflict> {
        let mut node = self;
        for segment in split_path(path) {
            match segment.strip_prefix(':').filter(|name| !name.is_empty()) {
                Some(name) => {
                    if let Some(existing) = &node.param_name {
                        if existing != name {
                            return Err(RouteConflict::new(path, name, existing));
                        }
                    } else {
                        node.param_name = Some(name.to_string());
                    }
                    node = node.param_child.get_or_insert_with(Box::default);
                }
                None => {
                    node = node.children.entry(segment.to_string()).or_default();
                }
            }
        }
        node.handlers.insert(method, chain);
        Ok(())
    }

    /// Walk the trie along a concrete path, literal children first, binding
    /// parameter values into `params` when falling back to the parameter
    /// child. Returns the terminal node, or `None` when the walk dead-ends.
    pub(crate) fn find<'a>(
        &'a self,
        path: &str,
        params: &mut HashMap<String, String>,
    ) -> Option<&'a TrieNode> {
        let mut node = self;
        for segment in split_path(path) {
            if let Some(child) = node.children.get(segment) {
                node = child;
            } else if let (Some(name), Some(child)) = (&node.param_name, &node.param_child) {
                params.insert(name.clone(), segment.to_string());
                node = child;
            } else {
                return None;
            }
        }
        Some(node)
    }

    /// The chain bound to `method` at this node, if any.
    #[must_use]
    pub fn chain(&self, method: Method) -> Option<&Arc<HandlerChain>> {
        self.handlers.get(&method)
    }

    /// Whether any method is bound at this node.
    #[must_use]
    pub fn has_bindings(&self) -> bool {
        !self.handlers.is_empty()
    }

    /// The explicitly bound methods, unordered.
    #[must_use]
    pub fn bound_methods(&self) -> Vec<Method> {
        self.handlers.keys().copied().collect()
    }

    /// True for a dead end: no bindings and no children of either kind.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty() && self.children.is_empty() && self.param_child.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use velox_core::handler_fn;

    fn chain() -> Arc<HandlerChain> {
        Arc::new(HandlerChain::new(handler_fn(|_req, _res, _ctx| async {
            Ok(())
        })))
    }

    #[test]
    fn literal_child_wins_over_param_child() {
        let mut root = TrieNode::new();
        root.insert_chain("/users/:id", Method::Get, chain()).unwrap();
        root.insert_chain("/users/me", Method::Get, chain()).unwrap();

        let mut params = HashMap::new();
        let node = root.find("/users/me", &mut params).unwrap();
        assert!(node.has_bindings());
        assert!(params.is_empty());

        let node = root.find("/users/42", &mut params).unwrap();
        assert!(node.has_bindings());
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn conflicting_param_names_fail_registration() {
        let mut root = TrieNode::new();
        root.insert_chain("/a/:x/b", Method::Get, chain()).unwrap();
        let err = root
            .insert_chain("/a/:y/c", Method::Put, chain())
            .unwrap_err();

        assert_eq!(err.path(), "/a/:y/c");
        assert_eq!(err.conflicting_param(), "y");
        assert_eq!(err.existing_param(), "x");
        assert!(err.to_string().contains("route conflict"));
    }

    #[test]
    fn same_param_name_is_reused() {
        let mut root = TrieNode::new();
        root.insert_chain("/a/:x/b", Method::Get, chain()).unwrap();
        root.insert_chain("/a/:x/c", Method::Put, chain()).unwrap();

        let mut params = HashMap::new();
        assert!(root.find("/a/1/b", &mut params).unwrap().has_bindings());
        assert!(root.find("/a/2/c", &mut params).unwrap().has_bindings());
    }

    #[test]
    fn bare_colon_segment_is_literal() {
        let mut root = TrieNode::new();
        root.insert_chain("/odd/:", Method::Get, chain()).unwrap();

        let mut params = HashMap::new();
        assert!(root.find("/odd/:", &mut params).is_some_and(TrieNode::has_bindings));
        assert!(root.find("/odd/anything", &mut params).is_none());
    }

    #[test]
    fn empty_segments_are_dropped() {
        let mut root = TrieNode::new();
        root.insert_chain("//users///list/", Method::Get, chain())
            .unwrap();

        let mut params = HashMap::new();
        assert!(root.find("/users/list", &mut params).is_some_and(TrieNode::has_bindings));
    }

    #[test]
    fn intermediate_node_has_no_bindings() {
        let mut root = TrieNode::new();
        root.insert_chain("/users/list", Method::Get, chain()).unwrap();

        let mut params = HashMap::new();
        let node = root.find("/users", &mut params).unwrap();
        assert!(!node.has_bindings());
        assert!(!node.is_empty());
    }

    #[test]
    fn rebinding_replaces_chain() {
        let mut root = TrieNode::new();
        let first = chain();
        let second = chain();
        root.insert_chain("/x", Method::Get, Arc::clone(&first)).unwrap();
        root.insert_chain("/x", Method::Get, Arc::clone(&second)).unwrap();

        let mut params = HashMap::new();
        let node = root.find("/x", &mut params).unwrap();
        assert!(Arc::ptr_eq(node.chain(Method::Get).unwrap(), &second));
    }
}
