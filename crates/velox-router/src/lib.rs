//! Trie-based route table for the velox framework.
//!
//! One shared trie holds every registered route; each node keeps literal
//! children, at most one named parameter child, and a per-method binding map.
//! Keeping all methods on one node is what lets lookup distinguish "no such
//! path" (404) from "path exists, wrong method" (405 with `Allow`), and what
//! makes derived `HEAD` and synthesized `OPTIONS` possible.
//!
//! [`Router::group`] opens a scoped view over the same trie with an extended
//! prefix and middleware stack; nothing is copied or merged afterward.

#![forbid(unsafe_code)]

mod r#match;
mod router;
mod trie;

pub use r#match::{AllowedMethods, RouteLookup, RouteMatch};
pub use router::{RouteConfig, Router};
pub use trie::{RouteConflict, TrieNode};
