//! Error types for graph operations

use super::Key;
use thiserror::Error;

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors produced by graph validation and subgraph integration.
///
/// Builder misuse (missing endpoints, self-loops, duplicate nodes in
/// [`Graph::add_node`](crate::Graph::add_node)) is a programmer error
/// and panics instead; this type covers the conditions a caller can
/// legitimately hit at runtime.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum GraphError {
    /// The graph contains a cycle. The path is the actual cycle,
    /// joined by `" -> "`.
    #[error("found cycle in graph: {path}")]
    Cycle {
        /// The cycle, starting and ending at the same key.
        path: String,
    },

    /// A subgraph introduced a key that already exists in the walk.
    #[error("node '{key}' already exists")]
    DuplicateKey {
        /// The colliding key.
        key: Key,
    },
}

impl GraphError {
    /// Creates a cycle error with the given path.
    pub fn cycle(path: impl Into<String>) -> Self {
        Self::Cycle { path: path.into() }
    }

    /// Creates a duplicate key error.
    pub fn duplicate_key(key: Key) -> Self {
        Self::DuplicateKey { key }
    }
}
