//! Error types for the walk

use crate::graph::{BoxError, GraphError, Key};
use thiserror::Error;

/// Errors surfaced by [`Graph::walk`](crate::Graph::walk).
///
/// Node failures are captured per key and aggregated; a walk with
/// several failed branches returns a single [`WalkError::Aggregate`]
/// listing every one of them, sorted by key.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WalkError {
    /// The graph failed pre-walk validation; no node body was run.
    #[error("failed to validate graph: {source}")]
    InvalidGraph {
        /// The underlying validation failure.
        source: GraphError,
    },

    /// An executable node body returned an error.
    #[error("failed to execute node '{key}': {source}")]
    ExecuteFailed {
        /// The failing node.
        key: Key,
        /// The error returned by the body.
        source: BoxError,
    },

    /// An expandable node body returned an error.
    #[error("failed to expand node '{key}': {source}")]
    ExpandFailed {
        /// The failing node.
        key: Key,
        /// The error returned by the body.
        source: BoxError,
    },

    /// An expansion produced a subgraph that is cyclic or collides
    /// with keys already in the walk.
    #[error("failed to validate subgraph from node '{key}': {source}")]
    InvalidSubgraph {
        /// The expander whose subgraph was rejected.
        key: Key,
        /// The structural fault.
        source: GraphError,
    },

    /// A node body panicked. The panic is contained: the walk drains
    /// normally and the node's descendants are pruned as if it had
    /// errored.
    #[error("node '{key}' panicked: {message}")]
    Panicked {
        /// The panicking node.
        key: Key,
        /// The panic payload, if it was a string.
        message: String,
    },

    /// The walk reached quiescence with nodes unaccounted for and no
    /// errors recorded. Pruning after a failure is reported through the
    /// failure itself, so this variant always indicates a bug.
    #[error("incomplete walk: {completed} completed and {errored} errored out of {total} nodes")]
    Incomplete {
        /// Nodes known to the walk, spliced subgraphs included.
        total: usize,
        /// Nodes that completed.
        completed: usize,
        /// Nodes that errored.
        errored: usize,
    },

    /// Multiple nodes failed during one walk.
    #[error("{}", aggregate_message(.0))]
    Aggregate(Vec<WalkError>),
}

impl WalkError {
    /// Returns the key of the node this error is tagged with, if any.
    pub fn key(&self) -> Option<&Key> {
        match self {
            WalkError::ExecuteFailed { key, .. }
            | WalkError::ExpandFailed { key, .. }
            | WalkError::InvalidSubgraph { key, .. }
            | WalkError::Panicked { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Iterates over the individual errors: the members of an
    /// [`Aggregate`](WalkError::Aggregate), or just this error itself.
    pub fn errors(&self) -> impl Iterator<Item = &WalkError> {
        match self {
            WalkError::Aggregate(errors) => errors.iter(),
            other => std::slice::from_ref(other).iter(),
        }
    }

    /// Folds a list of node errors into a single error, preserving
    /// every entry.
    pub(crate) fn aggregate(mut errors: Vec<WalkError>) -> Option<WalkError> {
        match errors.len() {
            0 => None,
            1 => Some(errors.remove(0)),
            _ => Some(WalkError::Aggregate(errors)),
        }
    }
}

impl From<GraphError> for WalkError {
    fn from(source: GraphError) -> Self {
        WalkError::InvalidGraph { source }
    }
}

fn aggregate_message(errors: &[WalkError]) -> String {
    let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
    format!(
        "{} nodes failed during walk: {}",
        errors.len(),
        details.join("; ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(message: &str) -> BoxError {
        message.to_string().into()
    }

    #[test]
    fn test_node_error_display() {
        let err = WalkError::ExecuteFailed {
            key: Key::new("a"),
            source: boxed("boom"),
        };
        assert_eq!(err.to_string(), "failed to execute node 'a': boom");
        assert_eq!(err.key(), Some(&Key::new("a")));
    }

    #[test]
    fn test_aggregate_display_lists_all() {
        let err = WalkError::Aggregate(vec![
            WalkError::ExecuteFailed {
                key: Key::new("a"),
                source: boxed("boom"),
            },
            WalkError::ExpandFailed {
                key: Key::new("b"),
                source: boxed("bust"),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "2 nodes failed during walk: failed to execute node 'a': boom; \
             failed to expand node 'b': bust"
        );
        assert_eq!(err.errors().count(), 2);
    }

    #[test]
    fn test_aggregate_of_one_unwraps() {
        let single = WalkError::aggregate(vec![WalkError::ExecuteFailed {
            key: Key::new("a"),
            source: boxed("boom"),
        }])
        .unwrap();
        assert!(matches!(single, WalkError::ExecuteFailed { .. }));
        assert!(WalkError::aggregate(Vec::new()).is_none());
    }
}
