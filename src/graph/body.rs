//! Node capability contract
//!
//! Every node carries exactly one capability, expressed as a tagged
//! union rather than runtime type checks:
//!
//! - [`Execute`]: run a side-effecting body to completion.
//! - [`Expand`]: produce a subgraph that is stitched into the walk
//!   between the node and its children.
//!
//! Implement the traits directly for stateful node types, or use the
//! [`Body::executable`] / [`Body::expandable`] closure adapters for
//! simple function nodes.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::dag::Graph;

/// A boxed error that can be sent across threads.
///
/// This is the standard error type used throughout async Rust
/// ecosystems (tokio, tower, axum, etc.). Any error implementing
/// `std::error::Error` can be automatically converted to this type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A node body that runs to completion.
///
/// Returning `Ok(())` marks the node completed; returning an error
/// marks the node errored and prunes its transitive descendants from
/// the walk.
#[async_trait]
pub trait Execute: Send + Sync {
    /// Runs the node body.
    ///
    /// The token is cancelled when the caller cancels the walk; bodies
    /// are expected to honour it and return an error.
    async fn execute(&self, ctx: CancellationToken) -> Result<(), BoxError>;
}

/// A node body that expands into a subgraph.
///
/// The returned subgraph executes in place of the node: the node's
/// children stay blocked until every finisher of the subgraph has
/// completed. Returning an empty graph is equivalent to an [`Execute`]
/// body that returned `Ok(())`.
#[async_trait]
pub trait Expand: Send + Sync {
    /// Produces the subgraph to run in place of this node.
    async fn expand(&self, ctx: CancellationToken) -> Result<Graph, BoxError>;
}

/// The capability of a node: executable or expandable, exactly one.
///
/// # Examples
///
/// ```
/// use trellis::{Body, Graph};
///
/// let run = Body::executable(|_ctx| async { Ok(()) });
/// let grow = Body::expandable(|_ctx| async { Ok(Graph::new()) });
/// ```
#[derive(Clone)]
pub enum Body {
    /// Runs a side-effecting body.
    Executable(Arc<dyn Execute>),
    /// Produces a subgraph at runtime.
    Expandable(Arc<dyn Expand>),
}

impl Body {
    /// Creates an executable body from a plain async function.
    pub fn executable<F, Fut>(f: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        Self::Executable(Arc::new(ExecuteFn(f)))
    }

    /// Creates an expandable body from a plain async function.
    pub fn expandable<F, Fut>(f: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Graph, BoxError>> + Send + 'static,
    {
        Self::Expandable(Arc::new(ExpandFn(f)))
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Executable(_) => f.write_str("Executable"),
            Body::Expandable(_) => f.write_str("Expandable"),
        }
    }
}

struct ExecuteFn<F>(F);

#[async_trait]
impl<F, Fut> Execute for ExecuteFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), BoxError>> + Send,
{
    async fn execute(&self, ctx: CancellationToken) -> Result<(), BoxError> {
        (self.0)(ctx).await
    }
}

struct ExpandFn<F>(F);

#[async_trait]
impl<F, Fut> Expand for ExpandFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Graph, BoxError>> + Send,
{
    async fn expand(&self, ctx: CancellationToken) -> Result<Graph, BoxError> {
        (self.0)(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_executable_adapter() {
        let body = Body::executable(|_ctx| async { Ok(()) });
        match body {
            Body::Executable(exec) => {
                exec.execute(CancellationToken::new()).await.unwrap();
            }
            Body::Expandable(_) => panic!("expected executable"),
        }
    }

    #[tokio::test]
    async fn test_expandable_adapter() {
        let body = Body::expandable(|_ctx| async { Ok(Graph::new()) });
        match body {
            Body::Expandable(exp) => {
                let graph = exp.expand(CancellationToken::new()).await.unwrap();
                assert!(graph.is_empty());
            }
            Body::Executable(_) => panic!("expected expandable"),
        }
    }

    #[test]
    fn test_body_debug() {
        let body = Body::executable(|_ctx| async { Ok(()) });
        assert_eq!(format!("{:?}", body), "Executable");
    }
}
