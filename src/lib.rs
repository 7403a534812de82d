//! Trellis: concurrent dependency-graph walker
//!
//! `trellis` executes a directed acyclic graph of work units in
//! parallel, respecting dependency edges, with dynamic graph expansion
//! at runtime and per-node error isolation.
//!
//! # Features
//!
//! - **Dependency-ordered execution**: a node body never starts until
//!   every ancestor's body has returned successfully
//! - **Bounded parallelism**: independent branches run concurrently on
//!   up to `parallelism` workers; `1` gives a deterministic serial walk
//! - **Dynamic expansion**: a node can produce a subgraph at runtime,
//!   which is stitched into the walk between the node and its children
//! - **Error isolation**: a failing node prunes its descendants but
//!   never stops unrelated branches; every failure is aggregated into
//!   the walk's result
//! - **Deterministic validation**: cycles are reported with the same
//!   message every run
//!
//! # Quick start
//!
//! ```no_run
//! use trellis::{Body, CancellationToken, Graph, WalkOptions};
//!
//! # async fn demo() -> Result<(), trellis::WalkError> {
//! let mut graph = Graph::new();
//! graph.add_node("fetch", Body::executable(|_ctx| async {
//!     println!("fetching");
//!     Ok(())
//! }));
//! graph.add_node("build", Body::executable(|_ctx| async {
//!     println!("building");
//!     Ok(())
//! }));
//! graph.add_node("test", Body::executable(|_ctx| async {
//!     println!("testing");
//!     Ok(())
//! }));
//! graph.connect("fetch", "build");
//! graph.connect("build", "test");
//!
//! graph.validate()?;
//! graph.walk(CancellationToken::new(), WalkOptions::new().parallelism(2)).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Module organization
//!
//! Each module hides a design decision that is likely to change:
//!
//! - [`graph`]: the data model and validation (hides the adjacency
//!   representation)
//! - [`walker`]: the traversal engine (hides the scheduling strategy)
//!
//! # Error tiers
//!
//! Misusing the builder (duplicate keys, self-loops, missing edge
//! endpoints, a parallelism of zero) is a programmer bug and panics
//! immediately with a descriptive message. Conditions that depend on
//! runtime data, such as cycles, failing node bodies, and rejected
//! subgraphs, flow through `Result` and are aggregated per walk.

pub mod graph;
pub mod walker;

pub use graph::{
    Body, BoxError, Execute, Expand, Graph, GraphError, GraphResult, GraphSummary, Key, Node,
};
pub use walker::{WalkError, WalkOptions};

// Re-export dependencies used in the public API so callers don't hit
// version mismatches: node bodies receive a `CancellationToken`, and
// hand-rolled `Execute`/`Expand` impls need the `async_trait` macro.
pub use async_trait::async_trait;
pub use tokio_util::sync::CancellationToken;

/// Prelude module for convenient glob imports
///
/// # Example
///
/// ```
/// use trellis::prelude::*;
/// ```
pub mod prelude {
    pub use crate::graph::{Body, BoxError, Execute, Expand, Graph, Key};
    pub use crate::walker::{WalkError, WalkOptions};
    pub use crate::CancellationToken;
    pub use async_trait::async_trait;
}
