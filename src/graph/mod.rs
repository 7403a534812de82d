//! Dependency graph: data model, builder API, and validation
//!
//! This module hides the graph representation and exposes only the
//! operations the rest of the crate needs:
//!
//! - building: [`Graph::add_node`], [`Graph::connect`]
//! - inspecting: [`Graph::starters`], [`Graph::finishers`],
//!   [`Graph::summary`], [`Graph::to_dot`]
//! - checking: [`Graph::validate`] with deterministic cycle reports
//!
//! The traversal itself lives in [`crate::walker`].

mod body;
mod dag;
mod error;
mod key;
mod validate;
mod viz;

pub use body::{Body, BoxError, Execute, Expand};
pub use dag::{Graph, Node};
pub use error::{GraphError, GraphResult};
pub use key::Key;
pub use viz::GraphSummary;
