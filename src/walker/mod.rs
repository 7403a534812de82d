//! Traversal engine: coordinator, worker pool, and walk state
//!
//! This module hides how the walk is scheduled. The surface is just
//! [`Graph::walk`](crate::Graph::walk) plus its configuration:
//!
//! - [`WalkOptions`]: parallelism bound and observation callbacks
//! - [`WalkError`]: everything a walk can report back
//!
//! Internally, a single coordinator owns all traversal state and a
//! bounded pool of workers runs node bodies; see `walk.rs` for the
//! shape of the loop.

mod error;
mod options;
mod state;
mod walk;
mod worker;

pub use error::WalkError;
pub use options::WalkOptions;
