//! The walk: a single-consumer coordinator over a bounded worker pool
//!
//! All traversal state is owned by the coordinator (the `walk` future
//! itself). Workers receive nodes over a bounded ready channel and
//! report typed outcomes back; the coordinator consumes outcomes
//! serially, applies the state transition, and re-dispatches. One
//! consumer, no locks over the state maps, no lock-ordering puzzles.
//!
//! # Channel sizing
//!
//! The ready channel holds `parallelism` entries. Dispatch is gated on
//! the number of keys in worker custody, which never exceeds
//! `parallelism`, so the coordinator can never block on a full ready
//! channel while every worker is blocked reporting an outcome, which
//! is the deadlock a naive unbuffered dispatch channel invites.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::graph::{Graph, Key, Node};

use super::options::{Callbacks, WalkOptions};
use super::state::Walker;
use super::worker::{self, Outcome};
use super::WalkError;

impl Graph {
    /// Walks the graph, running every node body exactly once.
    ///
    /// Node bodies run on up to `opts.parallelism` concurrent workers;
    /// a child never starts until all of its parents have completed.
    /// If a node errors, the walk continues but none of the node's
    /// descendants run; every error is collected and returned together
    /// at the end. Expandable nodes splice their subgraphs into the
    /// walk as it runs.
    ///
    /// The token is forwarded to every node body. The walker never
    /// interrupts in-flight work itself: on cancellation, bodies are
    /// expected to notice and return errors, which drain through the
    /// normal path.
    ///
    /// Walking is idempotent: the graph is not consumed or mutated,
    /// and can be walked any number of times.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use trellis::{Body, CancellationToken, Graph, WalkOptions};
    ///
    /// # async fn demo() -> Result<(), trellis::WalkError> {
    /// let mut graph = Graph::new();
    /// graph.add_node("fetch", Body::executable(|_ctx| async { Ok(()) }));
    /// graph.add_node("build", Body::executable(|_ctx| async { Ok(()) }));
    /// graph.connect("fetch", "build");
    ///
    /// let opts = WalkOptions::new().parallelism(2);
    /// graph.walk(CancellationToken::new(), opts).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn walk(&self, ctx: CancellationToken, opts: WalkOptions) -> Result<(), WalkError> {
        if self.is_empty() {
            return Ok(());
        }

        self.validate()?;

        run_walk(self, ctx, opts).await
    }
}

async fn run_walk(graph: &Graph, ctx: CancellationToken, opts: WalkOptions) -> Result<(), WalkError> {
    let parallelism = opts.parallelism;
    let callbacks = opts.callbacks;

    let mut walker = Walker::new(graph);

    let (ready_tx, ready_rx) = mpsc::channel(parallelism);
    let ready_rx: worker::ReadyReceiver = Arc::new(Mutex::new(ready_rx));
    let (outcome_tx, mut outcome_rx) = mpsc::channel(1);

    let mut workers = JoinSet::new();
    for _ in 0..parallelism {
        workers.spawn(worker::run(
            Arc::clone(&ready_rx),
            outcome_tx.clone(),
            ctx.clone(),
        ));
    }
    // The workers hold the only senders now; when they exit, the
    // outcome channel closes.
    drop(outcome_tx);

    dispatch(&mut walker, parallelism, &ready_tx).await;

    while !walker.is_quiescent() {
        let Some(outcome) = outcome_rx.recv().await else {
            // Workers only exit once the ready channel closes, which
            // happens below, after quiescence.
            break;
        };

        match outcome {
            Outcome::Completed { key } => {
                debug!(key = %key, "node completed");
                callbacks.complete(&key);
                let ready = walker.complete(&key);
                walker.enqueue(ready);
            }
            Outcome::Expanded { key, subgraph } => {
                debug!(key = %key, nodes = subgraph.len(), "node expanded");
                callbacks.expand(&key);
                apply_expansion(&mut walker, &callbacks, key, subgraph);
            }
            Outcome::Failed { key, error } => {
                warn!(key = %key, error = %error, "node failed");
                callbacks.error(&key, &error);
                walker.record_error(key, error);
            }
        }

        dispatch(&mut walker, parallelism, &ready_tx).await;
    }

    // Close the ready channel so the workers drain and exit.
    drop(ready_tx);
    while workers.join_next().await.is_some() {}

    walker.finish()
}

/// Integrates a subgraph produced by an expander node.
///
/// An empty subgraph completes the expander on the spot. A subgraph
/// that is cyclic or collides with existing keys errors the expander;
/// other branches are unaffected. Otherwise the subgraph's starters
/// join the pending set, and the expander's own children stay blocked
/// until every finisher of the subgraph has completed.
fn apply_expansion(walker: &mut Walker, callbacks: &Callbacks, key: Key, subgraph: Graph) {
    if subgraph.is_empty() {
        let ready = walker.complete(&key);
        walker.enqueue(ready);
        return;
    }

    if let Err(source) = subgraph.validate() {
        fail_expansion(walker, callbacks, key, source);
        return;
    }

    match walker.splice(&key, &subgraph) {
        Ok(starters) => walker.enqueue(starters),
        Err(source) => fail_expansion(walker, callbacks, key, source),
    }
}

fn fail_expansion(
    walker: &mut Walker,
    callbacks: &Callbacks,
    key: Key,
    source: crate::graph::GraphError,
) {
    let error = WalkError::InvalidSubgraph {
        key: key.clone(),
        source,
    };
    warn!(key = %key, error = %error, "subgraph rejected");
    callbacks.error(&key, &error);
    walker.record_error(key, error);
}

/// Moves ready keys to the workers, bounded by the free worker slots.
async fn dispatch(walker: &mut Walker, parallelism: usize, ready_tx: &mpsc::Sender<Node>) {
    let free = parallelism.saturating_sub(walker.processing_count());
    for node in walker.take_ready(free) {
        debug!(key = %node.key(), "dispatching node");
        if ready_tx.send(node).await.is_err() {
            // Receivers live as long as the workers; a closed channel
            // means the walk is being torn down.
            return;
        }
    }
}
