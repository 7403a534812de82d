//! Worker task
//!
//! A worker pulls one node at a time from the shared ready channel,
//! runs its body, and reports a typed [`Outcome`] back to the
//! coordinator. Workers are stateless beyond their channel handles:
//! every state transition is applied by the coordinator, so no locks
//! guard the walker maps.
//!
//! The body itself runs in a freshly spawned task. That keeps a
//! panicking body from taking the worker down with it: the panic is
//! caught at the join boundary and reported like any other failure, so
//! the pool drains instead of wedging.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::graph::{Body, Graph, Key, Node};

use super::WalkError;

/// Outcome of processing one node, reported to the coordinator.
pub(crate) enum Outcome {
    Completed { key: Key },
    Expanded { key: Key, subgraph: Graph },
    Failed { key: Key, error: WalkError },
}

/// The ready channel is drained by every worker; the mutex hands each
/// dispatched node to exactly one of them.
pub(crate) type ReadyReceiver = Arc<Mutex<mpsc::Receiver<Node>>>;

/// Runs until the ready channel closes or the coordinator goes away.
pub(crate) async fn run(
    ready: ReadyReceiver,
    outcomes: mpsc::Sender<Outcome>,
    ctx: CancellationToken,
) {
    loop {
        let node = { ready.lock().await.recv().await };
        let Some(node) = node else {
            // Channel closed: the walk is over.
            return;
        };

        let outcome = process(node, &ctx).await;
        if outcomes.send(outcome).await.is_err() {
            return;
        }
    }
}

/// Runs one node body and maps its result to an outcome.
async fn process(node: Node, ctx: &CancellationToken) -> Outcome {
    let key = node.key().clone();
    let body = node.body().clone();
    let token = ctx.child_token();
    let is_expander = matches!(body, Body::Expandable(_));

    let handle = tokio::spawn(async move {
        match body {
            Body::Executable(exec) => exec.execute(token).await.map(|()| None),
            Body::Expandable(exp) => exp.expand(token).await.map(Some),
        }
    });

    match handle.await {
        Ok(Ok(None)) => Outcome::Completed { key },
        Ok(Ok(Some(subgraph))) => Outcome::Expanded { key, subgraph },
        Ok(Err(source)) => {
            let error = if is_expander {
                WalkError::ExpandFailed {
                    key: key.clone(),
                    source,
                }
            } else {
                WalkError::ExecuteFailed {
                    key: key.clone(),
                    source,
                }
            };
            Outcome::Failed { key, error }
        }
        Err(join_err) => {
            let message = if join_err.is_panic() {
                let payload = join_err.into_panic();
                if let Some(s) = payload.downcast_ref::<&str>() {
                    (*s).to_string()
                } else if let Some(s) = payload.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "non-string panic payload".to_string()
                }
            } else {
                "body task was cancelled".to_string()
            };
            let error = WalkError::Panicked {
                key: key.clone(),
                message,
            };
            Outcome::Failed { key, error }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_process_maps_success_to_completed() {
        let mut graph = Graph::new();
        graph.add_node("a", Body::executable(|_ctx| async { Ok(()) }));
        let node = graph.node("a").unwrap().clone();

        let outcome = process(node, &CancellationToken::new()).await;
        assert!(matches!(outcome, Outcome::Completed { key } if key.as_str() == "a"));
    }

    #[tokio::test]
    async fn test_process_maps_failure_with_key() {
        let mut graph = Graph::new();
        graph.add_node("a", Body::executable(|_ctx| async { Err("boom".into()) }));
        let node = graph.node("a").unwrap().clone();

        let outcome = process(node, &CancellationToken::new()).await;
        match outcome {
            Outcome::Failed { key, error } => {
                assert_eq!(key.as_str(), "a");
                assert_eq!(error.to_string(), "failed to execute node 'a': boom");
            }
            _ => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_process_contains_panics() {
        let mut graph = Graph::new();
        graph.add_node(
            "a",
            Body::executable(|_ctx| async { panic!("blew up") }),
        );
        let node = graph.node("a").unwrap().clone();

        let outcome = process(node, &CancellationToken::new()).await;
        match outcome {
            Outcome::Failed { error, .. } => {
                assert_eq!(error.to_string(), "node 'a' panicked: blew up");
            }
            _ => panic!("expected failure"),
        }
    }
}
