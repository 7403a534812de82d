//! Per-walk traversal state
//!
//! One `Walker` exists for the duration of one walk and is owned
//! entirely by the coordinator; workers never touch it. It tracks
//! where every key is in its lifecycle (pending, processing,
//! completed, errored) and the bookkeeping that stitches dynamically
//! produced subgraphs into the lattice.
//!
//! The node map is a copy of the caller's graph: expansion splices new
//! nodes in here, never into the graph being walked.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use crate::graph::{Graph, GraphError, GraphResult, Key, Node};

use super::WalkError;

pub(crate) struct Walker {
    /// Node lookup; spliced subgraph nodes land here.
    nodes: HashMap<Key, Node>,
    /// Keys ready to be dispatched, in FIFO order.
    pending: VecDeque<Key>,
    /// Keys currently in worker custody.
    processing: HashSet<Key>,
    /// Keys that finished successfully.
    completed: HashSet<Key>,
    /// Keys that failed, with their errors. Sorted so the aggregate
    /// error is reproducible.
    errored: BTreeMap<Key, WalkError>,
    /// Expander -> the finishers of the subgraph it produced.
    expander_finishers: HashMap<Key, Vec<Key>>,
    /// Subgraph finisher -> the expander that produced it.
    finisher_expander: HashMap<Key, Key>,
}

impl Walker {
    /// Copies the graph's node map and seeds `pending` with its
    /// starters, in sorted order.
    pub(crate) fn new(graph: &Graph) -> Self {
        Self {
            nodes: graph.nodes().clone(),
            pending: graph.starters().into(),
            processing: HashSet::new(),
            completed: HashSet::new(),
            errored: BTreeMap::new(),
            expander_finishers: HashMap::new(),
            finisher_expander: HashMap::new(),
        }
    }

    /// True when nothing is waiting and nothing is in flight. The walk
    /// terminates here and only here: checking `pending` alone would
    /// declare victory while a worker still holds a key.
    pub(crate) fn is_quiescent(&self) -> bool {
        self.pending.is_empty() && self.processing.is_empty()
    }

    pub(crate) fn processing_count(&self) -> usize {
        self.processing.len()
    }

    /// Moves up to `limit` keys from `pending` into `processing` and
    /// returns their nodes for dispatch.
    pub(crate) fn take_ready(&mut self, limit: usize) -> Vec<Node> {
        let mut batch = Vec::new();
        while batch.len() < limit {
            let Some(key) = self.pending.pop_front() else {
                break;
            };
            // Keys only enter pending via the node map, so the lookup
            // cannot miss.
            let node = self.nodes.get(&key).expect("pending key not in node map");
            batch.push(node.clone());
            self.processing.insert(key);
        }
        batch
    }

    /// Queues keys for dispatch.
    pub(crate) fn enqueue(&mut self, keys: impl IntoIterator<Item = Key>) {
        self.pending.extend(keys);
    }

    /// Marks a key as errored and takes it out of worker custody. Its
    /// children are never enqueued: their parents can no longer all
    /// complete, so they stay unreached.
    pub(crate) fn record_error(&mut self, key: Key, err: WalkError) {
        self.processing.remove(&key);
        self.errored.insert(key, err);
    }

    /// Splices an expander's subgraph into the walk.
    ///
    /// Rejects the whole subgraph if any of its keys already exist.
    /// On success the expander leaves worker custody but stays out of
    /// `completed` until every finisher of the subgraph has completed;
    /// returns the subgraph's starters for dispatch.
    pub(crate) fn splice(&mut self, key: &Key, subgraph: &Graph) -> GraphResult<Vec<Key>> {
        for sub_key in subgraph.nodes().keys() {
            if self.nodes.contains_key(sub_key) {
                return Err(GraphError::duplicate_key(sub_key.clone()));
            }
        }

        self.processing.remove(key);
        for (sub_key, node) in subgraph.nodes() {
            self.nodes.insert(sub_key.clone(), node.clone());
        }

        let finishers = subgraph.finishers();
        for finisher in &finishers {
            self.finisher_expander.insert(finisher.clone(), key.clone());
        }
        self.expander_finishers.insert(key.clone(), finishers);

        Ok(subgraph.starters())
    }

    /// Marks a key as completed and returns the keys that became ready.
    ///
    /// If the key finishes a subgraph and it was the last finisher to
    /// do so, the expander that produced the subgraph completes too,
    /// recursively; that is what finally unblocks the expander's own
    /// children.
    pub(crate) fn complete(&mut self, key: &Key) -> Vec<Key> {
        self.completed.insert(key.clone());
        self.processing.remove(key);

        if let Some(expander) = self.finisher_expander.get(key) {
            let expander = expander.clone();
            let all_finished = self.expander_finishers[&expander]
                .iter()
                .all(|finisher| self.completed.contains(finisher));
            if all_finished {
                return self.complete(&expander);
            }
            // Subgraph finishers have no children of their own; the
            // expander's children wait for the remaining finishers.
            return Vec::new();
        }

        let mut ready = Vec::new();
        let Some(node) = self.nodes.get(key) else {
            return ready;
        };
        for child in node.children() {
            let all_parents_complete = self.nodes[child]
                .parents()
                .iter()
                .all(|parent| self.completed.contains(parent));
            if all_parents_complete {
                ready.push(child.clone());
            }
        }
        ready
    }

    /// Final accounting once the walk is quiescent.
    pub(crate) fn finish(self) -> Result<(), WalkError> {
        let total = self.nodes.len();
        let completed = self.completed.len();
        let errored = self.errored.len();

        if self.errored.is_empty() {
            if completed != total {
                return Err(WalkError::Incomplete {
                    total,
                    completed,
                    errored,
                });
            }
            return Ok(());
        }

        let errors: Vec<WalkError> = self.errored.into_values().collect();
        // errored is non-empty, so aggregation always yields an error.
        Err(WalkError::aggregate(errors).expect("errored map was not empty"))
    }
}
