//! Graph - the dependency graph of work units
//!
//! Since the `trellis::` namespace already says what kind of graph this
//! is, the type is just `Graph`.
//!
//! # Design
//!
//! The graph is a map from [`Key`] to [`Node`], where each node holds
//! both edge directions:
//!
//! - `children`: nodes that depend on this node (outgoing edges)
//! - `parents`: nodes this node depends on (incoming edges)
//!
//! Bidirectional adjacency gives O(1) access to dependencies and
//! dependents, which the walker needs for ready-set computation. Two
//! auxiliary sets are maintained on every mutation: `starters` (no
//! parents, seed the walk) and `finishers` (no children). Keeping them
//! sorted makes snapshots, and therefore serial walks, deterministic.
//!
//! # Error tiers
//!
//! Builder misuse is a programmer bug, not a runtime condition: adding
//! a duplicate key, connecting a node to itself, connecting endpoints
//! that do not exist, or adding an edge twice all panic with a
//! descriptive message. These failures never flow through
//! [`Graph::walk`](crate::Graph::walk)'s return value. Cycles are the
//! exception: they can only be seen whole, so they surface from
//! [`Graph::validate`](crate::Graph::validate) as a normal error.

use std::collections::{BTreeSet, HashMap};

use super::{Body, Key};

/// A node in the graph: a key, a capability, and its edges.
#[derive(Debug, Clone)]
pub struct Node {
    key: Key,
    body: Body,
    parents: Vec<Key>,
    children: Vec<Key>,
}

impl Node {
    pub(crate) fn new(key: Key, body: Body) -> Self {
        Self {
            key,
            body,
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Returns the node's key.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Returns the node's capability.
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Returns the keys this node depends on, in insertion order.
    pub fn parents(&self) -> &[Key] {
        &self.parents
    }

    /// Returns the keys that depend on this node, in insertion order.
    pub fn children(&self) -> &[Key] {
        &self.children
    }
}

/// A directed acyclic graph of work units.
///
/// Build the graph with [`add_node`](Graph::add_node) and
/// [`connect`](Graph::connect), check it with
/// [`validate`](Graph::validate), then run it with
/// [`walk`](Graph::walk). Walking never mutates the graph, so one graph
/// can be walked any number of times.
///
/// # Examples
///
/// ```
/// use trellis::{Body, Graph};
///
/// let mut graph = Graph::new();
/// graph.add_node("fetch", Body::executable(|_ctx| async { Ok(()) }));
/// graph.add_node("build", Body::executable(|_ctx| async { Ok(()) }));
/// graph.add_node("test", Body::executable(|_ctx| async { Ok(()) }));
///
/// // build depends on fetch, test depends on build
/// graph.connect("fetch", "build");
/// graph.connect("build", "test");
///
/// assert_eq!(graph.starters(), vec!["fetch".into()]);
/// assert_eq!(graph.finishers(), vec!["test".into()]);
/// graph.validate().unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: HashMap<Key, Node>,
    starters: BTreeSet<Key>,
    finishers: BTreeSet<Key>,
}

impl Graph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if the key exists in the graph.
    pub fn contains(&self, key: impl AsRef<str>) -> bool {
        self.nodes.contains_key(key.as_ref())
    }

    /// Returns a reference to a node.
    pub fn node(&self, key: impl AsRef<str>) -> Option<&Node> {
        self.nodes.get(key.as_ref())
    }

    /// Returns all keys in the graph, sorted.
    pub fn keys(&self) -> Vec<Key> {
        let mut keys: Vec<Key> = self.nodes.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub(crate) fn nodes(&self) -> &HashMap<Key, Node> {
        &self.nodes
    }

    /// Adds a node to the graph.
    ///
    /// The new node starts with no edges, so it joins both the starter
    /// and finisher sets until [`connect`](Graph::connect) says
    /// otherwise.
    ///
    /// # Panics
    ///
    /// Panics if the key already exists. Reusing a key is a bug in the
    /// caller, not a condition to recover from.
    pub fn add_node(&mut self, key: impl Into<Key>, body: Body) {
        let key = key.into();
        if self.nodes.contains_key(&key) {
            panic!("node '{key}' already exists");
        }

        self.starters.insert(key.clone());
        self.finishers.insert(key.clone());
        self.nodes.insert(key.clone(), Node::new(key, body));
    }

    /// Connects two nodes: `from` must complete before `to` starts.
    ///
    /// Appends to `from`'s children and `to`'s parents, removes `to`
    /// from the starter set and `from` from the finisher set.
    ///
    /// # Panics
    ///
    /// Panics on a self-loop, a missing endpoint, or a duplicate edge.
    /// Cycles spanning more than one edge are not detected here; use
    /// [`validate`](Graph::validate).
    pub fn connect(&mut self, from: impl Into<Key>, to: impl Into<Key>) {
        let from = from.into();
        let to = to.into();

        if from == to {
            panic!("cannot connect node '{from}' to itself");
        }
        if !self.nodes.contains_key(&from) {
            panic!("node '{from}' does not exist");
        }
        if !self.nodes.contains_key(&to) {
            panic!("node '{to}' does not exist");
        }
        if self.nodes[&from].children.contains(&to) {
            panic!("edge '{from}' -> '{to}' already exists");
        }

        // Both lookups are guarded above.
        self.nodes.get_mut(&from).unwrap().children.push(to.clone());
        self.nodes.get_mut(&to).unwrap().parents.push(from.clone());

        self.starters.remove(&to);
        self.finishers.remove(&from);
    }

    /// Returns a sorted snapshot of the nodes with no parents.
    pub fn starters(&self) -> Vec<Key> {
        self.starters.iter().cloned().collect()
    }

    /// Returns a sorted snapshot of the nodes with no children.
    pub fn finishers(&self) -> Vec<Key> {
        self.finishers.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Body {
        Body::executable(|_ctx| async { Ok(()) })
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
        assert!(graph.starters().is_empty());
        assert!(graph.finishers().is_empty());
    }

    #[test]
    fn test_add_node() {
        let mut graph = Graph::new();
        graph.add_node("a", noop());
        graph.add_node("b", noop());

        assert_eq!(graph.len(), 2);
        assert!(graph.contains("a"));
        assert!(graph.contains("b"));
        assert!(!graph.contains("c"));
    }

    #[test]
    fn test_new_node_is_starter_and_finisher() {
        let mut graph = Graph::new();
        graph.add_node("a", noop());

        assert_eq!(graph.starters(), vec![Key::new("a")]);
        assert_eq!(graph.finishers(), vec![Key::new("a")]);
    }

    #[test]
    fn test_connect_updates_edges_and_sets() {
        let mut graph = Graph::new();
        graph.add_node("a", noop());
        graph.add_node("b", noop());
        graph.connect("a", "b");

        assert_eq!(graph.node("a").unwrap().children(), &[Key::new("b")]);
        assert_eq!(graph.node("b").unwrap().parents(), &[Key::new("a")]);
        assert_eq!(graph.starters(), vec![Key::new("a")]);
        assert_eq!(graph.finishers(), vec![Key::new("b")]);
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let mut graph = Graph::new();
        graph.add_node("a", noop());
        graph.add_node("c", noop());
        graph.add_node("b", noop());
        graph.connect("a", "c");
        graph.connect("a", "b");

        // Insertion order, not sorted order.
        assert_eq!(
            graph.node("a").unwrap().children(),
            &[Key::new("c"), Key::new("b")]
        );
    }

    #[test]
    fn test_snapshots_are_sorted() {
        let mut graph = Graph::new();
        graph.add_node("c", noop());
        graph.add_node("a", noop());
        graph.add_node("b", noop());

        assert_eq!(
            graph.starters(),
            vec![Key::new("a"), Key::new("b"), Key::new("c")]
        );
    }

    #[test]
    #[should_panic(expected = "node 'a' already exists")]
    fn test_duplicate_key_panics() {
        let mut graph = Graph::new();
        graph.add_node("a", noop());
        graph.add_node("a", noop());
    }

    #[test]
    #[should_panic(expected = "cannot connect node 'a' to itself")]
    fn test_self_loop_panics() {
        let mut graph = Graph::new();
        graph.add_node("a", noop());
        graph.connect("a", "a");
    }

    #[test]
    #[should_panic(expected = "node 'b' does not exist")]
    fn test_missing_endpoint_panics() {
        let mut graph = Graph::new();
        graph.add_node("a", noop());
        graph.connect("a", "b");
    }

    #[test]
    #[should_panic(expected = "node 'x' does not exist")]
    fn test_missing_source_panics() {
        let mut graph = Graph::new();
        graph.add_node("a", noop());
        graph.connect("x", "a");
    }

    #[test]
    #[should_panic(expected = "edge 'a' -> 'b' already exists")]
    fn test_duplicate_edge_panics() {
        let mut graph = Graph::new();
        graph.add_node("a", noop());
        graph.add_node("b", noop());
        graph.connect("a", "b");
        graph.connect("a", "b");
    }
}
