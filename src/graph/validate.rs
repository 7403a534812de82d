//! Cycle detection
//!
//! A depth-first search over every node with a shared `visited` set and
//! an explicit path stack. When the search re-enters a node that is
//! already on the path, the slice of the path from that occurrence to
//! the current node is the cycle, and it is reported verbatim.
//!
//! Both the outer iteration and each node's children are visited in
//! sorted order, so the same graph always reports the same cycle.

use std::collections::HashSet;

use super::{Graph, GraphError, GraphResult, Key};

impl Graph {
    /// Validates the graph, returning an error if it contains a cycle.
    ///
    /// [`walk`](Graph::walk) validates internally before running
    /// anything; call this directly to check a graph at build time.
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis::{Body, Graph};
    ///
    /// let mut graph = Graph::new();
    /// graph.add_node("a", Body::executable(|_ctx| async { Ok(()) }));
    /// graph.add_node("b", Body::executable(|_ctx| async { Ok(()) }));
    /// graph.connect("a", "b");
    /// graph.connect("b", "a");
    ///
    /// let err = graph.validate().unwrap_err();
    /// assert_eq!(err.to_string(), "found cycle in graph: a -> b -> a");
    /// ```
    pub fn validate(&self) -> GraphResult<()> {
        let mut keys: Vec<&Key> = self.nodes().keys().collect();
        keys.sort();

        let mut visited = HashSet::new();
        let mut path = Vec::new();
        for key in keys {
            self.dfs(key, &mut visited, &mut path)?;
        }
        Ok(())
    }

    fn dfs(
        &self,
        current: &Key,
        visited: &mut HashSet<Key>,
        path: &mut Vec<Key>,
    ) -> GraphResult<()> {
        if let Some(ix) = path.iter().position(|ancestor| ancestor == current) {
            let mut cycle: Vec<&str> = path[ix..].iter().map(Key::as_str).collect();
            cycle.push(current.as_str());
            return Err(GraphError::cycle(cycle.join(" -> ")));
        }

        if visited.contains(current) {
            // Already explored and proven acyclic.
            return Ok(());
        }
        visited.insert(current.clone());
        path.push(current.clone());

        let mut children = match self.node(current) {
            Some(node) => node.children().to_vec(),
            None => Vec::new(),
        };
        children.sort();

        for child in &children {
            self.dfs(child, visited, path)?;
        }

        path.pop();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Body;

    fn noop() -> Body {
        Body::executable(|_ctx| async { Ok(()) })
    }

    fn chain(keys: &[&str]) -> Graph {
        let mut graph = Graph::new();
        for key in keys {
            graph.add_node(*key, noop());
        }
        for pair in keys.windows(2) {
            graph.connect(pair[0], pair[1]);
        }
        graph
    }

    #[test]
    fn test_empty_graph_is_valid() {
        assert!(Graph::new().validate().is_ok());
    }

    #[test]
    fn test_chain_is_valid() {
        assert!(chain(&["a", "b", "c"]).validate().is_ok());
    }

    #[test]
    fn test_diamond_is_valid() {
        let mut graph = Graph::new();
        for key in ["a", "b", "c", "d"] {
            graph.add_node(key, noop());
        }
        graph.connect("a", "b");
        graph.connect("a", "c");
        graph.connect("b", "d");
        graph.connect("c", "d");

        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_cycle_in_the_middle() {
        let mut graph = chain(&["a", "b", "c", "d", "e"]);
        graph.connect("d", "b");

        let err = graph.validate().unwrap_err();
        assert_eq!(err.to_string(), "found cycle in graph: b -> c -> d -> b");
    }

    #[test]
    fn test_two_node_cycle() {
        let mut graph = Graph::new();
        for key in ["a", "b", "c"] {
            graph.add_node(key, noop());
        }
        graph.connect("a", "b");
        graph.connect("b", "a");
        graph.connect("b", "c");

        let err = graph.validate().unwrap_err();
        assert_eq!(err.to_string(), "found cycle in graph: a -> b -> a");
    }

    #[test]
    fn test_cycle_reached_from_later_starter() {
        let mut graph = Graph::new();
        for key in ["a", "b", "c"] {
            graph.add_node(key, noop());
        }
        graph.connect("a", "b");
        graph.connect("b", "a");
        graph.connect("c", "a");

        // The sorted outer iteration finds the cycle from 'a' first,
        // so the report is stable no matter where the cycle hangs.
        let err = graph.validate().unwrap_err();
        assert_eq!(err.to_string(), "found cycle in graph: a -> b -> a");
    }
}
