//! Graph inspection helpers: Graphviz export and structure summary.

use std::collections::HashMap;

use petgraph::dot::{Config, Dot};
use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};

use super::{Graph, Key};

/// Structural statistics for a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    /// Total number of nodes.
    pub nodes: usize,
    /// Number of nodes with no parents.
    pub starters: usize,
    /// Number of nodes with no children.
    pub finishers: usize,
    /// Length of the longest dependency chain, counted in edges.
    pub max_depth: usize,
}

impl Graph {
    /// Generates a DOT representation of the graph for Graphviz.
    ///
    /// Render with `dot -Tpng graph.dot -o graph.png`. Nodes and edges
    /// are emitted in sorted key order so the output is stable.
    pub fn to_dot(&self) -> String {
        let mut dot_graph = DiGraph::<String, ()>::new();
        let mut indices = HashMap::new();

        for key in self.keys() {
            let ix = dot_graph.add_node(key.to_string());
            indices.insert(key, ix);
        }

        for key in self.keys() {
            // keys() only returns nodes that exist.
            let node = self.node(&key).unwrap();
            for child in node.children() {
                if let Some(&child_ix) = indices.get(child) {
                    dot_graph.add_edge(indices[&key], child_ix, ());
                }
            }
        }

        format!("{:?}", Dot::with_config(&dot_graph, &[Config::EdgeNoLabel]))
    }

    /// Returns structural statistics for the graph.
    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            nodes: self.len(),
            starters: self.starters().len(),
            finishers: self.finishers().len(),
            max_depth: self.depths().into_values().max().unwrap_or(0),
        }
    }

    /// Computes each node's distance from the starter set.
    ///
    /// Iterative relaxation: a node's depth is known once every parent's
    /// depth is known. Nodes trapped in a cycle never satisfy that, so
    /// they simply stay unassigned and the loop still terminates.
    fn depths(&self) -> HashMap<Key, usize> {
        let mut depths: HashMap<Key, usize> = self
            .starters()
            .into_iter()
            .map(|key| (key, 0))
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for node in self.nodes().values() {
                if node.parents().is_empty() {
                    continue;
                }

                let mut max_parent = None;
                for parent in node.parents() {
                    match depths.get(parent) {
                        Some(&depth) => {
                            max_parent = Some(max_parent.map_or(depth, |m: usize| m.max(depth)));
                        }
                        None => {
                            max_parent = None;
                            break;
                        }
                    }
                }

                if let Some(max_parent) = max_parent {
                    let depth = max_parent + 1;
                    if depths.get(node.key()) != Some(&depth) {
                        depths.insert(node.key().clone(), depth);
                        changed = true;
                    }
                }
            }
        }

        depths
    }
}
