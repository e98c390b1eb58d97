//! Basic graph statistics.
//!
//! # Statistics Provided
//!
//! - **node_count** / **edge_count**: sizes of the graph.
//! - **density**: `2 * edge_count / (node_count * (node_count - 1))` for an
//!   undirected simple graph. Zero for graphs with 0 or 1 node.
//! - **component_count**: number of connected components.
//! - **isolated_node_count**: nodes with no incident edges. Edge loss grows
//!   this number level by level, and every isolated node still has to be
//!   scored by the centrality function.
//! - **max_degree**: highest node degree.
//! - **content_hash**: BLAKE3 hash of the edge set.

use petgraph::algo::connected_components;
use petgraph::visit::IntoNodeIdentifiers;
use serde::Serialize;

use crate::graph::build::Graph;

/// Summary statistics for an undirected graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    /// Ranges from 0.0 (no edges) to 1.0 (complete graph).
    pub density: f64,
    pub component_count: usize,
    pub isolated_node_count: usize,
    pub max_degree: usize,
    pub content_hash: String,
}

impl GraphStats {
    /// Compute statistics for `graph`.
    #[must_use]
    pub fn from_graph(graph: &Graph) -> Self {
        let g = graph.inner();
        let node_count = graph.node_count();
        let edge_count = graph.edge_count();

        let mut isolated_node_count = 0;
        let mut max_degree = 0;
        for idx in g.node_identifiers() {
            let degree = graph.degree(idx);
            if degree == 0 {
                isolated_node_count += 1;
            }
            max_degree = max_degree.max(degree);
        }

        Self {
            node_count,
            edge_count,
            density: compute_density(node_count, edge_count),
            component_count: connected_components(g),
            isolated_node_count,
            max_degree,
            content_hash: graph.content_hash(),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64 / 2.0;
    edge_count as f64 / max_edges
}
