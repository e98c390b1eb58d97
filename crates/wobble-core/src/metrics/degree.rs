//! Degree centrality.
//!
//! The cheapest scorer and the one most exposed to ties: on sparse graphs
//! many nodes share a degree, so tau-b and gamma diverge noticeably.

use std::sync::Arc;

use petgraph::visit::IntoNodeIdentifiers;

use crate::centrality::{Centrality, CentralityVector};
use crate::graph::Graph;

/// Degree centrality scorer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Degree {
    /// Divide by `n - 1`.
    pub normalized: bool,
}

impl Centrality for Degree {
    fn compute(&self, graph: &Graph) -> CentralityVector {
        degree_centrality(graph, self.normalized)
    }

    fn name(&self) -> &str {
        "degree"
    }
}

/// Number of incident edges per node, optionally divided by `n - 1`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn degree_centrality(graph: &Graph, normalized: bool) -> CentralityVector {
    let n = graph.node_count();
    let scale = if normalized && n > 1 {
        1.0 / (n - 1) as f64
    } else {
        1.0
    };

    let scores = graph
        .inner()
        .node_identifiers()
        .map(|idx| graph.degree(idx) as f64 * scale)
        .collect();

    CentralityVector::from_aligned(Arc::clone(graph.nodes()), scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_incident_edges() {
        let graph = Graph::with_nodes(["a", "b", "c", "d"], [("a", "b"), ("a", "c"), ("b", "c")]);
        let deg = degree_centrality(&graph, false);
        assert_eq!(deg.scores(), [2.0, 2.0, 2.0, 0.0]);
    }

    #[test]
    fn normalized_star_centre_is_one() {
        let graph = Graph::from_edges([("c", "x"), ("c", "y"), ("c", "z")]);
        let deg = degree_centrality(&graph, true);
        assert_eq!(deg.get("c"), Some(1.0));
        let leaf = deg.get("x").expect("x");
        assert!((leaf - 1.0 / 3.0).abs() < 1e-12);
    }
}
