//! Betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness centrality measures how often a node lies on shortest paths
//! between other pairs of nodes. High-betweenness nodes are bridges: losing
//! their edges reroutes or disconnects many paths, which is why betweenness
//! rankings tend to be fragile under edge loss.
//!
//! # Algorithm
//!
//! Brandes' algorithm (2001) for unweighted graphs:
//!
//! 1. For each source node `s`, run BFS to compute shortest-path counts
//!    and distances.
//! 2. Accumulate dependency scores in reverse BFS order (farthest nodes first).
//! 3. Sum the dependency scores across all source nodes.
//!
//! Complexity: O(V * E).
//!
//! On an undirected graph every pair `{s, t}` is visited from both ends, so
//! the raw sums are halved. With `normalized` set, scores are further
//! divided by `(n - 1)(n - 2) / 2`, the number of pairs not involving the
//! node.

use std::collections::VecDeque;
use std::sync::Arc;

use petgraph::graph::NodeIndex;
use petgraph::visit::{IntoNodeIdentifiers, NodeIndexable};
use tracing::instrument;

use crate::centrality::{Centrality, CentralityVector};
use crate::graph::Graph;

/// Betweenness centrality scorer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Betweenness {
    /// Divide by the number of node pairs excluding the scored node.
    pub normalized: bool,
}

impl Centrality for Betweenness {
    fn compute(&self, graph: &Graph) -> CentralityVector {
        betweenness_centrality(graph, self.normalized)
    }

    fn name(&self) -> &str {
        "betweenness"
    }
}

/// Compute betweenness centrality for every node of `graph`.
///
/// Isolated nodes and nodes with no shortest paths through them receive
/// 0.0.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn betweenness_centrality(graph: &Graph, normalized: bool) -> CentralityVector {
    let g = graph.inner();
    let n = g.node_count();

    // Node-indexed betweenness accumulator.
    let mut cb: Vec<f64> = vec![0.0; n];

    for s in g.node_identifiers() {
        let si = g.to_index(s);

        // Nodes in order of discovery (farthest popped first).
        let mut stack: Vec<NodeIndex> = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];

        // sigma[t]: number of shortest paths from s to t.
        let mut sigma: Vec<f64> = vec![0.0; n];
        sigma[si] = 1.0;

        // dist[t]: distance from s to t (-1 = unvisited).
        let mut dist: Vec<i64> = vec![-1; n];
        dist[si] = 0;

        let mut queue: VecDeque<NodeIndex> = VecDeque::new();
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            let vi = g.to_index(v);
            stack.push(v);

            for w in g.neighbors(v) {
                let wi = g.to_index(w);

                if dist[wi] < 0 {
                    dist[wi] = dist[vi] + 1;
                    queue.push_back(w);
                }

                if dist[wi] == dist[vi] + 1 {
                    sigma[wi] += sigma[vi];
                    predecessors[wi].push(v);
                }
            }
        }

        let mut delta: Vec<f64> = vec![0.0; n];

        while let Some(w) = stack.pop() {
            let wi = g.to_index(w);

            for &v in &predecessors[wi] {
                let vi = g.to_index(v);
                if sigma[wi] > 0.0 {
                    delta[vi] += (sigma[vi] / sigma[wi]) * (1.0 + delta[wi]);
                }
            }

            if wi != si {
                cb[wi] += delta[wi];
            }
        }
    }

    let scale = rescale_factor(n, normalized);
    for v in &mut cb {
        *v *= scale;
    }

    CentralityVector::from_aligned(Arc::clone(graph.nodes()), cb)
}

#[allow(clippy::cast_precision_loss)]
fn rescale_factor(n: usize, normalized: bool) -> f64 {
    if normalized && n > 2 {
        // 0.5 for undirected double counting, then divide by C(n-1, 2).
        0.5 / (((n - 1) * (n - 2)) as f64 / 2.0)
    } else {
        0.5
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
