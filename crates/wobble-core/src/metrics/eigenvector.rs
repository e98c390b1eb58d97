//! Eigenvector centrality via power iteration.
//!
//! # Overview
//!
//! Eigenvector centrality scores nodes based on the idea that connections to
//! high-scoring nodes contribute more to a node's score. It is the dominant
//! eigenvector of the adjacency matrix.
//!
//! # Algorithm
//!
//! Power iteration on `A + I`:
//!
//! 1. Initialize scores uniformly.
//! 2. For each node `v`: `score(v) = score(v) + sum of score(u) for u ~ v`.
//! 3. Normalize the score vector to unit L2 norm.
//! 4. Repeat until convergence or max iterations.
//!
//! The identity shift keeps bipartite graphs (paths, even cycles, stars)
//! from oscillating between two vectors; it does not change the
//! eigenvectors. Isolated nodes keep only their own shifted mass and decay
//! towards zero relative to connected nodes.

use std::sync::Arc;

use petgraph::visit::{IntoNodeIdentifiers, NodeIndexable};
use tracing::{instrument, warn};

use crate::centrality::{Centrality, CentralityVector};
use crate::graph::Graph;

/// Eigenvector centrality scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eigenvector {
    pub max_iter: usize,
    /// Stop when the L2 norm of the change in scores falls below this value.
    pub tolerance: f64,
}

impl Default for Eigenvector {
    fn default() -> Self {
        Self {
            max_iter: 100,
            tolerance: 1e-6,
        }
    }
}

impl Centrality for Eigenvector {
    fn compute(&self, graph: &Graph) -> CentralityVector {
        let result = eigenvector_centrality(graph, self.max_iter, self.tolerance);
        if !result.converged {
            warn!(
                iterations = result.iterations,
                "eigenvector centrality did not converge"
            );
        }
        result.scores
    }

    fn name(&self) -> &str {
        "eigenvector"
    }
}

/// Result of eigenvector centrality computation.
#[derive(Debug, Clone)]
pub struct EigenvectorResult {
    pub scores: CentralityVector,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the algorithm converged within `max_iter`.
    pub converged: bool,
}

/// Compute eigenvector centrality for all nodes of `graph`.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn eigenvector_centrality(graph: &Graph, max_iter: usize, tolerance: f64) -> EigenvectorResult {
    let g = graph.inner();
    let n = g.node_count();

    if n == 0 {
        return EigenvectorResult {
            scores: CentralityVector::zeros(Arc::clone(graph.nodes())),
            iterations: 0,
            converged: true,
        };
    }

    let init_val = 1.0 / (n as f64).sqrt();
    let mut scores: Vec<f64> = vec![init_val; n];

    let mut converged = false;
    let mut iterations = 0;

    for iter in 0..max_iter {
        iterations = iter + 1;

        let mut new_scores = scores.clone();

        for v in g.node_identifiers() {
            let vi = g.to_index(v);
            for u in g.neighbors(v) {
                new_scores[vi] += scores[g.to_index(u)];
            }
        }

        let norm: f64 = new_scores.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for x in &mut new_scores {
                *x /= norm;
            }
        }

        let diff: f64 = scores
            .iter()
            .zip(new_scores.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt();

        scores = new_scores;

        if diff < tolerance {
            converged = true;
            break;
        }
    }

    EigenvectorResult {
        scores: CentralityVector::from_aligned(Arc::clone(graph.nodes()), scores),
        iterations,
        converged,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
