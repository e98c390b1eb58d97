//! Cascading random edge removal.
//!
//! # Overview
//!
//! [`perturb`] removes `floor(|E| * fraction)` edges, sampled uniformly
//! without replacement, and returns a new [`Graph`] over the same node set.
//! [`cascade`] applies it repeatedly, each step thinning the previous
//! step's output:
//!
//! ```text
//! G0 = G  →  G1 = perturb(G0)  →  G2 = perturb(G1)  →  …  →  Gk
//! ```
//!
//! With the default fraction of 0.05, level `i` keeps roughly `0.95^i` of
//! the original edges. The compounding models repeated independent sampling
//! passes, not a single fixed-rate loss.
//!
//! The random source is always passed in explicitly.

use fixedbitset::FixedBitSet;
use rand::Rng;
use rand::seq::index;
use tracing::{instrument, trace};

use crate::error::{Error, Result};
use crate::graph::Graph;

/// Check that `fraction` is a finite value in `[0, 1]`.
///
/// # Errors
///
/// Returns [`Error::InvalidFraction`] otherwise.
pub fn validate_fraction(fraction: f64) -> Result<()> {
    if fraction.is_finite() && (0.0..=1.0).contains(&fraction) {
        Ok(())
    } else {
        Err(Error::InvalidFraction(fraction))
    }
}

/// Number of edges removed from a graph with `edge_count` edges.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn removal_count(edge_count: usize, fraction: f64) -> usize {
    let k = (edge_count as f64 * fraction).floor();
    if k <= 0.0 {
        0
    } else {
        (k as usize).min(edge_count)
    }
}

/// Remove a random `fraction` of `graph`'s edges.
///
/// A graph without edges, or a fraction too small to remove a whole edge,
/// yields an unchanged copy.
///
/// # Errors
///
/// Returns [`Error::InvalidFraction`] if `fraction` is outside `[0, 1]`.
pub fn perturb<R: Rng + ?Sized>(graph: &Graph, fraction: f64, rng: &mut R) -> Result<Graph> {
    validate_fraction(fraction)?;
    Ok(thin(graph, fraction, rng))
}

fn thin<R: Rng + ?Sized>(graph: &Graph, fraction: f64, rng: &mut R) -> Graph {
    let m = graph.edge_count();
    let k = removal_count(m, fraction);
    if k == 0 {
        return graph.clone();
    }

    let mut removed = FixedBitSet::with_capacity(m);
    for e in index::sample(rng, m, k) {
        removed.insert(e);
    }
    trace!(edges = m, removed = k, "thinned graph");
    graph.without_edges(&removed)
}

/// An ordered sequence of progressively thinned graphs.
///
/// Index 0 is the unperturbed input; index `i` is perturbation level `i`.
#[derive(Debug, Clone)]
pub struct Cascade {
    graphs: Vec<Graph>,
}

impl Cascade {
    /// The unperturbed graph (level 0).
    #[must_use]
    pub fn original(&self) -> &Graph {
        &self.graphs[0]
    }

    /// Graph at `level` (0 = original).
    #[must_use]
    pub fn level(&self, level: usize) -> Option<&Graph> {
        self.graphs.get(level)
    }

    /// Perturbed levels `1..=k`, least perturbed first.
    pub fn perturbed(&self) -> impl Iterator<Item = &Graph> + '_ {
        self.graphs.iter().skip(1)
    }

    /// Number of perturbed levels (`k`).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.graphs.len() - 1
    }

    /// All graphs including the original.
    #[must_use]
    pub fn graphs(&self) -> &[Graph] {
        &self.graphs
    }

    /// Edge count at every level, original first.
    #[must_use]
    pub fn edge_counts(&self) -> Vec<usize> {
        self.graphs.iter().map(Graph::edge_count).collect()
    }
}

/// Build a cascade of `levels` perturbed graphs below `graph`.
///
/// # Errors
///
/// Returns [`Error::InvalidFraction`] if `fraction` is outside `[0, 1]`.
#[instrument(skip(graph, rng), fields(edges = graph.edge_count()))]
pub fn cascade<R: Rng + ?Sized>(
    graph: &Graph,
    fraction: f64,
    levels: usize,
    rng: &mut R,
) -> Result<Cascade> {
    validate_fraction(fraction)?;

    let mut graphs = Vec::with_capacity(levels + 1);
    graphs.push(graph.clone());
    for _ in 0..levels {
        let next = thin(&graphs[graphs.len() - 1], fraction, rng);
        graphs.push(next);
    }

    Ok(Cascade { graphs })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
