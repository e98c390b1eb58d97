//! Centrality vectors and the injected scoring capability.
//!
//! A [`CentralityVector`] holds one real score per node, index-aligned with
//! the [`NodeSet`] of the graph it was computed on. Any function
//! `Fn(&Graph) -> CentralityVector` is a [`Centrality`]; the built-in
//! scorers live in [`crate::metrics`].

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeSet};

/// A node-scoring function over graphs.
///
/// Implementations must return a vector over exactly `graph.nodes()`,
/// including nodes left isolated by edge removal.
pub trait Centrality: Sync {
    /// Score every node of `graph`.
    fn compute(&self, graph: &Graph) -> CentralityVector;

    /// Short name used in logs and reports.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> Centrality for F
where
    F: Fn(&Graph) -> CentralityVector + Sync,
{
    fn compute(&self, graph: &Graph) -> CentralityVector {
        self(graph)
    }
}

/// Per-node scores over a shared node set.
#[derive(Debug, Clone, PartialEq)]
pub struct CentralityVector {
    nodes: Arc<NodeSet>,
    scores: Vec<f64>,
}

impl CentralityVector {
    /// The zero vector over `nodes`.
    #[must_use]
    pub fn zeros(nodes: Arc<NodeSet>) -> Self {
        let scores = vec![0.0; nodes.len()];
        Self { nodes, scores }
    }

    /// Wrap index-aligned scores.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeSetMismatch`] if `scores.len()` differs from the
    /// node count.
    pub fn from_scores(nodes: Arc<NodeSet>, scores: Vec<f64>) -> Result<Self> {
        if scores.len() != nodes.len() {
            return Err(Error::NodeSetMismatch {
                detail: format!("{} scores for {} nodes", scores.len(), nodes.len()),
            });
        }
        Ok(Self { nodes, scores })
    }

    /// Wrap scores already known to match the node set (built-in scorers).
    pub(crate) fn from_aligned(nodes: Arc<NodeSet>, scores: Vec<f64>) -> Self {
        debug_assert_eq!(nodes.len(), scores.len());
        Self { nodes, scores }
    }

    /// Align a label-keyed score map to `nodes`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeSetMismatch`] if the map is missing a node or
    /// names a node outside the set.
    pub fn from_map(nodes: Arc<NodeSet>, map: &HashMap<String, f64>) -> Result<Self> {
        let mut scores = Vec::with_capacity(nodes.len());
        for label in nodes.labels() {
            let Some(&score) = map.get(label) else {
                return Err(Error::NodeSetMismatch {
                    detail: format!("no score for node `{label}`"),
                });
            };
            scores.push(score);
        }

        if map.len() != nodes.len() {
            let extra = map
                .keys()
                .find(|k| nodes.index_of(k).is_none())
                .cloned()
                .unwrap_or_default();
            return Err(Error::NodeSetMismatch {
                detail: format!("score for unknown node `{extra}`"),
            });
        }

        Ok(Self { nodes, scores })
    }

    /// Node set this vector is defined over.
    #[must_use]
    pub const fn nodes(&self) -> &Arc<NodeSet> {
        &self.nodes
    }

    /// Scores in node-index order.
    #[must_use]
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Score of the node labelled `label`.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<f64> {
        let idx = self.nodes.index_of(label)?;
        self.scores.get(idx.index()).copied()
    }

    /// `(label, score)` pairs in node-index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.nodes
            .labels()
            .iter()
            .map(String::as_str)
            .zip(self.scores.iter().copied())
    }

    /// Label-keyed copy, ordered by label.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    /// Fail unless `other` is over the same node set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeSetMismatch`].
    pub fn ensure_aligned(&self, other: &Self) -> Result<()> {
        if Arc::ptr_eq(&self.nodes, &other.nodes) || self.nodes == other.nodes {
            return Ok(());
        }
        Err(Error::NodeSetMismatch {
            detail: format!(
                "vector over {} nodes compared with vector over {} nodes",
                self.nodes.len(),
                other.nodes.len()
            ),
        })
    }

    /// Fail unless this vector is over `graph`'s node set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeSetMismatch`].
    pub fn ensure_over(&self, graph: &Graph) -> Result<()> {
        if Arc::ptr_eq(&self.nodes, graph.nodes()) || *self.nodes == **graph.nodes() {
            return Ok(());
        }
        Err(Error::NodeSetMismatch {
            detail: format!(
                "{} scores for a graph with {} nodes",
                self.len(),
                graph.node_count()
            ),
        })
    }

    /// Fail on the first NaN or infinite score.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonFiniteScore`].
    pub fn ensure_finite(&self) -> Result<()> {
        match self.iter().find(|(_, v)| !v.is_finite()) {
            Some((node, value)) => Err(Error::NonFiniteScore {
                node: node.to_string(),
                value,
            }),
            None => Ok(()),
        }
    }

    /// Node-wise `self += other`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeSetMismatch`] if the node sets differ.
    pub fn accumulate(&mut self, other: &Self) -> Result<()> {
        self.ensure_aligned(other)?;
        for (acc, v) in self.scores.iter_mut().zip(&other.scores) {
            *acc += v;
        }
        Ok(())
    }

    /// Multiply every score by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.scores {
            *v *= factor;
        }
    }
}
