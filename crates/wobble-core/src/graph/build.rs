//! Graph construction from edge lists.
//!
//! # Overview
//!
//! A [`Graph`] is an undirected, unweighted, simple graph backed by a
//! [`petgraph`] `UnGraph<(), ()>`. Node labels live in a shared
//! [`NodeSet`]; every graph derived from the same base graph (every level of
//! every cascade) holds the same `Arc<NodeSet>`, so node `i` means the same
//! thing everywhere and centrality vectors can be compared index by index.
//!
//! ## Edge List Format
//!
//! One edge per line, two node labels separated by whitespace or a comma.
//! Additional columns (weights, timestamps) are ignored. Blank lines and
//! lines starting with `#` or `%` are skipped.
//!
//! ```text
//! # source target
//! alice bob
//! bob,carol
//! ```
//!
//! ## Simple-Graph Normalization
//!
//! Self-loops and repeated undirected edges are dropped while building; the
//! number dropped is logged at `warn` level.
//!
//! ## Content Hash
//!
//! [`Graph::content_hash`] is a BLAKE3 hash of the sorted canonical edge
//! list (`min(label) \0 max(label) \0` per edge). Reports carry it so a run
//! can be tied back to its input.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use fixedbitset::FixedBitSet;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use tracing::{instrument, warn};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// NodeSet
// ---------------------------------------------------------------------------

/// Ordered node labels shared by every graph of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeSet {
    labels: Vec<String>,
    index: HashMap<String, NodeIndex>,
}

impl NodeSet {
    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True if the set holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label of the node at `idx`.
    #[must_use]
    pub fn label(&self, idx: NodeIndex) -> Option<&str> {
        self.labels.get(idx.index()).map(String::as_str)
    }

    /// Index of the node labelled `label`.
    #[must_use]
    pub fn index_of(&self, label: &str) -> Option<NodeIndex> {
        self.index.get(label).copied()
    }

    /// Labels in index order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn insert(&mut self, label: &str) -> (NodeIndex, bool) {
        if let Some(&idx) = self.index.get(label) {
            return (idx, false);
        }
        let idx = NodeIndex::new(self.labels.len());
        self.labels.push(label.to_string());
        self.index.insert(label.to_string(), idx);
        (idx, true)
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// An immutable undirected simple graph.
///
/// Perturbation never mutates a `Graph`; it produces a new one over the same
/// [`NodeSet`] with a subset of the edges.
#[derive(Debug, Clone)]
pub struct Graph {
    inner: UnGraph<(), ()>,
    nodes: Arc<NodeSet>,
}

impl Graph {
    /// Build a graph from an edge list. Nodes are added in order of first
    /// appearance.
    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut builder = GraphBuilder::default();
        for (a, b) in edges {
            builder.add_edge(a, b);
        }
        builder.build()
    }

    /// Build a graph with an explicit node list (allows isolated nodes).
    /// Edge endpoints not present in `nodes` are appended.
    pub fn with_nodes<'a, N, E>(nodes: N, edges: E) -> Self
    where
        N: IntoIterator<Item = &'a str>,
        E: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut builder = GraphBuilder::default();
        for id in nodes {
            builder.add_node(id);
        }
        for (a, b) in edges {
            builder.add_edge(a, b);
        }
        builder.build()
    }

    /// Parse an edge list from `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for a line with fewer than two columns and
    /// [`Error::Io`] if reading fails.
    #[instrument(skip(reader))]
    pub fn parse_edge_list<R: BufRead>(reader: R) -> Result<Self> {
        let mut builder = GraphBuilder::default();

        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('%') {
                continue;
            }

            let mut fields = trimmed
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|f| !f.is_empty());

            match (fields.next(), fields.next()) {
                (Some(a), Some(b)) => {
                    builder.add_edge(a, b);
                }
                _ => {
                    return Err(Error::Parse {
                        line: lineno + 1,
                        message: format!("expected two node labels, got `{trimmed}`"),
                    });
                }
            }
        }

        Ok(builder.build())
    }

    /// Read and parse an edge list file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened, otherwise any
    /// error from [`Graph::parse_edge_list`].
    pub fn read_edge_list(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::parse_edge_list(BufReader::new(file))
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Shared node set.
    #[must_use]
    pub const fn nodes(&self) -> &Arc<NodeSet> {
        &self.nodes
    }

    /// Underlying petgraph structure.
    #[must_use]
    pub const fn inner(&self) -> &UnGraph<(), ()> {
        &self.inner
    }

    /// Look up the node index for a label.
    #[must_use]
    pub fn node_index(&self, label: &str) -> Option<NodeIndex> {
        self.nodes.index_of(label)
    }

    /// Label of a node.
    #[must_use]
    pub fn label(&self, idx: NodeIndex) -> Option<&str> {
        self.nodes.label(idx)
    }

    /// Number of edges incident to `idx`.
    #[must_use]
    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.inner.neighbors(idx).count()
    }

    /// Whether `other` is defined over the same node set.
    #[must_use]
    pub fn same_nodes(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.nodes, &other.nodes) || self.nodes == other.nodes
    }

    /// Endpoints of every edge, in edge-index order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.inner.edge_references().map(|e| (e.source(), e.target()))
    }

    /// BLAKE3 hash of the sorted canonical edge list.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut pairs: Vec<(&str, &str)> = self
            .edges()
            .filter_map(|(a, b)| {
                let (la, lb) = (self.label(a)?, self.label(b)?);
                Some(if la <= lb { (la, lb) } else { (lb, la) })
            })
            .collect();
        pairs.sort_unstable();

        let mut hasher = blake3::Hasher::new();
        for (a, b) in pairs {
            hasher.update(a.as_bytes());
            hasher.update(b"\x00");
            hasher.update(b.as_bytes());
            hasher.update(b"\x00");
        }
        format!("blake3:{}", hasher.finalize())
    }

    /// A new graph over the same node set without the edges whose index is
    /// set in `removed`. Node indices are preserved.
    pub(crate) fn without_edges(&self, removed: &FixedBitSet) -> Self {
        let inner = self.inner.filter_map(
            |_, &w| Some(w),
            |e: EdgeIndex, &w| (!removed.contains(e.index())).then_some(w),
        );
        Self {
            inner,
            nodes: Arc::clone(&self.nodes),
        }
    }
}

// ---------------------------------------------------------------------------
// GraphBuilder
// ---------------------------------------------------------------------------

/// Incremental builder enforcing the simple-graph assumption.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: NodeSet,
    inner: UnGraph<(), ()>,
    seen: HashSet<(usize, usize)>,
    self_loops: usize,
    duplicates: usize,
}

impl GraphBuilder {
    /// Add a node (no-op if already present) and return its index.
    pub fn add_node(&mut self, label: &str) -> NodeIndex {
        let (idx, fresh) = self.nodes.insert(label);
        if fresh {
            self.inner.add_node(());
        }
        idx
    }

    /// Add an undirected edge. Returns `false` when the edge is a self-loop
    /// or already present.
    pub fn add_edge(&mut self, a: &str, b: &str) -> bool {
        let ia = self.add_node(a);
        let ib = self.add_node(b);

        if ia == ib {
            self.self_loops += 1;
            return false;
        }

        let key = if ia < ib {
            (ia.index(), ib.index())
        } else {
            (ib.index(), ia.index())
        };
        if !self.seen.insert(key) {
            self.duplicates += 1;
            return false;
        }

        self.inner.add_edge(ia, ib, ());
        true
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Graph {
        if self.self_loops > 0 || self.duplicates > 0 {
            warn!(
                self_loops = self.self_loops,
                duplicates = self.duplicates,
                "dropped edges to keep the graph simple"
            );
        }
        Graph {
            inner: self.inner,
            nodes: Arc::new(self.nodes),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
