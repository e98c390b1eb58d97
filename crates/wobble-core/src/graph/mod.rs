//! Undirected graph model for robustness runs.
//!
//! # Overview
//!
//! ```text
//! edge list (text)
//!        ↓  build::Graph::parse_edge_list()
//! Graph (UnGraph<(), ()> + Arc<NodeSet>)
//!        ↓  perturb::cascade()
//! G0, G1, ..., Gk   (same Arc<NodeSet>, fewer edges)
//!        ↓  stats::GraphStats::from_graph()
//! GraphStats (density, components, isolated nodes, …)
//! ```
//!
//! All graphs produced from one base graph share its node set, so node
//! indices are stable across perturbation levels.

pub mod build;
pub mod stats;

pub use build::{Graph, GraphBuilder, NodeSet};
pub use stats::GraphStats;
