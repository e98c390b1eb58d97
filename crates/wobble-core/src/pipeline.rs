//! End-to-end robustness run.
//!
//! # Pipeline
//!
//! ```text
//! RunConfig::validate()            fail fast, before any trial
//!        ↓
//! centrality(G)                    unperturbed vector, computed once
//!        ↓
//! aggregate::aggregate()           T cascades, per-level sums
//!        ↓
//! Aggregation (mean | sum)         same constant for every level
//!        ↓
//! matrix::build()                  tau-b and gamma, L = k + 1 levels
//! ```
//!
//! Levels are labelled `level-1` (least perturbed) through `level-k`, with
//! `original` last.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, instrument};

use crate::aggregate::aggregate;
use crate::centrality::{Centrality, CentralityVector};
use crate::config::{Aggregation, RunConfig};
use crate::error::Result;
use crate::graph::{Graph, GraphStats};
use crate::matrix::{self, CorrelationMatrix};

/// Label of the unperturbed graph.
pub const ORIGINAL_LABEL: &str = "original";

/// Label of perturbation level `level` (1-based).
#[must_use]
pub fn level_label(level: usize) -> String {
    format!("level-{level}")
}

/// Everything a reporting collaborator needs from one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RobustnessReport {
    pub centrality: String,
    pub graph: GraphStats,
    pub config: RunConfig,
    /// Row/column labels shared by both matrices.
    pub labels: Vec<String>,
    pub tau_b: CorrelationMatrix,
    pub gamma: CorrelationMatrix,
    pub elapsed_ms: u64,
}

impl RobustnessReport {
    /// Tau-b between the most perturbed level and the original graph.
    #[must_use]
    pub fn deepest_tau_b(&self) -> Option<f64> {
        let last = self.labels.len().checked_sub(1)?;
        self.tau_b.get(last.checked_sub(1)?, last)
    }
}

/// Run the full robustness estimation for `graph`.
///
/// # Errors
///
/// Any configuration error aborts before the first trial. See
/// [`crate::aggregate::aggregate`] and [`crate::matrix::build`] for the
/// remaining failure modes.
#[instrument(skip_all, fields(
    centrality = centrality.name(),
    nodes = graph.node_count(),
    edges = graph.edge_count(),
))]
pub fn run<C: Centrality + ?Sized>(
    graph: &Graph,
    centrality: &C,
    config: &RunConfig,
) -> Result<RobustnessReport> {
    config.validate()?;
    let counter = config.counter()?;
    let started = Instant::now();

    let original = centrality.compute(graph);
    original.ensure_over(graph)?;

    let aggregated = aggregate(graph, centrality, &config.aggregate_options())?;
    let levels = match config.aggregation {
        Aggregation::Mean => aggregated.means(),
        Aggregation::Sum => aggregated.into_sums(),
    };

    let mut vectors: Vec<(String, CentralityVector)> = levels
        .into_iter()
        .enumerate()
        .map(|(i, v)| (level_label(i + 1), v))
        .collect();
    vectors.push((ORIGINAL_LABEL.to_string(), original));

    let matrices = matrix::build(&vectors, &counter)?;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let report = RobustnessReport {
        centrality: centrality.name().to_string(),
        graph: GraphStats::from_graph(graph),
        config: config.clone(),
        labels: vectors.into_iter().map(|(label, _)| label).collect(),
        tau_b: matrices.tau_b,
        gamma: matrices.gamma,
        elapsed_ms,
    };

    info!(
        elapsed_ms,
        deepest_tau_b = ?report.deepest_tau_b(),
        "robustness run complete"
    );

    Ok(report)
}
