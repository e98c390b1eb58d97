//! Built-in centrality scorers.
//!
//! # Overview
//!
//! The robustness pipeline treats centrality as an injected capability (see
//! [`crate::centrality::Centrality`]). These scorers cover the common
//! choices for undirected, unweighted graphs:
//!
//! - **Betweenness** (`betweenness`): which nodes act as bridges on shortest
//!   paths?
//! - **Eigenvector** (`eigenvector`): which nodes are connected to other
//!   well-connected nodes?
//! - **Degree** (`degree`): how many neighbours does a node have?
//!
//! Every scorer returns a vector over the full node set; nodes isolated by
//! edge removal score zero (or decay towards zero for eigenvector).
//!
//! # Usage
//!
//! ```rust,ignore
//! use wobble_core::metrics::{Metric, MetricKind};
//!
//! let metric = Metric::from_kind(MetricKind::Betweenness);
//! let scores = metric.compute(&graph);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::centrality::{Centrality, CentralityVector};
use crate::graph::Graph;

pub mod betweenness;
pub mod degree;
pub mod eigenvector;

pub use betweenness::Betweenness;
pub use degree::Degree;
pub use eigenvector::Eigenvector;

/// Names of the built-in scorers, as used in config files and on the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    #[default]
    Betweenness,
    Eigenvector,
    Degree,
}

impl MetricKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Betweenness => "betweenness",
            Self::Eigenvector => "eigenvector",
            Self::Degree => "degree",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "betweenness" => Ok(Self::Betweenness),
            "eigenvector" => Ok(Self::Eigenvector),
            "degree" => Ok(Self::Degree),
            other => Err(format!(
                "unknown centrality `{other}` (expected betweenness, eigenvector or degree)"
            )),
        }
    }
}

/// A configured built-in scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Betweenness(Betweenness),
    Eigenvector(Eigenvector),
    Degree(Degree),
}

impl Metric {
    /// Scorer of `kind` with default settings.
    #[must_use]
    pub fn from_kind(kind: MetricKind) -> Self {
        match kind {
            MetricKind::Betweenness => Self::Betweenness(Betweenness::default()),
            MetricKind::Eigenvector => Self::Eigenvector(Eigenvector::default()),
            MetricKind::Degree => Self::Degree(Degree::default()),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> MetricKind {
        match self {
            Self::Betweenness(_) => MetricKind::Betweenness,
            Self::Eigenvector(_) => MetricKind::Eigenvector,
            Self::Degree(_) => MetricKind::Degree,
        }
    }
}

impl Centrality for Metric {
    fn compute(&self, graph: &Graph) -> CentralityVector {
        match self {
            Self::Betweenness(m) => m.compute(graph),
            Self::Eigenvector(m) => m.compute(graph),
            Self::Degree(m) => m.compute(graph),
        }
    }

    fn name(&self) -> &str {
        self.kind().as_str()
    }
}
