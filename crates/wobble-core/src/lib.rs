#![forbid(unsafe_code)]
//! wobble-core library.
//!
//! Estimates how stable a node-centrality ranking is when a graph loses
//! edges at random, compounding over several levels.
//!
//! ```text
//! Graph ──perturb::cascade()──▶ G1 … Gk        (T independent trials)
//!        ──aggregate::aggregate()──▶ per-level summed vectors
//!        ──matrix::build()──▶ tau-b / gamma matrices over [level-1 … level-k, original]
//! ```
//!
//! [`pipeline::run`] strings the stages together.
//!
//! # Conventions
//!
//! - **Errors**: Return [`Result`] with the crate's [`Error`] enum.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod aggregate;
pub mod centrality;
pub mod concordance;
pub mod config;
pub mod error;
pub mod graph;
pub mod matrix;
pub mod metrics;
pub mod perturb;
pub mod pipeline;

pub use aggregate::{AggregateOptions, AggregatedLevels, aggregate};
pub use centrality::{Centrality, CentralityVector};
pub use concordance::{ConcordanceCounter, ConcordanceCounts};
pub use config::{Aggregation, CentralityConfig, ConfigFile, RunConfig};
pub use error::{Error, Result};
pub use graph::{Graph, GraphBuilder, GraphStats, NodeSet};
pub use matrix::{CorrelationMatrices, CorrelationMatrix};
pub use metrics::{Metric, MetricKind};
pub use perturb::{Cascade, cascade, perturb};
pub use pipeline::{RobustnessReport, run};
