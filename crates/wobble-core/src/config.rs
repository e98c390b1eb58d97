//! Run configuration.
//!
//! A config file is TOML with two optional tables; every key has a default.
//!
//! ```toml
//! [run]
//! perturbation_fraction = 0.05
//! cascade_depth = 4
//! trial_count = 50
//! seed = 0
//! aggregation = "mean"      # or "sum"
//! tie_tolerance = 0.0       # exact tie detection
//! # time_budget_secs = 600
//!
//! [centrality]
//! kind = "betweenness"      # or "eigenvector", "degree"
//! normalized = false
//! max_iter = 100            # eigenvector only
//! tolerance = 1e-6          # eigenvector only
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateOptions;
use crate::concordance::ConcordanceCounter;
use crate::error::{Error, Result};
use crate::metrics::{Betweenness, Degree, Eigenvector, Metric, MetricKind};
use crate::perturb::validate_fraction;

/// How per-level sums are turned into comparison vectors.
///
/// Both choices divide every perturbed level by the same constant (or by
/// none), so rank statistics are identical; only absolute scores differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Divide each level's sum by the trial count.
    #[default]
    Mean,
    /// Keep the raw sum over trials.
    Sum,
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mean => "mean",
            Self::Sum => "sum",
        })
    }
}

impl FromStr for Aggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" | "average" => Ok(Self::Mean),
            "sum" => Ok(Self::Sum),
            other => Err(format!("unknown aggregation `{other}` (expected mean or sum)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_fraction")]
    pub perturbation_fraction: f64,
    #[serde(default = "default_depth")]
    pub cascade_depth: usize,
    #[serde(default = "default_trials")]
    pub trial_count: usize,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default)]
    pub tie_tolerance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_budget_secs: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            perturbation_fraction: default_fraction(),
            cascade_depth: default_depth(),
            trial_count: default_trials(),
            seed: 0,
            aggregation: Aggregation::default(),
            tie_tolerance: 0.0,
            time_budget_secs: None,
        }
    }
}

impl RunConfig {
    /// Check every field before a run starts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFraction`], [`Error::InvalidTrialCount`] or
    /// [`Error::InvalidTolerance`].
    pub fn validate(&self) -> Result<()> {
        validate_fraction(self.perturbation_fraction)?;
        if self.trial_count == 0 {
            return Err(Error::InvalidTrialCount);
        }
        self.counter().map(|_| ())
    }

    #[must_use]
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_secs.map(Duration::from_secs)
    }

    /// Options for [`crate::aggregate::aggregate`].
    #[must_use]
    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            fraction: self.perturbation_fraction,
            levels: self.cascade_depth,
            trials: self.trial_count,
            seed: self.seed,
            time_budget: self.time_budget(),
        }
    }

    /// Concordance counter honoring `tie_tolerance`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTolerance`].
    pub fn counter(&self) -> Result<ConcordanceCounter> {
        ConcordanceCounter::with_tolerance(self.tie_tolerance)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentralityConfig {
    #[serde(default)]
    pub kind: MetricKind,
    #[serde(default)]
    pub normalized: bool,
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            kind: MetricKind::default(),
            normalized: false,
            max_iter: default_max_iter(),
            tolerance: default_tolerance(),
        }
    }
}

impl CentralityConfig {
    /// The configured scorer.
    #[must_use]
    pub const fn metric(&self) -> Metric {
        match self.kind {
            MetricKind::Betweenness => Metric::Betweenness(Betweenness {
                normalized: self.normalized,
            }),
            MetricKind::Eigenvector => Metric::Eigenvector(Eigenvector {
                max_iter: self.max_iter,
                tolerance: self.tolerance,
            }),
            MetricKind::Degree => Metric::Degree(Degree {
                normalized: self.normalized,
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub centrality: CentralityConfig,
}

impl ConfigFile {
    /// Parse TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on malformed TOML or wrong value types.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file exists but cannot be read, or
    /// [`Error::Config`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }
}

const fn default_fraction() -> f64 {
    0.05
}

const fn default_depth() -> usize {
    4
}

const fn default_trials() -> usize {
    50
}

const fn default_max_iter() -> usize {
    100
}

const fn default_tolerance() -> f64 {
    1e-6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = RunConfig::default();
        assert!((cfg.perturbation_fraction - 0.05).abs() < f64::EPSILON);
        assert_eq!(cfg.cascade_depth, 4);
        assert_eq!(cfg.trial_count, 50);
        assert_eq!(cfg.aggregation, Aggregation::Mean);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_file_yields_defaults() {
        let file = ConfigFile::parse("").expect("parse");
        assert_eq!(file, ConfigFile::default());
    }

    #[test]
    fn partial_tables_fill_defaults() {
        let file = ConfigFile::parse(
            r#"
            [run]
            trial_count = 10
            aggregation = "sum"

            [centrality]
            kind = "eigenvector"
            "#,
        )
        .expect("parse");

        assert_eq!(file.run.trial_count, 10);
        assert_eq!(file.run.cascade_depth, 4);
        assert_eq!(file.run.aggregation, Aggregation::Sum);
        assert_eq!(file.centrality.kind, MetricKind::Eigenvector);
        assert_eq!(file.centrality.max_iter, 100);
        assert_eq!(file.centrality.metric().kind(), MetricKind::Eigenvector);
    }

    #[test]
    fn bad_values_fail_validation() {
        let bad_fraction = RunConfig {
            perturbation_fraction: -0.1,
            ..RunConfig::default()
        };
        assert!(matches!(
            bad_fraction.validate(),
            Err(Error::InvalidFraction(_))
        ));

        let no_trials = RunConfig {
            trial_count: 0,
            ..RunConfig::default()
        };
        assert!(matches!(no_trials.validate(), Err(Error::InvalidTrialCount)));

        let bad_tolerance = RunConfig {
            tie_tolerance: -1.0,
            ..RunConfig::default()
        };
        assert!(matches!(
            bad_tolerance.validate(),
            Err(Error::InvalidTolerance(_))
        ));
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let err = ConfigFile::parse("[centrality]\nkind = \"pagerank\"\n").expect_err("bad kind");
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = ConfigFile::load(&dir.path().join("wobble.toml")).expect("load");
        assert_eq!(file, ConfigFile::default());
    }

    #[test]
    fn aggregation_parses() {
        assert_eq!("Mean".parse::<Aggregation>(), Ok(Aggregation::Mean));
        assert_eq!("sum".parse::<Aggregation>(), Ok(Aggregation::Sum));
        assert!("median".parse::<Aggregation>().is_err());
    }
}
