use std::io;

/// Result alias used across `wobble-core`.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by the robustness pipeline.
///
/// Configuration errors are detected before any trial runs and abort the
/// whole run. Degenerate statistics are not errors: they surface as `None`
/// cells in a [`crate::matrix::CorrelationMatrix`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("perturbation fraction must be a finite value in [0, 1], got {0}")]
    InvalidFraction(f64),

    #[error("trial count must be at least 1")]
    InvalidTrialCount,

    #[error("tie tolerance must be finite and >= 0, got {0}")]
    InvalidTolerance(f64),

    #[error("node sets differ: {detail}")]
    NodeSetMismatch { detail: String },

    #[error("centrality score for node `{node}` is not finite ({value})")]
    NonFiniteScore { node: String, value: f64 },

    #[error("correlation matrix needs at least one vector")]
    EmptyComparison,

    #[error("edge list line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("time budget exhausted after {completed} of {requested} trials")]
    BudgetExceeded { completed: usize, requested: usize },
}

impl Error {
    /// Stable code identifier (`W####`) for machine parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidFraction(_) => "W1001",
            Self::InvalidTrialCount => "W1002",
            Self::InvalidTolerance(_) => "W1003",
            Self::NodeSetMismatch { .. } => "W1004",
            Self::NonFiniteScore { .. } => "W1005",
            Self::EmptyComparison => "W1006",
            Self::Parse { .. } => "W2001",
            Self::Config(_) => "W2002",
            Self::Io(_) => "W2003",
            Self::BudgetExceeded { .. } => "W3001",
        }
    }

    /// True for errors caused by an invalid run configuration or by inputs
    /// that cannot be compared. These abort a run before any trial starts.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidFraction(_)
                | Self::InvalidTrialCount
                | Self::InvalidTolerance(_)
                | Self::NodeSetMismatch { .. }
                | Self::NonFiniteScore { .. }
                | Self::EmptyComparison
        )
    }
}
