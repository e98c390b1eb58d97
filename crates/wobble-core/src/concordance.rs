//! Pairwise concordance counting and the tau-b / gamma statistics.
//!
//! # Overview
//!
//! For two vectors `x`, `y` over the same `n` nodes, every unordered pair
//! `{u, v}` (there are `C(n, 2)`) falls into exactly one class:
//!
//! | `x(u)` vs `x(v)` | `y(u)` vs `y(v)` | class        |
//! |------------------|------------------|--------------|
//! | tie              | tie              | `tied_both`  |
//! | tie              | differ           | `tied_x`     |
//! | differ           | tie              | `tied_y`     |
//! | same direction   | same direction   | `concordant` |
//! | opposite         | opposite         | `discordant` |
//!
//! `tied_both` pairs are counted for auditing but take no part in either
//! statistic.
//!
//! # Statistics
//!
//! ```text
//! tau_b = (nc - nd) / sqrt((nc + nd + ntx) * (nc + nd + nty))
//! gamma = (nc - nd) / (nc + nd)
//! ```
//!
//! Gamma is the classic Goodman-Kruskal gamma: pairs tied in either vector
//! are excluded from its denominator. A statistic whose denominator is zero
//! is undefined and returned as `None`; it is never coerced to 0 or 1.
//!
//! # Ties
//!
//! Scores are compared exactly by default. [`ConcordanceCounter::with_tolerance`]
//! treats `|a - b| <= tolerance` as a tie instead, for scorers whose output
//! carries floating-point noise (power iteration, normalized betweenness).
//! The tolerance is a run configuration choice and changes the counts.

use serde::Serialize;

use crate::centrality::CentralityVector;
use crate::error::{Error, Result};

/// Pair classification counts for two aligned vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ConcordanceCounts {
    pub concordant: u64,
    pub discordant: u64,
    /// Tied in `x` only.
    pub tied_x: u64,
    /// Tied in `y` only.
    pub tied_y: u64,
    /// Tied in both vectors; excluded from every statistic.
    pub tied_both: u64,
}

impl ConcordanceCounts {
    /// Total pairs classified, `C(n, 2)`.
    #[must_use]
    pub const fn pairs(&self) -> u64 {
        self.concordant + self.discordant + self.tied_x + self.tied_y + self.tied_both
    }

    /// Counts for the swapped comparison `count(y, x)`.
    #[must_use]
    pub const fn swapped(&self) -> Self {
        Self {
            tied_x: self.tied_y,
            tied_y: self.tied_x,
            ..*self
        }
    }

    /// Kendall tau-b, or `None` when either vector is entirely tied.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn tau_b(&self) -> Option<f64> {
        let untied = self.concordant + self.discordant;
        let left = untied + self.tied_x;
        let right = untied + self.tied_y;
        if left == 0 || right == 0 {
            return None;
        }
        let numerator = self.concordant as f64 - self.discordant as f64;
        let tau = numerator / ((left as f64) * (right as f64)).sqrt();
        Some(tau.clamp(-1.0, 1.0))
    }

    /// Goodman-Kruskal gamma, or `None` when no pair is untied in both.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn gamma(&self) -> Option<f64> {
        let untied = self.concordant + self.discordant;
        if untied == 0 {
            return None;
        }
        Some((self.concordant as f64 - self.discordant as f64) / untied as f64)
    }
}

/// Counts concordant, discordant and tied pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConcordanceCounter {
    tolerance: f64,
}

impl ConcordanceCounter {
    /// Exact tie detection.
    #[must_use]
    pub const fn exact() -> Self {
        Self { tolerance: 0.0 }
    }

    /// Treat scores within `tolerance` of each other as tied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTolerance`] for a negative or non-finite value.
    pub fn with_tolerance(tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(Error::InvalidTolerance(tolerance));
        }
        Ok(Self { tolerance })
    }

    #[must_use]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Classify every node pair of `x` and `y`.
    ///
    /// # Errors
    ///
    /// - [`Error::NodeSetMismatch`] if the vectors are over different nodes.
    /// - [`Error::NonFiniteScore`] if either holds NaN or an infinity.
    pub fn count(&self, x: &CentralityVector, y: &CentralityVector) -> Result<ConcordanceCounts> {
        x.ensure_aligned(y)?;
        x.ensure_finite()?;
        y.ensure_finite()?;
        Ok(self.count_aligned(x.scores(), y.scores()))
    }

    /// Classify every index pair of two plain slices.
    ///
    /// # Errors
    ///
    /// - [`Error::NodeSetMismatch`] if the lengths differ.
    /// - [`Error::NonFiniteScore`] (node named `#index`) for NaN/infinite input.
    pub fn count_slices(&self, x: &[f64], y: &[f64]) -> Result<ConcordanceCounts> {
        if x.len() != y.len() {
            return Err(Error::NodeSetMismatch {
                detail: format!("slices of length {} and {}", x.len(), y.len()),
            });
        }
        for (i, &value) in x.iter().chain(y).enumerate() {
            if !value.is_finite() {
                return Err(Error::NonFiniteScore {
                    node: format!("#{}", i % x.len()),
                    value,
                });
            }
        }
        Ok(self.count_aligned(x, y))
    }

    fn count_aligned(&self, x: &[f64], y: &[f64]) -> ConcordanceCounts {
        let mut counts = ConcordanceCounts::default();
        let n = x.len();

        for u in 0..n {
            for v in (u + 1)..n {
                let dx = self.direction(x[u], x[v]);
                let dy = self.direction(y[u], y[v]);

                match (dx, dy) {
                    (0, 0) => counts.tied_both += 1,
                    (0, _) => counts.tied_x += 1,
                    (_, 0) => counts.tied_y += 1,
                    _ if dx == dy => counts.concordant += 1,
                    _ => counts.discordant += 1,
                }
            }
        }

        counts
    }

    fn direction(&self, a: f64, b: f64) -> i8 {
        let d = a - b;
        if d.abs() <= self.tolerance {
            0
        } else if d > 0.0 {
            1
        } else {
            -1
        }
    }
}

/// Count with exact tie detection.
///
/// # Errors
///
/// See [`ConcordanceCounter::count`].
pub fn count(x: &CentralityVector, y: &CentralityVector) -> Result<ConcordanceCounts> {
    ConcordanceCounter::exact().count(x, y)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(x: &[f64], y: &[f64]) -> ConcordanceCounts {
        ConcordanceCounter::exact().count_slices(x, y).expect("valid input")
    }

    #[test]
    fn reversed_order_is_fully_discordant() {
        let c = exact(&[1.0, 2.0, 3.0, 4.0], &[4.0, 3.0, 2.0, 1.0]);
        assert_eq!(c.concordant, 0);
        assert_eq!(c.discordant, 6);
        assert_eq!(c.tau_b(), Some(-1.0));
        assert_eq!(c.gamma(), Some(-1.0));
    }

    #[test]
    fn single_ties_land_in_their_own_bucket() {
        // Pair (0,1) is tied in x only, pair (1,2) is tied in y only.
        let c = exact(&[1.0, 1.0, 2.0, 3.0], &[1.0, 2.0, 2.0, 3.0]);
        assert_eq!(c.tied_x, 1);
        assert_eq!(c.tied_y, 1);
        assert_eq!(c.tied_both, 0);
        assert_eq!(c.concordant, 4);
        assert_eq!(c.discordant, 0);
        assert_eq!(c.pairs(), 6);

        // tau-b = 4 / sqrt(5 * 5), gamma ignores the tied pairs.
        let tau = c.tau_b().expect("defined");
        assert!((tau - 0.8).abs() < 1e-12, "tau {tau}");
        assert_eq!(c.gamma(), Some(1.0));
    }

    #[test]
    fn self_comparison_is_perfect() {
        let x = [0.3, 0.1, 0.1, 0.9, 0.5];
        let c = exact(&x, &x);
        assert_eq!(c.discordant, 0);
        assert_eq!(c.tied_x, 0);
        assert_eq!(c.tied_y, 0);
        assert_eq!(c.tied_both, 1);
        assert_eq!(c.tau_b(), Some(1.0));
        assert_eq!(c.gamma(), Some(1.0));
    }

    #[test]
    fn all_tied_vector_is_undefined() {
        let c = exact(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]);
        assert_eq!(c.tied_x, 3);
        assert_eq!(c.tau_b(), None);
        assert_eq!(c.gamma(), None);

        let same = exact(&[5.0, 5.0], &[5.0, 5.0]);
        assert_eq!(same.tied_both, 1);
        assert_eq!(same.tau_b(), None);
        assert_eq!(same.gamma(), None);
    }

    #[test]
    fn fewer_than_two_nodes_is_undefined() {
        let c = exact(&[1.0], &[1.0]);
        assert_eq!(c.pairs(), 0);
        assert_eq!(c.tau_b(), None);
        assert_eq!(c.gamma(), None);
    }

    #[test]
    fn swapping_arguments_swaps_tie_counts() {
        let x = [1.0, 1.0, 2.0, 3.0, 0.5];
        let y = [1.0, 2.0, 2.0, 0.0, 0.5];
        let xy = exact(&x, &y);
        let yx = exact(&y, &x);
        assert_eq!(yx, xy.swapped());
        assert_eq!(xy.tau_b(), yx.tau_b());
        assert_eq!(xy.gamma(), yx.gamma());
    }

    #[test]
    fn tolerance_merges_near_ties() {
        let x = [1.0, 1.0 + 1e-12, 2.0];
        let y = [1.0, 2.0, 3.0];

        let strict = exact(&x, &y);
        assert_eq!(strict.tied_x, 0);
        assert_eq!(strict.concordant, 3);

        let loose = ConcordanceCounter::with_tolerance(1e-9)
            .expect("valid")
            .count_slices(&x, &y)
            .expect("valid input");
        assert_eq!(loose.tied_x, 1);
        assert_eq!(loose.concordant, 2);
    }

    #[test]
    fn invalid_tolerance_rejected() {
        assert!(ConcordanceCounter::with_tolerance(-1e-6).is_err());
        assert!(ConcordanceCounter::with_tolerance(f64::NAN).is_err());
    }

    #[test]
    fn length_mismatch_and_nan_rejected() {
        let counter = ConcordanceCounter::exact();
        assert!(matches!(
            counter.count_slices(&[1.0, 2.0], &[1.0]),
            Err(Error::NodeSetMismatch { .. })
        ));
        match counter.count_slices(&[1.0, 2.0], &[1.0, f64::NAN]) {
            Err(Error::NonFiniteScore { node, .. }) => assert_eq!(node, "#1"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn mixed_example_counts() {
        // x = 1 2 3 4 5, y = 2 1 4 3 5: two swapped neighbour pairs.
        let c = exact(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 1.0, 4.0, 3.0, 5.0]);
        assert_eq!(c.concordant, 8);
        assert_eq!(c.discordant, 2);
        assert_eq!(c.tau_b(), Some(0.6));
        assert_eq!(c.gamma(), Some(0.6));
    }
}
