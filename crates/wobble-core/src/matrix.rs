//! Level-by-level correlation matrices.
//!
//! Given `L` labelled centrality vectors, [`build`] counts concordance for
//! every pair of levels and fills two `L x L` matrices, one for tau-b and
//! one for gamma. Counting is symmetric under argument swap, so only the
//! upper triangle (diagonal included) is counted and mirrored.
//!
//! Undefined cells (a vector that is entirely tied) hold `None`. A
//! degenerate cell never aborts the build.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::centrality::CentralityVector;
use crate::concordance::{ConcordanceCounter, ConcordanceCounts};
use crate::error::{Error, Result};

/// A labelled symmetric matrix of an optional statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    fn filled(labels: Vec<String>) -> Self {
        let n = labels.len();
        Self {
            labels,
            values: vec![vec![None; n]; n],
        }
    }

    /// Number of rows (and columns).
    #[must_use]
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Cell `[i][j]`; `None` when out of range or undefined.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i)?.get(j).copied().flatten()
    }

    /// Cell addressed by row and column label.
    #[must_use]
    pub fn get_by_label(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == row)?;
        let j = self.labels.iter().position(|l| l == col)?;
        self.get(i, j)
    }

    /// All rows, in label order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.values
    }

    /// Whether `[i][j] == [j][i]` for every cell.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        (0..self.size()).all(|i| (0..i).all(|j| self.values[i][j] == self.values[j][i]))
    }

    fn set_pair(&mut self, i: usize, j: usize, value: Option<f64>) {
        self.values[i][j] = value;
        self.values[j][i] = value;
    }
}

/// Tau-b and gamma matrices over the same labels, plus the raw counts of
/// every counted pair of levels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrices {
    pub tau_b: CorrelationMatrix,
    pub gamma: CorrelationMatrix,
    /// Upper-triangle counts as `(i, j, counts)` with `i <= j`.
    pub counts: Vec<(usize, usize, ConcordanceCounts)>,
}

/// Build both matrices over `vectors`, in the given order.
///
/// # Errors
///
/// - [`Error::EmptyComparison`] if `vectors` is empty.
/// - [`Error::NodeSetMismatch`] / [`Error::NonFiniteScore`] from counting.
#[instrument(skip(vectors, counter), fields(levels = vectors.len()))]
pub fn build(
    vectors: &[(String, CentralityVector)],
    counter: &ConcordanceCounter,
) -> Result<CorrelationMatrices> {
    if vectors.is_empty() {
        return Err(Error::EmptyComparison);
    }

    let l = vectors.len();
    let pairs: Vec<(usize, usize)> = (0..l).flat_map(|i| (i..l).map(move |j| (i, j))).collect();

    let counted: Vec<(usize, usize, ConcordanceCounts)> = pairs
        .into_par_iter()
        .map(|(i, j)| {
            let c = counter.count(&vectors[i].1, &vectors[j].1)?;
            Ok((i, j, c))
        })
        .collect::<Result<_>>()?;

    let labels: Vec<String> = vectors.iter().map(|(label, _)| label.clone()).collect();
    let mut tau_b = CorrelationMatrix::filled(labels.clone());
    let mut gamma = CorrelationMatrix::filled(labels);

    for &(i, j, c) in &counted {
        tau_b.set_pair(i, j, c.tau_b());
        gamma.set_pair(i, j, c.gamma());
        if c.tau_b().is_none() || c.gamma().is_none() {
            debug!(
                row = %vectors[i].0,
                col = %vectors[j].0,
                "degenerate statistic (all pairs tied)"
            );
        }
    }

    Ok(CorrelationMatrices {
        tau_b,
        gamma,
        counts: counted,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
