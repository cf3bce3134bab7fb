//! Transition matrix bank
//!
//! One dense, row-stochastic `dimensions × dimensions` matrix per ordered
//! pair of distinct active labels. Self pairs are never built.

use hyperstate_core::invariants::{self, InvariantViolation};
use hyperstate_core::{vector, HyperstateError, StateLabel, GOLDEN_RATIO};
use ndarray::{Array2, ArrayView2};
use std::fmt;
use tracing::debug;

/// Self-loop weight added to every diagonal entry
const DIAGONAL_REGULARIZATION: f64 = 0.05;

/// Structural template of a transition matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixTemplate {
    /// Weight 0.2 to both ring neighbours
    Ring,
    /// Weight 0.3 to `floor(i φ) mod n`
    GoldenJump,
    /// Triangular band of `max(3, 5% of n)` columns centred at `7i mod n`
    ///
    /// Even widths reach one column further left than right.
    Band,
}

impl MatrixTemplate {
    /// Template for an ordered pair of labels
    pub fn for_pair(from: StateLabel, to: StateLabel) -> Self {
        match (from.ordinal() + to.ordinal()) % 3 {
            0 => Self::Ring,
            1 => Self::GoldenJump,
            _ => Self::Band,
        }
    }

    /// Raw template weights, before regularization and normalization
    pub fn weights(&self, n: usize) -> Array2<f64> {
        let mut m = Array2::<f64>::zeros((n, n));
        match self {
            Self::Ring => {
                for i in 0..n {
                    m[[i, (i + 1) % n]] += 0.2;
                    m[[i, (i + n - 1) % n]] += 0.2;
                }
            }
            Self::GoldenJump => {
                for i in 0..n {
                    let target = (i as f64 * GOLDEN_RATIO).floor() as usize % n;
                    m[[i, target]] += 0.3;
                }
            }
            Self::Band => {
                let width = 3usize.max(n * 5 / 100);
                let half = width / 2;
                let reach = (width - 1) / 2;
                for i in 0..n {
                    let center = ((i * 7) % n) as isize;
                    for d in -(half as isize)..=reach as isize {
                        let weight = 0.3 * (1.0 - d.unsigned_abs() as f64 / (half + 1) as f64);
                        let column = (center + d).rem_euclid(n as isize) as usize;
                        m[[i, column]] += weight;
                    }
                }
            }
        }
        m
    }
}

impl fmt::Display for MatrixTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Build the normalized matrix for one ordered pair
pub fn build_matrix(
    from: StateLabel,
    to: StateLabel,
    dimensions: usize,
    transition_complexity: f64,
    zero_free: bool,
) -> Array2<f64> {
    let mut m = MatrixTemplate::for_pair(from, to).weights(dimensions);
    m.diag_mut().mapv_inplace(|x| x + DIAGONAL_REGULARIZATION);
    m.mapv_inplace(|x| x * transition_complexity);
    vector::row_normalize(&mut m);
    if zero_free {
        vector::zero_free_correct(&mut m);
    }
    m
}

/// Lookup table keyed by label ordinals
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrixBank {
    labels: Vec<StateLabel>,
    dimensions: usize,
    /// Row-major over (from ordinal, to ordinal); `None` on the diagonal
    matrices: Vec<Option<Array2<f64>>>,
}

impl TransitionMatrixBank {
    /// Build every off-diagonal matrix for the active labels
    pub fn build(
        labels: &[StateLabel],
        dimensions: usize,
        transition_complexity: f64,
        zero_free: bool,
    ) -> Self {
        let k = labels.len();
        let mut matrices = Vec::with_capacity(k * k);
        for &from in labels {
            for &to in labels {
                if from == to {
                    matrices.push(None);
                } else {
                    matrices.push(Some(build_matrix(
                        from,
                        to,
                        dimensions,
                        transition_complexity,
                        zero_free,
                    )));
                }
            }
        }

        debug!(
            labels = k,
            dimensions,
            matrices = k * k.saturating_sub(1),
            "Built transition matrix bank"
        );

        Self {
            labels: labels.to_vec(),
            dimensions,
            matrices,
        }
    }

    pub fn labels(&self) -> &[StateLabel] {
        &self.labels
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of stored matrices
    pub fn len(&self) -> usize {
        self.matrices.iter().filter(|m| m.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, label: StateLabel) -> Option<usize> {
        self.labels.iter().position(|&l| l == label)
    }

    /// Matrix for `from -> to`, absent for self pairs and inactive labels
    pub fn get(&self, from: StateLabel, to: StateLabel) -> Option<ArrayView2<'_, f64>> {
        let row = self.slot(from)?;
        let col = self.slot(to)?;
        self.matrices[row * self.labels.len() + col]
            .as_ref()
            .map(|m| m.view())
    }

    /// Like [`get`](Self::get) but reports the missing pair
    pub fn require(
        &self,
        from: StateLabel,
        to: StateLabel,
    ) -> Result<ArrayView2<'_, f64>, HyperstateError> {
        self.get(from, to)
            .ok_or(HyperstateError::MissingMatrix { from, to })
    }

    /// Every stored matrix with its pair
    pub fn iter(&self) -> impl Iterator<Item = (StateLabel, StateLabel, ArrayView2<'_, f64>)> {
        let k = self.labels.len();
        self.matrices.iter().enumerate().filter_map(move |(idx, m)| {
            m.as_ref()
                .map(|m| (self.labels[idx / k], self.labels[idx % k], m.view()))
        })
    }

    /// Row-stochastic and no-self-pair checks
    pub fn check_invariants(&self, zero_free: bool) -> Vec<InvariantViolation> {
        let k = self.labels.len();
        let mut violations = Vec::new();
        for (idx, m) in self.matrices.iter().enumerate() {
            let (from, to) = (self.labels[idx / k], self.labels[idx % k]);
            match m {
                Some(_) if from == to => {
                    violations.push(InvariantViolation::SelfTransitionMatrix { label: from });
                }
                Some(m) => {
                    if let Err(v) = invariants::check_row_stochastic(from, to, m.view()) {
                        violations.push(v);
                    }
                    if zero_free {
                        if let Err(v) =
                            invariants::check_zero_free(format!("matrix {}->{}", from, to), m.iter())
                        {
                            violations.push(v);
                        }
                    }
                }
                None => {}
            }
        }
        violations
    }
}
