//! State invariant checking and validation

use super::StateLabel;
use crate::vector::{self, MIN_DENOMINATOR};
use crate::zero_free;
use ndarray::{ArrayView1, ArrayView2};
use std::fmt;

/// Tolerance used when checking unit norms
pub const NORM_TOLERANCE: f64 = 1e-4;

/// Tolerance used when checking row sums
pub const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// Severity of an invariant violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational - not a problem
    Info,
    /// Warning - should investigate
    Warning,
    /// High - likely problem, numerics have drifted
    High,
    /// Critical - structural defect
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Types of invariant violations
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    /// Layer vector is neither unit norm nor the zero vector
    NonUnitNorm { layer: usize, norm: f64 },
    /// Transition matrix row does not sum to one
    RowSumDrift {
        from: StateLabel,
        to: StateLabel,
        row: usize,
        sum: f64,
    },
    /// A matrix exists for a label paired with itself
    SelfTransitionMatrix { label: StateLabel },
    /// A stored scalar is closer to zero than the zero-free floor permits
    ZeroComponent { location: String, index: usize },
}

impl InvariantViolation {
    /// Severity if violated
    pub fn severity(&self) -> Severity {
        match self {
            Self::SelfTransitionMatrix { .. } => Severity::Critical,
            Self::NonUnitNorm { .. } | Self::RowSumDrift { .. } => Severity::High,
            Self::ZeroComponent { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonUnitNorm { layer, norm } => {
                write!(f, "Layer {} has norm {:.6}", layer, norm)
            }
            Self::RowSumDrift { from, to, row, sum } => {
                write!(
                    f,
                    "Matrix {} -> {} row {} sums to {:.9}",
                    from, to, row, sum
                )
            }
            Self::SelfTransitionMatrix { label } => {
                write!(f, "Self-transition matrix present for {}", label)
            }
            Self::ZeroComponent { location, index } => {
                write!(f, "{}[{}] is below the zero-free floor", location, index)
            }
        }
    }
}

/// Layer vector must have unit norm unless it is the zero vector
pub fn check_unit_norm(layer: usize, v: ArrayView1<'_, f64>) -> Result<(), InvariantViolation> {
    let norm = vector::norm(&v);
    // A zero-free "zero vector" is made of infinitesimals
    let degenerate = norm < MIN_DENOMINATOR;
    if degenerate || (norm - 1.0).abs() <= NORM_TOLERANCE {
        Ok(())
    } else {
        Err(InvariantViolation::NonUnitNorm { layer, norm })
    }
}

/// Every row of a transition matrix must sum to one
pub fn check_row_stochastic(
    from: StateLabel,
    to: StateLabel,
    m: ArrayView2<'_, f64>,
) -> Result<(), InvariantViolation> {
    for (row, values) in m.rows().into_iter().enumerate() {
        let sum = values.sum();
        if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
            return Err(InvariantViolation::RowSumDrift { from, to, row, sum });
        }
    }
    Ok(())
}

/// No component may sit below the zero-free floor
pub fn check_zero_free<'a>(
    location: impl Into<String>,
    values: impl IntoIterator<Item = &'a f64>,
) -> Result<(), InvariantViolation> {
    match values
        .into_iter()
        .position(|&x| !zero_free::is_zero_free(x))
    {
        Some(index) => Err(InvariantViolation::ZeroComponent {
            location: location.into(),
            index,
        }),
        None => Ok(()),
    }
}
