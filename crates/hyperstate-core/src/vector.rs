//! Vector and matrix helpers shared across the engine
//!
//! Normalization leaves zero vectors untouched: a zero-norm vector has no
//! direction to preserve, so it is reported instead of divided.

use crate::zero_free;
use ndarray::{ArrayBase, ArrayView1, Data, DataMut, Ix1, Ix2};

/// Smallest denominator used when dividing by a row sum
pub const MIN_DENOMINATOR: f64 = 1e-10;

/// Outcome of an in-place normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Vector was scaled to unit norm
    Scaled,
    /// Vector had zero norm and was left unchanged
    Degenerate,
}

impl Normalization {
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::Degenerate)
    }
}

/// Euclidean norm
pub fn norm<S>(v: &ArrayBase<S, Ix1>) -> f64
where
    S: Data<Elem = f64>,
{
    v.dot(v).sqrt()
}

/// Scale a vector to unit Euclidean norm in place
pub fn normalize<S>(v: &mut ArrayBase<S, Ix1>) -> Normalization
where
    S: DataMut<Elem = f64>,
{
    let n = norm(&*v);
    if n == 0.0 || !n.is_finite() {
        return Normalization::Degenerate;
    }
    v.mapv_inplace(|x| x / n);
    Normalization::Scaled
}

/// Replace every near-zero component with a signed infinitesimal
pub fn zero_free_correct<S, D>(a: &mut ArrayBase<S, D>)
where
    S: DataMut<Elem = f64>,
    D: ndarray::Dimension,
{
    a.mapv_inplace(zero_free::floor);
}

/// Whether every component of an array is a legal zero-free scalar
pub fn is_zero_free<S, D>(a: &ArrayBase<S, D>) -> bool
where
    S: Data<Elem = f64>,
    D: ndarray::Dimension,
{
    a.iter().all(|&x| zero_free::is_zero_free(x))
}

/// Divide each row by its sum, clamping the sum from below
pub fn row_normalize<S>(m: &mut ArrayBase<S, Ix2>)
where
    S: DataMut<Elem = f64>,
{
    for mut row in m.rows_mut() {
        let sum = row.sum().max(MIN_DENOMINATOR);
        row.mapv_inplace(|x| x / sum);
    }
}

/// Cosine similarity, zero when either vector is degenerate
pub fn cosine(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    let denom = norm(&a) * norm(&b);
    if denom == 0.0 {
        return 0.0;
    }
    a.dot(&b) / denom
}
