//! Eigenfrequencies and the initial state-vector bank

use hyperstate_core::vector;
use hyperstate_patterns::{DynamicTransforms, ResonanceBank, ResonanceFamily};
use ndarray::{Array1, Array2};

/// Every seventh index carries a harmonic of the fundamental
const HARMONIC_STRIDE: usize = 7;

/// Log-spaced frequencies from 1 to 100 with harmonic overrides
pub fn eigenfrequencies(n: usize) -> Array1<f64> {
    if n <= 1 {
        return Array1::from_elem(n, 1.0);
    }

    let mut eigen = Array1::from_shape_fn(n, |i| 10f64.powf(2.0 * i as f64 / (n - 1) as f64));
    let fundamental = eigen[0];
    for i in (HARMONIC_STRIDE..n).step_by(HARMONIC_STRIDE) {
        eigen[i] = fundamental * (i / HARMONIC_STRIDE + 1) as f64;
    }
    eigen
}

/// Seed vector for one layer: two adjacent resonance patterns through Ψ
pub fn layer_seed(
    layer: usize,
    patterns: &ResonanceBank,
    transforms: &DynamicTransforms,
    zero_free: bool,
) -> Array1<f64> {
    let primary = patterns.get(ResonanceFamily::cycle(layer));
    let secondary = patterns.get(ResonanceFamily::cycle(layer + 1));

    let mixed = &primary * 0.7 + &secondary * 0.3;
    let mut v = transforms.modulus(mixed);
    vector::normalize(&mut v);
    if zero_free {
        vector::zero_free_correct(&mut v);
    }
    v
}

/// `(layers × dimensions)` bank of layer seeds
pub fn initial_bank(
    layers: usize,
    patterns: &ResonanceBank,
    transforms: &DynamicTransforms,
    zero_free: bool,
) -> Array2<f64> {
    let mut bank = Array2::zeros((layers, patterns.dimensions()));
    for (layer, mut row) in bank.rows_mut().into_iter().enumerate() {
        row.assign(&layer_seed(layer, patterns, transforms, zero_free));
    }
    bank
}
