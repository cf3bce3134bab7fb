//! Dynamic base (Φ) and dynamic modulus (Ψ) transforms
//!
//! Φ adds fractal harmonic corrections whose frequencies are spaced by powers
//! of the golden ratio. Ψ multiplies by a stack of interference factors, one
//! per phase evenly spaced around a full turn. Both accept a scalar or an
//! array through [`Modulated`].

use hyperstate_core::vector::MIN_DENOMINATOR;
use hyperstate_core::GOLDEN_RATIO;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Weight of the base harmonic term and of each interference factor
const CORRECTION_WEIGHT: f64 = 0.1;

/// Only the leading components get an index-dependent phase under Ψ
const PHASED_COMPONENTS: usize = 7;

/// Parameters shared by Φ and Ψ
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicTransforms {
    /// Ambient dimension driving Φ's scale
    pub dimension: usize,
    /// Number of harmonic layers in Φ, including the base term
    pub fractal_depth: usize,
    /// Number of phases stacked by Ψ
    pub interference_patterns: usize,
}

impl DynamicTransforms {
    pub fn new(dimension: usize, fractal_depth: usize, interference_patterns: usize) -> Self {
        Self {
            dimension,
            fractal_depth,
            interference_patterns,
        }
    }

    /// Apply Φ to a scalar or array
    pub fn base<T: Modulated>(&self, x: T) -> T {
        x.dynamic_base(self.dimension, self.fractal_depth)
    }

    /// Apply Ψ to a scalar or array
    pub fn modulus<T: Modulated>(&self, x: T) -> T {
        x.dynamic_modulus(self.interference_patterns)
    }
}

/// Inputs accepted by the dynamic transforms
pub trait Modulated: Sized {
    fn dynamic_base(self, dimension: usize, fractal_depth: usize) -> Self;

    fn dynamic_modulus(self, interference_patterns: usize) -> Self;
}

impl Modulated for f64 {
    fn dynamic_base(self, dimension: usize, fractal_depth: usize) -> Self {
        let log_dim = (dimension as f64).ln();
        let scale = (log_dim * GOLDEN_RATIO).max(MIN_DENOMINATOR);

        let mut y = self + (self / scale).sin() * CORRECTION_WEIGHT * log_dim;
        for d in 1..fractal_depth {
            let frequency = scale * GOLDEN_RATIO.powi(d as i32);
            y += (CORRECTION_WEIGHT / d as f64) * (self / frequency).sin();
        }
        y
    }

    fn dynamic_modulus(self, interference_patterns: usize) -> Self {
        self * interference_factor(interference_patterns, 0.0)
    }
}

impl Modulated for Array1<f64> {
    fn dynamic_base(self, dimension: usize, fractal_depth: usize) -> Self {
        self.mapv_into(|x| x.dynamic_base(dimension, fractal_depth))
    }

    fn dynamic_modulus(mut self, interference_patterns: usize) -> Self {
        let uniform = interference_factor(interference_patterns, 0.0);
        for (i, x) in self.iter_mut().enumerate() {
            let factor = if i < PHASED_COMPONENTS {
                interference_factor(interference_patterns, i as f64 * PI / PHASED_COMPONENTS as f64)
            } else {
                uniform
            };
            *x *= factor;
        }
        self
    }
}

/// Π_j (1 + 0.1 sin(2πj/P + offset))
fn interference_factor(patterns: usize, offset: f64) -> f64 {
    (0..patterns)
        .map(|j| {
            let phase = 2.0 * PI * j as f64 / patterns as f64 + offset;
            1.0 + CORRECTION_WEIGHT * phase.sin()
        })
        .product()
}
