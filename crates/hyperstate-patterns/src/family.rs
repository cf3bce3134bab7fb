//! Resonance families and their closed-form pattern generators

use crate::dynamic::DynamicTransforms;
use hyperstate_core::{vector, GOLDEN_RATIO};
use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Structural family of a resonance pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum ResonanceFamily {
    /// Multi-scale sine superposition
    Fractal = 0,
    /// Gaussian-enveloped cosine
    Quantum = 1,
    /// Hyperbolic tangent ramp
    Hyperbolic = 2,
    /// Tiled sine
    Tessellated = 3,
    /// Twisted double sine
    Mobius = 4,
    /// Triple-angle product
    CalabiYau = 5,
    /// Magnitude of a complex polynomial on a spiral
    Holomorphic = 6,
    /// Position/momentum sinusoids on the two halves
    Symplectic = 7,
    /// Tangent-seeded harmonic
    Xenomorphic = 8,
    /// Triple-frequency average
    Polymorphic = 9,
    /// Golden-ratio cosine superposition
    Quasicrystal = 10,
    /// Sine wave fed through the dynamic base transform
    Dynamic = 11,
}

impl ResonanceFamily {
    pub const ALL: [ResonanceFamily; 12] = [
        Self::Fractal,
        Self::Quantum,
        Self::Hyperbolic,
        Self::Tessellated,
        Self::Mobius,
        Self::CalabiYau,
        Self::Holomorphic,
        Self::Symplectic,
        Self::Xenomorphic,
        Self::Polymorphic,
        Self::Quasicrystal,
        Self::Dynamic,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    /// Family at position `index`, wrapping around the catalog
    pub fn cycle(index: usize) -> Self {
        Self::ALL[index % Self::COUNT]
    }

    /// Raw, unnormalized pattern of length `n`
    pub fn raw_pattern(&self, n: usize, transforms: &DynamicTransforms) -> Array1<f64> {
        let nf = n as f64;
        let angle = |i: usize| 2.0 * PI * i as f64 / nf;

        match self {
            Self::Fractal => Array1::from_shape_fn(n, |i| {
                (0..4)
                    .map(|k| {
                        let scale = f64::from(1u32 << k);
                        (scale * angle(i)).sin() / scale
                    })
                    .sum()
            }),
            Self::Quantum => {
                let width = (nf / 6.0).max(1.0);
                Array1::from_shape_fn(n, |i| {
                    let u = (i as f64 - nf / 2.0) / width;
                    (-u * u / 2.0).exp() * (5.0 * angle(i)).cos()
                })
            }
            Self::Hyperbolic => Array1::linspace(-3.0, 3.0, n).mapv_into(f64::tanh),
            Self::Tessellated => {
                let tile = (n / 4).max(1);
                Array1::from_shape_fn(n, |i| {
                    let t = ((i % tile) as f64 + 0.5) / tile as f64;
                    (2.0 * PI * t).sin()
                })
            }
            Self::Mobius => Array1::from_shape_fn(n, |i| {
                let x = angle(i);
                (x / 2.0).sin() * (2.0 * x).sin()
            }),
            Self::CalabiYau => Array1::from_shape_fn(n, |i| {
                let x = angle(i);
                x.sin() * (2.0 * x).cos() * (3.0 * x).sin()
            }),
            Self::Holomorphic => Array1::from_shape_fn(n, |i| {
                let z = Complex64::from_polar(0.5 + i as f64 / nf, angle(i));
                (z.powi(3) - z * 0.5 + 0.25).norm()
            }),
            Self::Symplectic => {
                let half = n / 2;
                let q_len = half.max(1) as f64;
                let p_len = (n - half).max(1) as f64;
                Array1::from_shape_fn(n, |i| {
                    if i < half {
                        (2.0 * PI * i as f64 / q_len).sin()
                    } else {
                        (2.0 * PI * (i - half) as f64 / p_len).cos()
                    }
                })
            }
            Self::Xenomorphic => Array1::from_shape_fn(n, |i| {
                let seed = (0.4 * PI * i as f64 / nf).tan();
                (3.0 * seed).sin() + 0.5 * (5.0 * seed).cos()
            }),
            Self::Polymorphic => Array1::from_shape_fn(n, |i| {
                let x = angle(i);
                (x.sin() + (2.0 * x).sin() + (3.0 * x).sin()) / 3.0
            }),
            Self::Quasicrystal => Array1::from_shape_fn(n, |i| {
                let x = angle(i);
                (0..5)
                    .map(|k| (x * GOLDEN_RATIO.powi(k)).cos() / (k + 1) as f64)
                    .sum()
            }),
            Self::Dynamic => transforms.base(Array1::from_shape_fn(n, |i| angle(i).sin())),
        }
    }

    /// Unit-norm, zero-free pattern of length `n`
    pub fn pattern(&self, n: usize, transforms: &DynamicTransforms) -> Array1<f64> {
        let mut v = self.raw_pattern(n, transforms);
        vector::normalize(&mut v);
        vector::zero_free_correct(&mut v);
        v
    }
}

impl fmt::Display for ResonanceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
