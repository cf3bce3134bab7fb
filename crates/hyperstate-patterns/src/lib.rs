//! # Hyperstate Patterns
//!
//! Closed-form pattern generators for the twelve resonance families and the
//! dynamic base/modulus transforms used to synthesize initial state vectors.
//! Everything here is pure and deterministic; the engine builds a
//! [`ResonanceBank`] once per machine and never mutates it.

pub mod dynamic;
pub mod family;

pub use dynamic::{DynamicTransforms, Modulated};
pub use family::ResonanceFamily;

use ndarray::{Array1, ArrayView1};

/// Immutable mapping from resonance family to its unit-norm pattern
#[derive(Debug, Clone, PartialEq)]
pub struct ResonanceBank {
    dimensions: usize,
    patterns: Vec<Array1<f64>>,
}

impl ResonanceBank {
    /// Generate every family's pattern at the given width
    pub fn generate(dimensions: usize, transforms: &DynamicTransforms) -> Self {
        let patterns = ResonanceFamily::ALL
            .iter()
            .map(|family| family.pattern(dimensions, transforms))
            .collect();

        Self {
            dimensions,
            patterns,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Pattern for one family
    pub fn get(&self, family: ResonanceFamily) -> ArrayView1<'_, f64> {
        self.patterns[family.ordinal()].view()
    }

    /// All families with their patterns, in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (ResonanceFamily, ArrayView1<'_, f64>)> {
        ResonanceFamily::ALL
            .iter()
            .zip(self.patterns.iter())
            .map(|(family, pattern)| (*family, pattern.view()))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
