//! Hyperspatial connections between layers
//!
//! A connection blends a localized window of one layer's vector into
//! another's. The table is generated once from the machine's random source
//! and never changes afterwards.

use ndarray::{ArrayBase, ArrayView1, DataMut, Ix1};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction of the forward strength used by the reverse blend
pub const REVERSE_STRENGTH: f64 = 0.7;

/// Probability that a generated connection is bidirectional
const BIDIRECTIONAL_PROBABILITY: f64 = 0.7;

/// Directed, windowed blending rule between two layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperspatialConnection {
    pub source_layer: usize,
    pub target_layer: usize,
    /// Center index of the blended window
    pub center: usize,
    /// Half-width of the blended window
    pub radius: usize,
    /// Blend strength in (0, 1]
    pub strength: f64,
    pub bidirectional: bool,
}

impl HyperspatialConnection {
    /// Indices touched by this connection with their distance from the center
    pub fn window(&self, dimensions: usize) -> Vec<(usize, usize)> {
        window_indices(self.center, self.radius, dimensions)
    }
}

impl fmt::Display for HyperspatialConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} @{}±{} (strength {:.3})",
            self.source_layer,
            if self.bidirectional { "<->" } else { "->" },
            self.target_layer,
            self.center,
            self.radius,
            self.strength
        )
    }
}

/// Fixed list of connections, `2 × layers` long
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionTable {
    connections: Vec<HyperspatialConnection>,
}

impl ConnectionTable {
    /// Draw the table from `rng`
    ///
    /// Routing is deterministic: record `i` runs from layer `i mod L` to
    /// `(i + 1 + i/2) mod L`. Only the window and strength are random.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, layers: usize, dimensions: usize) -> Self {
        let radius_end = 4.max(dimensions / 8);
        let connections = (0..2 * layers)
            .map(|i| HyperspatialConnection {
                source_layer: i % layers,
                target_layer: (i + 1 + i / 2) % layers,
                center: rng.gen_range(0..dimensions),
                radius: rng.gen_range(3..radius_end),
                strength: rng.gen_range(0.1..0.5),
                bidirectional: rng.gen_bool(BIDIRECTIONAL_PROBABILITY),
            })
            .collect();

        Self { connections }
    }

    /// Wrap a hand-built list, e.g. to share a custom routing between machines
    pub fn from_connections(connections: Vec<HyperspatialConnection>) -> Self {
        Self { connections }
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&HyperspatialConnection> {
        self.connections.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut HyperspatialConnection> {
        self.connections.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HyperspatialConnection> {
        self.connections.iter()
    }

    /// Indices of connections leaving `layer`
    pub fn from_layer(&self, layer: usize) -> Vec<usize> {
        self.connections
            .iter()
            .enumerate()
            .filter(|(_, c)| c.source_layer == layer)
            .map(|(i, _)| i)
            .collect()
    }
}

/// `center ± d (mod n)` for `d = 0..=radius`, each index once, nearest first
pub fn window_indices(center: usize, radius: usize, n: usize) -> Vec<(usize, usize)> {
    if n == 0 {
        return Vec::new();
    }
    let mut seen = vec![false; n];
    let mut out = Vec::with_capacity((2 * radius + 1).min(n));
    let center = center % n;
    for d in 0..=radius {
        let step = d % n;
        for j in [(center + step) % n, (center + n - step) % n] {
            if !seen[j] {
                seen[j] = true;
                out.push((j, d));
            }
        }
    }
    out
}

/// Blend the window of `target` toward `source`
///
/// The mix at distance `d` is `1 - (1 - strength)^f` with triangular falloff
/// `f = 1 - d/(radius + 1)`, so a strength of 1 copies the whole window.
pub fn blend_window<S>(
    target: &mut ArrayBase<S, Ix1>,
    source: ArrayView1<'_, f64>,
    center: usize,
    radius: usize,
    strength: f64,
) where
    S: DataMut<Elem = f64>,
{
    let n = target.len().min(source.len());
    let keep = (1.0 - strength).clamp(0.0, 1.0);
    for (j, d) in window_indices(center, radius, n) {
        let falloff = 1.0 - d as f64 / (radius + 1) as f64;
        let mix = 1.0 - keep.powf(falloff);
        target[j] = (1.0 - mix) * target[j] + mix * source[j];
    }
}
