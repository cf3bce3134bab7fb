//! State label catalog
//!
//! Labels are abstract tags. A machine activates a prefix of the catalog and
//! uses each label as a key into its transition bank and as the dispatch tag
//! for post-processing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One abstract state of the machine
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord,
)]
pub enum StateLabel {
    Superposition = 0,
    Entangled = 1,
    Collapsed = 2,
    Tunneling = 3,
    Coherent = 4,
    Decoherent = 5,
    Resonant = 6,
    Fractal = 7,
    Hyperbolic = 8,
    Toroidal = 9,
    Chaotic = 10,
    Crystalline = 11,
    Holographic = 12,
    Topological = 13,
    Transcendent = 14,
}

impl StateLabel {
    /// Full catalog in ordinal order
    pub const ALL: [StateLabel; 15] = [
        Self::Superposition,
        Self::Entangled,
        Self::Collapsed,
        Self::Tunneling,
        Self::Coherent,
        Self::Decoherent,
        Self::Resonant,
        Self::Fractal,
        Self::Hyperbolic,
        Self::Toroidal,
        Self::Chaotic,
        Self::Crystalline,
        Self::Holographic,
        Self::Topological,
        Self::Transcendent,
    ];

    /// Size of the catalog
    pub const CATALOG_SIZE: usize = Self::ALL.len();

    /// Label every machine starts in
    pub const INITIAL: StateLabel = Self::Superposition;

    /// Position in the catalog
    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    /// Label at a catalog position
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    /// First `count` labels of the catalog
    pub fn active_prefix(count: usize) -> &'static [StateLabel] {
        &Self::ALL[..count.min(Self::CATALOG_SIZE)]
    }

    /// Human-readable description
    pub fn description(&self) -> &str {
        match self {
            Self::Superposition => "Spectrally reweighted blend of modes",
            Self::Entangled => "Neighbouring components mixed together",
            Self::Collapsed => "Perturbed by Gaussian noise",
            Self::Tunneling => "Shifted one step forward",
            Self::Coherent => "Phase-modulated by eigenfrequencies",
            Self::Decoherent => "Damped toward its mean",
            Self::Resonant => "Amplified by a standing wave",
            Self::Fractal => "Folded onto a self-similar copy",
            Self::Hyperbolic => "Saturated through tanh",
            Self::Toroidal => "Shifted one step back",
            Self::Chaotic => "Kicked by a logistic map",
            Self::Crystalline => "Snapped toward a lattice",
            Self::Holographic => "Blended with its mirror image",
            Self::Topological => "Smoothed over a ring",
            Self::Transcendent => "Left unchanged",
        }
    }
}

impl fmt::Display for StateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One History Log entry: the label and layer occupied before a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub label: StateLabel,
    pub layer: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_match_catalog() {
        for (idx, label) in StateLabel::ALL.iter().enumerate() {
            assert_eq!(label.ordinal(), idx);
            assert_eq!(StateLabel::from_ordinal(idx), Some(*label));
        }
        assert_eq!(StateLabel::from_ordinal(StateLabel::CATALOG_SIZE), None);
    }

    #[test]
    fn test_active_prefix() {
        let active = StateLabel::active_prefix(3);
        assert_eq!(
            active,
            &[
                StateLabel::Superposition,
                StateLabel::Entangled,
                StateLabel::Collapsed
            ]
        );
        assert_eq!(StateLabel::active_prefix(99).len(), 15);
    }

    #[test]
    fn test_descriptions_are_distinct() {
        let descriptions: std::collections::HashSet<&str> =
            StateLabel::ALL.iter().map(|l| l.description()).collect();
        assert_eq!(descriptions.len(), StateLabel::CATALOG_SIZE);
        assert!(descriptions.iter().all(|d| !d.is_empty()));
    }

    #[test]
    fn test_initial_label_is_first() {
        assert_eq!(StateLabel::INITIAL.ordinal(), 0);
    }
}
