//! Machine construction parameters

use hyperstate_core::{HyperstateError, StateLabel};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placement hint for the numeric work. Not used by the algorithm itself.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComputeTarget {
    #[default]
    Cpu,
    /// Named accelerator, e.g. "cuda:0"
    Accelerator(String),
}

impl fmt::Display for ComputeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Accelerator(name) => write!(f, "{}", name),
        }
    }
}

/// Configuration for a [`HyperstateMachine`](crate::HyperstateMachine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Width of every state vector
    pub dimensions: usize,
    /// Number of active labels, a prefix of the label catalog
    pub num_states: usize,
    /// Number of parallel state-vector layers
    pub reality_layers: usize,
    /// Multiplier applied to every transition matrix before normalization
    pub transition_complexity: f64,
    /// Replace near-zero scalars with signed infinitesimals
    pub zero_free: bool,
    pub compute_target: ComputeTarget,
    /// Harmonic layers in the dynamic base transform
    pub fractal_depth: usize,
    /// Phases stacked by the dynamic modulus transform
    pub interference_patterns: usize,
    /// Seed for the machine's random source; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            dimensions: 64,
            num_states: 7,
            reality_layers: 3,
            transition_complexity: 1.0,
            zero_free: true,
            compute_target: ComputeTarget::Cpu,
            fractal_depth: 4,
            interference_patterns: 3,
            seed: None,
        }
    }
}

impl MachineConfig {
    pub fn new(dimensions: usize, num_states: usize, reality_layers: usize) -> Self {
        Self {
            dimensions,
            num_states,
            reality_layers,
            ..Self::default()
        }
    }

    pub fn with_transition_complexity(mut self, complexity: f64) -> Self {
        self.transition_complexity = complexity;
        self
    }

    pub fn with_zero_free(mut self, zero_free: bool) -> Self {
        self.zero_free = zero_free;
        self
    }

    pub fn with_compute_target(mut self, target: ComputeTarget) -> Self {
        self.compute_target = target;
        self
    }

    pub fn with_fractal_depth(mut self, depth: usize) -> Self {
        self.fractal_depth = depth;
        self
    }

    pub fn with_interference_patterns(mut self, patterns: usize) -> Self {
        self.interference_patterns = patterns;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Active labels, in catalog order
    pub fn active_labels(&self) -> &'static [StateLabel] {
        StateLabel::active_prefix(self.num_states)
    }

    /// Reject any parameter the engine cannot run with. Nothing is clamped.
    pub fn validate(&self) -> Result<(), HyperstateError> {
        if self.dimensions == 0 {
            return Err(HyperstateError::config("dimensions", "must be at least 1"));
        }
        if self.reality_layers == 0 {
            return Err(HyperstateError::config("reality_layers", "must be at least 1"));
        }
        if self.num_states == 0 {
            return Err(HyperstateError::config("num_states", "must be at least 1"));
        }
        if self.num_states > StateLabel::CATALOG_SIZE {
            return Err(HyperstateError::config(
                "num_states",
                format!(
                    "{} exceeds the catalog of {} labels",
                    self.num_states,
                    StateLabel::CATALOG_SIZE
                ),
            ));
        }
        if self.num_states < 2 {
            return Err(HyperstateError::config(
                "num_states",
                "at least 2 labels are needed so every state has a transition target",
            ));
        }
        if !self.transition_complexity.is_finite() || self.transition_complexity <= 0.0 {
            return Err(HyperstateError::config(
                "transition_complexity",
                format!("must be finite and positive, got {}", self.transition_complexity),
            ));
        }
        if self.fractal_depth == 0 {
            return Err(HyperstateError::config("fractal_depth", "must be at least 1"));
        }
        if self.interference_patterns == 0 {
            return Err(HyperstateError::config(
                "interference_patterns",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
