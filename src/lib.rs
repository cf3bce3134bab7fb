//! # Hyperstate
//!
//! A stochastic state machine whose state is a bank of unit vectors, one per
//! "reality layer". Each step picks a new label, pushes the active layer
//! through the matching transition matrix, reshapes it with the label's
//! post-processing transform and may blend it into another layer.
//!
//! This crate re-exports the workspace members:
//!
//! - [`hyperstate_core`]: zero-free arithmetic, labels, errors, invariants, events
//! - [`hyperstate_patterns`]: resonance families and the dynamic transforms
//! - [`hyperstate_metrics`]: entropy, coherence, complexity and composite series
//! - [`hyperstate_engine`]: configuration, matrix bank, connections, the machine

pub use hyperstate_core;
pub use hyperstate_engine;
pub use hyperstate_metrics;
pub use hyperstate_patterns;

pub use hyperstate_core::{
    HistoryEntry, HyperstateError, InvariantViolation, LayerMove, RecordingObserver, Severity,
    StateLabel, TracingObserver, TransitionEvent, TransitionObserver, ZeroFree,
};
pub use hyperstate_engine::{
    blend_transition, blend_window, ComputeTarget, ConnectionTable, HyperspatialConnection,
    HyperstateMachine, MachineConfig, MatrixTemplate, TransitionMatrixBank,
};
pub use hyperstate_metrics::{MetricsCollector, MetricsSeries, MetricsSummary, StepMetrics};
pub use hyperstate_patterns::{DynamicTransforms, ResonanceBank, ResonanceFamily};
