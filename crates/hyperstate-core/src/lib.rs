//! # Hyperstate Core
//!
//! Core types shared by every hyperstate crate: zero-free arithmetic,
//! vector normalization, the state label catalog, the error taxonomy,
//! invariant checks and transition events.

pub mod state;
pub mod vector;
pub mod zero_free;

pub use state::{
    HistoryEntry, HyperstateError, InvariantViolation, LayerMove, RecordingObserver, Severity,
    StateLabel, TracingObserver, TransitionEvent, TransitionObserver,
};
pub use state::invariants;
pub use vector::Normalization;
pub use zero_free::ZeroFree;

/// Golden ratio, used throughout pattern and matrix construction
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Result alias for hyperstate operations
pub type Result<T> = std::result::Result<T, HyperstateError>;
