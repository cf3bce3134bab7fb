//! State types shared across the hyperstate engine
//!
//! Labels, history entries, the error taxonomy, invariant checks and the
//! transition events handed to observers.

pub mod error;
pub mod invariants;
pub mod label;
pub mod transition;

pub use error::HyperstateError;
pub use invariants::{InvariantViolation, Severity};
pub use label::{HistoryEntry, StateLabel};
pub use transition::{
    LayerMove, RecordingObserver, TracingObserver, TransitionEvent, TransitionObserver,
};
