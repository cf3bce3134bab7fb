//! Transition events and observer hooks
//!
//! The engine never prints. Callers that want status reporting register a
//! [`TransitionObserver`] and receive one [`TransitionEvent`] per step.

use super::StateLabel;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// How the active layer changed during a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayerMove {
    /// No cross-layer movement
    Stayed,
    /// Moved along a hyperspatial connection
    Connection {
        index: usize,
        from: usize,
        to: usize,
        strength: f64,
        bidirectional: bool,
    },
    /// Jumped to a random layer
    Jump { from: usize, to: usize },
}

impl fmt::Display for LayerMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stayed => write!(f, "stayed"),
            Self::Connection {
                index,
                from,
                to,
                strength,
                bidirectional,
            } => {
                let arrow = if *bidirectional { "<->" } else { "->" };
                write!(
                    f,
                    "connection #{} {} {} {} (strength {:.3})",
                    index, from, arrow, to, strength
                )
            }
            Self::Jump { from, to } => write!(f, "jump {} -> {}", from, to),
        }
    }
}

/// Record of a single transition step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    /// Zero-based step number
    pub step: u64,
    pub from: StateLabel,
    pub to: StateLabel,
    /// Whether the caller forced the target label
    pub forced: bool,
    pub layer_before: usize,
    pub layer_after: usize,
    pub layer_move: LayerMove,
}

impl fmt::Display for TransitionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} → {}{} (layer {}, {})",
            self.step,
            self.from,
            self.to,
            if self.forced { " (forced)" } else { "" },
            self.layer_after,
            self.layer_move
        )
    }
}

/// Hook invoked after every completed transition
pub trait TransitionObserver: Send {
    fn on_transition(&mut self, event: &TransitionEvent);

    /// Called once when the observer is attached to a machine
    fn on_attach(&mut self, _label: StateLabel, _layer: usize) {}
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TransitionObserver for TracingObserver {
    fn on_transition(&mut self, event: &TransitionEvent) {
        debug!(
            step = event.step,
            from = %event.from,
            to = %event.to,
            forced = event.forced,
            layer = event.layer_after,
            layer_move = %event.layer_move,
            "Transition"
        );
    }

    fn on_attach(&mut self, label: StateLabel, layer: usize) {
        info!(
            %label,
            description = label.description(),
            layer,
            "Observer attached"
        );
    }
}

/// Collects events into a shared buffer
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<TransitionEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<TransitionEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl TransitionObserver for RecordingObserver {
    fn on_transition(&mut self, event: &TransitionEvent) {
        self.events.lock().push(event.clone());
    }
}
