//! # Hyperstate Engine
//!
//! The state machine itself: configuration, the transition matrix bank,
//! hyperspatial connections, label post-processing and the
//! [`HyperstateMachine`] that ties them together.
//!
//! ```no_run
//! use hyperstate_engine::{HyperstateMachine, MachineConfig};
//!
//! let mut machine = HyperstateMachine::new(MachineConfig::new(64, 7, 3).with_seed(42))?;
//! for _ in 0..100 {
//!     machine.transition(None)?;
//! }
//! println!("{} on layer {}", machine.current_label(), machine.current_layer());
//! # Ok::<(), hyperstate_core::HyperstateError>(())
//! ```

pub mod config;
pub mod connections;
pub mod initial_state;
pub mod matrix_bank;
pub mod post_process;
pub mod state_machine;

pub use config::{ComputeTarget, MachineConfig};
pub use connections::{blend_window, ConnectionTable, HyperspatialConnection};
pub use matrix_bank::{MatrixTemplate, TransitionMatrixBank};
pub use state_machine::{blend_transition, HyperstateMachine};
