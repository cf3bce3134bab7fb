//! Error types for the hyperstate engine

use super::StateLabel;
use thiserror::Error;

/// Errors surfaced by machine construction and transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HyperstateError {
    #[error("Invalid configuration for `{field}`: {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },

    #[error("Label {0} is not in the active label set")]
    InactiveLabel(StateLabel),

    #[error("Cannot transition from {0} to itself")]
    SelfTransition(StateLabel),

    #[error("No transition matrix for {from} -> {to}")]
    MissingMatrix { from: StateLabel, to: StateLabel },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Connection {index} does not leave layer {layer}")]
    ConnectionNotFromLayer { index: usize, layer: usize },

    #[error("Connection index {0} out of range")]
    UnknownConnection(usize),
}

impl HyperstateError {
    pub fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }

    /// Whether this error was raised while validating construction parameters
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = HyperstateError::config("dimensions", "must be positive");
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "Invalid configuration for `dimensions`: must be positive"
        );

        let err = HyperstateError::MissingMatrix {
            from: StateLabel::Superposition,
            to: StateLabel::Entangled,
        };
        assert!(!err.is_configuration());
        assert_eq!(
            err.to_string(),
            "No transition matrix for Superposition -> Entangled"
        );
    }
}
