//! Model rule violations.

use thiserror::Error;

/// A rule a model failed to satisfy.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ModelViolation {
    #[error("Region '{region}' of '{owner}' has no initial pseudostate")]
    MissingInitial { region: String, owner: String },

    #[error("Transition from '{from}' targets the pseudostate '{target}'")]
    PseudostateTarget { from: String, target: String },

    #[error("{satisfied} transitions of '{state}' accept the message {message}")]
    AmbiguousGuards {
        state: String,
        message: String,
        satisfied: usize,
    },

    #[error("{satisfied} completion transitions of '{state}' are enabled at once")]
    AmbiguousCompletions { state: String, satisfied: usize },

    #[error("Custom check failed: {message}")]
    CustomCheckFailed { message: String },
}
