//! Engine error types.

use crate::core::{ActionError, RegionId, VertexId};
use thiserror::Error;

/// Errors raised while initialising an instance or processing a message.
///
/// Any of these aborts the stimulus: the transaction it ran in is dropped
/// without commit, so the committed configuration is left as it was.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unknown vertex {0}")]
    UnknownVertex(VertexId),

    #[error("Vertex '{name}' is not a state")]
    NotAState { name: String },

    #[error("Region '{region}' has no initial pseudostate")]
    MissingInitial { region: String },

    #[error("Pseudostate '{vertex}' has no enabled outgoing transition")]
    MissingInitialTransition { vertex: String },

    #[error("{satisfied} transitions of '{state}' are enabled at once")]
    AmbiguousTransition { state: String, satisfied: usize },

    #[error("Action of '{state}' failed: {source}")]
    Action { state: String, source: ActionError },

    #[error("Completion cascade exceeded {limit} transitions")]
    CascadeLimit { limit: usize },

    #[error("Configuration changed concurrently (expected revision {expected}, found {actual})")]
    Conflict { expected: u64, actual: u64 },

    #[error("Transaction belongs to another instance")]
    ForeignTransaction,

    #[error("Stored slot {region} -> {vertex} does not belong to the model")]
    ForeignConfiguration { region: RegionId, vertex: VertexId },
}

impl EngineError {
    /// Returns whether the stimulus can simply be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Conflict { .. })
    }

    /// Returns whether the error points at a defect in the model rather than
    /// at run-time conditions.
    pub fn is_model_error(&self) -> bool {
        matches!(
            self,
            EngineError::MissingInitial { .. }
                | EngineError::MissingInitialTransition { .. }
                | EngineError::AmbiguousTransition { .. }
                | EngineError::CascadeLimit { .. }
        )
    }
}
