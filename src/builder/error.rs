//! Build errors for models and transitions.

use crate::core::{RegionId, VertexId};
use crate::validation::ModelViolation;
use thiserror::Error;

/// Errors that can occur when building a model.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Transition source not specified. Call .from(vertex)")]
    MissingFromState,

    #[error("A completion transition cannot carry a message guard")]
    MixedTrigger,

    #[error("Unknown vertex {0}")]
    UnknownVertex(VertexId),

    #[error("Unknown region {0}")]
    UnknownRegion(RegionId),

    #[error("Vertex '{name}' is not a state")]
    NotAState { name: String },

    #[error("Region '{region}' already has an initial pseudostate")]
    DuplicateInitial { region: String },

    #[error("Initial target '{target}' does not belong to region '{region}'")]
    InitialOutsideRegion { region: String, target: String },

    #[error("Transition from '{from}' to '{to}' crosses separate state trees")]
    DisjointVertices { from: String, to: String },

    #[error("Model failed validation with {} violation(s)", .0.len())]
    Invalid(Vec<ModelViolation>),
}
