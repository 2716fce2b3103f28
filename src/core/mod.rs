//! Core building blocks of the state tree.
//!
//! This module contains the static pieces a model is made of:
//! - Arena identifiers for vertices, regions and transitions
//! - Vertices (states, final states, initial pseudostates) and regions
//! - Guard predicates and entry/exit actions
//!
//! Nothing here holds per-instance data; the active configuration of a
//! running instance lives in [`crate::engine`].

mod action;
mod guard;
mod id;
mod region;
mod vertex;

pub use action::{Action, ActionError, ActionFn};
pub use guard::Guard;
pub use id::{Node, RegionId, TransitionId, VertexId};
pub use region::Region;
pub use vertex::{Vertex, VertexKind};
