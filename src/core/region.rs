//! Regions: containers of mutually exclusive sibling vertices.

use super::id::VertexId;

/// An ordered set of sibling vertices owned by a state.
///
/// At most one of the vertices is active per running instance. Which one is
/// not recorded here; the model is shared and the active vertex lives in the
/// instance's configuration store.
#[derive(Debug, Clone)]
pub struct Region {
    pub(crate) name: String,
    pub(crate) owner: VertexId,
    pub(crate) vertices: Vec<VertexId>,
    pub(crate) initial: Option<VertexId>,
    pub(crate) history: bool,
}

impl Region {
    pub(crate) fn new(name: impl Into<String>, owner: VertexId) -> Self {
        Self {
            name: name.into(),
            owner,
            vertices: Vec::new(),
            initial: None,
            history: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The state this region belongs to.
    pub fn owner(&self) -> VertexId {
        self.owner
    }

    /// Child vertices in declaration order, pseudostates included.
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// The initial pseudostate, if one was declared.
    pub fn initial(&self) -> Option<VertexId> {
        self.initial
    }

    /// Whether the region remembers its last active vertex for deep history
    /// re-entry.
    pub fn has_history(&self) -> bool {
        self.history
    }
}
