//! Stable arena identifiers.
//!
//! Every vertex, region and transition of a [`Model`](crate::model::Model) is
//! addressed by a small index newtype. Parent links are stored as these ids,
//! so walking towards the root is a chain of index lookups.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a vertex (state, final state or pseudostate) within one model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub(crate) usize);

/// Identifies a region within one model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub(crate) usize);

/// Identifies a transition within one model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionId(pub(crate) usize);

impl VertexId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl RegionId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl TransitionId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// A node of the state tree: either a vertex or a region.
///
/// Ancestor chains alternate between the two, starting from a root vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Node {
    Vertex(VertexId),
    Region(RegionId),
}

impl Node {
    pub fn as_vertex(self) -> Option<VertexId> {
        match self {
            Node::Vertex(id) => Some(id),
            Node::Region(_) => None,
        }
    }

    pub fn as_region(self) -> Option<RegionId> {
        match self {
            Node::Region(id) => Some(id),
            Node::Vertex(_) => None,
        }
    }
}

impl From<VertexId> for Node {
    fn from(id: VertexId) -> Self {
        Node::Vertex(id)
    }
}

impl From<RegionId> for Node {
    fn from(id: RegionId) -> Self {
        Node::Region(id)
    }
}
