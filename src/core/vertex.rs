//! Vertices of the state tree.
//!
//! A vertex is a named node owned by a parent region (roots have none). The
//! set of vertex kinds is closed, so it is a tagged variant rather than a
//! trait: the engine matches on [`VertexKind`] to decide how each hook
//! behaves and the compiler checks that every kind is handled.

use super::action::Action;
use super::id::{RegionId, TransitionId};
use serde::{Deserialize, Serialize};

/// The closed set of vertex kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VertexKind {
    /// A state; may own regions, actions and transitions.
    State,
    /// Terminal marker. Its activation completes the owning region.
    Final,
    /// Transient pseudostate marking a region's default entry.
    Initial,
}

impl VertexKind {
    pub fn is_pseudostate(self) -> bool {
        matches!(self, VertexKind::Initial)
    }
}

/// A node of the state tree.
///
/// Only [`VertexKind::State`] vertices carry regions, actions and message
/// transitions; an initial pseudostate carries exactly one completion
/// transition towards its region's default target.
#[derive(Debug)]
pub struct Vertex {
    pub(crate) name: String,
    pub(crate) parent: Option<RegionId>,
    pub(crate) kind: VertexKind,
    pub(crate) regions: Vec<RegionId>,
    pub(crate) default_region: Option<RegionId>,
    pub(crate) entry: Vec<Action>,
    pub(crate) exit: Vec<Action>,
    pub(crate) transitions: Vec<TransitionId>,
    pub(crate) completions: Vec<TransitionId>,
}

impl Vertex {
    pub(crate) fn new(name: impl Into<String>, parent: Option<RegionId>, kind: VertexKind) -> Self {
        Self {
            name: name.into(),
            parent,
            kind,
            regions: Vec::new(),
            default_region: None,
            entry: Vec::new(),
            exit: Vec::new(),
            transitions: Vec::new(),
            completions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The region that owns this vertex, or `None` for a root state.
    pub fn parent(&self) -> Option<RegionId> {
        self.parent
    }

    pub fn kind(&self) -> VertexKind {
        self.kind
    }

    pub fn is_state(&self) -> bool {
        self.kind == VertexKind::State
    }

    pub fn is_final(&self) -> bool {
        self.kind == VertexKind::Final
    }

    pub fn is_pseudostate(&self) -> bool {
        self.kind.is_pseudostate()
    }

    /// Child regions in declaration order.
    pub fn regions(&self) -> &[RegionId] {
        &self.regions
    }

    /// True if the vertex has no child regions.
    pub fn is_simple(&self) -> bool {
        self.regions.is_empty()
    }

    /// True if the vertex has at least one child region.
    pub fn is_composite(&self) -> bool {
        !self.regions.is_empty()
    }

    /// True if the vertex has more than one child region.
    pub fn is_orthogonal(&self) -> bool {
        self.regions.len() > 1
    }

    /// Message-triggered transitions leaving this vertex.
    pub fn transitions(&self) -> &[TransitionId] {
        &self.transitions
    }

    /// Completion transitions leaving this vertex.
    pub fn completions(&self) -> &[TransitionId] {
        &self.completions
    }

    pub fn entry_actions(&self) -> &[Action] {
        &self.entry
    }

    pub fn exit_actions(&self) -> &[Action] {
        &self.exit
    }
}
