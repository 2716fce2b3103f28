//! Transitions with precomputed traversal chains.
//!
//! All structural work is done once, when the model is built: the lowest
//! common ancestor of source and target decides which vertex is exited and
//! which vertices are entered. At run time a traversal only replays the
//! stored chains against a transaction, so one transition serves every
//! running instance of the model.

use super::Model;
use crate::builder::BuildError;
use crate::core::{Guard, Node, RegionId, VertexId};
use std::fmt;

/// What makes a transition eligible.
pub enum Trigger<M> {
    /// Fired by a message satisfying the guard.
    Message(Guard<M>),
    /// Fired automatically once the source state is complete.
    Completion(Guard<()>),
}

impl<M> Trigger<M> {
    pub fn is_completion(&self) -> bool {
        matches!(self, Trigger::Completion(_))
    }
}

impl<M> fmt::Debug for Trigger<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Message(_) => f.write_str("Message(..)"),
            Trigger::Completion(_) => f.write_str("Completion(..)"),
        }
    }
}

/// An immutable transition between two vertices of the same tree.
///
/// A transition without a target is internal: it is selected like any other
/// but has no structural effect.
#[derive(Debug)]
pub struct Transition<M> {
    pub(crate) source: VertexId,
    pub(crate) target: Option<VertexId>,
    pub(crate) trigger: Trigger<M>,
    pub(crate) deep_history: bool,
    /// Vertices whose exit hook runs, in order.
    pub(crate) exit: Vec<VertexId>,
    /// Vertices whose entry hook runs, outermost first.
    pub(crate) enter: Vec<VertexId>,
    /// Regions of entered orthogonal states that are off the enter path.
    pub(crate) forks: Vec<RegionId>,
    pub(crate) exit_path: Vec<VertexId>,
    pub(crate) lca: Option<RegionId>,
}

impl<M> Transition<M> {
    /// Compute the traversal chains between `source` and `target`.
    ///
    /// Both ancestor chains are walked in lockstep from the root. The first
    /// index where they disagree (clamped to the shorter chain, so that self
    /// transitions and ancestor/descendant pairs exit and re-enter the shared
    /// vertex) is the divergence point; when it falls on two sibling regions
    /// of one orthogonal state it is moved up to that state.
    pub(crate) fn new(
        model: &Model<M>,
        source: VertexId,
        target: Option<VertexId>,
        trigger: Trigger<M>,
        deep_history: bool,
    ) -> Result<Self, BuildError> {
        let Some(target) = target else {
            return Ok(Self {
                source,
                target: None,
                trigger,
                deep_history,
                exit: Vec::new(),
                enter: Vec::new(),
                forks: Vec::new(),
                exit_path: Vec::new(),
                lca: None,
            });
        };

        let source_chain = model
            .ancestors(source)
            .ok_or(BuildError::UnknownVertex(source))?;
        let target_chain = model
            .ancestors(target)
            .ok_or(BuildError::UnknownVertex(target))?;

        if source_chain.first() != target_chain.first() {
            return Err(BuildError::DisjointVertices {
                from: model.v(source).name().to_string(),
                to: model.v(target).name().to_string(),
            });
        }

        let shared = source_chain
            .iter()
            .zip(&target_chain)
            .take_while(|(s, t)| s == t)
            .count();
        let mut split = shared
            .min(source_chain.len() - 1)
            .min(target_chain.len() - 1);
        if matches!(source_chain[split], Node::Region(_)) {
            split -= 1;
        }

        let lca = split
            .checked_sub(1)
            .and_then(|index| source_chain[index].as_region());

        let exit_path: Vec<VertexId> = source_chain[split..]
            .iter()
            .rev()
            .filter_map(|node| node.as_vertex())
            .collect();

        let mut exit = Vec::with_capacity(2);
        let divergence = exit_path.last().copied().unwrap_or(source);
        if model.v(source).is_pseudostate() && divergence != source {
            exit.push(source);
        }
        exit.push(divergence);

        let enter: Vec<VertexId> = target_chain[split..]
            .iter()
            .filter_map(|node| node.as_vertex())
            .collect();

        let mut forks = Vec::new();
        for index in (split..target_chain.len() - 1).step_by(2) {
            let (Node::Vertex(state), Node::Region(on_path)) =
                (target_chain[index], target_chain[index + 1])
            else {
                continue;
            };
            forks.extend(
                model
                    .v(state)
                    .regions()
                    .iter()
                    .copied()
                    .filter(|region| *region != on_path),
            );
        }

        Ok(Self {
            source,
            target: Some(target),
            trigger,
            deep_history,
            exit,
            enter,
            forks,
            exit_path,
            lca,
        })
    }

    pub fn source(&self) -> VertexId {
        self.source
    }

    /// `None` for internal transitions.
    pub fn target(&self) -> Option<VertexId> {
        self.target
    }

    pub fn trigger(&self) -> &Trigger<M> {
        &self.trigger
    }

    pub fn is_internal(&self) -> bool {
        self.target.is_none()
    }

    pub fn is_completion(&self) -> bool {
        self.trigger.is_completion()
    }

    /// Whether the target is entered restoring history-enabled regions.
    pub fn deep_history(&self) -> bool {
        self.deep_history
    }

    /// The region in which source and target paths meet, or `None` when the
    /// divergence point is a root (or the transition is internal).
    pub fn lca(&self) -> Option<RegionId> {
        self.lca
    }

    /// Vertices left by this transition: the source and each of its
    /// ancestors below the LCA, innermost first.
    pub fn exit_path(&self) -> &[VertexId] {
        &self.exit_path
    }

    /// Vertices entered by this transition: each ancestor of the target
    /// below the LCA and the target itself, outermost first.
    pub fn enter_path(&self) -> &[VertexId] {
        &self.enter
    }

    /// Regions default-initialised alongside the enter path.
    pub fn forks(&self) -> &[RegionId] {
        &self.forks
    }

    /// Check whether a message satisfies this transition's guard.
    ///
    /// Always false for completion transitions.
    pub fn accepts(&self, message: &M) -> bool {
        match &self.trigger {
            Trigger::Message(guard) => guard.check(message),
            Trigger::Completion(_) => false,
        }
    }

    /// Check the completion guard. Always false for message transitions.
    pub fn completes(&self) -> bool {
        match &self.trigger {
            Trigger::Completion(guard) => guard.check(&()),
            Trigger::Message(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::{BuildError, ModelBuilder, TransitionBuilder};
    use crate::core::VertexId;

    /// machine
    ///   top: [ A { ra: [ A1 { ra1: [ A11, A12 ] }, A2 ] }, B { rb: [ B1 ] } ]
    struct Tree {
        machine: VertexId,
        a: VertexId,
        a1: VertexId,
        a11: VertexId,
        a12: VertexId,
        a2: VertexId,
        b: VertexId,
        b1: VertexId,
    }

    fn tree() -> (ModelBuilder<&'static str>, Tree) {
        let mut builder = ModelBuilder::new();
        let machine = builder.root("machine");
        let top = builder.default_region(machine).unwrap();
        let a = builder.state("A", top).unwrap();
        let b = builder.state("B", top).unwrap();
        builder.initial(top, a).unwrap();

        let ra = builder.region("ra", a).unwrap();
        let a1 = builder.state("A1", ra).unwrap();
        let a2 = builder.state("A2", ra).unwrap();
        builder.initial(ra, a1).unwrap();

        let ra1 = builder.region("ra1", a1).unwrap();
        let a11 = builder.state("A11", ra1).unwrap();
        let a12 = builder.state("A12", ra1).unwrap();
        builder.initial(ra1, a11).unwrap();

        let rb = builder.region("rb", b).unwrap();
        let b1 = builder.state("B1", rb).unwrap();
        builder.initial(rb, b1).unwrap();

        (
            builder,
            Tree {
                machine,
                a,
                a1,
                a11,
                a12,
                a2,
                b,
                b1,
            },
        )
    }

    #[test]
    fn sibling_transition_exits_and_enters_only_siblings() {
        let (mut builder, t) = tree();
        let id = builder
            .transition(TransitionBuilder::new().from(t.a11).to(t.a12))
            .unwrap();
        let model = builder.build().unwrap();
        let transition = model.transition(id).unwrap();

        assert_eq!(transition.exit_path(), &[t.a11]);
        assert_eq!(transition.enter_path(), &[t.a12]);
        assert_eq!(transition.lca(), model.vertex(t.a11).unwrap().parent());
    }

    #[test]
    fn cross_branch_transition_meets_at_top_region() {
        let (mut builder, t) = tree();
        let id = builder
            .transition(TransitionBuilder::new().from(t.a11).to(t.b1))
            .unwrap();
        let model = builder.build().unwrap();
        let transition = model.transition(id).unwrap();

        assert_eq!(transition.exit_path(), &[t.a11, t.a1, t.a]);
        assert_eq!(transition.enter_path(), &[t.b, t.b1]);
        assert_eq!(transition.lca(), model.default_region(t.machine));
    }

    #[test]
    fn self_transition_exits_and_reenters_source() {
        let (mut builder, t) = tree();
        let id = builder
            .transition(TransitionBuilder::new().from(t.a1).to(t.a1))
            .unwrap();
        let model = builder.build().unwrap();
        let transition = model.transition(id).unwrap();

        assert_eq!(transition.exit_path(), &[t.a1]);
        assert_eq!(transition.enter_path(), &[t.a1]);
    }

    #[test]
    fn transition_into_descendant_is_external() {
        let (mut builder, t) = tree();
        let id = builder
            .transition(TransitionBuilder::new().from(t.a).to(t.a12))
            .unwrap();
        let model = builder.build().unwrap();
        let transition = model.transition(id).unwrap();

        assert_eq!(transition.exit_path(), &[t.a]);
        assert_eq!(transition.enter_path(), &[t.a, t.a1, t.a12]);
    }

    #[test]
    fn transition_to_ancestor_reenters_ancestor() {
        let (mut builder, t) = tree();
        let id = builder
            .transition(TransitionBuilder::new().from(t.a12).to(t.a))
            .unwrap();
        let model = builder.build().unwrap();
        let transition = model.transition(id).unwrap();

        assert_eq!(transition.exit_path(), &[t.a12, t.a1, t.a]);
        assert_eq!(transition.enter_path(), &[t.a]);
    }

    #[test]
    fn internal_transition_has_empty_chains() {
        let (mut builder, t) = tree();
        let id = builder
            .transition(TransitionBuilder::new().from(t.a2))
            .unwrap();
        let model = builder.build().unwrap();
        let transition = model.transition(id).unwrap();

        assert!(transition.is_internal());
        assert!(transition.exit_path().is_empty());
        assert!(transition.enter_path().is_empty());
        assert!(transition.lca().is_none());
    }

    #[test]
    fn initial_pseudostate_transition_exits_pseudostate() {
        let (builder, t) = tree();
        let model = builder.build().unwrap();
        let region = model.vertex(t.a11).unwrap().parent().unwrap();
        let initial = model.region(region).unwrap().initial().unwrap();
        let id = model.vertex(initial).unwrap().completions()[0];
        let transition = model.transition(id).unwrap();

        assert_eq!(transition.exit_path(), &[initial]);
        assert_eq!(transition.enter_path(), &[t.a11]);
    }

    #[test]
    fn transition_between_roots_is_rejected() {
        let (mut builder, t) = tree();
        let other = builder.root("other");
        builder
            .transition(TransitionBuilder::new().from(t.a2).to(other))
            .unwrap();

        let result = builder.build();
        assert!(matches!(result, Err(BuildError::DisjointVertices { .. })));
    }

    #[test]
    fn entering_orthogonal_state_forks_sibling_regions() {
        let mut builder: ModelBuilder<&'static str> = ModelBuilder::new();
        let machine = builder.root("machine");
        let top = builder.default_region(machine).unwrap();
        let idle = builder.state("idle", top).unwrap();
        let both = builder.state("both", top).unwrap();
        builder.initial(top, idle).unwrap();

        let left = builder.region("left", both).unwrap();
        let l1 = builder.state("l1", left).unwrap();
        let l2 = builder.state("l2", left).unwrap();
        builder.initial(left, l1).unwrap();
        let right = builder.region("right", both).unwrap();
        let r1 = builder.state("r1", right).unwrap();
        builder.initial(right, r1).unwrap();

        let id = builder
            .transition(TransitionBuilder::new().from(idle).to(l2))
            .unwrap();
        let model = builder.build().unwrap();
        let transition = model.transition(id).unwrap();

        assert_eq!(transition.enter_path(), &[both, l2]);
        assert_eq!(transition.forks(), &[right]);
    }

    #[test]
    fn transition_across_orthogonal_regions_exits_owner() {
        let mut builder: ModelBuilder<&'static str> = ModelBuilder::new();
        let machine = builder.root("machine");
        let top = builder.default_region(machine).unwrap();
        let both = builder.state("both", top).unwrap();
        builder.initial(top, both).unwrap();
        let left = builder.region("left", both).unwrap();
        let l1 = builder.state("l1", left).unwrap();
        builder.initial(left, l1).unwrap();
        let right = builder.region("right", both).unwrap();
        let r1 = builder.state("r1", right).unwrap();
        builder.initial(right, r1).unwrap();

        let id = builder
            .transition(TransitionBuilder::new().from(l1).to(r1))
            .unwrap();
        let model = builder.build().unwrap();
        let transition = model.transition(id).unwrap();

        assert_eq!(transition.exit_path(), &[l1, both]);
        assert_eq!(transition.enter_path(), &[both, r1]);
        assert_eq!(transition.forks(), &[left]);
        assert_eq!(transition.lca(), Some(top));
    }
}
