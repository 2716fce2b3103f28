//! The traversal protocol: how entering, exiting and completing vertices
//! updates a transaction.

use crate::core::{RegionId, TransitionId, VertexId, VertexKind};
use crate::engine::config::{AmbiguityPolicy, EngineConfig};
use crate::engine::error::EngineError;
use crate::engine::store::Slot;
use crate::engine::transaction::Transaction;
use crate::model::{Model, Transition};
use parking_lot::ReentrantMutex;

/// Borrowed view of an instance while it handles one stimulus.
///
/// `depth` counts transitions fired since the stimulus began, so that a
/// cycle of completion transitions fails instead of recursing forever.
pub(crate) struct Executor<'a, M> {
    pub(crate) model: &'a Model<M>,
    pub(crate) config: &'a EngineConfig,
    pub(crate) locks: &'a [ReentrantMutex<()>],
}

impl<'a, M> Executor<'a, M> {
    /// Enter `state` and initialise every region below it.
    pub(crate) fn initialise(
        &self,
        state: VertexId,
        tx: &mut Transaction<'_>,
    ) -> Result<(), EngineError> {
        let _guard = self.locks[state.0].lock();
        self.begin_enter(state, tx)?;
        self.end_enter(state, tx, false, 0)
    }

    /// Offer `message` to `state`, then to the active vertex of each of its
    /// regions if the state itself has nothing enabled.
    pub(crate) fn process(
        &self,
        state: VertexId,
        message: &M,
        tx: &mut Transaction<'_>,
    ) -> Result<bool, EngineError> {
        let _guard = self.locks[state.0].lock();

        if !self.is_active(state, tx) {
            return Ok(false);
        }

        let vertex = self.model.v(state);
        if let Some(id) = self.select(state, vertex.transitions(), |t| t.accepts(message))? {
            self.fire(id, tx, false, 0)?;
            return Ok(true);
        }

        let mut consumed = false;
        for region in vertex.regions() {
            if let Some(active) = self.current(*region, tx) {
                if self.model.v(active).is_state() {
                    consumed |= self.process(active, message, tx)?;
                }
            }
        }
        Ok(consumed)
    }

    /// A root is always active; any other vertex is active when its region
    /// currently holds it.
    pub(crate) fn is_active(&self, vertex: VertexId, tx: &Transaction<'_>) -> bool {
        match self.model.v(vertex).parent() {
            Some(region) => self.current(region, tx) == Some(vertex),
            None => true,
        }
    }

    /// Every region of `state` rests in a final state.
    pub(crate) fn is_complete(&self, state: VertexId, tx: &Transaction<'_>) -> bool {
        self.model
            .v(state)
            .regions()
            .iter()
            .all(|region| self.region_complete(*region, tx))
    }

    fn region_complete(&self, region: RegionId, tx: &Transaction<'_>) -> bool {
        self.current(region, tx)
            .is_some_and(|vertex| self.model.v(vertex).is_final())
    }

    /// The slot of `region`, or `None` if it names a vertex that is not a
    /// member of that region.
    fn slot(&self, region: RegionId, tx: &Transaction<'_>) -> Option<Slot> {
        tx.slot(region).filter(|slot| {
            self.model
                .vertex(slot.vertex)
                .is_some_and(|vertex| vertex.parent() == Some(region))
        })
    }

    fn current(&self, region: RegionId, tx: &Transaction<'_>) -> Option<VertexId> {
        self.slot(region, tx)
            .filter(|slot| slot.active)
            .map(|slot| slot.vertex)
    }

    fn select<F>(
        &self,
        state: VertexId,
        candidates: &[TransitionId],
        enabled: F,
    ) -> Result<Option<TransitionId>, EngineError>
    where
        F: Fn(&Transition<M>) -> bool,
    {
        let mut matching = candidates
            .iter()
            .copied()
            .filter(|id| enabled(self.model.t(*id)));

        match self.config.ambiguity {
            AmbiguityPolicy::Reject => {
                let first = matching.next();
                let others = matching.count();
                if others > 0 {
                    return Err(EngineError::AmbiguousTransition {
                        state: self.model.v(state).name().to_string(),
                        satisfied: others + 1,
                    });
                }
                Ok(first)
            }
            AmbiguityPolicy::FirstDeclared => {
                let first = matching.next();
                if first.is_some() && matching.next().is_some() {
                    tracing::warn!(
                        "Several transitions of '{}' are enabled; taking the first declared",
                        self.model.v(state).name()
                    );
                }
                Ok(first)
            }
        }
    }

    fn fire(
        &self,
        id: TransitionId,
        tx: &mut Transaction<'_>,
        deep: bool,
        depth: usize,
    ) -> Result<(), EngineError> {
        if depth > self.config.max_cascade_depth {
            return Err(EngineError::CascadeLimit {
                limit: self.config.max_cascade_depth,
            });
        }

        let transition = self.model.t(id);
        let deep = deep || transition.deep_history;
        tracing::trace!(
            "Firing {} from '{}' (depth {})",
            id,
            self.model.v(transition.source).name(),
            depth
        );

        for vertex in &transition.exit {
            self.on_exit(*vertex, tx)?;
        }
        for vertex in &transition.enter {
            self.begin_enter(*vertex, tx)?;
        }
        for region in &transition.forks {
            self.initialise_region(*region, tx, deep, depth)?;
        }

        let Some(target) = transition.target else {
            return Ok(());
        };
        self.end_enter(target, tx, deep, depth)?;

        // Reaching a final state may complete the owning state. Region
        // initialisation is left out: the owner checks itself once all of its
        // regions are entered.
        let source = self.model.v(transition.source);
        if self.model.v(target).is_final() && !source.is_pseudostate() {
            if let Some(owner) = self.model.owner_of(target) {
                self.evaluate_completion(owner, tx, false, depth)?;
            }
        }
        Ok(())
    }

    fn on_exit(&self, vertex: VertexId, tx: &mut Transaction<'_>) -> Result<(), EngineError> {
        let node = self.model.v(vertex);

        for region in node.regions() {
            if let Some(active) = self.current(*region, tx) {
                self.on_exit(active, tx)?;
            }
        }

        for action in node.exit_actions() {
            action.run().map_err(|source| EngineError::Action {
                state: node.name().to_string(),
                source,
            })?;
        }

        if let Some(region) = node.parent() {
            tx.stage(region, Slot::exited(vertex));
        }
        tracing::trace!("Left '{}'", node.name());
        Ok(())
    }

    fn begin_enter(&self, vertex: VertexId, tx: &mut Transaction<'_>) -> Result<(), EngineError> {
        let node = self.model.v(vertex);

        if let Some(region) = node.parent() {
            tx.stage(region, Slot::active(vertex));
        }
        tracing::trace!("Entered '{}'", node.name());

        for action in node.entry_actions() {
            action.run().map_err(|source| EngineError::Action {
                state: node.name().to_string(),
                source,
            })?;
        }
        Ok(())
    }

    fn end_enter(
        &self,
        vertex: VertexId,
        tx: &mut Transaction<'_>,
        deep: bool,
        depth: usize,
    ) -> Result<(), EngineError> {
        let node = self.model.v(vertex);

        match node.kind() {
            VertexKind::State => {
                for region in node.regions() {
                    self.initialise_region(*region, tx, deep, depth)?;
                }
                self.evaluate_completion(vertex, tx, deep, depth)?;
                Ok(())
            }
            VertexKind::Initial => {
                let id = self
                    .select(vertex, node.completions(), |t| t.completes())?
                    .ok_or_else(|| EngineError::MissingInitialTransition {
                        vertex: node.name().to_string(),
                    })?;
                self.fire(id, tx, deep, depth + 1)
            }
            VertexKind::Final => Ok(()),
        }
    }

    fn initialise_region(
        &self,
        region: RegionId,
        tx: &mut Transaction<'_>,
        deep: bool,
        depth: usize,
    ) -> Result<(), EngineError> {
        let node = self.model.r(region);

        if deep && node.has_history() {
            if let Some(slot) = self.slot(region, tx) {
                tracing::trace!(
                    "Restoring '{}' in region '{}'",
                    self.model.v(slot.vertex).name(),
                    node.name()
                );
                self.begin_enter(slot.vertex, tx)?;
                return self.end_enter(slot.vertex, tx, deep, depth);
            }
        }

        let initial = node.initial().ok_or_else(|| EngineError::MissingInitial {
            region: node.name().to_string(),
        })?;
        self.begin_enter(initial, tx)?;
        self.end_enter(initial, tx, deep, depth)
    }

    /// Fire the enabled completion transition of `state` if it is active and
    /// complete. Returns whether one fired.
    fn evaluate_completion(
        &self,
        state: VertexId,
        tx: &mut Transaction<'_>,
        deep: bool,
        depth: usize,
    ) -> Result<bool, EngineError> {
        let vertex = self.model.v(state);

        if vertex.completions().is_empty()
            || !self.is_active(state, tx)
            || !self.is_complete(state, tx)
        {
            return Ok(false);
        }

        match self.select(state, vertex.completions(), |t| t.completes())? {
            Some(id) => {
                self.fire(id, tx, deep, depth + 1)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
