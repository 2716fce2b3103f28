//! A running instance of a model.

use crate::core::{RegionId, VertexId};
use crate::engine::config::EngineConfig;
use crate::engine::error::EngineError;
use crate::engine::executor::Executor;
use crate::engine::store::{Configuration, ConfigurationStore, MemoryStore};
use crate::engine::transaction::Transaction;
use crate::model::Model;
use parking_lot::ReentrantMutex;
use std::sync::Arc;
use uuid::Uuid;

/// Pairs a shared, immutable [`Model`] with a configuration store.
///
/// Every call that takes an optional transaction opens and commits its own
/// when given `None`. With an explicit transaction the caller decides when
/// (and whether) the writes are published.
///
/// Each vertex carries a re-entrant lock taken while a stimulus is applied
/// to it and held until the stimulus commits, so stimuli aimed at the same
/// state from different threads are serialised while disjoint subtrees
/// proceed in parallel.
///
/// Locks cover one state, not its subtree: a stimulus on a descendant does
/// not wait for one on its ancestor. If the ancestor's stimulus exits the
/// descendant first, a plain [`Transaction::commit`] of the descendant's
/// writes still marks vertices active below a state that is no longer
/// active. Callers that mix the two should drive the descendant through
/// [`Instance::begin`] and [`Transaction::commit_if_unchanged`], which
/// reports a retryable [`EngineError::Conflict`] instead.
pub struct Instance<M, S = MemoryStore> {
    id: Uuid,
    model: Arc<Model<M>>,
    root: VertexId,
    config: EngineConfig,
    store: S,
    locks: Vec<ReentrantMutex<()>>,
}

impl<M> Instance<M, MemoryStore> {
    /// Create an instance backed by an empty in-memory store.
    pub fn new(model: Arc<Model<M>>, root: VertexId) -> Result<Self, EngineError> {
        Self::with_store(model, root, MemoryStore::new(), EngineConfig::default())
    }

    pub fn with_config(
        model: Arc<Model<M>>,
        root: VertexId,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        Self::with_store(model, root, MemoryStore::new(), config)
    }
}

impl<M, S: ConfigurationStore> Instance<M, S> {
    pub fn with_store(
        model: Arc<Model<M>>,
        root: VertexId,
        store: S,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        let vertex = model.vertex(root).ok_or(EngineError::UnknownVertex(root))?;
        if !vertex.is_state() {
            return Err(EngineError::NotAState {
                name: vertex.name().to_string(),
            });
        }

        check_configuration(&model, &store.snapshot())?;

        let locks = (0..model.vertex_count())
            .map(|_| ReentrantMutex::new(()))
            .collect();

        Ok(Self {
            id: Uuid::new_v4(),
            model,
            root,
            config,
            store,
            locks,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn model(&self) -> &Arc<Model<M>> {
        &self.model
    }

    pub fn root(&self) -> VertexId {
        self.root
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open a transaction over this instance's store.
    pub fn begin(&self) -> Transaction<'_> {
        Transaction::new(self.id, &self.store)
    }

    /// Enter the root state and its default configuration, then commit.
    pub fn initialise(&self) -> Result<(), EngineError> {
        self.initialise_state(self.root, None)
    }

    /// Enter `state` and initialise every region below it.
    pub fn initialise_state(
        &self,
        state: VertexId,
        tx: Option<&mut Transaction<'_>>,
    ) -> Result<(), EngineError> {
        self.check_state(state)?;
        let executor = self.executor();
        let _guard = self.locks[state.0].lock();

        match tx {
            Some(tx) => {
                self.check_transaction(tx)?;
                executor.initialise(state, tx)
            }
            None => {
                let mut tx = self.begin();
                executor.initialise(state, &mut tx)?;
                let revision = tx.commit()?;
                tracing::debug!(
                    "Instance {} initialised '{}' at revision {}",
                    self.id,
                    self.model.v(state).name(),
                    revision
                );
                Ok(())
            }
        }
    }

    /// Deliver `message` to the root state and commit the result.
    ///
    /// Returns whether any transition consumed the message.
    pub fn process(&self, message: &M) -> Result<bool, EngineError> {
        self.process_state(self.root, message, None)
    }

    /// Deliver `message` to `state`.
    ///
    /// The state fires its own enabled transition if it has one; otherwise
    /// the message is forwarded to the active vertex of each of its regions.
    /// An inactive state ignores the message and returns `Ok(false)`.
    pub fn process_state(
        &self,
        state: VertexId,
        message: &M,
        tx: Option<&mut Transaction<'_>>,
    ) -> Result<bool, EngineError> {
        self.check_state(state)?;
        let executor = self.executor();
        let _guard = self.locks[state.0].lock();

        match tx {
            Some(tx) => {
                self.check_transaction(tx)?;
                executor.process(state, message, tx)
            }
            None => {
                let mut tx = self.begin();
                let consumed = match executor.process(state, message, &mut tx) {
                    Ok(consumed) => consumed,
                    Err(e) => {
                        tracing::warn!(
                            "Instance {} rejected message at '{}': {}",
                            self.id,
                            self.model.v(state).name(),
                            e
                        );
                        return Err(e);
                    }
                };
                if consumed {
                    let revision = tx.commit()?;
                    tracing::debug!("Instance {} advanced to revision {}", self.id, revision);
                }
                Ok(consumed)
            }
        }
    }

    /// Copy of the committed configuration.
    pub fn configuration(&self) -> Configuration {
        self.store.snapshot()
    }

    /// Committed active vertex of `region`.
    pub fn current(&self, region: RegionId) -> Option<VertexId> {
        self.store
            .load(region)
            .filter(|slot| slot.active)
            .map(|slot| slot.vertex)
    }

    /// Whether `vertex` is active in the committed configuration. The root
    /// counts as always active.
    pub fn is_active(&self, vertex: VertexId) -> bool {
        match self.model.vertex(vertex).map(|v| v.parent()) {
            Some(Some(region)) => self.current(region) == Some(vertex),
            Some(None) => true,
            None => false,
        }
    }

    /// Whether every region of `state` rests in a final state.
    pub fn is_complete(&self, state: VertexId) -> bool {
        self.model.vertex(state).is_some_and(|vertex| {
            vertex.regions().iter().all(|region| {
                self.current(*region)
                    .and_then(|active| self.model.vertex(active))
                    .is_some_and(|active| active.is_final())
            })
        })
    }

    fn executor(&self) -> Executor<'_, M> {
        Executor {
            model: &self.model,
            config: &self.config,
            locks: &self.locks,
        }
    }

    fn check_state(&self, state: VertexId) -> Result<(), EngineError> {
        let vertex = self
            .model
            .vertex(state)
            .ok_or(EngineError::UnknownVertex(state))?;
        if !vertex.is_state() {
            return Err(EngineError::NotAState {
                name: vertex.name().to_string(),
            });
        }
        Ok(())
    }

    fn check_transaction(&self, tx: &Transaction<'_>) -> Result<(), EngineError> {
        if tx.owner() != self.id {
            return Err(EngineError::ForeignTransaction);
        }
        Ok(())
    }
}

/// Every stored slot must name a region of `model` and one of that region's
/// own vertices.
fn check_configuration<M>(
    model: &Model<M>,
    configuration: &Configuration,
) -> Result<(), EngineError> {
    for (region, slot) in configuration.slots() {
        let fits = model.region(region).is_some()
            && model
                .vertex(slot.vertex)
                .is_some_and(|vertex| vertex.parent() == Some(region));
        if !fits {
            return Err(EngineError::ForeignConfiguration {
                region,
                vertex: slot.vertex,
            });
        }
    }
    Ok(())
}
