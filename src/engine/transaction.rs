//! Staged writes to a configuration store.

use crate::core::{RegionId, VertexId};
use crate::engine::error::EngineError;
use crate::engine::store::{ConfigurationStore, Slot};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// A unit of work over one instance's configuration.
///
/// Reads see the transaction's own staged writes first and fall back to the
/// committed store. Nothing becomes visible to other readers until
/// [`commit`](Transaction::commit); dropping a transaction discards its
/// writes.
pub struct Transaction<'a> {
    owner: Uuid,
    store: &'a dyn ConfigurationStore,
    base_revision: u64,
    staged: HashMap<RegionId, Slot>,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(owner: Uuid, store: &'a dyn ConfigurationStore) -> Self {
        Self {
            owner,
            store,
            base_revision: store.revision(),
            staged: HashMap::new(),
        }
    }

    /// Id of the instance this transaction was begun on.
    pub fn owner(&self) -> Uuid {
        self.owner
    }

    /// Store revision observed when the transaction began.
    pub fn base_revision(&self) -> u64 {
        self.base_revision
    }

    pub fn slot(&self, region: RegionId) -> Option<Slot> {
        self.staged
            .get(&region)
            .copied()
            .or_else(|| self.store.load(region))
    }

    /// The active vertex of `region` as seen by this transaction.
    pub fn current(&self, region: RegionId) -> Option<VertexId> {
        self.slot(region)
            .filter(|slot| slot.active)
            .map(|slot| slot.vertex)
    }

    /// Number of regions written so far.
    pub fn staged(&self) -> usize {
        self.staged.len()
    }

    pub(crate) fn stage(&mut self, region: RegionId, slot: Slot) {
        self.staged.insert(region, slot);
    }

    /// Publish every staged write and return the new store revision.
    pub fn commit(self) -> Result<u64, EngineError> {
        self.store.publish(self.staged, None)
    }

    /// Publish only if no other commit landed since this transaction began.
    pub fn commit_if_unchanged(self) -> Result<u64, EngineError> {
        self.store.publish(self.staged, Some(self.base_revision))
    }

    /// Discard every staged write.
    pub fn rollback(self) {
        tracing::trace!(
            "Instance {} discarded {} staged write(s)",
            self.owner,
            self.staged.len()
        );
    }
}

impl fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("owner", &self.owner)
            .field("base_revision", &self.base_revision)
            .field("staged", &self.staged)
            .finish()
    }
}
