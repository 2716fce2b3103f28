//! Storage for the active-vertex configuration of an instance.

use crate::core::{RegionId, VertexId};
use crate::engine::error::EngineError;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// The last vertex a region held, and whether it is still active.
///
/// An exited slot keeps its vertex so that history can restore it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub vertex: VertexId,
    pub active: bool,
}

impl Slot {
    pub fn active(vertex: VertexId) -> Self {
        Self {
            vertex,
            active: true,
        }
    }

    pub fn exited(vertex: VertexId) -> Self {
        Self {
            vertex,
            active: false,
        }
    }
}

/// A committed snapshot of every region slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    revision: u64,
    committed_at: Option<DateTime<Utc>>,
    slots: BTreeMap<RegionId, Slot>,
}

impl Configuration {
    /// Number of commits that changed the configuration.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn committed_at(&self) -> Option<DateTime<Utc>> {
        self.committed_at
    }

    /// Every recorded slot, ordered by region.
    pub fn slots(&self) -> impl Iterator<Item = (RegionId, Slot)> + '_ {
        self.slots.iter().map(|(region, slot)| (*region, *slot))
    }

    pub fn slot(&self, region: RegionId) -> Option<Slot> {
        self.slots.get(&region).copied()
    }

    /// The active vertex of `region`, if any.
    pub fn current(&self, region: RegionId) -> Option<VertexId> {
        self.slot(region)
            .filter(|slot| slot.active)
            .map(|slot| slot.vertex)
    }

    pub fn is_active(&self, vertex: VertexId) -> bool {
        self.slots
            .values()
            .any(|slot| slot.active && slot.vertex == vertex)
    }

    /// Every active vertex, ordered by region.
    pub fn active_vertices(&self) -> Vec<VertexId> {
        self.slots
            .values()
            .filter(|slot| slot.active)
            .map(|slot| slot.vertex)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Backing store for the committed configuration of one instance.
///
/// Implementations must make `publish` atomic: readers observe either all of
/// a transaction's writes or none of them.
pub trait ConfigurationStore: Send + Sync {
    /// The committed slot of `region`.
    fn load(&self, region: RegionId) -> Option<Slot>;

    /// Current committed revision.
    fn revision(&self) -> u64;

    /// Apply `writes` as one unit and return the new revision.
    ///
    /// With `expected` set, the write is refused with
    /// [`EngineError::Conflict`] unless the committed revision still equals
    /// it.
    fn publish(
        &self,
        writes: HashMap<RegionId, Slot>,
        expected: Option<u64>,
    ) -> Result<u64, EngineError>;

    /// Copy of the whole committed configuration.
    fn snapshot(&self) -> Configuration;
}

/// In-process store guarded by a read-write lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Configuration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously captured configuration.
    pub fn from_configuration(configuration: Configuration) -> Self {
        Self {
            inner: RwLock::new(configuration),
        }
    }
}

impl ConfigurationStore for MemoryStore {
    fn load(&self, region: RegionId) -> Option<Slot> {
        self.inner.read().slot(region)
    }

    fn revision(&self) -> u64 {
        self.inner.read().revision
    }

    fn publish(
        &self,
        writes: HashMap<RegionId, Slot>,
        expected: Option<u64>,
    ) -> Result<u64, EngineError> {
        let mut inner = self.inner.write();

        if let Some(expected) = expected {
            if inner.revision != expected {
                return Err(EngineError::Conflict {
                    expected,
                    actual: inner.revision,
                });
            }
        }

        if writes.is_empty() {
            return Ok(inner.revision);
        }

        inner.slots.extend(writes);
        inner.revision += 1;
        inner.committed_at = Some(Utc::now());
        Ok(inner.revision)
    }

    fn snapshot(&self) -> Configuration {
        self.inner.read().clone()
    }
}
