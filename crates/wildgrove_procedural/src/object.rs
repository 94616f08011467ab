//! # Pooled World Objects
//!
//! One [`SlotPool`] per registered [`ObjectType`]. Tiles, trees and
//! creatures are acquired when a chunk materializes them and released when
//! the chunk is torn down; their slots are recycled, never freed.

use tracing::{trace, warn};
use wildgrove_core::{ChunkKey, ObjectType, PerType, PixelPos, PoolHandle, SlotPool, WorldError, WorldResult};

/// Handle to a pooled world object.
///
/// The type selects the pool, the slot handle selects the object in it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    /// Object type (and pool).
    pub kind: ObjectType,
    /// Slot in the type's pool.
    pub slot: PoolHandle,
}

/// State of a pooled object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldObject {
    /// Object type.
    pub kind: ObjectType,
    /// Position in pixels.
    pub position: PixelPos,
    /// Whether the object is in play.
    pub active: bool,
    /// Chunk the object is registered with, if any.
    pub chunk: Option<ChunkKey>,
}

impl WorldObject {
    fn inactive(kind: ObjectType) -> Self {
        Self {
            kind,
            position: PixelPos::default(),
            active: false,
            chunk: None,
        }
    }
}

/// Per-type object pools.
///
/// Only registered types can be acquired. Every pool grows on demand and
/// keeps its slots for the lifetime of the world.
pub struct ObjectPool {
    pools: PerType<Option<SlotPool<WorldObject>>>,
}

impl ObjectPool {
    /// Creates pools for `types`.
    #[must_use]
    pub fn new(types: &[ObjectType]) -> Self {
        Self {
            pools: PerType::from_fn(|kind| types.contains(&kind).then(SlotPool::new)),
        }
    }

    /// Creates pools for every object type.
    #[must_use]
    pub fn with_all_types() -> Self {
        Self::new(&ObjectType::ALL)
    }

    /// Returns true if `kind` has a pool.
    #[inline]
    #[must_use]
    pub fn is_registered(&self, kind: ObjectType) -> bool {
        self.pools[kind].is_some()
    }

    /// Activates an object of `kind` at `position`.
    ///
    /// Reuses a released slot of the same type when one is free, otherwise
    /// allocates a new slot. The object records `chunk` as its owner; the
    /// caller registers the returned handle with that chunk.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnregisteredObjectType`] if `kind` has no pool.
    pub fn acquire(
        &mut self,
        kind: ObjectType,
        position: PixelPos,
        chunk: Option<ChunkKey>,
    ) -> WorldResult<ObjectHandle> {
        let pool = self.pools[kind]
            .as_mut()
            .ok_or(WorldError::UnregisteredObjectType(kind))?;

        let acquired = pool.acquire(|| WorldObject::inactive(kind));
        *acquired.value = WorldObject {
            kind,
            position,
            active: true,
            chunk,
        };
        trace!(kind = kind.name(), reused = acquired.reused, "acquired object");

        Ok(ObjectHandle {
            kind,
            slot: acquired.handle,
        })
    }

    /// Deactivates an object and returns its slot to the free list.
    ///
    /// Returns the object's state as it was before release, so the caller
    /// can drop the chunk registration it held. Releasing a stale or
    /// unknown handle is a no-op returning `None`.
    pub fn release(&mut self, handle: ObjectHandle) -> Option<WorldObject> {
        let Some(pool) = self.pools[handle.kind].as_mut() else {
            warn!(kind = handle.kind.name(), "release of unregistered object type ignored");
            return None;
        };

        let object = pool.release(handle.slot)?;
        let previous = *object;
        object.active = false;
        object.chunk = None;
        Some(previous)
    }

    /// Returns the live object behind `handle`.
    #[must_use]
    pub fn get(&self, handle: ObjectHandle) -> Option<&WorldObject> {
        self.pools[handle.kind].as_ref()?.get(handle.slot)
    }

    /// Returns the live object behind `handle`, mutably.
    pub fn get_mut(&mut self, handle: ObjectHandle) -> Option<&mut WorldObject> {
        self.pools[handle.kind].as_mut()?.get_mut(handle.slot)
    }

    /// Slots ever allocated for `kind`.
    #[must_use]
    pub fn slot_count(&self, kind: ObjectType) -> usize {
        self.pools[kind].as_ref().map_or(0, SlotPool::slot_count)
    }

    /// Objects of `kind` currently in play.
    #[must_use]
    pub fn active_count(&self, kind: ObjectType) -> usize {
        self.pools[kind].as_ref().map_or(0, SlotPool::active_count)
    }

    /// Released slots of `kind` waiting for reuse.
    #[must_use]
    pub fn free_count(&self, kind: ObjectType) -> usize {
        self.pools[kind].as_ref().map_or(0, SlotPool::free_count)
    }

    /// Objects in play across all types.
    #[must_use]
    pub fn total_active(&self) -> usize {
        ObjectType::ALL.iter().map(|&kind| self.active_count(kind)).sum()
    }

    /// Slots ever allocated across all types.
    #[must_use]
    pub fn total_slots(&self) -> usize {
        ObjectType::ALL.iter().map(|&kind| self.slot_count(kind)).sum()
    }
}

impl Default for ObjectPool {
    fn default() -> Self {
        Self::with_all_types()
    }
}

#[cfg(test)]
mod tests {
    use wildgrove_core::ChunkCoord;

    use super::*;

    #[test]
    fn test_acquire_sets_state() {
        let mut pool = ObjectPool::with_all_types();
        let key = ChunkKey::new(ChunkCoord::new(2, -1), 7);

        let handle = pool.acquire(ObjectType::Slime, PixelPos::new(10.0, 20.0), Some(key)).unwrap();
        let object = pool.get(handle).unwrap();

        assert_eq!(object.kind, ObjectType::Slime);
        assert_eq!(object.position, PixelPos::new(10.0, 20.0));
        assert!(object.active);
        assert_eq!(object.chunk, Some(key));
        assert_eq!(pool.active_count(ObjectType::Slime), 1);
    }

    #[test]
    fn test_unregistered_type_is_an_error() {
        let mut pool = ObjectPool::new(&[ObjectType::GrassTile]);

        let err = pool.acquire(ObjectType::Fireball, PixelPos::default(), None).unwrap_err();
        assert!(matches!(err, WorldError::UnregisteredObjectType(ObjectType::Fireball)));
        assert_eq!(pool.total_slots(), 0);
    }

    #[test]
    fn test_release_reuses_slot_of_same_type() {
        let mut pool = ObjectPool::with_all_types();

        let first = pool.acquire(ObjectType::WaterTile, PixelPos::default(), None).unwrap();
        let released = pool.release(first).unwrap();
        assert!(released.active);
        assert_eq!(pool.free_count(ObjectType::WaterTile), 1);

        let other = pool.acquire(ObjectType::SandTile, PixelPos::default(), None).unwrap();
        assert_eq!(pool.free_count(ObjectType::WaterTile), 1, "pools are per type");

        let second = pool.acquire(ObjectType::WaterTile, PixelPos::new(1.0, 1.0), None).unwrap();
        assert_eq!(second.slot.index(), first.slot.index());
        assert_ne!(second.slot, first.slot);
        assert_eq!(pool.slot_count(ObjectType::WaterTile), 1);
        assert!(pool.get(other).is_some());
    }

    #[test]
    fn test_stale_release_is_noop() {
        let mut pool = ObjectPool::with_all_types();

        let handle = pool.acquire(ObjectType::BigOak, PixelPos::default(), None).unwrap();
        assert!(pool.release(handle).is_some());
        assert!(pool.release(handle).is_none());
        assert!(pool.get(handle).is_none());
        assert_eq!(pool.active_count(ObjectType::BigOak), 0);
    }

    #[test]
    fn test_release_clears_registration() {
        let mut pool = ObjectPool::with_all_types();
        let key = ChunkKey::new(ChunkCoord::new(0, 0), 1);

        let handle = pool.acquire(ObjectType::GrassTile, PixelPos::default(), Some(key)).unwrap();
        let previous = pool.release(handle).unwrap();
        assert_eq!(previous.chunk, Some(key));

        let again = pool.acquire(ObjectType::GrassTile, PixelPos::default(), None).unwrap();
        assert_eq!(pool.get(again).unwrap().chunk, None);
    }
}
