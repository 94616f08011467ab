//! # Handles
//!
//! Handles are lightweight identifiers consisting of:
//! - An index into a slot array
//! - A generation counter for safe reuse
//!
//! A slot's generation moves on every time it is released, so a handle
//! kept past its object's lifetime stops resolving instead of silently
//! addressing whatever reused the slot.

use crate::coords::ChunkCoord;

/// Handle to a slot in a [`crate::SlotPool`].
///
/// The ID is split into two parts:
/// - Lower 32 bits: Slot index
/// - Upper 32 bits: Generation counter for detecting stale references
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PoolHandle(u64);

impl PoolHandle {
    /// Null/invalid handle.
    pub const NULL: Self = Self(u64::MAX);

    /// Creates a handle from index and generation.
    ///
    /// # Arguments
    ///
    /// * `index` - The slot index (0 to 2^32-1)
    /// * `generation` - The generation counter (0 to 2^32-1)
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation the handle was issued with.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Checks if this handle is null.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for PoolHandle {
    fn default() -> Self {
        Self::NULL
    }
}

/// Weak reference from a pooled object to the chunk it is registered with.
///
/// Every chunk instance gets a fresh generation when the grid creates it.
/// A key only resolves while the chunk at `coord` is the same instance that
/// was current when the key was taken; a chunk torn down and regenerated at
/// the same coordinate produces a different key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkKey {
    /// Chunk coordinate.
    pub coord: ChunkCoord,
    /// Instance generation assigned by the grid.
    pub generation: u32,
}

impl ChunkKey {
    /// Creates a new chunk key.
    #[inline]
    #[must_use]
    pub const fn new(coord: ChunkCoord, generation: u32) -> Self {
        Self { coord, generation }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_handle_roundtrip() {
        let handle = PoolHandle::new(12345, 67890);
        assert_eq!(handle.index(), 12345);
        assert_eq!(handle.generation(), 67890);
        assert!(!handle.is_null());
    }

    #[test]
    fn test_default_is_null() {
        assert!(PoolHandle::default().is_null());
    }

    #[test]
    fn test_chunk_key_distinguishes_instances() {
        let coord = ChunkCoord::new(-2, 5);
        assert_ne!(ChunkKey::new(coord, 1), ChunkKey::new(coord, 2));
        assert_eq!(ChunkKey::new(coord, 1), ChunkKey::new(coord, 1));
    }
}
