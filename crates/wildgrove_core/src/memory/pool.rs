//! # Slot Pool
//!
//! Growable pool for objects that are frequently retired and brought back.

use tracing::warn;

use crate::handle::PoolHandle;

/// One pool slot. The value stays in place while the slot is free.
struct Slot<T> {
    /// The pooled object.
    value: T,
    /// Bumped on every release; handles must match it.
    generation: u32,
    /// Whether the slot is currently handed out.
    active: bool,
}

/// Result of [`SlotPool::acquire`].
pub struct Acquired<'a, T> {
    /// Handle addressing the slot for this activation.
    pub handle: PoolHandle,
    /// The slot's value, ready to be repositioned by the caller.
    pub value: &'a mut T,
    /// True if an inactive slot was recycled, false if a new one was allocated.
    pub reused: bool,
}

/// A pool that recycles slots instead of deallocating them.
///
/// Slots are allocated on demand and never freed while the pool lives.
/// Released slots keep their value and go onto a LIFO free list; the next
/// acquire hands the most recently released slot back out.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. It belongs to the game-loop thread.
///
/// # Example
///
/// ```rust,ignore
/// let mut pool: SlotPool<Particle> = SlotPool::with_capacity(256);
///
/// let acquired = pool.acquire(Particle::default);
/// acquired.value.life = 1.0;
/// let handle = acquired.handle;
///
/// pool.release(handle);            // slot kept, handle now stale
/// let again = pool.acquire(Particle::default);
/// assert!(again.reused);
/// ```
pub struct SlotPool<T> {
    /// Slot storage, only ever grows.
    slots: Vec<Slot<T>>,
    /// Free list - indices of inactive slots.
    free_list: Vec<u32>,
    /// Number of active slots.
    active_count: usize,
}

impl<T> SlotPool<T> {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            active_count: 0,
        }
    }

    /// Creates an empty pool with room for `capacity` slots before growing.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::with_capacity(capacity),
            active_count: 0,
        }
    }

    /// Total number of slots ever allocated.
    #[inline]
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots currently handed out.
    #[inline]
    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.active_count
    }

    /// Number of inactive slots waiting for reuse.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Activates a slot.
    ///
    /// Reuses the most recently released slot if there is one, otherwise
    /// allocates a new slot holding `create()`. The caller is expected to
    /// overwrite the returned value's state either way.
    pub fn acquire(&mut self, create: impl FnOnce() -> T) -> Acquired<'_, T> {
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.active = true;
            self.active_count += 1;
            return Acquired {
                handle: PoolHandle::new(index, slot.generation),
                value: &mut slot.value,
                reused: true,
            };
        }

        let position = self.slots.len();
        self.slots.push(Slot {
            value: create(),
            generation: 0,
            active: true,
        });
        self.active_count += 1;
        let slot = &mut self.slots[position];
        Acquired {
            handle: PoolHandle::new(position as u32, 0),
            value: &mut slot.value,
            reused: false,
        }
    }

    /// Deactivates a slot and returns it to the free list.
    ///
    /// The value is kept in place; the returned reference lets the caller
    /// clear whatever registration the object had. Releasing a stale or
    /// already-released handle is a logged no-op returning `None`.
    pub fn release(&mut self, handle: PoolHandle) -> Option<&mut T> {
        let Some(slot) = self.slots.get_mut(handle.index() as usize) else {
            warn!(index = handle.index(), "release of unknown pool slot ignored");
            return None;
        };
        if !slot.active || slot.generation != handle.generation() {
            warn!(
                index = handle.index(),
                generation = handle.generation(),
                "release of inactive or stale pool handle ignored"
            );
            return None;
        }

        slot.active = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(handle.index());
        self.active_count -= 1;
        Some(&mut slot.value)
    }

    /// Returns true if `handle` addresses an active slot.
    #[inline]
    #[must_use]
    pub fn is_live(&self, handle: PoolHandle) -> bool {
        self.slot(handle).is_some()
    }

    /// Gets a reference to an active object.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.slot(handle).map(|slot| &slot.value)
    }

    /// Gets a mutable reference to an active object.
    #[inline]
    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.active && slot.generation == handle.generation())
            .map(|slot| &mut slot.value)
    }

    /// Iterates over all active objects in slot order.
    pub fn iter_active(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.slots.iter().enumerate().filter(|(_, slot)| slot.active).map(|(index, slot)| {
            (PoolHandle::new(index as u32, slot.generation), &slot.value)
        })
    }

    fn slot(&self, handle: PoolHandle) -> Option<&Slot<T>> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.active && slot.generation == handle.generation())
    }
}

impl<T> Default for SlotPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_acquire_release() {
        let mut pool: SlotPool<u32> = SlotPool::new();

        let acquired = pool.acquire(|| 42);
        assert!(!acquired.reused);
        let h1 = acquired.handle;
        assert_eq!(*pool.get(h1).unwrap(), 42);
        assert_eq!(pool.active_count(), 1);

        assert_eq!(pool.release(h1).copied(), Some(42));
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.free_count(), 1);
        assert!(pool.get(h1).is_none());
    }

    #[test]
    fn test_pool_reuse_keeps_slot_and_bumps_generation() {
        let mut pool: SlotPool<u32> = SlotPool::new();

        let h1 = pool.acquire(|| 1).handle;
        pool.release(h1);

        let acquired = pool.acquire(|| unreachable!("free slot must be reused"));
        assert!(acquired.reused);
        *acquired.value = 2;
        let h2 = acquired.handle;

        assert_eq!(h1.index(), h2.index());
        assert_ne!(h1.generation(), h2.generation());
        assert_eq!(pool.slot_count(), 1);
        assert!(!pool.is_live(h1));
        assert_eq!(*pool.get(h2).unwrap(), 2);
    }

    #[test]
    fn test_double_release_is_noop() {
        let mut pool: SlotPool<u8> = SlotPool::new();
        let handle = pool.acquire(|| 7).handle;

        assert!(pool.release(handle).is_some());
        assert!(pool.release(handle).is_none());
        assert_eq!(pool.free_count(), 1);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_stale_handle_cannot_release_reused_slot() {
        let mut pool: SlotPool<u8> = SlotPool::new();
        let old = pool.acquire(|| 1).handle;
        pool.release(old);
        let new = pool.acquire(|| 2).handle;

        assert!(pool.release(old).is_none());
        assert!(pool.is_live(new));
    }

    #[test]
    fn test_grows_only_when_free_list_empty() {
        let mut pool: SlotPool<u16> = SlotPool::with_capacity(4);
        let handles: Vec<_> = (0..3).map(|i| pool.acquire(|| i).handle).collect();
        assert_eq!(pool.slot_count(), 3);

        pool.release(handles[1]);
        let _ = pool.acquire(|| 99);
        assert_eq!(pool.slot_count(), 3);

        let _ = pool.acquire(|| 100);
        assert_eq!(pool.slot_count(), 4);
        assert_eq!(pool.iter_active().count(), 4);
    }
}
