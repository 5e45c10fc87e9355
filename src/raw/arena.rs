use alloc::vec::Vec;

use super::handle::Handle;

/// Dense, append-only slot storage addressed by [`Handle`].
///
/// Nodes are never freed individually, so there is no free list; `truncate`
/// drops everything past a prefix in one go.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<T>,
}

impl<T> Arena<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        assert!(
            self.slots.len() <= Handle::MAX,
            "`Arena::alloc()` - arena is at maximum capacity ({})",
            Handle::MAX
        );
        self.slots.push(element);
        Handle::from_index(self.slots.len() - 1)
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots
            .get(handle.to_index())
            .expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots
            .get_mut(handle.to_index())
            .expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Drops every slot at or after `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.slots.truncate(len);
    }
}
