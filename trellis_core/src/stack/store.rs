// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays handle storage with allocation, arrangement, and
//! visibility management.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use understory_dirty::{CycleHandling, DirtyTracker};

use super::id::HandleId;
use crate::descriptor::Renderable;
use crate::dirty;

/// Struct-of-arrays storage for the live handles of one stack.
///
/// Handles are addressed by [`HandleId`]. Internally, each handle occupies a
/// slot in parallel arrays. Destroyed handles are recycled via a free list,
/// and generation counters prevent stale handle access.
///
/// The store also holds the *arrangement*: the ordered list of handles
/// currently laid out by the container. A handle can be alive without being
/// arranged, e.g. while it animates out before destruction.
pub struct HandleStore {
    // -- Handles --
    pub(crate) handles: Vec<Option<Box<dyn Renderable>>>,
    pub(crate) hidden: Vec<bool>,

    // -- Presented state (written by evaluate) --
    pub(crate) presented_hidden: Vec<bool>,

    // -- Arrangement --
    pub(crate) arranged: Vec<u32>,
    pub(crate) arrangement_dirty: bool,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl fmt::Debug for HandleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleStore")
            .field("len", &self.len)
            .field("free", &self.free_list.len())
            .field("arranged", &self.arranged)
            .field("hidden", &self.hidden)
            .finish_non_exhaustive()
    }
}

impl Default for HandleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HandleStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
            hidden: Vec::new(),
            presented_hidden: Vec::new(),
            arranged: Vec::new(),
            arrangement_dirty: false,
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Takes ownership of `handle` and returns its id.
    ///
    /// The handle starts visible and unarranged.
    pub fn allocate(&mut self, handle: Box<dyn Renderable>) -> HandleId {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.generation[idx as usize] += 1;
            self.handles[idx as usize] = Some(handle);
            self.hidden[idx as usize] = false;
            self.presented_hidden[idx as usize] = false;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.handles.push(Some(handle));
            self.hidden.push(false);
            self.presented_hidden.push(false);
            self.generation.push(0);
            idx
        };

        self.pending_added.push(idx);

        HandleId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a handle, dropping the view and freeing its slot for reuse.
    ///
    /// The handle is removed from the arrangement if it is still arranged.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy(&mut self, id: HandleId) {
        self.validate(id);
        let idx = id.idx;

        if let Some(position) = self.arranged.iter().position(|&slot| slot == idx) {
            self.arranged.remove(position);
            self.arrangement_dirty = true;
        }

        self.dirty.remove_key(idx);
        self.handles[idx as usize] = None;

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
        self.pending_removed.push(idx);
    }

    /// Returns whether the given id refers to a live handle.
    #[must_use]
    pub fn is_alive(&self, id: HandleId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && self.handles[id.idx as usize].is_some()
    }

    /// Number of live handles, arranged or not.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.handles.iter().filter(|h| h.is_some()).count()
    }

    // -- Handle access --

    /// Returns the view behind `id`, or `None` if the id is stale.
    #[must_use]
    pub fn get(&self, id: HandleId) -> Option<&dyn Renderable> {
        if !self.is_alive(id) {
            return None;
        }
        self.handles[id.idx as usize].as_deref()
    }

    /// Returns the view behind `id` mutably, or `None` if the id is stale.
    pub fn get_mut(&mut self, id: HandleId) -> Option<&mut dyn Renderable> {
        if !self.is_alive(id) {
            return None;
        }
        self.handles[id.idx as usize].as_deref_mut()
    }

    // -- Visibility --

    /// Sets the hidden flag of a handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_hidden(&mut self, id: HandleId, hidden: bool) {
        self.validate(id);
        if self.hidden[id.idx as usize] != hidden {
            self.hidden[id.idx as usize] = hidden;
            self.dirty.mark(id.idx, dirty::VISIBILITY);
        }
    }

    /// Returns the hidden flag of a handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn is_hidden(&self, id: HandleId) -> bool {
        self.validate(id);
        self.hidden[id.idx as usize]
    }

    /// Records that a handle received a new payload.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn mark_updated(&mut self, id: HandleId) {
        self.validate(id);
        self.dirty.mark(id.idx, dirty::CONTENT);
    }

    // -- Arrangement --

    /// Replaces the arrangement with `order`.
    ///
    /// Handles missing from `order` stay alive but are no longer arranged.
    ///
    /// # Panics
    ///
    /// Panics if any handle is stale.
    pub fn arrange(&mut self, order: &[HandleId]) {
        for &id in order {
            self.validate(id);
        }
        let changed = self.arranged.len() != order.len()
            || self.arranged.iter().zip(order).any(|(&a, b)| a != b.idx);
        if changed {
            let previous = core::mem::take(&mut self.arranged);
            for (position, id) in order.iter().enumerate() {
                if previous.get(position) != Some(&id.idx) {
                    self.dirty.mark(id.idx, dirty::TOPOLOGY);
                }
            }
            self.arranged.extend(order.iter().map(|id| id.idx));
            self.arrangement_dirty = true;
        }
    }

    /// Number of arranged handles.
    #[must_use]
    pub fn arranged_len(&self) -> usize {
        self.arranged.len()
    }

    /// Returns the handle arranged at `position`, if any.
    #[must_use]
    pub fn arranged_at(&self, position: usize) -> Option<HandleId> {
        let idx = *self.arranged.get(position)?;
        Some(HandleId {
            idx,
            generation: self.generation[idx as usize],
        })
    }

    /// Iterates over the arranged handles, in order.
    pub fn arranged(&self) -> impl ExactSizeIterator<Item = HandleId> + '_ {
        self.arranged.iter().map(|&idx| HandleId {
            idx,
            generation: self.generation[idx as usize],
        })
    }

    /// Returns the raw slot indices of the arranged handles, in order.
    #[must_use]
    pub fn arranged_slots(&self) -> &[u32] {
        &self.arranged
    }

    // -- Raw slot accessors --
    //
    // These take a raw slot index (u32) rather than a HandleId, for use by
    // hosts processing `StackChanges`. No generation check is performed.

    /// Returns the view at raw slot `idx`, or `None` if the slot is free.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn handle_at(&self, idx: u32) -> Option<&dyn Renderable> {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.handles[idx as usize].as_deref()
    }

    /// Returns the hidden flag at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn hidden_at(&self, idx: u32) -> bool {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.hidden[idx as usize]
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    fn validate(&self, id: HandleId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale HandleId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::descriptor::tests::Label;

    fn label() -> Box<dyn Renderable> {
        Box::new(Label::default())
    }

    #[test]
    fn allocate_and_destroy() {
        let mut store = HandleStore::new();
        let id = store.allocate(label());
        assert!(store.is_alive(id));
        assert!(store.get(id).is_some());
        store.destroy(id);
        assert!(!store.is_alive(id));
        assert!(store.get(id).is_none());
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = HandleStore::new();
        let id1 = store.allocate(label());
        store.destroy(id1);
        let id2 = store.allocate(label());
        // id2 reuses the same slot but has a different generation.
        assert!(!store.is_alive(id1));
        assert!(store.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
        assert!(store.get_mut(id1).is_none());
    }

    #[test]
    #[should_panic(expected = "stale HandleId")]
    fn destroyed_handle_panics_on_set_hidden() {
        let mut store = HandleStore::new();
        let id = store.allocate(label());
        store.destroy(id);
        store.set_hidden(id, true);
    }

    #[test]
    #[should_panic(expected = "stale HandleId")]
    fn destroyed_handle_panics_on_arrange() {
        let mut store = HandleStore::new();
        let id = store.allocate(label());
        store.destroy(id);
        store.arrange(&[id]);
    }

    #[test]
    fn arrange_and_query() {
        let mut store = HandleStore::new();
        let a = store.allocate(label());
        let b = store.allocate(label());
        let c = store.allocate(label());

        store.arrange(&[c, a, b]);
        let order: Vec<_> = store.arranged().collect();
        assert_eq!(order, vec![c, a, b]);
        assert_eq!(store.arranged_at(1), Some(a));
        assert_eq!(store.arranged_at(3), None);
        assert_eq!(store.arranged_slots(), &[c.idx, a.idx, b.idx]);
    }

    #[test]
    fn destroy_removes_from_arrangement() {
        let mut store = HandleStore::new();
        let a = store.allocate(label());
        let b = store.allocate(label());
        store.arrange(&[a, b]);
        store.destroy(a);
        assert_eq!(store.arranged().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn hidden_flag_round_trips() {
        let mut store = HandleStore::new();
        let id = store.allocate(label());
        assert!(!store.is_hidden(id));
        store.set_hidden(id, true);
        assert!(store.is_hidden(id));
        assert!(store.hidden_at(id.idx));
    }
}
