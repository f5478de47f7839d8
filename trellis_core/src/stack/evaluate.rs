// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change evaluation.
//!
//! Evaluation drains each dirty channel once:
//!
//! 1. **VISIBILITY**: compare the hidden flag with the last presented value
//!    and record a transition only if they differ.
//! 2. **CONTENT**: collect handles that received a new payload.
//! 3. **TOPOLOGY**: collect arranged handles that changed position, leaving
//!    out handles added in the same evaluation.
//!
//! [`StackChanges`] uses raw slot indices (`u32`) rather than
//! [`HandleId`](super::HandleId) handles so that hosts can index directly into
//! the store via the `*_at()` accessors (e.g.
//! [`handle_at`](super::HandleStore::handle_at)).

use alloc::vec::Vec;

use super::store::HandleStore;
use crate::dirty;

/// The set of changes produced by a single [`HandleStore::evaluate`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StackChanges {
    /// Handles allocated since the last evaluate.
    pub added: Vec<u32>,
    /// Handles destroyed since the last evaluate.
    pub removed: Vec<u32>,
    /// Handles that transitioned from hidden to visible.
    pub shown: Vec<u32>,
    /// Handles that transitioned from visible to hidden.
    pub hidden: Vec<u32>,
    /// Handles that received a new payload.
    pub updated: Vec<u32>,
    /// Arranged handles that sit at a different position than at the last
    /// evaluate. Newly added handles are reported in `added` only.
    pub repositioned: Vec<u32>,
    /// Whether the arrangement changed.
    pub order_changed: bool,
}

impl StackChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.added.clear();
        self.removed.clear();
        self.shown.clear();
        self.hidden.clear();
        self.updated.clear();
        self.repositioned.clear();
        self.order_changed = false;
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.shown.is_empty()
            && self.hidden.is_empty()
            && self.updated.is_empty()
            && self.repositioned.is_empty()
            && !self.order_changed
    }
}

impl HandleStore {
    /// Drains all dirty channels and returns the set of changes.
    pub fn evaluate(&mut self) -> StackChanges {
        let mut changes = StackChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut StackChanges) {
        changes.clear();

        changes.order_changed = core::mem::take(&mut self.arrangement_dirty);

        // Drain VISIBILITY, keeping only real transitions.
        let dirty_visibility: Vec<u32> = self
            .dirty
            .drain(dirty::VISIBILITY)
            .deterministic()
            .run()
            .collect();
        for idx in dirty_visibility {
            let hidden = self.hidden[idx as usize];
            if hidden != self.presented_hidden[idx as usize] {
                if hidden {
                    changes.hidden.push(idx);
                } else {
                    changes.shown.push(idx);
                }
                self.presented_hidden[idx as usize] = hidden;
            }
        }

        changes.updated = self
            .dirty
            .drain(dirty::CONTENT)
            .deterministic()
            .run()
            .collect();

        let added = &self.pending_added;
        changes.repositioned = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .filter(|idx| !added.contains(idx))
            .collect();

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use super::*;
    use crate::descriptor::tests::Label;

    #[test]
    fn added_and_removed_lifecycle() {
        let mut store = HandleStore::new();
        let id = store.allocate(Box::new(Label::default()));
        let changes = store.evaluate();
        assert_eq!(changes.added, [id.index()]);
        assert!(changes.removed.is_empty());

        store.destroy(id);
        let changes = store.evaluate();
        assert!(changes.added.is_empty());
        assert_eq!(changes.removed, [id.index()]);
    }

    #[test]
    fn no_change_evaluate_returns_empty() {
        let mut store = HandleStore::new();
        let _id = store.allocate(Box::new(Label::default()));
        let _ = store.evaluate();
        assert!(store.evaluate().is_empty());
    }

    #[test]
    fn visibility_reports_transitions_only() {
        let mut store = HandleStore::new();
        let id = store.allocate(Box::new(Label::default()));
        let _ = store.evaluate();

        store.set_hidden(id, true);
        let changes = store.evaluate();
        assert_eq!(changes.hidden, [id.index()]);
        assert!(changes.shown.is_empty());

        // Hidden and shown again before evaluation: no net transition.
        store.set_hidden(id, false);
        store.set_hidden(id, true);
        assert!(store.evaluate().is_empty());

        store.set_hidden(id, false);
        assert_eq!(store.evaluate().shown, [id.index()]);
    }

    #[test]
    fn hidden_before_first_evaluate_is_reported() {
        let mut store = HandleStore::new();
        let id = store.allocate(Box::new(Label::default()));
        store.set_hidden(id, true);
        let changes = store.evaluate();
        assert_eq!(changes.added, [id.index()]);
        assert_eq!(changes.hidden, [id.index()]);
    }

    #[test]
    fn content_updates_are_collected() {
        let mut store = HandleStore::new();
        let a = store.allocate(Box::new(Label::default()));
        let b = store.allocate(Box::new(Label::default()));
        let _ = store.evaluate();

        store.mark_updated(b);
        store.mark_updated(a);
        store.mark_updated(b);
        let mut updated = store.evaluate().updated;
        updated.sort_unstable();
        assert_eq!(updated, [a.index(), b.index()]);
    }

    #[test]
    fn arrangement_flag_is_reported_once() {
        let mut store = HandleStore::new();
        let a = store.allocate(Box::new(Label::default()));
        let b = store.allocate(Box::new(Label::default()));
        store.arrange(&[a, b]);
        assert!(store.evaluate().order_changed);
        store.arrange(&[a, b]);
        assert!(!store.evaluate().order_changed, "same order is not a change");
        store.arrange(&[b, a]);
        assert!(store.evaluate().order_changed);
    }

    #[test]
    fn repositioned_lists_moved_handles_only() {
        let mut store = HandleStore::new();
        let a = store.allocate(Box::new(Label::default()));
        let b = store.allocate(Box::new(Label::default()));
        let c = store.allocate(Box::new(Label::default()));
        store.arrange(&[a, b, c]);
        let changes = store.evaluate();
        assert!(changes.repositioned.is_empty(), "new handles are only added");

        store.arrange(&[a, c, b]);
        let mut repositioned = store.evaluate().repositioned;
        repositioned.sort_unstable();
        assert_eq!(repositioned, [b.index(), c.index()]);

        store.destroy(b);
        let changes = store.evaluate();
        assert_eq!(changes.removed, [b.index()]);
        assert!(changes.repositioned.is_empty());
    }

    #[test]
    fn evaluate_into_reuses_buffer() {
        let mut store = HandleStore::new();
        let id = store.allocate(Box::new(Label::default()));
        let mut changes = StackChanges::default();
        store.evaluate_into(&mut changes);
        assert_eq!(changes.added.len(), 1);

        store.mark_updated(id);
        store.evaluate_into(&mut changes);
        assert!(changes.added.is_empty());
        assert_eq!(changes.updated, [id.index()]);
    }
}
