// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handle identity.

use core::fmt;

/// A handle to a live view in a [`HandleStore`](super::HandleStore).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after the view is destroyed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId {
    /// Slot index into the store's arrays.
    pub(crate) idx: u32,
    /// Generation counter, must match the store's generation for this slot.
    pub(crate) generation: u32,
}

impl HandleId {
    /// Returns the raw slot index.
    ///
    /// Hosts use this to correlate [`StackChanges`](super::StackChanges)
    /// entries with their own native objects.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandleId({}@gen{})", self.idx, self.generation)
    }
}
