// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-level positions.

use core::fmt;

/// Position of an element in a [`CollectionData`](super::CollectionData).
///
/// Ordered section-major: every item of section `n` sorts before any item of
/// section `n + 1`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    /// Section index.
    pub section: usize,
    /// Item index within the section.
    pub item: usize,
}

impl Coordinate {
    /// Creates a coordinate.
    #[inline]
    #[must_use]
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.section, self.item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_section_major() {
        assert!(Coordinate::new(0, 9) < Coordinate::new(1, 0));
        assert!(Coordinate::new(1, 0) < Coordinate::new(1, 1));
    }
}
