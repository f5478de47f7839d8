// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Computed geometry for one element.

use kurbo::Rect;

use crate::collection::{Coordinate, DecorationKind};

/// What kind of element a [`LayoutAttributes`] positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementCategory {
    /// A cell.
    Cell,
    /// A synthetic decoration of the given kind.
    Decoration(DecorationKind),
}

/// Frame and stacking order of a cell or decoration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutAttributes {
    /// Cell coordinate, or the first covered cell for a decoration.
    pub coordinate: Coordinate,
    /// Element kind.
    pub category: ElementCategory,
    /// Frame in content coordinates.
    pub frame: Rect,
    /// Stacking order; cells sit at zero.
    pub z_index: i32,
}

impl LayoutAttributes {
    /// Attributes of a cell.
    #[must_use]
    pub const fn cell(coordinate: Coordinate, frame: Rect) -> Self {
        Self {
            coordinate,
            category: ElementCategory::Cell,
            frame,
            z_index: 0,
        }
    }

    /// Attributes of a decoration, stacked with the kind's z-index.
    #[must_use]
    pub const fn decoration(kind: DecorationKind, coordinate: Coordinate, frame: Rect) -> Self {
        Self {
            coordinate,
            category: ElementCategory::Decoration(kind),
            frame,
            z_index: kind.metrics().z_index,
        }
    }

    /// Decoration kind, if this positions a decoration.
    #[must_use]
    pub const fn decoration_kind(&self) -> Option<DecorationKind> {
        match self.category {
            ElementCategory::Cell => None,
            ElementCategory::Decoration(kind) => Some(kind),
        }
    }

    /// Whether the frame shares a non-empty area with `rect`.
    #[must_use]
    pub fn intersects(&self, rect: Rect) -> bool {
        overlaps(self.frame, rect)
    }
}

/// Strict overlap: rectangles that only touch along an edge do not overlap.
pub(crate) fn overlaps(a: Rect, b: Rect) -> bool {
    let (a, b) = (a.abs(), b.abs());
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(overlaps(a, Rect::new(5.0, 5.0, 15.0, 15.0)));
        assert!(!overlaps(a, Rect::new(10.0, 0.0, 20.0, 10.0)));
        assert!(!overlaps(a, Rect::new(0.0, 10.0, 10.0, 20.0)));
        assert!(overlaps(a, Rect::new(2.0, 2.0, 3.0, 3.0)));
    }

    #[test]
    fn decoration_takes_kind_z_index() {
        let coord = Coordinate::new(0, 1);
        let frame = Rect::new(0.0, 0.0, 1.0, 1.0);
        let bordered = LayoutAttributes::decoration(DecorationKind::Bordered, coord, frame);
        assert_eq!(bordered.z_index, -1);
        assert_eq!(bordered.decoration_kind(), Some(DecorationKind::Bordered));
        let line = LayoutAttributes::decoration(DecorationKind::Line, coord, frame);
        assert_eq!(line.z_index, 1);
        assert_eq!(LayoutAttributes::cell(coord, frame).decoration_kind(), None);
    }
}
