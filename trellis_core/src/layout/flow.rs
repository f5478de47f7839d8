// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Base flow geometry.

use alloc::collections::BTreeMap;

use kurbo::{Rect, Size};

use crate::collection::{CollectionData, Coordinate};

/// Undecorated geometry the vertical layout offsets.
///
/// Platform integrations usually wrap the toolkit's own flow layout.
/// [`StackedFlow`] is a self-contained implementation.
pub trait FlowLayout {
    /// Bounds of the container.
    fn bounds(&self) -> Rect;

    /// Base frame of the cell at `coordinate`, if it is laid out.
    fn item_frame(&self, coordinate: Coordinate) -> Option<Rect>;

    /// Size of the undecorated content.
    fn content_size(&self) -> Size;
}

/// Stacks cells vertically, one per row, at their
/// [`CellDescriptor::size`](crate::collection::CellDescriptor::size).
///
/// Cells are placed at the section's left inset, separated by the section's
/// line spacing. Sections follow each other with no gap.
#[derive(Clone, Debug)]
pub struct StackedFlow {
    bounds: Rect,
    frames: BTreeMap<Coordinate, Rect>,
    content_size: Size,
}

impl StackedFlow {
    /// Creates an empty flow for a container of the given bounds.
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            frames: BTreeMap::new(),
            content_size: Size::new(bounds.width(), 0.0),
        }
    }

    /// Changes the container bounds. Takes effect at the next
    /// [`prepare`](Self::prepare).
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Recomputes every frame from `data`.
    pub fn prepare(&mut self, data: &CollectionData) {
        self.frames.clear();
        let mut y = 0.0;
        for (section, descriptor) in data.sections.iter().enumerate() {
            let inset = descriptor.section_inset();
            for (item, cell) in descriptor.cells().iter().enumerate() {
                if item > 0 {
                    y += descriptor.line_spacing();
                }
                let size = cell.size(self.bounds, inset);
                let frame = Rect::from_origin_size((inset.x0, y), size);
                self.frames.insert(Coordinate::new(section, item), frame);
                y += size.height;
            }
        }
        self.content_size = Size::new(self.bounds.width(), y);
    }

    /// Number of laid out cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if no cell is laid out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FlowLayout for StackedFlow {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn item_frame(&self, coordinate: Coordinate) -> Option<Rect> {
        self.frames.get(&coordinate).copied()
    }

    fn content_size(&self) -> Size {
        self.content_size
    }
}
