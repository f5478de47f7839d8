// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell and supplementary view descriptors.

use alloc::string::String;

use kurbo::{Insets, Rect, Size};

use super::coordinate::Coordinate;
use crate::diff::Diffability;

/// How a cell's size is derived from the collection bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutFitting {
    /// Full available width; the height is a starting estimate.
    EstimatedHeight(f64),
    /// Full available width and a fixed height.
    FixedHeight(f64),
    /// Full available height; the width is a starting estimate.
    EstimatedWidth(f64),
    /// Full available height and a fixed width.
    FixedWidth(f64),
    /// Fixed width and height.
    Fixed(Size),
}

impl LayoutFitting {
    /// Whether the host must measure the cell to get its final size.
    #[must_use]
    pub const fn requires_self_sizing(self) -> bool {
        matches!(self, Self::EstimatedHeight(_) | Self::EstimatedWidth(_))
    }

    /// Size within `bounds` once `inset` is taken out.
    #[must_use]
    pub fn size(self, bounds: Rect, inset: Insets) -> Size {
        match self {
            Self::EstimatedHeight(height) | Self::FixedHeight(height) => {
                Size::new(bounds.width() - inset.x0 - inset.x1, height)
            }
            Self::EstimatedWidth(width) | Self::FixedWidth(width) => {
                Size::new(width, bounds.height() - inset.y0 - inset.y1)
            }
            Self::Fixed(size) => size,
        }
    }
}

/// Describes one cell of a section.
#[derive(Clone, Debug)]
pub struct CellDescriptor {
    identifier: String,
    class_name: String,
    selectable: bool,
    fitting: Option<LayoutFitting>,
    diffable: Diffability,
    pub(crate) coordinate: Option<Coordinate>,
}

impl CellDescriptor {
    /// Creates a cell rendered by `class_name`.
    ///
    /// The identifier defaults to the class name.
    pub fn new(class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        Self {
            identifier: class_name.clone(),
            class_name,
            selectable: true,
            fitting: None,
            diffable: Diffability::Opaque,
            coordinate: None,
        }
    }

    /// Replaces the identifier.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Sets whether the cell reacts to selection.
    #[must_use]
    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    /// Sets the sizing rule.
    #[must_use]
    pub fn with_fitting(mut self, fitting: LayoutFitting) -> Self {
        self.fitting = Some(fitting);
        self
    }

    /// Attaches a comparable payload.
    #[must_use]
    pub fn with_payload<T: PartialEq + 'static>(mut self, payload: T) -> Self {
        self.diffable = Diffability::token(payload);
        self
    }

    /// Identity used when diffing cells.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Name of the view class that renders the cell.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Whether the cell reacts to selection.
    #[must_use]
    pub fn selectable(&self) -> bool {
        self.selectable
    }

    /// Sizing rule, if any.
    #[must_use]
    pub fn fitting(&self) -> Option<LayoutFitting> {
        self.fitting
    }

    /// Payload used for reload decisions.
    #[must_use]
    pub fn diffable(&self) -> &Diffability {
        &self.diffable
    }

    /// Position assigned by the last
    /// [`compute_indices`](super::CollectionData::compute_indices).
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }

    /// Size of the cell in `bounds`; zero without a sizing rule.
    #[must_use]
    pub fn size(&self, bounds: Rect, inset: Insets) -> Size {
        self.fitting
            .map_or(Size::ZERO, |fitting| fitting.size(bounds, inset))
    }
}

/// Describes a supplementary view (header, footer, ...) of a section.
#[derive(Clone, Debug)]
pub struct SupplementaryDescriptor {
    identifier: String,
    class_name: String,
    pub(crate) coordinate: Option<Coordinate>,
}

impl SupplementaryDescriptor {
    /// Creates a supplementary view rendered by `class_name`.
    pub fn new(class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        Self {
            identifier: class_name.clone(),
            class_name,
            coordinate: None,
        }
    }

    /// Identity of the view.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Name of the view class that renders it.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Position assigned by the last index computation.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 320.0, 480.0);
    const INSET: Insets = Insets {
        x0: 15.0,
        y0: 4.0,
        x1: 15.0,
        y1: 6.0,
    };

    #[test]
    fn height_fittings_take_available_width() {
        let estimated = LayoutFitting::EstimatedHeight(44.0).size(BOUNDS, INSET);
        assert_eq!(estimated, Size::new(290.0, 44.0));
        let fixed = LayoutFitting::FixedHeight(10.0).size(BOUNDS, INSET);
        assert_eq!(fixed, Size::new(290.0, 10.0));
    }

    #[test]
    fn width_fittings_take_available_height() {
        let estimated = LayoutFitting::EstimatedWidth(100.0).size(BOUNDS, INSET);
        assert_eq!(estimated, Size::new(100.0, 470.0));
        let fixed = LayoutFitting::FixedWidth(50.0).size(BOUNDS, INSET);
        assert_eq!(fixed, Size::new(50.0, 470.0));
    }

    #[test]
    fn fixed_and_missing_fitting() {
        let cell = CellDescriptor::new("Badge").with_fitting(LayoutFitting::Fixed(Size::new(8.0, 8.0)));
        assert_eq!(cell.size(BOUNDS, INSET), Size::new(8.0, 8.0));
        assert_eq!(CellDescriptor::new("Empty").size(BOUNDS, INSET), Size::ZERO);
    }

    #[test]
    fn self_sizing_only_for_estimates() {
        assert!(LayoutFitting::EstimatedHeight(1.0).requires_self_sizing());
        assert!(LayoutFitting::EstimatedWidth(1.0).requires_self_sizing());
        assert!(!LayoutFitting::FixedHeight(1.0).requires_self_sizing());
        assert!(!LayoutFitting::Fixed(Size::ZERO).requires_self_sizing());
    }

    #[test]
    fn identifier_defaults_to_class_name() {
        let cell = CellDescriptor::new("TitleCell");
        assert_eq!(cell.identifier(), "TitleCell");
        assert_eq!(cell.with_identifier("title").identifier(), "title");
        assert!(CellDescriptor::new("x").coordinate().is_none());
    }
}
