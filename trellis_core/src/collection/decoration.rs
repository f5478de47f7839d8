// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoration blocks.

/// Kind of synthetic decoration drawn around a run of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DecorationKind {
    /// Bordered background spanning a run of cells, drawn behind them.
    Bordered,
    /// One-point separator line above a cell.
    Line,
}

impl DecorationKind {
    /// Every kind, in registration order.
    pub const ALL: [Self; 2] = [Self::Bordered, Self::Line];

    /// Padding and stacking of this kind.
    #[must_use]
    pub const fn metrics(self) -> DecorationMetrics {
        match self {
            Self::Bordered => DecorationMetrics {
                top_padding: 10.0,
                bottom_padding: 10.0,
                z_index: -1,
            },
            Self::Line => DecorationMetrics {
                top_padding: 0.0,
                bottom_padding: 0.0,
                z_index: 1,
            },
        }
    }

    /// Short lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bordered => "bordered",
            Self::Line => "line",
        }
    }
}

/// Extra vertical room a decoration takes around its cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecorationMetrics {
    /// Space inserted above the first cell.
    pub top_padding: f64,
    /// Space inserted below the last cell.
    pub bottom_padding: f64,
    /// Stacking order relative to cells (which sit at zero).
    pub z_index: i32,
}

/// A decoration spanning the cells `start_item..=end_item` of its section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecorationBlock {
    /// Decoration kind.
    pub kind: DecorationKind,
    /// First covered item.
    pub start_item: usize,
    /// Last covered item.
    pub end_item: usize,
}

impl DecorationBlock {
    /// Creates a block covering a single item.
    #[must_use]
    pub const fn at(kind: DecorationKind, item: usize) -> Self {
        Self {
            kind,
            start_item: item,
            end_item: item,
        }
    }
}
