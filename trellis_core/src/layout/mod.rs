// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decorated vertical layout.
//!
//! [`VerticalLayout`] takes undecorated cell geometry from a [`FlowLayout`],
//! pushes cells down around the decoration blocks and vertical spaces of a
//! [`CollectionData`](crate::collection::CollectionData), and computes one
//! [`LayoutAttributes`] per decoration block. Results are cached by
//! coordinate until the next pass.
//!
//! For animated batch updates, [`VerticalLayout::prepare_for_updates`] maps
//! the previous pass's decoration anchors through the batch's
//! [`UpdateItem`]s and reports which decorations to insert or delete, per
//! kind, through the [`DecorationTracker`].
//!
//! ```
//! use kurbo::Rect;
//! use trellis_core::collection::{CellDescriptor, CollectionData, Coordinate, DecorationKind, LayoutFitting};
//! use trellis_core::layout::{StackedFlow, VerticalLayout};
//!
//! let mut data = CollectionData::new();
//! data.add_section().reload(|b| {
//!     let card = b.start_decoration_block(DecorationKind::Bordered);
//!     b.add(CellDescriptor::new("Row").with_fitting(LayoutFitting::FixedHeight(44.0)));
//!     b.end_decoration_block(card);
//! });
//!
//! let mut flow = StackedFlow::new(Rect::new(0.0, 0.0, 320.0, 480.0));
//! flow.prepare(&data);
//! let mut layout = VerticalLayout::new();
//! layout.prepare(&mut data, &flow);
//!
//! let row = layout.attributes_for_item(Coordinate::new(0, 0)).unwrap();
//! assert_eq!(row.frame.y0, 10.0);
//! assert_eq!(layout.content_size().height, 64.0);
//! ```

mod attributes;
mod decoration;
mod flow;
mod update;
mod vertical;

pub use attributes::{ElementCategory, LayoutAttributes};
pub use decoration::DecorationTracker;
pub use flow::{FlowLayout, StackedFlow};
pub use update::{CoordinateMap, UpdateItem};
pub use vertical::{LayoutPhase, VerticalLayout, VerticalLayoutConfig};
