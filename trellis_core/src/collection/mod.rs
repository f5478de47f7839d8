// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Section and cell model for collection layouts.
//!
//! A [`CollectionData`] owns an ordered list of [`SectionDescriptor`]s, each
//! holding [`CellDescriptor`]s, supplementary views keyed by kind, vertical
//! spaces and [`DecorationBlock`]s. Sections are filled through
//! [`SectionDescriptor::reload`] with a [`SectionBuilder`]:
//!
//! ```
//! use trellis_core::collection::{spacing, CellDescriptor, CollectionData, DecorationKind};
//!
//! let mut data = CollectionData::new();
//! data.add_section().reload(|b| {
//!     b.add(CellDescriptor::new("Title"));
//!     b.add_vertical_space(spacing::MEDIUM);
//!     let card = b.start_decoration_block(DecorationKind::Bordered);
//!     b.add(CellDescriptor::new("Detail"));
//!     b.end_decoration_block(card);
//! });
//! data.compute_indices();
//! assert_eq!(data.sections[0].decoration_blocks().len(), 1);
//! ```
//!
//! Positions are [`Coordinate`]s, recomputed from scratch by
//! [`CollectionData::compute_indices`] rather than tracked incrementally.
//! [`CollectionData::update`] rewrites sections in a batch and reports the
//! inserted, deleted, reloaded and moved sections and cells as an
//! [`UpdateCollectionResult`].

mod cell;
mod coordinate;
mod data;
mod decoration;
mod section;
pub mod spacing;
mod update;

pub use cell::{CellDescriptor, LayoutFitting, SupplementaryDescriptor};
pub use coordinate::Coordinate;
pub use data::CollectionData;
pub use decoration::{DecorationBlock, DecorationKind, DecorationMetrics};
pub use section::{BlockToken, SectionBuilder, SectionDescriptor};
pub use update::{CollectionUpdater, UpdateCollectionResult};
