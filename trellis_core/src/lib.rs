// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diff engine, stack reconciler and decorated vertical layout for
//! declarative list views.
//!
//! `trellis_core` lets host code describe *what should be on screen* as an
//! ordered list of lightweight descriptors and reconciles that description
//! against live view state. It is `no_std` compatible (with `alloc`) and
//! knows nothing about the rendering toolkit: views, animations and base
//! geometry are reached through small host traits.
//!
//! # Architecture
//!
//! ```text
//!   Descriptor tree ──► Vec<DescriptorItem>
//!                              │
//!                              ▼
//!   StackView::reconcile() ──► diff() ──► EditScript
//!                              │
//!                              ▼
//!   HandleStore::evaluate() ──► StackChanges ──► StackHost::apply()
//!
//!   CollectionData ──► VerticalLayout::prepare() ──► LayoutAttributes
//!                              │
//!                              ▼
//!                      DecorationTracker (inserted / deleted decorations)
//! ```
//!
//! **[`diff`]** — Set reconciliation producing inserted / deleted / reloaded /
//! moved index sets from two ordered lists of identified items.
//!
//! **[`descriptor`]** — Type-erased descriptor items, composite descriptors
//! (conditional inclusion, grouping with identifier disambiguation) and the
//! [`DescriptorList`](descriptor::DescriptorList) builder.
//!
//! **[`stack`]** — Generational handle arena and the linear stack reconciler
//! that applies edit scripts under an animated transaction.
//!
//! **[`collection`]** — Two-level section/cell model with coordinate
//! assignment, section builders and decoration blocks.
//!
//! **[`layout`]** — Vertical layout that offsets base flow geometry around
//! decoration blocks, caches attributes, and tracks decoration changes across
//! incremental updates.
//!
//! **[`host`]** — The [`StackHost`](host::StackHost) trait that platform
//! integrations implement, plus transaction and style configuration.
//!
//! **[`dirty`]** — Dirty-tracking channels used by the handle arena.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! reconciliation and layout instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-item
//!   change events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod collection;
pub mod descriptor;
pub mod diff;
pub mod dirty;
pub mod host;
pub mod layout;
pub mod stack;
pub mod trace;
