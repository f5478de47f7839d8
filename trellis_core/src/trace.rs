// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for reconciliation and layout.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! stack reconciler and the vertical layout call at each stage. All method
//! bodies default to no-ops, so implementing only the events you care about is
//! fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! Events carry no clock. Reconcile events are keyed by transaction id and
//! layout events by pass number; sinks that need wall time read their own.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates [`ItemChange`] events plus the
//!   corresponding `TraceSink` method.

#[cfg(feature = "trace-rich")]
use alloc::vec::Vec;

use crate::collection::DecorationKind;
use crate::diff::EditScript;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Diffing the previous and new descriptor lists.
    Diff,
    /// Applying the edit script to live handles.
    Apply,
    /// Computing layout attributes.
    Prepare,
    /// Destroying handles after an animated transaction.
    Complete,
}

impl PhaseKind {
    /// Short lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Diff => "diff",
            Self::Apply => "apply",
            Self::Prepare => "prepare",
            Self::Complete => "complete",
        }
    }
}

/// How an item changed in a reconcile pass.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemChangeKind {
    /// Created at a new-list index.
    Inserted,
    /// Removed from an old-list index.
    Deleted,
    /// Updated in place at a new-list index.
    Reloaded,
    /// Left the stable order; reported at its new-list index.
    Moved,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Marks the beginning of a phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Transaction id or layout pass number.
    pub sequence: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
}

/// Marks the end of a phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Transaction id or layout pass number.
    pub sequence: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
}

/// Emitted once per reconcile pass, after diffing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconcileEvent {
    /// Transaction opened by this pass.
    pub transaction: u64,
    /// Number of items before the pass.
    pub before: u32,
    /// Number of items after the pass.
    pub after: u32,
    /// Number of inserted items.
    pub inserted: u32,
    /// Number of deleted items.
    pub deleted: u32,
    /// Number of reloaded items.
    pub reloaded: u32,
    /// Number of moved items.
    pub moved: u32,
}

impl ReconcileEvent {
    /// Summarizes `script` for the given transaction.
    #[must_use]
    pub fn new(transaction: u64, before: usize, after: usize, script: &EditScript<usize>) -> Self {
        Self {
            transaction,
            before: saturating_count(before),
            after: saturating_count(after),
            inserted: saturating_count(script.inserted.len()),
            deleted: saturating_count(script.deleted.len()),
            reloaded: saturating_count(script.reloaded.len()),
            moved: saturating_count(script.moved.len()),
        }
    }
}

/// Emitted when an animated transaction completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransactionEvent {
    /// Transaction id.
    pub transaction: u64,
    /// Whether the animation ran to completion.
    pub finished: bool,
    /// Number of handles destroyed.
    pub removed: u32,
}

/// Emitted at the end of a layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutPassEvent {
    /// Layout pass number.
    pub pass: u64,
    /// Number of cached cell attributes.
    pub cells: u32,
    /// Number of decoration attributes.
    pub decorations: u32,
    /// Vertical offset added around decoration blocks and spaces.
    pub total_offset: f64,
    /// Resulting content height.
    pub content_height: f64,
}

/// Emitted per decoration kind when incremental updates are prepared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecorationUpdateEvent {
    /// Layout pass number.
    pub pass: u64,
    /// Decoration kind.
    pub kind: DecorationKind,
    /// Number of decorations to insert.
    pub inserted: u32,
    /// Number of decorations to delete.
    pub deleted: u32,
}

/// A per-item change record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemChange {
    /// List index of the item (old list for deletions, new list otherwise).
    pub index: u32,
    /// What happened to it.
    pub kind: ItemChangeKind,
}

#[cfg(feature = "trace-rich")]
impl ItemChange {
    /// Expands `script` into per-item records.
    #[must_use]
    pub fn from_script(script: &EditScript<usize>) -> Vec<Self> {
        let record = |index: usize, kind| Self {
            index: saturating_count(index),
            kind,
        };
        let mut changes = Vec::with_capacity(script.len());
        changes.extend(
            script
                .deleted
                .iter()
                .map(|&i| record(i, ItemChangeKind::Deleted)),
        );
        changes.extend(
            script
                .inserted
                .iter()
                .map(|&i| record(i, ItemChangeKind::Inserted)),
        );
        changes.extend(
            script
                .moved
                .iter()
                .map(|&(_, to)| record(to, ItemChangeKind::Moved)),
        );
        changes.extend(
            script
                .reloaded
                .iter()
                .map(|&i| record(i, ItemChangeKind::Reloaded)),
        );
        changes
    }
}

pub(crate) fn saturating_count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from reconciliation and layout.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called at the beginning of a phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called once per reconcile pass.
    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        _ = e;
    }

    /// Called when a transaction completes.
    fn on_transaction(&mut self, e: &TransactionEvent) {
        _ = e;
    }

    /// Called at the end of a layout pass.
    fn on_layout_pass(&mut self, e: &LayoutPassEvent) {
        _ = e;
    }

    /// Called per decoration kind when incremental updates are prepared.
    fn on_decoration_update(&mut self, e: &DecorationUpdateEvent) {
        _ = e;
    }

    /// Called with per-item changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_item_changes(&mut self, transaction: u64, changes: &[ItemChange]) {
        _ = (transaction, changes);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ReconcileEvent`].
    #[inline]
    pub fn reconcile(&mut self, e: &ReconcileEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_reconcile(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransactionEvent`].
    #[inline]
    pub fn transaction(&mut self, e: &TransactionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transaction(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LayoutPassEvent`].
    #[inline]
    pub fn layout_pass(&mut self, e: &LayoutPassEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layout_pass(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DecorationUpdateEvent`].
    #[inline]
    pub fn decoration_update(&mut self, e: &DecorationUpdateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_decoration_update(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits per-item changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn item_changes(&mut self, transaction: u64, changes: &[ItemChange]) {
        if let Some(s) = &mut self.sink {
            s.on_item_changes(transaction, changes);
        }
    }

    /// Brackets `f` with phase begin/end events.
    #[inline]
    pub fn phase<R>(&mut self, sequence: u64, phase: PhaseKind, f: impl FnOnce(&mut Self) -> R) -> R {
        self.phase_begin(&PhaseBeginEvent { sequence, phase });
        let result = f(self);
        self.phase_end(&PhaseEndEvent { sequence, phase });
        result
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
