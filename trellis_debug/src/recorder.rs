// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records: a one-byte tag followed by the event
//! fields. [`decode`] reads them back as an iterator of [`RecordedEvent`].
//!
//! Item change lists ([`on_item_changes`](TraceSink::on_item_changes)) are
//! stored as a count followed by one `(index, kind)` pair per change.

use trellis_core::collection::DecorationKind;
use trellis_core::trace::{
    DecorationUpdateEvent, ItemChange, ItemChangeKind, LayoutPassEvent, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, ReconcileEvent, TraceSink, TransactionEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_PHASE_BEGIN: u8 = 1;
const TAG_PHASE_END: u8 = 2;
const TAG_RECONCILE: u8 = 3;
const TAG_TRANSACTION: u8 = 4;
const TAG_LAYOUT_PASS: u8 = 5;
const TAG_DECORATION_UPDATE: u8 = 6;
const TAG_ITEM_CHANGES: u8 = 7;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::Diff => 0,
            PhaseKind::Apply => 1,
            PhaseKind::Prepare => 2,
            PhaseKind::Complete => 3,
        });
    }

    fn write_decoration(&mut self, kind: DecorationKind) {
        self.write_u8(match kind {
            DecorationKind::Bordered => 0,
            DecorationKind::Line => 1,
        });
    }

    fn write_change(&mut self, kind: ItemChangeKind) {
        self.write_u8(match kind {
            ItemChangeKind::Inserted => 0,
            ItemChangeKind::Deleted => 1,
            ItemChangeKind::Reloaded => 2,
            ItemChangeKind::Moved => 3,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.write_u8(TAG_PHASE_BEGIN);
        self.write_u64(e.sequence);
        self.write_phase(e.phase);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.write_u8(TAG_PHASE_END);
        self.write_u64(e.sequence);
        self.write_phase(e.phase);
    }

    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        self.write_u8(TAG_RECONCILE);
        self.write_u64(e.transaction);
        self.write_u32(e.before);
        self.write_u32(e.after);
        self.write_u32(e.inserted);
        self.write_u32(e.deleted);
        self.write_u32(e.reloaded);
        self.write_u32(e.moved);
    }

    fn on_transaction(&mut self, e: &TransactionEvent) {
        self.write_u8(TAG_TRANSACTION);
        self.write_u64(e.transaction);
        self.write_u8(u8::from(e.finished));
        self.write_u32(e.removed);
    }

    fn on_layout_pass(&mut self, e: &LayoutPassEvent) {
        self.write_u8(TAG_LAYOUT_PASS);
        self.write_u64(e.pass);
        self.write_u32(e.cells);
        self.write_u32(e.decorations);
        self.write_f64(e.total_offset);
        self.write_f64(e.content_height);
    }

    fn on_decoration_update(&mut self, e: &DecorationUpdateEvent) {
        self.write_u8(TAG_DECORATION_UPDATE);
        self.write_u64(e.pass);
        self.write_decoration(e.kind);
        self.write_u32(e.inserted);
        self.write_u32(e.deleted);
    }

    fn on_item_changes(&mut self, transaction: u64, changes: &[ItemChange]) {
        let count = u32::try_from(changes.len()).unwrap_or(u32::MAX);
        self.write_u8(TAG_ITEM_CHANGES);
        self.write_u64(transaction);
        self.write_u32(count);
        for change in changes.iter().take(count as usize) {
            self.write_u32(change.index);
            self.write_change(change.kind);
        }
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`ReconcileEvent`].
    Reconcile(ReconcileEvent),
    /// A [`TransactionEvent`].
    Transaction(TransactionEvent),
    /// A [`LayoutPassEvent`].
    LayoutPass(LayoutPassEvent),
    /// A [`DecorationUpdateEvent`].
    DecorationUpdate(DecorationUpdateEvent),
    /// Per-item changes of a reconcile pass.
    ItemChanges {
        /// Transaction id.
        transaction: u64,
        /// The changes, in recorded order.
        changes: Vec<ItemChange>,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first unknown tag or truncated record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(f64::from_le_bytes)
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        Some(match self.read_u8()? {
            0 => PhaseKind::Diff,
            1 => PhaseKind::Apply,
            2 => PhaseKind::Prepare,
            _ => PhaseKind::Complete,
        })
    }

    fn read_decoration(&mut self) -> Option<DecorationKind> {
        Some(match self.read_u8()? {
            0 => DecorationKind::Bordered,
            _ => DecorationKind::Line,
        })
    }

    fn read_change(&mut self) -> Option<ItemChangeKind> {
        Some(match self.read_u8()? {
            0 => ItemChangeKind::Inserted,
            1 => ItemChangeKind::Deleted,
            2 => ItemChangeKind::Reloaded,
            _ => ItemChangeKind::Moved,
        })
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            sequence: self.read_u64()?,
            phase: self.read_phase()?,
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            sequence: self.read_u64()?,
            phase: self.read_phase()?,
        }))
    }

    fn decode_reconcile(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Reconcile(ReconcileEvent {
            transaction: self.read_u64()?,
            before: self.read_u32()?,
            after: self.read_u32()?,
            inserted: self.read_u32()?,
            deleted: self.read_u32()?,
            reloaded: self.read_u32()?,
            moved: self.read_u32()?,
        }))
    }

    fn decode_transaction(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Transaction(TransactionEvent {
            transaction: self.read_u64()?,
            finished: self.read_u8()? != 0,
            removed: self.read_u32()?,
        }))
    }

    fn decode_layout_pass(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::LayoutPass(LayoutPassEvent {
            pass: self.read_u64()?,
            cells: self.read_u32()?,
            decorations: self.read_u32()?,
            total_offset: self.read_f64()?,
            content_height: self.read_f64()?,
        }))
    }

    fn decode_decoration_update(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::DecorationUpdate(DecorationUpdateEvent {
            pass: self.read_u64()?,
            kind: self.read_decoration()?,
            inserted: self.read_u32()?,
            deleted: self.read_u32()?,
        }))
    }

    fn decode_item_changes(&mut self) -> Option<RecordedEvent> {
        let transaction = self.read_u64()?;
        let count = self.read_u32()?;
        let mut changes = Vec::new();
        for _ in 0..count {
            changes.push(ItemChange {
                index: self.read_u32()?,
                kind: self.read_change()?,
            });
        }
        Some(RecordedEvent::ItemChanges {
            transaction,
            changes,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_RECONCILE => self.decode_reconcile(),
            TAG_TRANSACTION => self.decode_transaction(),
            TAG_LAYOUT_PASS => self.decode_layout_pass(),
            TAG_DECORATION_UPDATE => self.decode_decoration_update(),
            TAG_ITEM_CHANGES => self.decode_item_changes(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
