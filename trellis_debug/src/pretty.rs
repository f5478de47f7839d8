// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use trellis_core::trace::{
    DecorationUpdateEvent, ItemChange, ItemChangeKind, LayoutPassEvent, PhaseBeginEvent,
    PhaseEndEvent, ReconcileEvent, TraceSink, TransactionEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn change_symbol(kind: ItemChangeKind) -> char {
    match kind {
        ItemChangeKind::Inserted => '+',
        ItemChangeKind::Deleted => '-',
        ItemChangeKind::Reloaded => '~',
        ItemChangeKind::Moved => '>',
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] seq={} {}",
            e.sequence,
            e.phase.as_str(),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] seq={} {}",
            e.sequence,
            e.phase.as_str(),
        );
    }

    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        let _ = writeln!(
            self.writer,
            "[reconcile] tx={} items={}->{} +{} -{} ~{} >{}",
            e.transaction, e.before, e.after, e.inserted, e.deleted, e.reloaded, e.moved,
        );
    }

    fn on_transaction(&mut self, e: &TransactionEvent) {
        let finished = if e.finished { "finished" } else { "interrupted" };
        let _ = writeln!(
            self.writer,
            "[transaction] tx={} {finished} removed={}",
            e.transaction, e.removed,
        );
    }

    fn on_layout_pass(&mut self, e: &LayoutPassEvent) {
        let _ = writeln!(
            self.writer,
            "[layout] pass={} cells={} decorations={} offset={:.1} height={:.1}",
            e.pass, e.cells, e.decorations, e.total_offset, e.content_height,
        );
    }

    fn on_decoration_update(&mut self, e: &DecorationUpdateEvent) {
        let _ = writeln!(
            self.writer,
            "[decorations] pass={} {} +{} -{}",
            e.pass,
            e.kind.as_str(),
            e.inserted,
            e.deleted,
        );
    }

    fn on_item_changes(&mut self, transaction: u64, changes: &[ItemChange]) {
        let summary: String = changes
            .iter()
            .map(|c| format!(" {}{}", change_symbol(c.kind), c.index))
            .collect();
        let _ = writeln!(self.writer, "[items] tx={transaction}{summary}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::collection::DecorationKind;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn pretty_print_reconcile() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_reconcile(&ReconcileEvent {
            transaction: 3,
            before: 2,
            after: 3,
            inserted: 1,
            deleted: 0,
            reloaded: 1,
            moved: 0,
        });
        let output = output(sink);
        assert!(output.contains("[reconcile]"), "got: {output}");
        assert!(output.contains("tx=3 items=2->3 +1 -0 ~1 >0"), "got: {output}");
    }

    #[test]
    fn pretty_print_decorations_and_items() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_decoration_update(&DecorationUpdateEvent {
            pass: 4,
            kind: DecorationKind::Line,
            inserted: 2,
            deleted: 1,
        });
        sink.on_item_changes(
            9,
            &[
                ItemChange {
                    index: 0,
                    kind: ItemChangeKind::Deleted,
                },
                ItemChange {
                    index: 2,
                    kind: ItemChangeKind::Inserted,
                },
            ],
        );
        let output = output(sink);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines, ["[decorations] pass=4 line +2 -1", "[items] tx=9 -0 +2"]);
    }
}
