// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use trellis_core::trace::PhaseKind;

use crate::recorder::{RecordedEvent, decode};

/// Thread lane for reconciler events.
const STACK_TID: u32 = 0;
/// Thread lane for layout events.
const LAYOUT_TID: u32 = 1;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Recorded events carry no clock, so each event's timestamp is its position
/// in the recording, in microseconds. Spans therefore show ordering and
/// nesting, not duration.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for (ts, recorded) in decode(bytes).enumerate() {
        match recorded {
            RecordedEvent::PhaseBegin(e) => {
                events.push(json!({
                    "ph": "B",
                    "name": e.phase.as_str(),
                    "cat": "Phase",
                    "ts": ts,
                    "pid": 0,
                    "tid": phase_tid(e.phase),
                    "args": {
                        "sequence": e.sequence,
                    }
                }));
            }
            RecordedEvent::PhaseEnd(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": e.phase.as_str(),
                    "cat": "Phase",
                    "ts": ts,
                    "pid": 0,
                    "tid": phase_tid(e.phase),
                    "args": {
                        "sequence": e.sequence,
                    }
                }));
            }
            RecordedEvent::Reconcile(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Reconcile",
                    "cat": "Stack",
                    "ts": ts,
                    "pid": 0,
                    "tid": STACK_TID,
                    "s": "t",
                    "args": {
                        "transaction": e.transaction,
                        "before": e.before,
                        "after": e.after,
                        "inserted": e.inserted,
                        "deleted": e.deleted,
                        "reloaded": e.reloaded,
                        "moved": e.moved,
                    }
                }));
            }
            RecordedEvent::Transaction(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Transaction",
                    "cat": "Stack",
                    "ts": ts,
                    "pid": 0,
                    "tid": STACK_TID,
                    "s": "t",
                    "args": {
                        "transaction": e.transaction,
                        "finished": e.finished,
                        "removed": e.removed,
                    }
                }));
            }
            RecordedEvent::LayoutPass(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "LayoutPass",
                    "cat": "Layout",
                    "ts": ts,
                    "pid": 0,
                    "tid": LAYOUT_TID,
                    "s": "t",
                    "args": {
                        "pass": e.pass,
                        "cells": e.cells,
                        "decorations": e.decorations,
                        "total_offset": e.total_offset,
                        "content_height": e.content_height,
                    }
                }));
            }
            RecordedEvent::DecorationUpdate(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "DecorationUpdate",
                    "cat": "Layout",
                    "ts": ts,
                    "pid": 0,
                    "tid": LAYOUT_TID,
                    "s": "t",
                    "args": {
                        "pass": e.pass,
                        "kind": e.kind.as_str(),
                        "inserted": e.inserted,
                        "deleted": e.deleted,
                    }
                }));
            }
            RecordedEvent::ItemChanges {
                transaction,
                changes,
            } => {
                events.push(json!({
                    "ph": "i",
                    "name": "ItemChanges",
                    "cat": "Rich",
                    "ts": ts,
                    "pid": 0,
                    "tid": STACK_TID,
                    "s": "t",
                    "args": {
                        "transaction": transaction,
                        "count": changes.len(),
                        "changes": changes
                            .iter()
                            .map(|c| format!("{:?}@{}", c.kind, c.index))
                            .collect::<Vec<_>>(),
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn phase_tid(phase: PhaseKind) -> u32 {
    match phase {
        PhaseKind::Prepare => LAYOUT_TID,
        PhaseKind::Diff | PhaseKind::Apply | PhaseKind::Complete => STACK_TID,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use trellis_core::trace::{
        ItemChange, ItemChangeKind, LayoutPassEvent, PhaseBeginEvent, PhaseEndEvent,
        ReconcileEvent, TraceSink,
    };

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_phase_begin(&PhaseBeginEvent {
            sequence: 1,
            phase: PhaseKind::Diff,
        });
        rec.on_reconcile(&ReconcileEvent {
            transaction: 1,
            before: 0,
            after: 2,
            inserted: 2,
            deleted: 0,
            reloaded: 0,
            moved: 0,
        });
        rec.on_phase_end(&PhaseEndEvent {
            sequence: 1,
            phase: PhaseKind::Diff,
        });
        rec.on_layout_pass(&LayoutPassEvent {
            pass: 1,
            cells: 2,
            decorations: 0,
            total_offset: 0.0,
            content_height: 88.0,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 4);

        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["name"], "diff");
        assert_eq!(parsed[0]["ts"], 0);

        assert_eq!(parsed[1]["ph"], "i");
        assert_eq!(parsed[1]["name"], "Reconcile");
        assert_eq!(parsed[1]["args"]["inserted"], 2);

        assert_eq!(parsed[2]["ph"], "E");
        assert_eq!(parsed[2]["ts"], 2);

        assert_eq!(parsed[3]["tid"], LAYOUT_TID);
        assert_eq!(parsed[3]["args"]["content_height"], 88.0);
    }

    #[test]
    fn export_item_changes() {
        let mut rec = RecorderSink::new();
        rec.on_item_changes(
            3,
            &[ItemChange {
                index: 1,
                kind: ItemChangeKind::Inserted,
            }],
        );
        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["args"]["count"], 1);
        assert_eq!(parsed[0]["args"]["changes"][0], "Inserted@1");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
