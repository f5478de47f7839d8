// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drives a stack and a decorated collection layout through a few updates
//! while recording trace events.
//!
//! Events go to both a
//! [`PrettyPrintSink`](trellis_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](trellis_debug::recorder::RecorderSink); the recording is
//! then exported as a Chrome trace JSON file.

use std::any::Any;
use std::fs::File;
use std::io::BufWriter;

use kurbo::Rect;
use trellis_core::collection::{
    CellDescriptor, CollectionData, DecorationKind, LayoutFitting, spacing,
};
use trellis_core::descriptor::{Adaptable, DescriptorItem, DescriptorList, Renderable};
use trellis_core::host::{Animation, StackHost, StackStyle, TransactionId};
use trellis_core::layout::{StackedFlow, UpdateItem, VerticalLayout};
use trellis_core::stack::{HandleStore, StackChanges, StackView};
use trellis_core::trace::{
    DecorationUpdateEvent, ItemChange, LayoutPassEvent, PhaseBeginEvent, PhaseEndEvent,
    ReconcileEvent, TraceSink, Tracer, TransactionEvent,
};

use trellis_debug::pretty::PrettyPrintSink;
use trellis_debug::recorder::RecorderSink;

// ---------------------------------------------------------------------------
// A text row and a host that prints what it is asked to do
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Row {
    text: String,
}

impl Renderable for Row {}

impl Adaptable for Row {
    type Adapter = String;

    fn create() -> Self {
        Self::default()
    }

    fn update(&mut self, adapter: &String) {
        self.text.clone_from(adapter);
    }
}

fn row(id: &str, text: &str) -> DescriptorItem {
    DescriptorItem::describe::<Row>(text.to_owned()).with_identifier(id)
}

#[derive(Debug, Default)]
struct ConsoleHost;

impl StackHost for ConsoleHost {
    fn configure(&mut self, style: &StackStyle) {
        println!("  host: spacing={} decorated={}", style.spacing, style.decorated);
    }

    fn apply(&mut self, store: &HandleStore, changes: &StackChanges) {
        if changes.is_empty() {
            return;
        }
        let texts: Vec<&str> = store
            .arranged()
            .filter_map(|id| {
                let handle: &dyn Any = store.get(id)?;
                handle.downcast_ref::<Row>().map(|r| r.text.as_str())
            })
            .collect();
        println!(
            "  host: +{} -{} show={} hide={} updated={} repositioned={} -> {texts:?}",
            changes.added.len(),
            changes.removed.len(),
            changes.shown.len(),
            changes.hidden.len(),
            changes.updated.len(),
            changes.repositioned.len(),
        );
    }

    fn begin_transaction(&mut self, id: TransactionId, animation: Animation) {
        println!("  host: begin {id:?} ({}s)", animation.duration_secs);
    }

    fn commit_transaction(&mut self, id: TransactionId) {
        println!("  host: commit {id:?}");
    }
}

// ---------------------------------------------------------------------------
// Fan-out sink
// ---------------------------------------------------------------------------

struct Tee {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for Tee {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.pretty.on_phase_begin(e);
        self.recorder.on_phase_begin(e);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.pretty.on_phase_end(e);
        self.recorder.on_phase_end(e);
    }

    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        self.pretty.on_reconcile(e);
        self.recorder.on_reconcile(e);
    }

    fn on_transaction(&mut self, e: &TransactionEvent) {
        self.pretty.on_transaction(e);
        self.recorder.on_transaction(e);
    }

    fn on_layout_pass(&mut self, e: &LayoutPassEvent) {
        self.pretty.on_layout_pass(e);
        self.recorder.on_layout_pass(e);
    }

    fn on_decoration_update(&mut self, e: &DecorationUpdateEvent) {
        self.pretty.on_decoration_update(e);
        self.recorder.on_decoration_update(e);
    }

    fn on_item_changes(&mut self, transaction: u64, changes: &[ItemChange]) {
        self.pretty.on_item_changes(transaction, changes);
        self.recorder.on_item_changes(transaction, changes);
    }
}

fn main() {
    let mut sink = Tee {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())),
        recorder: RecorderSink::new(),
    };

    // -- stack -------------------------------------------------------------
    println!("== stack");
    let mut stack = StackView::with_style(ConsoleHost, StackStyle::decorated(16.0, 8.0));

    let steps: [&[(&str, &str)]; 4] = [
        &[("title", "Trips"), ("paris", "Paris"), ("lyon", "Lyon")],
        &[("title", "Trips"), ("lyon", "Lyon"), ("paris", "Paris")],
        &[("title", "Trips (2)"), ("lyon", "Lyon"), ("nice", "Nice")],
        &[("nice", "Nice")],
    ];
    for (step, rows) in steps.iter().enumerate() {
        println!("-- step {step}");
        let mut list = DescriptorList::new();
        for &(id, text) in *rows {
            list.add(row(id, text));
        }
        let mut tracer = Tracer::new(&mut sink);
        match stack.reconcile_traced(list.finish(), &mut tracer) {
            Ok(id) => {
                // The host's animation completion callback.
                stack.complete_transaction_traced(id, true, &mut tracer);
            }
            Err(err) => println!("  reconcile refused: {err}"),
        }
    }
    println!("children: {:?}", stack.identifiers().collect::<Vec<_>>());

    // -- collection layout -------------------------------------------------
    println!("== layout");
    let bounds = Rect::new(0.0, 0.0, 375.0, 812.0);
    let mut data = CollectionData::new();
    data.reload_data(|data| fill(data, false));

    let mut flow = StackedFlow::new(bounds);
    flow.prepare(&data);
    let mut layout = VerticalLayout::new();
    layout.prepare_traced(&mut data, &flow, &mut Tracer::new(&mut sink));

    let result = data.update(|updater| updater.diff(|data| fill(data, true)));
    println!(
        "update: +{:?} -{:?} ~{:?}",
        result.inserted_items, result.deleted_items, result.reloaded_items
    );
    flow.prepare(&data);
    let mut tracer = Tracer::new(&mut sink);
    layout.prepare_traced(&mut data, &flow, &mut tracer);
    layout.prepare_for_updates_traced(&UpdateItem::from_result(&result), &mut tracer);
    drop(tracer);
    for kind in DecorationKind::ALL {
        println!(
            "{}: insert {:?} delete {:?}",
            kind.as_str(),
            layout.inserted_decorations(kind),
            layout.deleted_decorations(kind),
        );
    }
    println!("content size: {:?}", layout.content_size());

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    trellis_debug::chrome::export(sink.recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path}");
}

fn fill(data: &mut CollectionData, with_subtitle: bool) {
    let text = |name: &str| {
        CellDescriptor::new("Text")
            .with_identifier(name)
            .with_payload(name.to_owned())
            .with_fitting(LayoutFitting::FixedHeight(44.0))
    };
    data.add_section().set_identifier("trip").reload(|b| {
        b.add(text("Title"));
        if with_subtitle {
            b.add_horizontal_line();
            b.add(text("Subtitle"));
        }
        b.add_vertical_space(spacing::MEDIUM);
        let card = b.start_decoration_block(DecorationKind::Bordered);
        b.add(text("Departure")).add(text("Arrival"));
        b.end_decoration_block(card);
    });
}
