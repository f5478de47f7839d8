// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertical layout with decoration blocks.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::{Rect, Size, Vec2};

use super::attributes::{LayoutAttributes, overlaps};
use super::decoration::DecorationTracker;
use super::flow::FlowLayout;
use super::update::UpdateItem;
use crate::collection::{CollectionData, Coordinate, DecorationBlock, DecorationKind};
use crate::trace::{DecorationUpdateEvent, LayoutPassEvent, PhaseKind, Tracer, saturating_count};

/// Configuration for [`VerticalLayout`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VerticalLayoutConfig {
    /// Distance between the container edges and decoration frames.
    pub decoration_inset_x: f64,
}

impl VerticalLayoutConfig {
    /// Decorations 10 points in from both container edges.
    pub const DEFAULT: Self = Self {
        decoration_inset_x: 10.0,
    };
}

impl Default for VerticalLayoutConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Where a [`VerticalLayout`] is in its pass cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LayoutPhase {
    /// No valid pass; call [`VerticalLayout::prepare`].
    #[default]
    Idle,
    /// A pass is running.
    Preparing,
    /// Attributes are cached and queries are valid.
    Prepared,
}

/// Offsets base flow geometry around decoration blocks and caches the result.
///
/// Each [`prepare`](Self::prepare) walks every cell in coordinate order. The
/// first cell of a decoration block is pushed down by the block's top
/// padding, and the cells after the last one by its bottom padding. Vertical
/// spaces registered in the section builder accumulate the same way. Every
/// offset carries over to all following cells, across sections.
///
/// Queries read the cache of the last pass.
#[derive(Clone, Debug)]
pub struct VerticalLayout {
    config: VerticalLayoutConfig,
    phase: LayoutPhase,
    cells: BTreeMap<Coordinate, LayoutAttributes>,
    decorations: DecorationTracker,
    total_offset: f64,
    content_size: Size,
    pass: u64,
}

impl Default for VerticalLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl VerticalLayout {
    /// Creates a layout with the default configuration and every decoration
    /// kind registered.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(VerticalLayoutConfig::DEFAULT)
    }

    /// Creates a layout with the given configuration.
    #[must_use]
    pub fn with_config(config: VerticalLayoutConfig) -> Self {
        let mut decorations = DecorationTracker::new();
        for kind in DecorationKind::ALL {
            decorations.register(kind);
        }
        Self {
            config,
            phase: LayoutPhase::Idle,
            cells: BTreeMap::new(),
            decorations,
            total_offset: 0.0,
            content_size: Size::ZERO,
            pass: 0,
        }
    }

    /// Layout configuration.
    #[must_use]
    pub fn config(&self) -> VerticalLayoutConfig {
        self.config
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> LayoutPhase {
        self.phase
    }

    /// Number of completed passes.
    #[must_use]
    pub fn pass(&self) -> u64 {
        self.pass
    }

    /// Marks the cached attributes as outdated.
    pub fn invalidate(&mut self) {
        self.phase = LayoutPhase::Idle;
    }

    /// Runs a layout pass over `data`, which gets fresh coordinates.
    pub fn prepare(&mut self, data: &mut CollectionData, flow: &dyn FlowLayout) {
        self.prepare_traced(data, flow, &mut Tracer::none());
    }

    /// Like [`prepare`](Self::prepare), emitting a
    /// [`LayoutPassEvent`] bracketed by `Prepare` phase events.
    pub fn prepare_traced(
        &mut self,
        data: &mut CollectionData,
        flow: &dyn FlowLayout,
        tracer: &mut Tracer<'_>,
    ) {
        self.phase = LayoutPhase::Preparing;
        self.pass += 1;
        let pass = self.pass;
        tracer.phase(pass, PhaseKind::Prepare, |tracer| {
            self.run_pass(data, flow);
            tracer.layout_pass(&LayoutPassEvent {
                pass,
                cells: saturating_count(self.cells.len()),
                decorations: saturating_count(self.decorations.len()),
                total_offset: self.total_offset,
                content_height: self.content_size.height,
            });
        });
        self.phase = LayoutPhase::Prepared;
    }

    fn run_pass(&mut self, data: &mut CollectionData, flow: &dyn FlowLayout) {
        data.compute_indices();
        self.decorations.prepare();
        self.total_offset = 0.0;
        self.cells.clear();

        let blocks: Vec<(usize, DecorationBlock)> = data
            .sections
            .iter()
            .enumerate()
            .flat_map(|(section, s)| s.decoration_blocks().iter().map(move |&b| (section, b)))
            .collect();

        // ----- cells
        for (section, descriptor) in data.sections.iter().enumerate() {
            for cell in descriptor.cells() {
                let Some(coordinate) = cell.coordinate() else {
                    continue;
                };
                let Some(base) = flow.item_frame(coordinate) else {
                    continue;
                };
                if coordinate.item == 0 {
                    self.total_offset += descriptor.leading_space();
                }
                self.total_offset += blocks
                    .iter()
                    .filter(|(s, b)| *s == section && b.start_item == coordinate.item)
                    .map(|(_, b)| b.kind.metrics().top_padding)
                    .sum::<f64>();

                let frame = base + Vec2::new(0.0, self.total_offset);
                self.cells
                    .insert(coordinate, LayoutAttributes::cell(coordinate, frame));

                self.total_offset += blocks
                    .iter()
                    .filter(|(s, b)| *s == section && b.end_item == coordinate.item)
                    .map(|(_, b)| b.kind.metrics().bottom_padding)
                    .sum::<f64>();
                if let Some(space) = descriptor.vertical_space_after(coordinate.item) {
                    self.total_offset += space;
                }
            }
        }

        // ----- decorations
        let bounds = flow.bounds();
        let x0 = self.config.decoration_inset_x;
        let x1 = bounds.width() - self.config.decoration_inset_x;
        for (section, block) in blocks {
            let first = Coordinate::new(section, block.start_item);
            let last = Coordinate::new(section, block.end_item);
            let (Some(first_cell), Some(last_cell)) = (self.cells.get(&first), self.cells.get(&last))
            else {
                continue;
            };
            let metrics = block.kind.metrics();
            let y0 = first_cell.frame.y0 - metrics.top_padding;
            let y1 = match block.kind {
                DecorationKind::Bordered => last_cell.frame.y1 + metrics.bottom_padding,
                DecorationKind::Line => y0 + 1.0,
            };
            self.decorations.add(LayoutAttributes::decoration(
                block.kind,
                first,
                Rect::new(x0, y0, x1, y1),
            ));
        }

        let base = flow.content_size();
        self.content_size = Size::new(base.width, base.height + self.total_offset);
    }

    /// Cached attributes of the cell at `coordinate`.
    #[must_use]
    pub fn attributes_for_item(&self, coordinate: Coordinate) -> Option<&LayoutAttributes> {
        self.cells.get(&coordinate)
    }

    /// Cached attributes of the `kind` decoration anchored at `coordinate`.
    #[must_use]
    pub fn attributes_for_decoration(
        &self,
        kind: DecorationKind,
        coordinate: Coordinate,
    ) -> Option<&LayoutAttributes> {
        self.decorations.attributes(kind, coordinate)
    }

    /// Cells, then decorations, whose frames overlap `rect`.
    #[must_use]
    pub fn attributes_in_rect(&self, rect: Rect) -> Vec<LayoutAttributes> {
        self.cells
            .values()
            .filter(|attributes| overlaps(attributes.frame, rect))
            .chain(self.decorations.attributes_in(rect))
            .copied()
            .collect()
    }

    /// Content size: the flow's content grown by [`total_offset`](Self::total_offset).
    #[must_use]
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Vertical offset accumulated over the last pass.
    #[must_use]
    pub fn total_offset(&self) -> f64 {
        self.total_offset
    }

    /// The decoration tracker.
    #[must_use]
    pub fn decorations(&self) -> &DecorationTracker {
        &self.decorations
    }

    /// Computes decoration insertions and deletions for a batch update.
    ///
    /// Call after the [`prepare`](Self::prepare) that reflects the new state.
    pub fn prepare_for_updates(&mut self, updates: &[UpdateItem]) {
        self.prepare_for_updates_traced(updates, &mut Tracer::none());
    }

    /// Like [`prepare_for_updates`](Self::prepare_for_updates), emitting one
    /// [`DecorationUpdateEvent`] per registered kind.
    pub fn prepare_for_updates_traced(&mut self, updates: &[UpdateItem], tracer: &mut Tracer<'_>) {
        self.decorations.prepare_for_updates(updates);
        for kind in self.decorations.kinds() {
            tracer.decoration_update(&DecorationUpdateEvent {
                pass: self.pass,
                kind,
                inserted: saturating_count(self.decorations.inserted(kind).len()),
                deleted: saturating_count(self.decorations.deleted(kind).len()),
            });
        }
    }

    /// New-state anchors of the `kind` decorations to animate in.
    #[must_use]
    pub fn inserted_decorations(&self, kind: DecorationKind) -> &[Coordinate] {
        self.decorations.inserted(kind)
    }

    /// Old-state anchors of the `kind` decorations to animate out.
    #[must_use]
    pub fn deleted_decorations(&self, kind: DecorationKind) -> &[Coordinate] {
        self.decorations.deleted(kind)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::collection::{CellDescriptor, LayoutFitting, spacing};
    use crate::layout::StackedFlow;

    const ROW: f64 = 50.0;
    const WIDTH: f64 = 320.0;

    /// Every cell is a full-width row of height `ROW`, rows following each
    /// other across sections.
    struct GridFlow {
        rows: Vec<Coordinate>,
    }

    impl GridFlow {
        fn new(data: &CollectionData) -> Self {
            Self {
                rows: data.cells().map(|(c, _)| c).collect(),
            }
        }
    }

    impl FlowLayout for GridFlow {
        fn bounds(&self) -> Rect {
            Rect::new(0.0, 0.0, WIDTH, 480.0)
        }

        fn item_frame(&self, coordinate: Coordinate) -> Option<Rect> {
            let row = self.rows.iter().position(|&c| c == coordinate)?;
            let y = row as f64 * ROW;
            Some(Rect::new(0.0, y, WIDTH, y + ROW))
        }

        fn content_size(&self) -> Size {
            Size::new(WIDTH, self.rows.len() as f64 * ROW)
        }
    }

    fn cell(name: &str) -> CellDescriptor {
        CellDescriptor::new(name)
    }

    fn frame(layout: &VerticalLayout, section: usize, item: usize) -> Rect {
        layout
            .attributes_for_item(Coordinate::new(section, item))
            .map(|a| a.frame)
            .unwrap_or_default()
    }

    fn bordered_over_middle() -> CollectionData {
        let mut data = CollectionData::new();
        data.add_section().reload(|b| {
            b.add(cell("c0"));
            let block = b.start_decoration_block(DecorationKind::Bordered);
            b.add(cell("c1")).add(cell("c2")).add(cell("c3"));
            b.end_decoration_block(block);
            b.add(cell("c4"));
        });
        data
    }

    #[test]
    fn bordered_block_wraps_its_cells() {
        let mut data = bordered_over_middle();
        let flow = GridFlow::new(&data);
        let mut layout = VerticalLayout::new();
        layout.prepare(&mut data, &flow);

        assert_eq!(layout.phase(), LayoutPhase::Prepared);
        assert_eq!(frame(&layout, 0, 0), Rect::new(0.0, 0.0, WIDTH, 50.0));
        assert_eq!(frame(&layout, 0, 1), Rect::new(0.0, 60.0, WIDTH, 110.0));
        assert_eq!(frame(&layout, 0, 3), Rect::new(0.0, 160.0, WIDTH, 210.0));
        assert_eq!(frame(&layout, 0, 4), Rect::new(0.0, 220.0, WIDTH, 270.0));

        let decoration = layout
            .attributes_for_decoration(DecorationKind::Bordered, Coordinate::new(0, 1))
            .copied();
        let decoration = decoration.map(|d| (d.frame, d.z_index));
        assert_eq!(
            decoration,
            Some((Rect::new(10.0, 50.0, WIDTH - 10.0, 220.0), -1)),
            "top is cell 1 minus padding, bottom is cell 3 plus padding"
        );
        assert!((layout.total_offset() - 20.0).abs() < 1e-12);
        assert_eq!(layout.content_size(), Size::new(WIDTH, 270.0));
    }

    #[test]
    fn line_decoration_is_one_point_at_cell_top() {
        let mut data = CollectionData::new();
        data.add_section().reload(|b| {
            b.add(cell("a"));
            b.add_horizontal_line();
            b.add(cell("b"));
        });
        let flow = GridFlow::new(&data);
        let mut layout = VerticalLayout::new();
        layout.prepare(&mut data, &flow);

        let line = layout
            .attributes_for_decoration(DecorationKind::Line, Coordinate::new(0, 1))
            .map(|d| (d.frame, d.z_index));
        assert_eq!(line, Some((Rect::new(10.0, 50.0, WIDTH - 10.0, 51.0), 1)));
        assert!(layout.total_offset().abs() < 1e-12);
    }

    #[test]
    fn offsets_never_decrease_and_carry_across_sections() {
        let mut data = CollectionData::new();
        data.add_section().reload(|b| {
            b.add_vertical_space(spacing::SMALL);
            b.add(cell("a"));
            b.add_vertical_space(spacing::BIG);
            let block = b.start_decoration_block(DecorationKind::Bordered);
            b.add(cell("b"));
            b.end_decoration_block(block);
        });
        data.add_section().reload(|b| {
            b.add(cell("c"));
            b.add_vertical_space(spacing::MEDIUM);
            b.add(cell("d"));
        });
        let flow = GridFlow::new(&data);
        let mut layout = VerticalLayout::new();
        layout.prepare(&mut data, &flow);

        let offsets: Vec<f64> = data
            .cells()
            .filter_map(|(c, _)| {
                let laid = layout.attributes_for_item(c)?.frame.y0;
                let base = flow.item_frame(c)?.y0;
                Some(laid - base)
            })
            .collect();
        assert_eq!(offsets, vec![5.0, 35.0, 45.0, 55.0]);
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn cells_without_base_frame_are_skipped() {
        struct Sparse;
        impl FlowLayout for Sparse {
            fn bounds(&self) -> Rect {
                Rect::new(0.0, 0.0, 100.0, 100.0)
            }
            fn item_frame(&self, coordinate: Coordinate) -> Option<Rect> {
                (coordinate.item == 0).then(|| Rect::new(0.0, 0.0, 100.0, 10.0))
            }
            fn content_size(&self) -> Size {
                Size::new(100.0, 10.0)
            }
        }

        let mut data = CollectionData::new();
        data.add_section().reload(|b| {
            b.add(cell("a"));
            let block = b.start_decoration_block(DecorationKind::Bordered);
            b.add(cell("b"));
            b.end_decoration_block(block);
        });
        let mut layout = VerticalLayout::new();
        layout.prepare(&mut data, &Sparse);

        assert!(layout.attributes_for_item(Coordinate::new(0, 0)).is_some());
        assert!(layout.attributes_for_item(Coordinate::new(0, 1)).is_none());
        assert!(layout.decorations().is_empty());
    }

    #[test]
    fn rect_query_returns_cells_then_decorations() {
        let mut data = bordered_over_middle();
        let flow = GridFlow::new(&data);
        let mut layout = VerticalLayout::new();
        layout.prepare(&mut data, &flow);

        let hits = layout.attributes_in_rect(Rect::new(0.0, 0.0, WIDTH, 55.0));
        let coords: Vec<_> = hits.iter().map(|a| (a.coordinate, a.decoration_kind())).collect();
        assert_eq!(
            coords,
            [
                (Coordinate::new(0, 0), None),
                (Coordinate::new(0, 1), Some(DecorationKind::Bordered)),
            ]
        );
        assert!(layout.attributes_in_rect(Rect::new(0.0, 300.0, WIDTH, 400.0)).is_empty());
    }

    #[test]
    fn reload_reports_decoration_changes() {
        let mut data = bordered_over_middle();
        let flow = GridFlow::new(&data);
        let mut layout = VerticalLayout::new();
        layout.prepare(&mut data, &flow);

        // Insert a row in front; the block shifts by one and a line appears.
        data.sections[0].reload(|b| {
            b.add(cell("new"));
            b.add_horizontal_line();
            b.add(cell("c0"));
            let block = b.start_decoration_block(DecorationKind::Bordered);
            b.add(cell("c1")).add(cell("c2")).add(cell("c3"));
            b.end_decoration_block(block);
            b.add(cell("c4"));
        });
        let flow = GridFlow::new(&data);
        layout.invalidate();
        assert_eq!(layout.phase(), LayoutPhase::Idle);
        layout.prepare(&mut data, &flow);
        layout.prepare_for_updates(&[UpdateItem::InsertItem(Coordinate::new(0, 0))]);

        assert!(layout.inserted_decorations(DecorationKind::Bordered).is_empty());
        assert!(layout.deleted_decorations(DecorationKind::Bordered).is_empty());
        assert_eq!(
            layout.inserted_decorations(DecorationKind::Line),
            [Coordinate::new(0, 1)]
        );
        assert!(layout.deleted_decorations(DecorationKind::Line).is_empty());
        assert_eq!(layout.pass(), 2);
    }

    #[test]
    fn collection_update_drives_decoration_changes() {
        let mut data = bordered_over_middle();
        let mut layout = VerticalLayout::new();
        layout.prepare(&mut data, &GridFlow::new(&data));

        let result = data.update(|updater| {
            updater.diff_section(0, |b| {
                b.add(cell("new"));
                b.add_horizontal_line();
                b.add(cell("c0"));
                let block = b.start_decoration_block(DecorationKind::Bordered);
                b.add(cell("c1")).add(cell("c2")).add(cell("c3"));
                b.end_decoration_block(block);
                b.add(cell("c4"));
            });
        });
        assert_eq!(result.inserted_items.len(), 1);
        layout.prepare(&mut data, &GridFlow::new(&data));
        layout.prepare_for_updates(&UpdateItem::from_result(&result));
        assert!(layout.inserted_decorations(DecorationKind::Bordered).is_empty());
        assert!(layout.deleted_decorations(DecorationKind::Bordered).is_empty());
        assert_eq!(
            layout.inserted_decorations(DecorationKind::Line),
            [Coordinate::new(0, 1)]
        );

        // Dropping the block's cells drops both decorations.
        let result = data.update(|updater| {
            updater.diff_section(0, |b| {
                b.add(cell("new")).add(cell("c0")).add(cell("c4"));
            });
        });
        assert_eq!(result.deleted_items.len(), 3);
        layout.prepare(&mut data, &GridFlow::new(&data));
        layout.prepare_for_updates(&UpdateItem::from_result(&result));
        assert_eq!(
            layout.deleted_decorations(DecorationKind::Bordered),
            [Coordinate::new(0, 2)]
        );
        assert_eq!(
            layout.deleted_decorations(DecorationKind::Line),
            [Coordinate::new(0, 1)]
        );
        assert!(layout.inserted_decorations(DecorationKind::Line).is_empty());
        assert!(layout.decorations().is_empty());
    }

    #[test]
    fn works_with_stacked_flow() {
        let mut data = CollectionData::new();
        data.add_section().reload(|b| {
            let block = b.start_decoration_block(DecorationKind::Bordered);
            b.add(cell("a").with_fitting(LayoutFitting::FixedHeight(40.0)));
            b.end_decoration_block(block);
        });
        let mut flow = StackedFlow::new(Rect::new(0.0, 0.0, 200.0, 400.0));
        flow.prepare(&data);
        let mut layout = VerticalLayout::new();
        layout.prepare(&mut data, &flow);

        assert_eq!(frame(&layout, 0, 0), Rect::new(15.0, 10.0, 185.0, 50.0));
        assert_eq!(layout.content_size(), Size::new(200.0, 60.0));
    }

    #[cfg(feature = "trace")]
    #[test]
    fn traced_pass_reports_counts() {
        use crate::trace::{LayoutPassEvent, PhaseBeginEvent, PhaseEndEvent, TraceSink};

        #[derive(Default)]
        struct Sink {
            passes: Vec<LayoutPassEvent>,
            phases: u32,
            updates: Vec<DecorationUpdateEvent>,
        }
        impl TraceSink for Sink {
            fn on_phase_begin(&mut self, _: &PhaseBeginEvent) {
                self.phases += 1;
            }
            fn on_phase_end(&mut self, _: &PhaseEndEvent) {
                self.phases += 1;
            }
            fn on_layout_pass(&mut self, e: &LayoutPassEvent) {
                self.passes.push(*e);
            }
            fn on_decoration_update(&mut self, e: &DecorationUpdateEvent) {
                self.updates.push(*e);
            }
        }

        let mut data = bordered_over_middle();
        let flow = GridFlow::new(&data);
        let mut layout = VerticalLayout::new();
        let mut sink = Sink::default();
        let mut tracer = Tracer::new(&mut sink);
        layout.prepare_traced(&mut data, &flow, &mut tracer);
        layout.prepare_for_updates_traced(&[], &mut tracer);
        drop(tracer);

        assert_eq!(sink.phases, 2);
        assert_eq!(sink.passes.len(), 1);
        assert_eq!(sink.passes[0].cells, 5);
        assert_eq!(sink.passes[0].decorations, 1);
        assert_eq!(sink.updates.len(), DecorationKind::ALL.len());
        assert_eq!(sink.updates[0].kind, DecorationKind::Bordered);
        assert_eq!(sink.updates[0].inserted, 1);
    }
}
