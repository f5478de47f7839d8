// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Section descriptors and their builder.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Insets;

use super::cell::{CellDescriptor, SupplementaryDescriptor};
use super::decoration::{DecorationBlock, DecorationKind};
use super::spacing;

/// Describes one section: its cells, supplementary views, vertical spaces and
/// decoration blocks.
///
/// The section index is recomputed by
/// [`CollectionData::compute_indices`](super::CollectionData::compute_indices)
/// and is never used as identity.
#[derive(Clone, Debug)]
pub struct SectionDescriptor {
    pub(crate) index: Option<usize>,
    identifier: Option<String>,
    pub(crate) cells: Vec<CellDescriptor>,
    pub(crate) supplementary_views: BTreeMap<String, Vec<SupplementaryDescriptor>>,
    leading_space: f64,
    vertical_spaces: BTreeMap<usize, f64>,
    decoration_blocks: Vec<DecorationBlock>,
    line_spacing: f64,
    horizontal_inset: f64,
}

impl Default for SectionDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionDescriptor {
    /// Creates an empty section with the default inset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            index: None,
            identifier: None,
            cells: Vec::new(),
            supplementary_views: BTreeMap::new(),
            leading_space: spacing::ZERO,
            vertical_spaces: BTreeMap::new(),
            decoration_blocks: Vec::new(),
            line_spacing: spacing::ZERO,
            horizontal_inset: spacing::SECTION_INSET,
        }
    }

    /// Index assigned by the last index computation.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Identity used when diffing sections. Sections without one match by
    /// position.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Sets the identity used when diffing sections.
    pub fn set_identifier(&mut self, identifier: impl Into<String>) -> &mut Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// The cells, in order.
    #[must_use]
    pub fn cells(&self) -> &[CellDescriptor] {
        &self.cells
    }

    /// Supplementary views, by kind.
    #[must_use]
    pub fn supplementary_views(&self) -> &BTreeMap<String, Vec<SupplementaryDescriptor>> {
        &self.supplementary_views
    }

    /// Appends a supplementary view of the given kind.
    pub fn add_supplementary_view(
        &mut self,
        kind: impl Into<String>,
        view: SupplementaryDescriptor,
    ) -> &mut Self {
        self.supplementary_views
            .entry(kind.into())
            .or_default()
            .push(view);
        self
    }

    /// Decoration blocks built by the last [`reload`](Self::reload).
    #[must_use]
    pub fn decoration_blocks(&self) -> &[DecorationBlock] {
        &self.decoration_blocks
    }

    /// Space inserted before the first cell.
    #[must_use]
    pub fn leading_space(&self) -> f64 {
        self.leading_space
    }

    /// Space inserted after the cell at `item`, if any.
    #[must_use]
    pub fn vertical_space_after(&self, item: usize) -> Option<f64> {
        self.vertical_spaces.get(&item).copied()
    }

    /// Spacing between consecutive cells.
    #[must_use]
    pub fn line_spacing(&self) -> f64 {
        self.line_spacing
    }

    /// Sets the spacing between consecutive cells.
    pub fn set_line_spacing(&mut self, value: f64) -> &mut Self {
        self.line_spacing = value;
        self
    }

    /// Left and right inset.
    #[must_use]
    pub fn horizontal_inset(&self) -> f64 {
        self.horizontal_inset
    }

    /// Sets the left and right inset.
    pub fn set_horizontal_inset(&mut self, value: f64) -> &mut Self {
        self.horizontal_inset = value;
        self
    }

    /// Insets applied to the cells of this section.
    #[must_use]
    pub fn section_inset(&self) -> Insets {
        Insets::new(self.horizontal_inset, 0.0, self.horizontal_inset, 0.0)
    }

    /// Replaces the content of the section with what `build` adds.
    ///
    /// Decoration blocks that were started but never ended are dropped.
    pub fn reload(&mut self, build: impl FnOnce(&mut SectionBuilder)) -> &mut Self {
        let mut builder = SectionBuilder::new();
        build(&mut builder);
        self.cells = builder.cells;
        self.leading_space = builder.leading_space;
        self.vertical_spaces = builder.vertical_spaces;
        self.decoration_blocks = builder.decoration_blocks;
        self
    }
}

/// Handle to a decoration block started with
/// [`SectionBuilder::start_decoration_block`].
#[must_use = "pass the token to `end_decoration_block`"]
#[derive(Debug, PartialEq, Eq)]
pub struct BlockToken(u32);

/// Collects the content of a section during [`SectionDescriptor::reload`].
#[derive(Debug, Default)]
pub struct SectionBuilder {
    cells: Vec<CellDescriptor>,
    leading_space: f64,
    vertical_spaces: BTreeMap<usize, f64>,
    decoration_blocks: Vec<DecorationBlock>,
    open_blocks: Vec<(u32, DecorationBlock)>,
    next_token: u32,
}

impl SectionBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a cell.
    pub fn add(&mut self, cell: CellDescriptor) -> &mut Self {
        self.cells.push(cell);
        self
    }

    /// Adds space after the last added cell.
    ///
    /// Before any cell, the space goes before the first cell. Adding space
    /// twice at the same place keeps the last value.
    pub fn add_vertical_space(&mut self, space: f64) -> &mut Self {
        match self.cells.len().checked_sub(1) {
            Some(last) => {
                self.vertical_spaces.insert(last, space);
            }
            None => self.leading_space = space,
        }
        self
    }

    /// Starts a decoration block at the next added cell.
    pub fn start_decoration_block(&mut self, kind: DecorationKind) -> BlockToken {
        let token = self.next_token;
        self.next_token += 1;
        self.open_blocks
            .push((token, DecorationBlock::at(kind, self.cells.len())));
        BlockToken(token)
    }

    /// Ends a decoration block at the last added cell.
    ///
    /// # Panics
    ///
    /// Panics if the section has no cell, if no cell was added since the
    /// block started, or if the token was not issued by this builder.
    pub fn end_decoration_block(&mut self, token: BlockToken) {
        let Some(position) = self.open_blocks.iter().position(|(t, _)| *t == token.0) else {
            panic!("decoration block was not started by this builder");
        };
        let (_, mut block) = self.open_blocks.remove(position);
        let Some(last) = self.cells.len().checked_sub(1) else {
            panic!("cannot end a decoration block in a section without cells");
        };
        assert!(
            block.start_item <= last,
            "add a cell after start_decoration_block and before end_decoration_block"
        );
        block.end_item = last;
        self.decoration_blocks.push(block);
    }

    /// Adds a separator line above the next added cell.
    pub fn add_horizontal_line(&mut self) -> &mut Self {
        self.decoration_blocks
            .push(DecorationBlock::at(DecorationKind::Line, self.cells.len()));
        self
    }

    /// Number of cells added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if no cell was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(name: &str) -> CellDescriptor {
        CellDescriptor::new(name)
    }

    #[test]
    fn vertical_spaces_key_on_last_cell() {
        let mut section = SectionDescriptor::new();
        section.reload(|b| {
            b.add_vertical_space(spacing::SMALL);
            b.add(cell("title"));
            b.add_vertical_space(spacing::MEDIUM);
            b.add(cell("body"));
            b.add_vertical_space(spacing::BIG);
            b.add_vertical_space(spacing::HUGE);
        });
        assert!((section.leading_space() - spacing::SMALL).abs() < 1e-12);
        assert_eq!(section.vertical_space_after(0), Some(spacing::MEDIUM));
        assert_eq!(section.vertical_space_after(1), Some(spacing::HUGE));
        assert_eq!(section.vertical_space_after(2), None);
    }

    #[test]
    fn decoration_block_spans_added_cells() {
        let mut section = SectionDescriptor::new();
        section.reload(|b| {
            b.add(cell("header"));
            let block = b.start_decoration_block(DecorationKind::Bordered);
            b.add(cell("a")).add(cell("b")).add(cell("c"));
            b.end_decoration_block(block);
            b.add(cell("footer"));
        });
        assert_eq!(
            section.decoration_blocks(),
            [DecorationBlock {
                kind: DecorationKind::Bordered,
                start_item: 1,
                end_item: 3,
            }]
        );
    }

    #[test]
    fn horizontal_line_anchors_next_cell() {
        let mut section = SectionDescriptor::new();
        section.reload(|b| {
            b.add(cell("a"));
            b.add_horizontal_line();
            b.add(cell("b"));
        });
        assert_eq!(
            section.decoration_blocks(),
            [DecorationBlock::at(DecorationKind::Line, 1)]
        );
    }

    #[test]
    fn unfinished_blocks_are_dropped() {
        let mut section = SectionDescriptor::new();
        section.reload(|b| {
            let _open = b.start_decoration_block(DecorationKind::Bordered);
            b.add(cell("a"));
        });
        assert!(section.decoration_blocks().is_empty());
        assert_eq!(section.cells().len(), 1);
    }

    #[test]
    #[should_panic(expected = "section without cells")]
    fn ending_block_in_empty_section_panics() {
        let mut builder = SectionBuilder::new();
        let block = builder.start_decoration_block(DecorationKind::Bordered);
        builder.end_decoration_block(block);
    }

    #[test]
    #[should_panic(expected = "add a cell after start_decoration_block")]
    fn ending_block_without_new_cell_panics() {
        let mut builder = SectionBuilder::new();
        builder.add(cell("a"));
        let block = builder.start_decoration_block(DecorationKind::Bordered);
        builder.end_decoration_block(block);
    }

    #[test]
    fn reload_replaces_content() {
        let mut section = SectionDescriptor::new();
        section.set_horizontal_inset(spacing::BIG).reload(|b| {
            b.add(cell("a")).add(cell("b"));
        });
        section.reload(|b| {
            b.add(cell("c"));
        });
        assert_eq!(section.cells().len(), 1);
        assert_eq!(section.cells()[0].identifier(), "c");
        assert_eq!(section.section_inset(), Insets::new(20.0, 0.0, 20.0, 0.0));
    }

    #[test]
    fn default_inset() {
        let section = SectionDescriptor::new();
        assert!((section.horizontal_inset() - 15.0).abs() < 1e-12);
        assert!(section.line_spacing().abs() < 1e-12);
    }
}
