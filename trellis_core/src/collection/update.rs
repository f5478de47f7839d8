// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batch updates of a collection.
//!
//! [`CollectionData::update`] hands a [`CollectionUpdater`] to a closure. The
//! updater rewrites sections and records what changed structurally, using the
//! [`diff`](crate::diff::diff) engine on cell identifiers and payloads. The
//! returned [`UpdateCollectionResult`] is what a host replays as one animated
//! batch, and what
//! [`UpdateItem::from_result`](crate::layout::UpdateItem::from_result) turns
//! into layout update items.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use super::cell::CellDescriptor;
use super::coordinate::Coordinate;
use super::data::CollectionData;
use super::section::{SectionBuilder, SectionDescriptor};
use crate::diff::{DiffItem, Diffability, EditScript, diff};

/// Structural changes recorded by one [`CollectionData::update`].
///
/// Deleted sections, deleted items and move sources are positions from
/// before the batch. Everything else is a position after it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateCollectionResult {
    /// Sections inserted.
    pub inserted_sections: BTreeSet<usize>,
    /// Sections deleted.
    pub deleted_sections: BTreeSet<usize>,
    /// Sections reloaded as a whole.
    pub reloaded_sections: BTreeSet<usize>,
    /// Cells inserted.
    pub inserted_items: BTreeSet<Coordinate>,
    /// Cells deleted.
    pub deleted_items: BTreeSet<Coordinate>,
    /// Cells whose payload changed.
    pub reloaded_items: BTreeSet<Coordinate>,
    /// Cells that moved, as `(from, to)`.
    pub moved_items: Vec<(Coordinate, Coordinate)>,
}

impl UpdateCollectionResult {
    /// Returns `true` if the batch changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserted_sections.is_empty()
            && self.deleted_sections.is_empty()
            && self.reloaded_sections.is_empty()
            && self.inserted_items.is_empty()
            && self.deleted_items.is_empty()
            && self.reloaded_items.is_empty()
            && self.moved_items.is_empty()
    }

    fn record_cells(&mut self, from: usize, to: usize, script: &EditScript<usize>) {
        self.deleted_items
            .extend(script.deleted.iter().map(|&i| Coordinate::new(from, i)));
        self.inserted_items
            .extend(script.inserted.iter().map(|&i| Coordinate::new(to, i)));
        self.reloaded_items
            .extend(script.reloaded.iter().map(|&i| Coordinate::new(to, i)));
        self.moved_items.extend(
            script
                .moved
                .iter()
                .map(|&(a, b)| (Coordinate::new(from, a), Coordinate::new(to, b))),
        );
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum SectionKey<'a> {
    Named(&'a str),
    Position(usize),
}

fn section_items(sections: &[SectionDescriptor]) -> Vec<DiffItem<usize, SectionKey<'_>>> {
    sections
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let key = section
                .identifier()
                .map_or(SectionKey::Position(i), SectionKey::Named);
            // Sections never reload as a whole; their cells are diffed.
            DiffItem::new(i, key, Diffability::token(()))
        })
        .collect()
}

fn cell_items(cells: &[CellDescriptor]) -> Vec<DiffItem<usize, &str>> {
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| DiffItem::new(i, cell.identifier(), cell.diffable().clone()))
        .collect()
}

/// Rewrites the sections of a [`CollectionData`] and records the changes.
///
/// Each operation records positions relative to the state before and after
/// the whole batch, so operations of one batch should touch distinct
/// sections.
#[derive(Debug)]
pub struct CollectionUpdater<'a> {
    data: &'a mut CollectionData,
    result: UpdateCollectionResult,
}

impl CollectionUpdater<'_> {
    /// The collection as rewritten so far.
    #[must_use]
    pub fn data(&self) -> &CollectionData {
        &*self.data
    }

    /// Replaces every section with what `rebuild` adds and records the
    /// differences.
    ///
    /// Sections match by [identifier](SectionDescriptor::identifier), or by
    /// position when they have none. Matched sections that kept their
    /// relative order are diffed cell by cell. A section that moved is
    /// recorded as deleted at its old position and inserted at its new one.
    pub fn diff(&mut self, rebuild: impl FnOnce(&mut CollectionData)) {
        let old = core::mem::take(&mut self.data.sections);
        rebuild(&mut *self.data);
        let new = &self.data.sections;

        let script = diff(&section_items(&old), &section_items(new));
        let result = &mut self.result;
        result.deleted_sections.extend(script.deleted.iter().copied());
        result
            .inserted_sections
            .extend(script.inserted.iter().copied());
        for &(from, to) in &script.moved {
            result.deleted_sections.insert(from);
            result.inserted_sections.insert(to);
        }

        let moved_from: BTreeSet<usize> = script.moved.iter().map(|&(from, _)| from).collect();
        let moved_to: BTreeSet<usize> = script.moved.iter().map(|&(_, to)| to).collect();
        let stable_old = (0..old.len())
            .filter(|i| !script.deleted.contains(i) && !moved_from.contains(i));
        let stable_new = (0..new.len())
            .filter(|i| !script.inserted.contains(i) && !moved_to.contains(i));
        for (from, to) in stable_old.zip(stable_new) {
            let cells = diff(&cell_items(&old[from].cells), &cell_items(&new[to].cells));
            result.record_cells(from, to, &cells);
        }

        self.data.compute_indices();
    }

    /// Reloads section `index` through `build` and records how its cells
    /// changed. Out-of-range indices are ignored.
    pub fn diff_section(&mut self, index: usize, build: impl FnOnce(&mut SectionBuilder)) {
        let Some(section) = self.data.sections.get_mut(index) else {
            return;
        };
        let old = core::mem::take(&mut section.cells);
        section.reload(build);
        let cells = diff(&cell_items(&old), &cell_items(&section.cells));
        self.result.record_cells(index, index, &cells);
        self.data.compute_coordinates(index);
    }

    /// Records sections whose content must be redrawn as a whole.
    /// Out-of-range indices are ignored.
    pub fn reload_sections(&mut self, indices: impl IntoIterator<Item = usize>) {
        let count = self.data.sections_count();
        self.result
            .reloaded_sections
            .extend(indices.into_iter().filter(|&i| i < count));
    }

    /// Records cells whose content must be redrawn. Coordinates without a
    /// cell are ignored.
    pub fn reload_cells(&mut self, coordinates: impl IntoIterator<Item = Coordinate>) {
        let data = &*self.data;
        self.result.reloaded_items.extend(
            coordinates
                .into_iter()
                .filter(|&c| data.cell(c).is_some()),
        );
    }
}

impl CollectionData {
    /// Runs `updates` against this collection and returns what changed.
    ///
    /// ```
    /// use trellis_core::collection::{CellDescriptor, CollectionData, Coordinate};
    ///
    /// let row = |id: &str, text: &str| CellDescriptor::new("Row").with_identifier(id).with_payload(text.to_owned());
    /// let mut data = CollectionData::new();
    /// data.add_section().reload(|b| {
    ///     b.add(row("a", "A")).add(row("b", "B"));
    /// });
    ///
    /// let result = data.update(|updater| {
    ///     updater.diff_section(0, |b| {
    ///         b.add(row("b", "B")).add(row("c", "C"));
    ///     });
    /// });
    /// assert!(result.deleted_items.contains(&Coordinate::new(0, 0)));
    /// assert!(result.inserted_items.contains(&Coordinate::new(0, 1)));
    /// ```
    pub fn update(
        &mut self,
        updates: impl FnOnce(&mut CollectionUpdater<'_>),
    ) -> UpdateCollectionResult {
        let mut updater = CollectionUpdater {
            data: self,
            result: UpdateCollectionResult::default(),
        };
        updates(&mut updater);
        updater.result
    }
}
