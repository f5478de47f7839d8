// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The section list backing a collection.

use alloc::vec::Vec;

use super::cell::{CellDescriptor, SupplementaryDescriptor};
use super::coordinate::Coordinate;
use super::section::SectionDescriptor;

/// Ordered sections of a collection.
///
/// Coordinates are only meaningful after [`compute_indices`](Self::compute_indices);
/// the layout engine calls it at the start of every pass.
#[derive(Clone, Debug, Default)]
pub struct CollectionData {
    /// The sections, in display order.
    pub sections: Vec<SectionDescriptor>,
}

impl CollectionData {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every section with what `build` adds.
    pub fn reload_data(&mut self, build: impl FnOnce(&mut Self)) {
        self.sections.clear();
        build(self);
    }

    /// Appends an empty section and returns it for configuration.
    pub fn add_section(&mut self) -> &mut SectionDescriptor {
        self.sections.push(SectionDescriptor::new());
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    /// Number of sections.
    #[must_use]
    pub fn sections_count(&self) -> usize {
        self.sections.len()
    }

    /// Total number of cells across sections.
    #[must_use]
    pub fn cells_count(&self) -> usize {
        self.sections.iter().map(|s| s.cells.len()).sum()
    }

    /// Assigns every section its index and every cell and supplementary view
    /// its coordinate.
    pub fn compute_indices(&mut self) {
        for section in 0..self.sections.len() {
            self.compute_coordinates(section);
        }
    }

    /// Recomputes the coordinates of one section. Out-of-range indices are
    /// ignored.
    pub fn compute_coordinates(&mut self, section: usize) {
        let Some(descriptor) = self.sections.get_mut(section) else {
            return;
        };
        descriptor.index = Some(section);
        for (item, cell) in descriptor.cells.iter_mut().enumerate() {
            cell.coordinate = Some(Coordinate::new(section, item));
        }
        for views in descriptor.supplementary_views.values_mut() {
            for (item, view) in views.iter_mut().enumerate() {
                view.coordinate = Some(Coordinate::new(section, item));
            }
        }
    }

    /// The section at `index`.
    #[must_use]
    pub fn section(&self, index: usize) -> Option<&SectionDescriptor> {
        self.sections.get(index)
    }

    /// The section containing the cell at `coordinate`.
    #[must_use]
    pub fn section_for_cell(&self, coordinate: Coordinate) -> Option<&SectionDescriptor> {
        self.section(coordinate.section)
    }

    /// The cell at `coordinate`.
    #[must_use]
    pub fn cell(&self, coordinate: Coordinate) -> Option<&CellDescriptor> {
        self.section_for_cell(coordinate)?.cells.get(coordinate.item)
    }

    /// The supplementary view of `kind` at `coordinate`.
    #[must_use]
    pub fn supplementary_view(
        &self,
        coordinate: Coordinate,
        kind: &str,
    ) -> Option<&SupplementaryDescriptor> {
        self.section(coordinate.section)?
            .supplementary_views
            .get(kind)?
            .get(coordinate.item)
    }

    /// Every cell in coordinate order, with its coordinate.
    pub fn cells(&self) -> impl Iterator<Item = (Coordinate, &CellDescriptor)> + '_ {
        self.sections.iter().enumerate().flat_map(|(section, s)| {
            s.cells
                .iter()
                .enumerate()
                .map(move |(item, cell)| (Coordinate::new(section, item), cell))
        })
    }
}
