// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoration attributes across layout passes.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::mem;

use kurbo::Rect;

use super::attributes::{LayoutAttributes, overlaps};
use super::update::{CoordinateMap, UpdateItem};
use crate::collection::{Coordinate, DecorationKind};
use crate::diff::{DiffItem, Diffability, diff};

type Key = (DecorationKind, Coordinate);

/// Holds the decoration attributes of the current and previous layout pass
/// and reports which decorations appear or disappear between them.
#[derive(Clone, Debug, Default)]
pub struct DecorationTracker {
    registered: BTreeSet<DecorationKind>,
    current: BTreeMap<Key, LayoutAttributes>,
    previous: BTreeMap<Key, LayoutAttributes>,
    inserted: BTreeMap<DecorationKind, Vec<Coordinate>>,
    deleted: BTreeMap<DecorationKind, Vec<Coordinate>>,
}

impl DecorationTracker {
    /// Creates a tracker with no registered kind.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows attributes of `kind` to be added.
    pub fn register(&mut self, kind: DecorationKind) {
        self.registered.insert(kind);
    }

    /// Whether `kind` was registered.
    #[must_use]
    pub fn is_registered(&self, kind: DecorationKind) -> bool {
        self.registered.contains(&kind)
    }

    /// Registered kinds, in order.
    pub fn kinds(&self) -> impl Iterator<Item = DecorationKind> + '_ {
        self.registered.iter().copied()
    }

    /// Starts a new pass: the current attributes become the previous ones.
    pub fn prepare(&mut self) {
        self.previous = mem::take(&mut self.current);
        self.inserted.clear();
        self.deleted.clear();
    }

    /// Adds decoration attributes to the current pass, replacing any at the
    /// same kind and coordinate.
    ///
    /// # Panics
    ///
    /// Panics if `attributes` positions a cell or an unregistered kind.
    pub fn add(&mut self, attributes: LayoutAttributes) {
        let Some(kind) = attributes.decoration_kind() else {
            panic!("cell attributes added as a decoration");
        };
        assert!(
            self.is_registered(kind),
            "decoration kind `{}` is not registered",
            kind.as_str()
        );
        self.current.insert((kind, attributes.coordinate), attributes);
    }

    /// Attributes of the `kind` decoration anchored at `coordinate`.
    #[must_use]
    pub fn attributes(
        &self,
        kind: DecorationKind,
        coordinate: Coordinate,
    ) -> Option<&LayoutAttributes> {
        self.current.get(&(kind, coordinate))
    }

    /// Current attributes whose frame overlaps `rect`.
    pub fn attributes_in(&self, rect: Rect) -> impl Iterator<Item = &LayoutAttributes> + '_ {
        self.current
            .values()
            .filter(move |attributes| overlaps(attributes.frame, rect))
    }

    /// Number of decorations in the current pass.
    #[must_use]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Returns `true` if the current pass has no decoration.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Computes inserted and deleted decorations for a batch update.
    ///
    /// Previous anchors are carried into the new coordinate space through
    /// `updates`; anchors whose cell was deleted count as deleted, and
    /// current anchors with no carried counterpart count as inserted.
    pub fn prepare_for_updates(&mut self, updates: &[UpdateItem]) {
        let map = CoordinateMap::new(updates);
        self.inserted.clear();
        self.deleted.clear();

        for kind in self.registered.iter().copied() {
            let mut deleted = Vec::new();
            let mut before = Vec::new();
            for &(_, old) in self.previous.keys().filter(|(k, _)| *k == kind) {
                match map.map(old) {
                    Some(carried) => {
                        before.push(DiffItem::new(old, carried, Diffability::token(())));
                    }
                    None => deleted.push(old),
                }
            }
            let after: Vec<_> = self
                .current
                .keys()
                .filter(|(k, _)| *k == kind)
                .map(|&(_, new)| DiffItem::new(new, new, Diffability::token(())))
                .collect();

            let script = diff(&before, &after);
            deleted.extend(script.deleted);
            deleted.sort_unstable();

            self.inserted.insert(kind, script.inserted.into_iter().collect());
            self.deleted.insert(kind, deleted);
        }
    }

    /// Coordinates, after the update, of the `kind` decorations to insert.
    #[must_use]
    pub fn inserted(&self, kind: DecorationKind) -> &[Coordinate] {
        self.inserted.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Coordinates, before the update, of the `kind` decorations to delete.
    #[must_use]
    pub fn deleted(&self, kind: DecorationKind) -> &[Coordinate] {
        self.deleted.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}
