// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batched structural updates and coordinate mapping.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use crate::collection::{Coordinate, UpdateCollectionResult};
use crate::diff::EditScript;

/// One structural change in a batch update.
///
/// Deletions and move sources use coordinates from before the batch;
/// insertions, reloads and move targets use coordinates from after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateItem {
    /// A cell was inserted.
    InsertItem(Coordinate),
    /// A cell was deleted.
    DeleteItem(Coordinate),
    /// A cell was reloaded in place.
    ReloadItem(Coordinate),
    /// A cell moved.
    MoveItem {
        /// Position before the batch.
        from: Coordinate,
        /// Position after the batch.
        to: Coordinate,
    },
    /// A section was inserted.
    InsertSection(usize),
    /// A section was deleted.
    DeleteSection(usize),
    /// A section was reloaded.
    ReloadSection(usize),
}

impl UpdateItem {
    /// Expresses an item-level edit script of one section as update items.
    #[must_use]
    pub fn from_edit_script(section: usize, script: &EditScript<usize>) -> Vec<Self> {
        let at = |item: usize| Coordinate::new(section, item);
        let mut items = Vec::with_capacity(script.len());
        items.extend(script.deleted.iter().map(|&i| Self::DeleteItem(at(i))));
        items.extend(script.inserted.iter().map(|&i| Self::InsertItem(at(i))));
        items.extend(script.reloaded.iter().map(|&i| Self::ReloadItem(at(i))));
        items.extend(script.moved.iter().map(|&(from, to)| Self::MoveItem {
            from: at(from),
            to: at(to),
        }));
        items
    }

    /// Expresses the changes recorded by
    /// [`CollectionData::update`](crate::collection::CollectionData::update)
    /// as update items.
    #[must_use]
    pub fn from_result(result: &UpdateCollectionResult) -> Vec<Self> {
        let mut items = Vec::new();
        items.extend(result.deleted_sections.iter().map(|&s| Self::DeleteSection(s)));
        items.extend(result.inserted_sections.iter().map(|&s| Self::InsertSection(s)));
        items.extend(result.reloaded_sections.iter().map(|&s| Self::ReloadSection(s)));
        items.extend(result.deleted_items.iter().map(|&c| Self::DeleteItem(c)));
        items.extend(result.inserted_items.iter().map(|&c| Self::InsertItem(c)));
        items.extend(result.reloaded_items.iter().map(|&c| Self::ReloadItem(c)));
        items.extend(
            result
                .moved_items
                .iter()
                .map(|&(from, to)| Self::MoveItem { from, to }),
        );
        items
    }
}

/// Maps coordinates from before a batch update to after it.
///
/// Deletions apply first, in the old coordinate space, then insertions in
/// the new one. A move counts as a deletion at its source and an insertion
/// at its target. Reloads keep their coordinate.
#[derive(Clone, Debug, Default)]
pub struct CoordinateMap {
    deleted_sections: BTreeSet<usize>,
    inserted_sections: BTreeSet<usize>,
    deleted_items: BTreeSet<Coordinate>,
    inserted_items: BTreeSet<Coordinate>,
    moves: BTreeMap<Coordinate, Coordinate>,
}

impl CoordinateMap {
    /// Builds the mapping for a batch.
    #[must_use]
    pub fn new(updates: &[UpdateItem]) -> Self {
        let mut map = Self::default();
        for update in updates {
            match *update {
                UpdateItem::InsertItem(to) => {
                    map.inserted_items.insert(to);
                }
                UpdateItem::DeleteItem(from) => {
                    map.deleted_items.insert(from);
                }
                UpdateItem::MoveItem { from, to } => {
                    map.deleted_items.insert(from);
                    map.inserted_items.insert(to);
                    map.moves.insert(from, to);
                }
                UpdateItem::InsertSection(section) => {
                    map.inserted_sections.insert(section);
                }
                UpdateItem::DeleteSection(section) => {
                    map.deleted_sections.insert(section);
                }
                UpdateItem::ReloadItem(_) | UpdateItem::ReloadSection(_) => {}
            }
        }
        map
    }

    /// New index of section `old`, or `None` if it was deleted.
    #[must_use]
    pub fn map_section(&self, old: usize) -> Option<usize> {
        if self.deleted_sections.contains(&old) {
            return None;
        }
        let mut section = old - self.deleted_sections.range(..old).count();
        for &inserted in &self.inserted_sections {
            if inserted > section {
                break;
            }
            section += 1;
        }
        Some(section)
    }

    /// New coordinate of the cell at `old`, or `None` if it was deleted.
    #[must_use]
    pub fn map(&self, old: Coordinate) -> Option<Coordinate> {
        if let Some(&to) = self.moves.get(&old) {
            return Some(to);
        }
        if self.deleted_items.contains(&old) {
            return None;
        }
        let section = self.map_section(old.section)?;
        let removed_before = self
            .deleted_items
            .range(Coordinate::new(old.section, 0)..old)
            .count();
        let mut item = old.item - removed_before;
        let inserted = self
            .inserted_items
            .range(Coordinate::new(section, 0)..=Coordinate::new(section, usize::MAX));
        for coordinate in inserted {
            if coordinate.item > item {
                break;
            }
            item += 1;
        }
        Some(Coordinate::new(section, item))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::diff::{DiffItem, Diffability, diff};

    fn c(section: usize, item: usize) -> Coordinate {
        Coordinate::new(section, item)
    }

    #[test]
    fn insert_shifts_following_items() {
        let map = CoordinateMap::new(&[UpdateItem::InsertItem(c(0, 1))]);
        assert_eq!(map.map(c(0, 0)), Some(c(0, 0)));
        assert_eq!(map.map(c(0, 1)), Some(c(0, 2)));
        assert_eq!(map.map(c(1, 1)), Some(c(1, 1)));
    }

    #[test]
    fn delete_removes_and_shifts() {
        let map = CoordinateMap::new(&[
            UpdateItem::DeleteItem(c(0, 0)),
            UpdateItem::DeleteItem(c(0, 2)),
        ]);
        assert_eq!(map.map(c(0, 0)), None);
        assert_eq!(map.map(c(0, 1)), Some(c(0, 0)));
        assert_eq!(map.map(c(0, 2)), None);
        assert_eq!(map.map(c(0, 3)), Some(c(0, 1)));
    }

    #[test]
    fn delete_then_insert_at_same_place() {
        // Old [a, b, c] -> new [a, x, c]
        let map = CoordinateMap::new(&[
            UpdateItem::DeleteItem(c(0, 1)),
            UpdateItem::InsertItem(c(0, 1)),
        ]);
        assert_eq!(map.map(c(0, 1)), None);
        assert_eq!(map.map(c(0, 2)), Some(c(0, 2)));
    }

    #[test]
    fn sections_shift_and_disappear() {
        let map = CoordinateMap::new(&[
            UpdateItem::DeleteSection(0),
            UpdateItem::InsertSection(1),
        ]);
        assert_eq!(map.map_section(0), None);
        assert_eq!(map.map_section(1), Some(0));
        assert_eq!(map.map_section(2), Some(2));
        assert_eq!(map.map(c(0, 3)), None);
        assert_eq!(map.map(c(2, 3)), Some(c(2, 3)));
    }

    #[test]
    fn moves_follow_target() {
        // Old [a, b, c] -> new [c, a, b]
        let map = CoordinateMap::new(&[UpdateItem::MoveItem {
            from: c(0, 2),
            to: c(0, 0),
        }]);
        assert_eq!(map.map(c(0, 2)), Some(c(0, 0)));
        assert_eq!(map.map(c(0, 0)), Some(c(0, 1)));
        assert_eq!(map.map(c(0, 1)), Some(c(0, 2)));
    }

    #[test]
    fn collection_update_feeds_the_map() {
        use crate::collection::{CellDescriptor, CollectionData};

        let row = |id: &str| CellDescriptor::new("Row").with_identifier(id).with_payload(());
        let mut data = CollectionData::new();
        data.reload_data(|data| {
            data.add_section().set_identifier("top").reload(|b| {
                b.add(row("a"));
            });
            data.add_section().set_identifier("list").reload(|b| {
                b.add(row("x")).add(row("y")).add(row("z"));
            });
        });
        let result = data.update(|updater| {
            updater.diff(|data| {
                data.add_section().set_identifier("list").reload(|b| {
                    b.add(row("z")).add(row("x")).add(row("new"));
                });
            });
        });
        let updates = UpdateItem::from_result(&result);
        assert_eq!(updates[0], UpdateItem::DeleteSection(0));
        let map = CoordinateMap::new(&updates);
        assert_eq!(map.map_section(1), Some(0));
        assert_eq!(map.map(c(0, 0)), None);
        assert_eq!(map.map(c(1, 0)), Some(c(0, 1)), "x follows z");
        assert_eq!(map.map(c(1, 1)), None, "y is gone");
        assert_eq!(map.map(c(1, 2)), Some(c(0, 0)), "z moved to the top");
    }

    #[test]
    fn edit_script_round_trips_through_map() {
        let ids = |names: &[&'static str]| -> Vec<DiffItem<usize, &'static str>> {
            names
                .iter()
                .enumerate()
                .map(|(i, &n)| DiffItem::new(i, n, Diffability::token(n)))
                .collect()
        };
        let before = ids(&["a", "b", "c", "d"]);
        let after = ids(&["d", "a", "x", "c"]);
        let script = diff(&before, &after);
        let updates = UpdateItem::from_edit_script(3, &script);
        let map = CoordinateMap::new(&updates);

        let mut mapped = vec![None; after.len()];
        for item in &before {
            if let Some(to) = map.map(c(3, item.index)) {
                assert_eq!(to.section, 3);
                mapped[to.item] = Some(item.identifier);
            }
        }
        assert_eq!(mapped, [Some("d"), Some("a"), None, Some("c")]);
    }
}
