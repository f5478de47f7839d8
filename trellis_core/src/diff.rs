// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Set reconciliation over ordered, identified items.
//!
//! [`diff`] compares a previous and a new list of [`DiffItem`]s and produces
//! an [`EditScript`] suitable for batched, animated application to a live
//! view hierarchy.
//!
//! # Matching
//!
//! Items are matched by identifier, left to right: each item of the new list
//! takes the first not-yet-matched item of the old list carrying the same
//! identifier. Identifiers are expected to be unique within one list (see
//! [`disambiguate`](crate::descriptor::disambiguate)); duplicates degrade to
//! "first match wins".
//!
//! A matched pair is *reloaded* when its payloads do not compare equal.
//! Payload equality is carried by [`Diffability`], which is resolved when the
//! item is built: [`Diffability::Opaque`] never compares equal and therefore
//! always reloads.
//!
//! # Moves
//!
//! Among matched pairs, the longest run whose old positions increase with
//! their new positions is considered stable. Every other matched pair is
//! reported in [`EditScript::moved`]. Items only shifted by surrounding
//! inserts or deletes are never reported as moved.

use alloc::collections::{BTreeSet, VecDeque};
use alloc::rc::Rc;
use alloc::vec;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;

/// A type-erased payload whose equality is fixed when the token is built.
///
/// Two tokens compare equal only if they wrap the same payload type and the
/// payloads compare equal with [`PartialEq`].
#[derive(Clone)]
pub struct DiffToken {
    value: Rc<dyn Any>,
    eq: fn(&dyn Any, &dyn Any) -> bool,
}

impl DiffToken {
    /// Wraps `value`, capturing its [`PartialEq`] implementation.
    #[must_use]
    pub fn new<T: PartialEq + 'static>(value: T) -> Self {
        Self {
            value: Rc::new(value),
            eq: eq_as::<T>,
        }
    }

    /// Returns whether both tokens wrap equal payloads of the same type.
    #[must_use]
    pub fn is_equal(&self, other: &Self) -> bool {
        (self.eq)(&*self.value, &*other.value)
    }

    /// Returns the wrapped payload if it has type `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for DiffToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiffToken").finish_non_exhaustive()
    }
}

fn eq_as<T: PartialEq + 'static>(a: &dyn Any, b: &dyn Any) -> bool {
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// How the payload of an item takes part in reload decisions.
#[derive(Clone, Debug, Default)]
pub enum Diffability {
    /// The payload cannot be compared; a matched item is always reloaded.
    #[default]
    Opaque,
    /// The payload is compared structurally.
    Token(DiffToken),
}

impl Diffability {
    /// Builds a comparable payload from `value`.
    #[must_use]
    pub fn token<T: PartialEq + 'static>(value: T) -> Self {
        Self::Token(DiffToken::new(value))
    }

    /// Returns whether two payloads compare equal.
    ///
    /// [`Opaque`](Self::Opaque) on either side always yields `false`.
    #[must_use]
    pub fn is_equal(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Token(a), Self::Token(b)) => a.is_equal(b),
            _ => false,
        }
    }
}

/// One entry of a list handed to [`diff`].
#[derive(Clone, Debug)]
pub struct DiffItem<I, K> {
    /// Position reported back in the [`EditScript`].
    pub index: I,
    /// Identity used for matching.
    pub identifier: K,
    /// Payload used for reload decisions.
    pub diffable: Diffability,
}

impl<I, K> DiffItem<I, K> {
    /// Creates an item.
    #[must_use]
    pub fn new(index: I, identifier: K, diffable: Diffability) -> Self {
        Self {
            index,
            identifier,
            diffable,
        }
    }
}

/// The output of [`diff`].
///
/// `inserted`, `reloaded` and the second element of each `moved` pair are
/// indices of the new list; `deleted` and the first element of each `moved`
/// pair are indices of the old list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditScript<I> {
    /// New-list indices with no counterpart in the old list.
    pub inserted: BTreeSet<I>,
    /// Old-list indices with no counterpart in the new list.
    pub deleted: BTreeSet<I>,
    /// New-list indices whose payload changed.
    pub reloaded: BTreeSet<I>,
    /// `(old, new)` pairs that left the stable order.
    pub moved: Vec<(I, I)>,
}

impl<I> Default for EditScript<I> {
    fn default() -> Self {
        Self {
            inserted: BTreeSet::new(),
            deleted: BTreeSet::new(),
            reloaded: BTreeSet::new(),
            moved: Vec::new(),
        }
    }
}

impl<I> EditScript<I> {
    /// Returns `true` if the two lists were equivalent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty()
            && self.deleted.is_empty()
            && self.reloaded.is_empty()
            && self.moved.is_empty()
    }

    /// Total number of edits across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inserted.len() + self.deleted.len() + self.reloaded.len() + self.moved.len()
    }
}

/// Computes the edit script turning `before` into `after`.
///
/// Runs in `O(n log n)`: one hash lookup per item plus a patience-sorting
/// pass over matched pairs to find moves.
#[must_use]
pub fn diff<I, K>(before: &[DiffItem<I, K>], after: &[DiffItem<I, K>]) -> EditScript<I>
where
    I: Copy + Ord,
    K: Eq + Hash,
{
    let mut script = EditScript::default();

    let mut lookup: HashMap<&K, VecDeque<usize>> = HashMap::with_capacity(before.len());
    for (position, item) in before.iter().enumerate() {
        lookup
            .entry(&item.identifier)
            .or_default()
            .push_back(position);
    }

    let mut matched = vec![false; before.len()];
    // (old position, new position), in new-list order.
    let mut pairs: Vec<(usize, usize)> = Vec::with_capacity(after.len().min(before.len()));

    for (position, item) in after.iter().enumerate() {
        let candidate = lookup
            .get_mut(&item.identifier)
            .and_then(VecDeque::pop_front);
        match candidate {
            Some(old) => {
                matched[old] = true;
                pairs.push((old, position));
                if !before[old].diffable.is_equal(&item.diffable) {
                    script.reloaded.insert(item.index);
                }
            }
            None => {
                script.inserted.insert(item.index);
            }
        }
    }

    for (position, item) in before.iter().enumerate() {
        if !matched[position] {
            script.deleted.insert(item.index);
        }
    }

    let stable = stable_pairs(&pairs);
    for (k, &(old, new)) in pairs.iter().enumerate() {
        if !stable[k] {
            script.moved.push((before[old].index, after[new].index));
        }
    }

    script
}

/// Marks the pairs belonging to the longest run of increasing old positions.
fn stable_pairs(pairs: &[(usize, usize)]) -> Vec<bool> {
    // tails[len - 1] is the pair ending the best run of length `len` seen so far.
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; pairs.len()];

    for (k, &(old, _)) in pairs.iter().enumerate() {
        let slot = tails.partition_point(|&t| pairs[t].0 < old);
        if slot > 0 {
            prev[k] = Some(tails[slot - 1]);
        }
        if slot == tails.len() {
            tails.push(k);
        } else {
            tails[slot] = k;
        }
    }

    let mut stable = vec![false; pairs.len()];
    let mut cursor = tails.last().copied();
    while let Some(k) = cursor {
        stable[k] = true;
        cursor = prev[k];
    }
    stable
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeSet;
    use alloc::vec::Vec;

    use super::*;

    fn items(ids: &[&'static str]) -> Vec<DiffItem<usize, &'static str>> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| DiffItem::new(i, *id, Diffability::token(*id)))
            .collect()
    }

    fn set(indices: &[usize]) -> BTreeSet<usize> {
        indices.iter().copied().collect()
    }

    #[test]
    fn changed_identifier_is_replace_not_reload() {
        let script = diff(&items(&["x", "y"]), &items(&["x", "z"]));
        assert_eq!(script.inserted, set(&[1]));
        assert_eq!(script.deleted, set(&[1]));
        assert!(script.reloaded.is_empty());
        assert!(script.moved.is_empty());
    }

    #[test]
    fn append_only_inserts() {
        let script = diff(&items(&["a"]), &items(&["a", "b"]));
        assert_eq!(script.inserted, set(&[1]));
        assert!(script.deleted.is_empty());
        assert!(script.reloaded.is_empty());
    }

    #[test]
    fn empty_before_inserts_everything() {
        let script = diff(&items(&[]), &items(&["a", "b", "c"]));
        assert_eq!(script.inserted, set(&[0, 1, 2]));
        assert!(script.deleted.is_empty());
    }

    #[test]
    fn empty_after_deletes_everything() {
        let script = diff(&items(&["a", "b", "c"]), &items(&[]));
        assert_eq!(script.deleted, set(&[0, 1, 2]));
        assert!(script.inserted.is_empty());
    }

    #[test]
    fn identical_lists_yield_empty_script() {
        let list = items(&["a", "b", "c", "d"]);
        let script = diff(&list, &list);
        assert!(script.is_empty());
        assert_eq!(script.len(), 0);
    }

    #[test]
    fn payload_change_reloads_new_index() {
        let before = vec![
            DiffItem::new(0, "title", Diffability::token(1_u32)),
            DiffItem::new(1, "body", Diffability::token(1_u32)),
        ];
        let after = vec![
            DiffItem::new(0, "header", Diffability::token(0_u32)),
            DiffItem::new(1, "title", Diffability::token(1_u32)),
            DiffItem::new(2, "body", Diffability::token(2_u32)),
        ];
        let script = diff(&before, &after);
        assert_eq!(script.inserted, set(&[0]));
        assert_eq!(script.reloaded, set(&[2]));
        assert!(script.deleted.is_empty());
        assert!(script.moved.is_empty(), "shifted items are not moves");
    }

    #[test]
    fn opaque_payload_always_reloads() {
        let before = vec![DiffItem::new(0, "stack", Diffability::Opaque)];
        let after = vec![DiffItem::new(0, "stack", Diffability::Opaque)];
        let script = diff(&before, &after);
        assert_eq!(script.reloaded, set(&[0]));
        assert!(script.inserted.is_empty() && script.deleted.is_empty());
    }

    #[test]
    fn tokens_of_different_types_differ() {
        let a = Diffability::token(1_u32);
        let b = Diffability::token(1_u64);
        assert!(!a.is_equal(&b));
        assert!(a.is_equal(&Diffability::token(1_u32)));
    }

    #[test]
    fn rotation_reports_single_move() {
        let script = diff(&items(&["a", "b", "c"]), &items(&["c", "a", "b"]));
        assert_eq!(script.moved, vec![(2, 0)]);
        assert!(script.inserted.is_empty());
        assert!(script.deleted.is_empty());
        assert!(script.reloaded.is_empty());
    }

    #[test]
    fn swap_reports_one_of_the_pair() {
        let script = diff(&items(&["a", "b"]), &items(&["b", "a"]));
        assert_eq!(script.moved.len(), 1);
    }

    #[test]
    fn duplicate_identifiers_match_left_to_right() {
        let before = vec![
            DiffItem::new(0, "label", Diffability::token("first")),
            DiffItem::new(1, "label", Diffability::token("second")),
        ];
        let after = vec![DiffItem::new(0, "label", Diffability::token("first"))];
        let script = diff(&before, &after);
        assert_eq!(script.deleted, set(&[1]), "the first old item wins the match");
        assert!(script.reloaded.is_empty());
    }

    #[test]
    fn membership_properties_hold() {
        let cases: &[(&[&str], &[&str])] = &[
            (&["a", "b", "c"], &["c", "d", "a"]),
            (&["a", "b", "c", "d", "e"], &["e", "d", "c", "b", "a"]),
            (&["q"], &["r", "s", "q", "t"]),
            (&["a", "b", "c", "d"], &["b", "d"]),
        ];
        for (before, after) in cases {
            let script = diff(&items(before), &items(after));
            for (i, id) in after.iter().enumerate() {
                let in_before = before.contains(id);
                assert_eq!(
                    script.inserted.contains(&i),
                    !in_before,
                    "{id} inserted iff absent before"
                );
                assert!(!script.reloaded.contains(&i), "{id} payload is unchanged");
            }
            for (i, id) in before.iter().enumerate() {
                assert_eq!(
                    script.deleted.contains(&i),
                    !after.contains(id),
                    "{id} deleted iff absent after"
                );
            }
        }
    }

    #[test]
    fn stable_run_is_longest_increasing() {
        let pairs = [(3, 0), (0, 1), (1, 2), (4, 3), (2, 4)];
        let stable = stable_pairs(&pairs);
        let kept: Vec<usize> = pairs
            .iter()
            .zip(&stable)
            .filter(|(_, s)| **s)
            .map(|(p, _)| p.0)
            .collect();
        assert_eq!(kept.len(), 3);
        assert!(kept.windows(2).all(|w| w[0] < w[1]));
    }
}
