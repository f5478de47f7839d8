// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stack reconciler.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use super::id::HandleId;
use super::store::HandleStore;
use crate::descriptor::{Adaptable, Descriptor, DescriptorItem, DescriptorList, Renderable, Role};
use crate::diff::{Diffability, diff};
use crate::host::{Animation, StackHost, StackStyle, TransactionId};
use crate::trace::{
    PhaseBeginEvent, PhaseEndEvent, PhaseKind, ReconcileEvent, Tracer, TransactionEvent,
    saturating_count,
};

/// Errors returned by [`StackView::reconcile`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileError {
    /// A previous transaction has not completed yet.
    TransactionPending(TransactionId),
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransactionPending(id) => {
                write!(f, "transaction {} has not completed", id.0)
            }
        }
    }
}

impl core::error::Error for ReconcileError {}

#[derive(Debug)]
struct PendingTransaction {
    id: TransactionId,
    removals: Vec<HandleId>,
}

/// An ordered container of live views driven by descriptor lists.
///
/// Each [`reconcile`](Self::reconcile) call diffs the new descriptors against
/// the previous ones and applies the result:
///
/// 1. Deleted views leave the arrangement and are hidden inside the
///    transaction. They are destroyed when the transaction completes.
/// 2. Inserted views are created, updated, arranged hidden, and shown inside
///    the transaction.
/// 3. Moved views are rearranged without being recreated.
/// 4. Reloaded views receive their new payload in place.
///
/// Only one transaction may be outstanding at a time.
pub struct StackView<H> {
    host: H,
    style: StackStyle,
    animation: Animation,
    store: HandleStore,
    descriptors: Vec<DescriptorItem>,
    pending: Option<PendingTransaction>,
    next_transaction: u64,
}

impl<H: fmt::Debug> fmt::Debug for StackView<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackView")
            .field("host", &self.host)
            .field("style", &self.style)
            .field("animation", &self.animation)
            .field("store", &self.store)
            .field("descriptors", &self.descriptors)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl<H: StackHost> StackView<H> {
    /// Creates an empty stack with [`StackStyle::DEFAULT`].
    #[must_use]
    pub fn new(host: H) -> Self {
        Self::with_style(host, StackStyle::DEFAULT)
    }

    /// Creates an empty stack with the given style.
    #[must_use]
    pub fn with_style(mut host: H, style: StackStyle) -> Self {
        host.configure(&style);
        Self {
            host,
            style,
            animation: Animation::DEFAULT,
            store: HandleStore::new(),
            descriptors: Vec::new(),
            pending: None,
            next_transaction: 1,
        }
    }

    /// Sets the animation used by subsequent transactions.
    ///
    /// With an instant animation, transactions complete before
    /// [`reconcile`](Self::reconcile) returns.
    pub fn set_animation(&mut self, animation: Animation) {
        self.animation = animation;
    }

    /// Returns the animation used by transactions.
    #[must_use]
    pub fn animation(&self) -> Animation {
        self.animation
    }

    /// Returns the container style.
    #[must_use]
    pub fn style(&self) -> &StackStyle {
        &self.style
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Returns the host mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Returns the handle store.
    #[must_use]
    pub fn store(&self) -> &HandleStore {
        &self.store
    }

    /// Number of arranged children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.arranged_len()
    }

    /// Returns `true` if no child is arranged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the arranged children, in order.
    pub fn children(&self) -> impl ExactSizeIterator<Item = HandleId> + '_ {
        self.store.arranged()
    }

    /// Iterates over the identifiers of the current descriptors, in order.
    pub fn identifiers(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.descriptors.iter().map(DescriptorItem::identifier)
    }

    /// Returns the child view at `index`.
    #[must_use]
    pub fn handle(&self, index: usize) -> Option<&dyn Renderable> {
        self.store.get(self.store.arranged_at(index)?)
    }

    /// Returns the child view at `index` mutably.
    pub fn handle_mut(&mut self, index: usize) -> Option<&mut dyn Renderable> {
        let id = self.store.arranged_at(index)?;
        self.store.get_mut(id)
    }

    /// Returns the child view at `index` if it is a `V`.
    #[must_use]
    pub fn handle_as<V: Renderable>(&self, index: usize) -> Option<&V> {
        let handle: &dyn Any = self.handle(index)?;
        handle.downcast_ref::<V>()
    }

    /// Returns the outstanding transaction, if any.
    #[must_use]
    pub fn pending_transaction(&self) -> Option<TransactionId> {
        self.pending.as_ref().map(|p| p.id)
    }

    /// Reconciles the children with `items`.
    ///
    /// Returns the id of the transaction opened for the visual changes. The
    /// host must report its completion through
    /// [`complete_transaction`](Self::complete_transaction) before the next
    /// call, unless the animation is instant.
    pub fn reconcile(&mut self, items: Vec<DescriptorItem>) -> Result<TransactionId, ReconcileError> {
        self.reconcile_traced(items, &mut Tracer::none())
    }

    /// Like [`reconcile`](Self::reconcile), emitting trace events.
    pub fn reconcile_traced(
        &mut self,
        items: Vec<DescriptorItem>,
        tracer: &mut Tracer<'_>,
    ) -> Result<TransactionId, ReconcileError> {
        if let Some(pending) = &self.pending {
            return Err(ReconcileError::TransactionPending(pending.id));
        }
        Ok(self.apply_items(items, tracer))
    }

    /// Completes the transaction `id`, destroying the views it removed.
    ///
    /// Views are destroyed whether or not the animation `finished`. Returns
    /// `false` if `id` is not the outstanding transaction.
    pub fn complete_transaction(&mut self, id: TransactionId, finished: bool) -> bool {
        self.complete_transaction_traced(id, finished, &mut Tracer::none())
    }

    /// Like [`complete_transaction`](Self::complete_transaction), emitting
    /// trace events.
    pub fn complete_transaction_traced(
        &mut self,
        id: TransactionId,
        finished: bool,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        let Some(pending) = self.pending.take_if(|p| p.id == id) else {
            return false;
        };

        tracer.phase(id.0, PhaseKind::Complete, |_| {
            for &handle in &pending.removals {
                if self.store.is_alive(handle) {
                    self.store.destroy(handle);
                }
            }
            // Nested stacks animate inside this transaction.
            let arranged: Vec<HandleId> = self.store.arranged().collect();
            for handle in arranged {
                let Some(view) = self.store.get_mut(handle) else {
                    continue;
                };
                if view.role() == Role::Container {
                    view.owner_transaction_completed(finished);
                }
            }
            let changes = self.store.evaluate();
            self.host.apply(&self.store, &changes);
        });
        tracer.transaction(&TransactionEvent {
            transaction: id.0,
            finished,
            removed: saturating_count(pending.removals.len()),
        });
        true
    }

    /// Completes the outstanding transaction, if any, as interrupted.
    pub fn settle(&mut self) {
        if let Some(id) = self.pending_transaction() {
            self.complete_transaction(id, false);
        }
    }

    fn apply_items(&mut self, items: Vec<DescriptorItem>, tracer: &mut Tracer<'_>) -> TransactionId {
        let id = TransactionId(self.next_transaction);
        self.next_transaction += 1;

        let script = tracer.phase(id.0, PhaseKind::Diff, |_| {
            let before: Vec<_> = self
                .descriptors
                .iter()
                .enumerate()
                .map(|(i, item)| item.to_diff_item(i))
                .collect();
            let after: Vec<_> = items
                .iter()
                .enumerate()
                .map(|(i, item)| item.to_diff_item(i))
                .collect();
            diff(&before, &after)
        });
        tracer.reconcile(&ReconcileEvent::new(
            id.0,
            self.descriptors.len(),
            items.len(),
            &script,
        ));
        #[cfg(feature = "trace-rich")]
        tracer.item_changes(id.0, &crate::trace::ItemChange::from_script(&script));

        tracer.phase_begin(&PhaseBeginEvent {
            sequence: id.0,
            phase: PhaseKind::Apply,
        });

        let previous: Vec<HandleId> = self.store.arranged().collect();

        // Deleted views leave the arrangement now and are destroyed later.
        let mut removals = Vec::with_capacity(script.deleted.len());
        for &index in script.deleted.iter().rev() {
            if let Some(&handle) = previous.get(index) {
                removals.push(handle);
            }
        }

        let moved_to: BTreeMap<usize, usize> =
            script.moved.iter().map(|&(from, to)| (to, from)).collect();
        let moved_from: BTreeSet<usize> = script.moved.iter().map(|&(from, _)| from).collect();
        // Survivors that kept their relative order fill the remaining slots.
        let mut stable = previous
            .iter()
            .enumerate()
            .filter(|(i, _)| !script.deleted.contains(i) && !moved_from.contains(i))
            .map(|(_, &handle)| handle);

        let mut arranged = Vec::with_capacity(items.len());
        let mut created = Vec::with_capacity(script.inserted.len());
        for (index, item) in items.iter().enumerate() {
            let handle = if script.inserted.contains(&index) {
                let mut view = item.create();
                item.update(&mut *view);
                let handle = self.store.allocate(view);
                self.store.set_hidden(handle, true);
                created.push(handle);
                Some(handle)
            } else if let Some(&from) = moved_to.get(&index) {
                previous.get(from).copied()
            } else {
                stable.next()
            };
            if let Some(handle) = handle {
                arranged.push(handle);
            }
        }
        self.store.arrange(&arranged);

        // New views are in place (hidden) before the transaction opens.
        let changes = self.store.evaluate();
        self.host.apply(&self.store, &changes);

        self.host.begin_transaction(id, self.animation);
        for &handle in &removals {
            self.store.set_hidden(handle, true);
        }
        for &handle in &created {
            self.store.set_hidden(handle, false);
        }
        for &index in &script.reloaded {
            let (Some(item), Some(&handle)) = (items.get(index), arranged.get(index)) else {
                continue;
            };
            if let Some(view) = self.store.get_mut(handle) {
                item.update(view);
                self.store.mark_updated(handle);
            }
        }
        let changes = self.store.evaluate();
        self.host.apply(&self.store, &changes);
        self.host.commit_transaction(id);

        tracer.phase_end(&PhaseEndEvent {
            sequence: id.0,
            phase: PhaseKind::Apply,
        });

        self.descriptors = items;
        self.pending = Some(PendingTransaction { id, removals });
        if self.animation.is_instant() {
            self.complete_transaction_traced(id, true, tracer);
        }
        id
    }
}

impl<H: StackHost + 'static> Renderable for StackView<H> {
    fn role(&self) -> Role {
        Role::Container
    }

    fn owner_transaction_completed(&mut self, finished: bool) {
        if let Some(id) = self.pending_transaction() {
            self.complete_transaction(id, finished);
        }
    }
}

impl<H: StackHost + Default + 'static> Adaptable for StackView<H> {
    type Adapter = StackAdapter;

    fn create() -> Self {
        Self::new(H::default())
    }

    /// Settles the outstanding transaction, then reconciles with the
    /// adapter's items.
    fn update(&mut self, adapter: &StackAdapter) {
        self.settle();
        self.apply_items(adapter.items.clone(), &mut Tracer::none());
    }
}

/// Payload of a nested stack: the descriptors of its children.
///
/// Always compares unequal, so a nested stack re-diffs its children on every
/// parent reconcile.
#[derive(Clone, Debug, Default)]
pub struct StackAdapter {
    items: Vec<DescriptorItem>,
}

impl StackAdapter {
    /// Flattens `body` into the adapter.
    #[must_use]
    pub fn new(body: impl Descriptor) -> Self {
        Self {
            items: body.items(),
        }
    }

    /// Builds the adapter from a [`DescriptorList`].
    #[must_use]
    pub fn build(build: impl FnOnce(&mut DescriptorList)) -> Self {
        let mut list = DescriptorList::new();
        build(&mut list);
        Self {
            items: list.finish(),
        }
    }

    /// The children's descriptors.
    #[must_use]
    pub fn items(&self) -> &[DescriptorItem] {
        &self.items
    }
}

/// Descriptor of a nested [`StackView`].
#[derive(Clone, Debug)]
pub struct StackDescriptor {
    item: DescriptorItem,
}

impl StackDescriptor {
    /// Describes a nested stack hosted by `host()` with the given style.
    ///
    /// The identifier is the stack's type name, so sibling stacks with the
    /// same host type match positionally. Give each one its own identifier
    /// with [`with_identifier`](Self::with_identifier), or add them through
    /// a [`Group`](crate::descriptor::Group).
    pub fn new<H>(host: impl Fn() -> H + 'static, style: StackStyle, adapter: StackAdapter) -> Self
    where
        H: StackHost + Default + 'static,
    {
        let item = DescriptorItem::with_factory::<StackView<H>>(
            move || StackView::with_style(host(), style),
            adapter,
            Diffability::Opaque,
        );
        Self { item }
    }

    /// Replaces the identifier.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.item = self.item.with_identifier(identifier);
        self
    }
}

impl Descriptor for StackDescriptor {
    fn items(&self) -> Vec<DescriptorItem> {
        alloc::vec![self.item.clone()]
    }
}
