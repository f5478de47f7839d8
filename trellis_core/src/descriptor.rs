// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Descriptor model.
//!
//! A *descriptor* is a short-lived value describing one view that should be on
//! screen: how to create it, how to push a payload into it, and what identity
//! and payload the [diff engine](crate::diff) should see. Descriptors are built
//! fresh for every update and consumed by the
//! [stack reconciler](crate::stack::StackView::reconcile).
//!
//! Composite descriptors flatten into ordered [`DescriptorItem`] lists:
//!
//! - [`If`] contributes its body only when its condition holds.
//! - [`Group`] flattens its body and then runs the identifier collision
//!   resolver ([`disambiguate`]) so repeated view types stay distinct.
//! - [`DescriptorList`] is the builder that host code uses to assemble lists
//!   imperatively with the same semantics.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut list = DescriptorList::new();
//! list.add(DescriptorItem::describe::<Label>("Title".into()))
//!     .add_if(show_details, |list| {
//!         list.add(DescriptorItem::describe::<Label>("Details".into()));
//!     })
//!     .add_group(|list| {
//!         list.add(DescriptorItem::describe::<Switch>(true));
//!         list.add(DescriptorItem::describe::<Switch>(false));
//!     });
//! stack.reconcile(list.finish())?;
//! ```

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::{Any, type_name};
use core::fmt;

use hashbrown::{HashMap, HashSet};

use crate::diff::{DiffItem, Diffability};

/// How a live handle relates to the children below it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Role {
    /// A plain view.
    #[default]
    Leaf,
    /// A view that reconciles its own children (e.g. a nested stack).
    Container,
}

/// A live view handle owned by a [`HandleStore`](crate::stack::HandleStore).
pub trait Renderable: Any + 'static {
    /// Whether this handle drives its own children.
    fn role(&self) -> Role {
        Role::Leaf
    }

    /// Called on [`Role::Container`] children when the transaction of the
    /// stack that owns them completes. Containers complete their own
    /// outstanding transaction with the same `finished` flag.
    fn owner_transaction_completed(&mut self, finished: bool) {
        let _ = finished;
    }
}

/// A view type that can be created and updated from a typed payload.
pub trait Adaptable: Renderable + Sized {
    /// The payload pushed into the view on every update.
    type Adapter: 'static;

    /// Creates a fresh view.
    fn create() -> Self;

    /// Pushes `adapter` into the view.
    fn update(&mut self, adapter: &Self::Adapter);
}

type CreateFn = Rc<dyn Fn() -> Box<dyn Renderable>>;
type UpdateFn = Rc<dyn Fn(&mut dyn Renderable)>;

/// One flattened descriptor: identity, payload, factory and updater.
#[derive(Clone)]
pub struct DescriptorItem {
    identifier: String,
    diffable: Diffability,
    create: CreateFn,
    update: UpdateFn,
}

impl DescriptorItem {
    /// Builds an item from raw parts.
    pub fn from_parts(
        identifier: impl Into<String>,
        diffable: Diffability,
        create: impl Fn() -> Box<dyn Renderable> + 'static,
        update: impl Fn(&mut dyn Renderable) + 'static,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            diffable,
            create: Rc::new(create),
            update: Rc::new(update),
        }
    }

    /// Describes a `V` whose payload takes part in reload decisions.
    ///
    /// The identifier is the type name of `V`; the item reloads only when the
    /// new adapter differs from the previous one.
    #[must_use]
    pub fn describe<V>(adapter: V::Adapter) -> Self
    where
        V: Adaptable,
        V::Adapter: Clone + PartialEq,
    {
        let diffable = Diffability::token(adapter.clone());
        Self::with_factory(V::create, adapter, diffable)
    }

    /// Describes a `V` that is updated on every reconcile pass.
    #[must_use]
    pub fn describe_opaque<V: Adaptable>(adapter: V::Adapter) -> Self {
        Self::with_factory(V::create, adapter, Diffability::Opaque)
    }

    /// Describes a `V` built by `factory` instead of [`Adaptable::create`].
    ///
    /// # Panics
    ///
    /// The resulting updater panics if it is applied to a handle that is not
    /// a `V`.
    pub fn with_factory<V: Adaptable>(
        factory: impl Fn() -> V + 'static,
        adapter: V::Adapter,
        diffable: Diffability,
    ) -> Self {
        Self {
            identifier: String::from(type_name::<V>()),
            diffable,
            create: Rc::new(move || Box::new(factory()) as Box<dyn Renderable>),
            update: Rc::new(move |handle: &mut dyn Renderable| {
                let handle: &mut dyn Any = handle;
                let Some(view) = handle.downcast_mut::<V>() else {
                    panic!(
                        "descriptor for `{}` applied to a handle of another type",
                        type_name::<V>()
                    );
                };
                view.update(&adapter);
            }),
        }
    }

    /// Replaces the identifier.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Identity used by the diff engine.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Payload used for reload decisions.
    #[must_use]
    pub fn diffable(&self) -> &Diffability {
        &self.diffable
    }

    /// Creates a fresh handle. The payload is not applied yet.
    #[must_use]
    pub fn create(&self) -> Box<dyn Renderable> {
        (self.create)()
    }

    /// Applies the payload to `handle`.
    pub fn update(&self, handle: &mut dyn Renderable) {
        (self.update)(handle);
    }

    pub(crate) fn to_diff_item(&self, index: usize) -> DiffItem<usize, &str> {
        DiffItem::new(index, self.identifier.as_str(), self.diffable.clone())
    }
}

impl fmt::Debug for DescriptorItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorItem")
            .field("identifier", &self.identifier)
            .field("diffable", &self.diffable)
            .finish_non_exhaustive()
    }
}

/// Anything that flattens into an ordered list of [`DescriptorItem`]s.
pub trait Descriptor {
    /// Returns the flattened items, in order.
    fn items(&self) -> Vec<DescriptorItem>;
}

impl Descriptor for DescriptorItem {
    fn items(&self) -> Vec<DescriptorItem> {
        alloc::vec![self.clone()]
    }
}

impl<D: Descriptor> Descriptor for Vec<D> {
    fn items(&self) -> Vec<DescriptorItem> {
        self.iter().flat_map(Descriptor::items).collect()
    }
}

impl<D: Descriptor + ?Sized> Descriptor for &D {
    fn items(&self) -> Vec<DescriptorItem> {
        (**self).items()
    }
}

/// Conditional inclusion.
#[derive(Clone, Debug)]
pub struct If {
    body: Vec<DescriptorItem>,
}

impl If {
    /// Runs `build` only when `condition` holds.
    pub fn new(condition: bool, build: impl FnOnce(&mut DescriptorList)) -> Self {
        let mut list = DescriptorList::new();
        if condition {
            build(&mut list);
        }
        Self { body: list.items }
    }
}

impl Descriptor for If {
    fn items(&self) -> Vec<DescriptorItem> {
        self.body.clone()
    }
}

/// Grouping with identifier disambiguation.
#[derive(Clone, Debug)]
pub struct Group {
    body: Vec<DescriptorItem>,
}

impl Group {
    /// Flattens the items added by `build` and disambiguates their identifiers.
    pub fn new(build: impl FnOnce(&mut DescriptorList)) -> Self {
        let mut list = DescriptorList::new();
        build(&mut list);
        disambiguate(&mut list.items);
        Self { body: list.items }
    }
}

impl Descriptor for Group {
    fn items(&self) -> Vec<DescriptorItem> {
        self.body.clone()
    }
}

/// Imperative builder for descriptor lists.
#[derive(Clone, Debug, Default)]
pub struct DescriptorList {
    items: Vec<DescriptorItem>,
}

impl DescriptorList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the flattened items of `descriptor`.
    pub fn add(&mut self, descriptor: impl Descriptor) -> &mut Self {
        self.items.extend(descriptor.items());
        self
    }

    /// Appends the items added by `build` when `condition` holds.
    pub fn add_if(&mut self, condition: bool, build: impl FnOnce(&mut Self)) -> &mut Self {
        if condition {
            build(self);
        }
        self
    }

    /// Appends the items added by `build` as a disambiguated group.
    pub fn add_group(&mut self, build: impl FnOnce(&mut Self)) -> &mut Self {
        let mut group = Group::new(build);
        self.items.append(&mut group.body);
        self
    }

    /// Number of items added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the flattened items.
    #[must_use]
    pub fn finish(self) -> Vec<DescriptorItem> {
        self.items
    }
}

impl Descriptor for DescriptorList {
    fn items(&self) -> Vec<DescriptorItem> {
        self.items.clone()
    }
}

/// Makes identifiers unique by suffixing repeats.
///
/// The first occurrence of an identifier is left untouched; the n-th repeated
/// occurrence gets the suffix `#n`. When `id#n` is already used elsewhere in
/// `items` (an earlier group already suffixed it, or the caller chose it), `n`
/// is bumped until the suffixed identifier is free.
pub fn disambiguate(items: &mut [DescriptorItem]) {
    let mut taken: HashSet<String> = items.iter().map(|i| i.identifier.clone()).collect();
    let mut first: HashSet<String> = HashSet::with_capacity(items.len());
    let mut repeats: HashMap<String, usize> = HashMap::new();
    for item in items.iter_mut() {
        if first.insert(item.identifier.clone()) {
            continue;
        }
        let n = repeats.entry(item.identifier.clone()).or_insert(0);
        let suffixed = loop {
            *n += 1;
            let candidate = format!("{}#{}", item.identifier, n);
            if !taken.contains(&candidate) {
                break candidate;
            }
        };
        taken.insert(suffixed.clone());
        item.identifier = suffixed;
    }
}
