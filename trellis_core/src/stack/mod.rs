// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear stack reconciliation.
//!
//! A [`StackView`] keeps an ordered list of live view handles in sync with a
//! list of [`DescriptorItem`](crate::descriptor::DescriptorItem)s. Each
//! handle has:
//!
//! - An identity ([`HandleId`]), a generational handle that becomes stale when
//!   the view is destroyed, preventing use-after-free bugs at the API level.
//! - A position in the store's *arrangement*, the order the host lays views
//!   out in.
//! - A hidden flag, flipped inside animated transactions to fade views in and
//!   out.
//!
//! Handles are stored in struct-of-arrays layout in a [`HandleStore`], the
//! single owner of live views. Everything else refers to them by id.
//!
//! # Dirty tracking
//!
//! Store mutations mark the corresponding dirty channel (see
//! [`dirty`](crate::dirty)); [`HandleStore::evaluate`] drains them into a
//! [`StackChanges`] value for the host.

mod evaluate;
mod id;
mod store;
mod view;

pub use evaluate::StackChanges;
pub use id::HandleId;
pub use store::HandleStore;
pub use view::{ReconcileError, StackAdapter, StackDescriptor, StackView};
