// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The [`HandleStore`](crate::stack::HandleStore) uses multi-channel dirty
//! tracking (via [`understory_dirty`]) so that a reconcile pass only reports
//! the handles it actually touched. Each channel represents an independent
//! category of change, and all of them are local-only: a stack's children
//! form a flat list, so nothing propagates.
//!
//! - [`VISIBILITY`] is marked whenever a handle's hidden flag flips. The
//!   drain compares against the last presented state, so a handle hidden and
//!   shown again before evaluation produces no transition.
//! - [`CONTENT`] is marked when a handle received a new payload.
//! - [`TOPOLOGY`] is marked for each handle whose position in the
//!   arrangement changed.
//!
//! # Consumption
//!
//! Each [`HandleStore::evaluate`](crate::stack::HandleStore::evaluate) call
//! drains all channels and surfaces the results as
//! [`StackChanges`](crate::stack::StackChanges), which hosts
//! [consume](crate::host::StackHost::apply).

use understory_dirty::Channel;

/// Hidden flag changed.
pub const VISIBILITY: Channel = Channel::new(0);

/// Handle was updated with a new payload.
pub const CONTENT: Channel = Channel::new(1);

/// Handle moved to another position in the arrangement.
pub const TOPOLOGY: Channel = Channel::new(2);
