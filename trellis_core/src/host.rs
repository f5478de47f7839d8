// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for toolkit integrations.
//!
//! Trellis never touches a real view hierarchy. A toolkit integration
//! provides:
//!
//! - **Presentation**: a [`StackHost`] that applies evaluated
//!   [`StackChanges`] to the native container (insert, show, hide, remove,
//!   reorder), reading handles from the [`HandleStore`].
//!
//! - **Transactions**: the animation runtime. [`StackHost::begin_transaction`]
//!   and [`StackHost::commit_transaction`] bracket the visual changes of one
//!   reconcile pass. When the animation finishes, the host reports back by
//!   calling [`StackView::complete_transaction`] with the same id.
//!
//! - **Base geometry**: a [`FlowLayout`](crate::layout::FlowLayout) for
//!   collection layouts.
//!
//! [`StackView::complete_transaction`]: crate::stack::StackView::complete_transaction

use core::fmt;

use crate::stack::{HandleStore, StackChanges};

/// Identifies one animated transaction of a [`StackView`](crate::stack::StackView).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(pub u64);

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionId({})", self.0)
    }
}

/// Animation parameters handed to [`StackHost::begin_transaction`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Animation {
    /// Duration of the transaction, in seconds.
    pub duration_secs: f64,
}

impl Animation {
    /// The default stack animation.
    pub const DEFAULT: Self = Self {
        duration_secs: 0.15,
    };

    /// Changes are applied without animation.
    pub const NONE: Self = Self { duration_secs: 0.0 };

    /// Returns `true` if the transaction completes immediately.
    #[must_use]
    pub fn is_instant(self) -> bool {
        self.duration_secs <= 0.0
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Visual configuration of a stack container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackStyle {
    /// Distance between adjacent children.
    pub spacing: f64,
    /// Margin between the decoration and the surrounding container.
    pub outer_margin: f64,
    /// Margin between the decoration and the children.
    pub inner_margin: f64,
    /// Whether the container draws a bordered background.
    pub decorated: bool,
}

impl StackStyle {
    /// Plain stack with the standard spacing.
    pub const DEFAULT: Self = Self {
        spacing: 8.0,
        outer_margin: 0.0,
        inner_margin: 0.0,
        decorated: false,
    };

    /// Bordered stack with the given margins.
    #[must_use]
    pub const fn decorated(outer_margin: f64, inner_margin: f64) -> Self {
        Self {
            spacing: Self::DEFAULT.spacing,
            outer_margin,
            inner_margin,
            decorated: true,
        }
    }

    /// Returns a copy with a different spacing.
    #[must_use]
    pub const fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }
}

impl Default for StackStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Applies reconcile results to a native stack container.
///
/// # Reconcile pass
///
/// One call to [`StackView::reconcile`](crate::stack::StackView::reconcile)
/// drives the host like this:
///
/// ```rust,ignore
/// host.apply(&store, &changes);           // new handles (hidden), order
/// host.begin_transaction(id, animation);
/// host.apply(&store, &changes);           // show, hide, content updates
/// host.commit_transaction(id);
/// // ... later, from the animation completion callback:
/// stack.complete_transaction(id, finished);
/// // which calls host.apply(&store, &changes) with the removals.
/// ```
///
/// Handles detached from the arrangement keep their native counterpart until
/// they are reported in [`StackChanges::removed`], so they can animate out.
pub trait StackHost {
    /// Receives the container style once, before any change is applied.
    fn configure(&mut self, style: &StackStyle) {
        _ = style;
    }

    /// Applies the given [`StackChanges`], reading current handle state from
    /// `store` as needed.
    fn apply(&mut self, store: &HandleStore, changes: &StackChanges);

    /// Opens an animated transaction.
    fn begin_transaction(&mut self, id: TransactionId, animation: Animation) {
        _ = (id, animation);
    }

    /// Closes the transaction opened by
    /// [`begin_transaction`](Self::begin_transaction).
    fn commit_transaction(&mut self, id: TransactionId) {
        _ = id;
    }
}
