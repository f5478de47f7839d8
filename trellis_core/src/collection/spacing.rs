// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertical space and inset presets, in points.

/// No space.
pub const ZERO: f64 = 0.0;

/// Tight space between related cells.
pub const SMALL: f64 = 5.0;

/// Default space between cells of one group.
pub const MEDIUM: f64 = 10.0;

/// Space between groups.
pub const BIG: f64 = 20.0;

/// Space between unrelated blocks.
pub const HUGE: f64 = 40.0;

/// Default left and right inset of a section.
pub const SECTION_INSET: f64 = 15.0;
