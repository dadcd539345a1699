// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The obstacle access seam between the placement engine and a host scene.

use alloc::boxed::Box;

use kurbo::Rect;

use crate::types::Obstacle;

/// Read-only access to the obstacles of a scene.
///
/// The probe asks a source only for obstacles near a candidate rectangle, so
/// hosts backed by their own spatial index can answer cheaply. A source may
/// over-report (return obstacles that do not actually intersect); the probe
/// re-tests every returned rectangle. [`ObstacleField`](crate::ObstacleField)
/// is the in-tree implementation, useful for tests and for hosts without a
/// store of their own.
pub trait ObstacleSource {
    /// Obstacles whose bounds overlap `rect` by more than `epsilon` on both
    /// axes. Degenerate obstacles may be omitted or returned; callers skip
    /// them either way.
    fn intersecting<'a>(
        &'a self,
        rect: Rect,
        epsilon: f64,
    ) -> Box<dyn Iterator<Item = Obstacle> + 'a>;
}
