// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What a session needs from the editor or canvas that embeds it.

use alloc::string::String;

use kurbo::{Point, Rect, Size};
use thiserror::Error;

use quadrille_field::{ObstacleSource, ShapeId};
use quadrille_place::Intent;

/// The single atomic write a commit hands the host.
///
/// Position, size, and content props land together or not at all; a caller
/// observing an in-progress commit must never see a partially-applied
/// shape.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeWrite {
    /// Top-left corner of the new shape.
    pub origin: Point,
    /// Final dimensions from the sizer.
    pub size: Size,
    /// Content payload for the new shape.
    pub intent: Intent,
}

impl ShapeWrite {
    /// Bounds the write will occupy.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }
}

/// Host rejection of an atomic write.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{reason}")]
pub struct CommitError {
    /// Host-provided reason, surfaced verbatim.
    pub reason: String,
}

impl CommitError {
    /// Wrap a host-side rejection reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The editor/canvas surface a session runs against.
///
/// Obstacle queries come via the [`ObstacleSource`] supertrait so the same
/// host object feeds collision probes directly. All methods are expected to
/// be cheap and non-blocking; the session calls them on every preview tick.
pub trait CanvasHost: ObstacleSource {
    /// Current bounds of a shape, or `None` if it no longer exists.
    fn shape_rect(&self, id: ShapeId) -> Option<Rect>;

    /// Bounds of the current page, or `None` for an unbounded canvas.
    fn page_bounds(&self) -> Option<Rect>;

    /// Whether the placement trigger modifier is currently held.
    fn modifier_held(&self) -> bool;

    /// Create a shape from a single all-or-nothing write.
    fn atomic_commit(&mut self, write: &ShapeWrite) -> Result<ShapeId, CommitError>;
}
