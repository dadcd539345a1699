// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-search context: anchor geometry, tuning configuration, and the
//! bounded search window.

use kurbo::{Rect, Size, Vec2};

use quadrille_field::{DEFAULT_EPSILON, is_degenerate};

use crate::snap::snap_size;

/// Whether an anchor reads as a row or a column.
///
/// Derived from the anchor's bounds, never stored on the shape: a wide
/// anchor wants its first neighbor to the right, a tall one wants it below.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Anchor is at least as wide as it is tall.
    Row,
    /// Anchor is taller than wide.
    Column,
}

impl Orientation {
    /// Derive the orientation of a rectangle.
    pub fn of(rect: &Rect) -> Self {
        if rect.width() >= rect.height() {
            Self::Row
        } else {
            Self::Column
        }
    }
}

/// Engine tuning shared across searches.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementConfig {
    /// Grid unit sizes snap to.
    pub grid: f64,
    /// Gap maintained between the anchor and a placed tile.
    pub gap: f64,
    /// Inset from the page bounds inside which tiles must land.
    pub page_inset: f64,
    /// Smallest tile the fit resolver may shrink to.
    pub min: Size,
    /// Optional hard cap on committed tile size.
    pub max: Option<Size>,
    /// Overlap tolerance forwarded to collision probes.
    pub epsilon: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            grid: 8.0,
            gap: 16.0,
            page_inset: 16.0,
            min: Size::new(32.0, 32.0),
            max: None,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// Bounded search window, in strides per axis away from the primary cell.
///
/// The default keeps preview recomputation O(1)-ish regardless of scene
/// size. [`SearchWindow::expanded`] grows it geometrically; callers only do
/// that on explicit request (a held gesture with no result yet).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchWindow {
    /// Horizontal reach, in strides either side of the primary cell.
    pub cols: u32,
    /// Vertical reach, in strides either side of the primary cell.
    pub rows: u32,
}

impl SearchWindow {
    /// Hard cap on either reach; expansion saturates here.
    pub const MAX_REACH: u32 = 48;

    /// Double both reaches, saturating at [`SearchWindow::MAX_REACH`].
    pub fn expanded(self) -> Self {
        Self {
            cols: (self.cols * 2).min(Self::MAX_REACH),
            rows: (self.rows * 2).min(Self::MAX_REACH),
        }
    }

    /// Whether expansion has saturated.
    pub fn is_max(self) -> bool {
        self.cols >= Self::MAX_REACH && self.rows >= Self::MAX_REACH
    }
}

impl Default for SearchWindow {
    fn default() -> Self {
        Self { cols: 6, rows: 6 }
    }
}

/// Immutable inputs of one placement search.
///
/// Built when a placement gesture begins and rebuilt whenever the anchor,
/// camera, or scene changes; discarded when the gesture ends.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorContext {
    /// The anchor's current, unsnapped bounds.
    pub anchor: Rect,
    /// Derived orientation of the anchor.
    pub orientation: Orientation,
    /// Desired tile size before snapping.
    pub desired: Size,
    /// Grid unit.
    pub grid: f64,
    /// Gap between anchor and tile.
    pub gap: f64,
    /// Page-bounds inset.
    pub page_inset: f64,
    /// Minimum tile size for fit variants.
    pub min: Size,
}

impl AnchorContext {
    /// Build a context, deriving orientation from the anchor.
    ///
    /// Returns `None` for a degenerate anchor or desired size; a search
    /// cannot start from nothing.
    pub fn new(anchor: Rect, desired: Size, config: &PlacementConfig) -> Option<Self> {
        if is_degenerate(&anchor) || !(desired.width > 0.0 && desired.height > 0.0) {
            return None;
        }
        Some(Self {
            anchor,
            orientation: Orientation::of(&anchor),
            desired,
            grid: config.grid,
            gap: config.gap,
            page_inset: config.page_inset,
            min: config.min,
        })
    }

    /// Desired size after its single snap pass.
    pub fn snapped_desired(&self) -> Size {
        Size::new(
            snap_size(self.desired.width, self.grid),
            snap_size(self.desired.height, self.grid),
        )
    }

    /// Minimum size after snapping.
    pub fn snapped_min(&self) -> Size {
        Size::new(
            snap_size(self.min.width, self.grid),
            snap_size(self.min.height, self.grid),
        )
    }

    /// Lattice stride per axis: snapped size plus gap.
    pub fn stride(&self) -> Vec2 {
        let s = self.snapped_desired();
        Vec2::new(s.width + self.gap, s.height + self.gap)
    }

    /// Everything the bounded search could possibly touch: the anchor
    /// inflated by the window's reach plus one stride of slack. Useful for
    /// seeding a lane index with just the relevant part of a scene.
    pub fn search_extent(&self, window: SearchWindow) -> Rect {
        let stride = self.stride();
        let dx = (window.cols as f64 + 2.0) * stride.x;
        let dy = (window.rows as f64 + 2.0) * stride.y;
        Rect::new(
            self.anchor.x0 - dx,
            self.anchor.y0 - dy,
            self.anchor.x1 + dx,
            self.anchor.y1 + dy,
        )
    }
}
