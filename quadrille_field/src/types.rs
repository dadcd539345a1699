// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive types: shape identifiers, obstacles, 1D intervals, and
//! epsilon-tolerant rectangle helpers.

use alloc::vec::Vec;

use kurbo::Rect;

/// Overlap tolerance used when none is specified explicitly.
///
/// Two rectangles must overlap by more than this amount on **both** axes to
/// count as colliding, so merely-touching neighbors (a tile placed exactly
/// one gap away, or sharing an edge) are never rejected.
pub const DEFAULT_EPSILON: f64 = 0.5;

/// Host-assigned identifier for a shape on the canvas.
///
/// The field never mints these; they come from the host scene and are only
/// compared and stored here.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ShapeId(u64);

impl ShapeId {
    /// Wrap a raw host identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw host identifier.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

bitflags::bitflags! {
    /// Obstacle flags controlling participation in collision queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ObstacleFlags: u8 {
        /// Obstacle blocks placement (participates in collision probing).
        const SOLID    = 0b0000_0001;
        /// Obstacle is part of the active selection; probes skip it the same
        /// way they skip ids on the explicit ignore list.
        const SELECTED = 0b0000_0010;
    }
}

impl Default for ObstacleFlags {
    fn default() -> Self {
        Self::SOLID
    }
}

/// An existing item on the canvas, as seen by the placement engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Obstacle {
    /// Host identifier of the shape.
    pub id: ShapeId,
    /// Current world-space bounds.
    pub rect: Rect,
    /// Collision participation flags.
    pub flags: ObstacleFlags,
}

impl Obstacle {
    /// Create a solid obstacle.
    pub fn new(id: ShapeId, rect: Rect) -> Self {
        Self {
            id,
            rect,
            flags: ObstacleFlags::default(),
        }
    }

    /// Replace the flags, builder-style.
    pub fn with_flags(mut self, flags: ObstacleFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Whether a rectangle has no usable area. Assumes no NaN produces `true`.
#[inline]
pub fn is_degenerate(r: &Rect) -> bool {
    !(r.width() > 0.0 && r.height() > 0.0)
}

/// Whether two rectangles overlap by more than `epsilon` on both axes.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect, epsilon: f64) -> bool {
    let ox = a.x1.min(b.x1) - a.x0.max(b.x0);
    let oy = a.y1.min(b.y1) - a.y0.max(b.y0);
    ox > epsilon && oy > epsilon
}

/// Whether `r` lies entirely inside `bounds` shrunk by `inset` on every side.
#[inline]
pub fn fits_within(bounds: &Rect, inset: f64, r: &Rect) -> bool {
    r.x0 >= bounds.x0 + inset
        && r.y0 >= bounds.y0 + inset
        && r.x1 <= bounds.x1 - inset
        && r.y1 <= bounds.y1 - inset
}

/// Truncate `r` against `bounds` shrunk by `inset`.
///
/// Positions are only clipped, never re-snapped. Returns `None` when nothing
/// with positive area remains.
pub fn truncate_to(bounds: &Rect, inset: f64, r: &Rect) -> Option<Rect> {
    let inner = Rect::new(
        bounds.x0 + inset,
        bounds.y0 + inset,
        bounds.x1 - inset,
        bounds.y1 - inset,
    );
    let clipped = r.intersect(inner);
    if is_degenerate(&clipped) {
        None
    } else {
        Some(clipped)
    }
}

/// A 1D occupied span inside a lane.
///
/// Lane interval lists are kept sorted by `start`, disjoint, and
/// non-touching: inserting a span that overlaps or touches existing spans
/// (within the lane's epsilon) coalesces them into one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interval {
    /// Span start.
    pub start: f64,
    /// Span end. Invariant: `end >= start`.
    pub end: f64,
}

impl Interval {
    /// Create a span. Debug-asserts the ordering invariant.
    pub fn new(start: f64, end: f64) -> Self {
        debug_assert!(end >= start, "interval must not be inverted");
        Self { start, end }
    }

    /// The horizontal extent of a rectangle.
    pub fn of_x(r: &Rect) -> Self {
        Self::new(r.x0, r.x1)
    }

    /// The vertical extent of a rectangle.
    pub fn of_y(r: &Rect) -> Self {
        Self::new(r.y0, r.y1)
    }

    /// Span length.
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Whether the spans overlap by more than `epsilon`.
    #[inline]
    pub fn overlaps(&self, other: &Self, epsilon: f64) -> bool {
        self.end.min(other.end) - self.start.max(other.start) > epsilon
    }

    /// Whether the spans overlap or the gap between them is at most
    /// `epsilon` (the coalescing rule).
    #[inline]
    fn joins(&self, other: &Self, epsilon: f64) -> bool {
        self.end.min(other.end) - self.start.max(other.start) >= -epsilon
    }
}

/// Insert `iv` into a sorted, disjoint, non-touching interval list,
/// coalescing any spans it overlaps or touches.
pub fn coalesce_insert(list: &mut Vec<Interval>, iv: Interval, epsilon: f64) {
    let lo = list.partition_point(|v| v.end < iv.start - epsilon);
    let mut hi = lo;
    let mut merged = iv;
    while hi < list.len() && list[hi].joins(&merged, epsilon) {
        merged.start = merged.start.min(list[hi].start);
        merged.end = merged.end.max(list[hi].end);
        hi += 1;
    }
    list.drain(lo..hi);
    list.insert(lo, merged);
}

/// Whether any span in a sorted, disjoint list overlaps `iv` by more than
/// `epsilon`. `O(log n)`.
pub fn any_overlap(list: &[Interval], iv: &Interval, epsilon: f64) -> bool {
    let i = list.partition_point(|v| v.end <= iv.start + epsilon);
    match list.get(i) {
        Some(v) => v.overlaps(iv, epsilon),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(!overlaps(&a, &b, DEFAULT_EPSILON));
        // A real overlap on both axes is detected.
        let c = Rect::new(8.0, 8.0, 20.0, 20.0);
        assert!(overlaps(&a, &c, DEFAULT_EPSILON));
    }

    #[test]
    fn sub_epsilon_overlap_is_free() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(9.7, 0.0, 20.0, 10.0);
        assert!(!overlaps(&a, &b, DEFAULT_EPSILON));
    }

    #[test]
    fn one_axis_overlap_is_free() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(2.0, 30.0, 8.0, 40.0);
        assert!(!overlaps(&a, &b, DEFAULT_EPSILON));
    }

    #[test]
    fn degenerate_rects() {
        assert!(is_degenerate(&Rect::new(0.0, 0.0, 0.0, 10.0)));
        assert!(is_degenerate(&Rect::new(5.0, 5.0, 4.0, 10.0)));
        assert!(!is_degenerate(&Rect::new(0.0, 0.0, 1.0, 1.0)));
        assert!(is_degenerate(&Rect::new(0.0, 0.0, f64::NAN, 10.0)));
    }

    #[test]
    fn fits_within_inset_bounds() {
        let page = Rect::new(0.0, 0.0, 800.0, 600.0);
        assert!(fits_within(
            &page,
            20.0,
            &Rect::new(20.0, 20.0, 780.0, 580.0)
        ));
        assert!(!fits_within(
            &page,
            20.0,
            &Rect::new(780.0, 0.0, 1020.0, 240.0)
        ));
    }

    #[test]
    fn truncate_clips_without_resnapping() {
        let page = Rect::new(0.0, 0.0, 800.0, 600.0);
        let r = Rect::new(700.0, 13.0, 900.0, 100.0);
        let t = truncate_to(&page, 20.0, &r).unwrap();
        assert_eq!(t, Rect::new(700.0, 20.0, 780.0, 100.0));
        assert!(truncate_to(&page, 20.0, &Rect::new(900.0, 0.0, 950.0, 50.0)).is_none());
    }

    #[test]
    fn coalesce_merges_touching_spans() {
        let mut list = Vec::new();
        coalesce_insert(&mut list, Interval::new(0.0, 10.0), 0.5);
        coalesce_insert(&mut list, Interval::new(20.0, 30.0), 0.5);
        assert_eq!(list.len(), 2);
        // Bridges both existing spans.
        coalesce_insert(&mut list, Interval::new(9.0, 21.0), 0.5);
        assert_eq!(list, vec![Interval::new(0.0, 30.0)]);
    }

    #[test]
    fn coalesce_keeps_disjoint_spans_sorted() {
        let mut list = Vec::new();
        coalesce_insert(&mut list, Interval::new(40.0, 50.0), 0.5);
        coalesce_insert(&mut list, Interval::new(0.0, 10.0), 0.5);
        coalesce_insert(&mut list, Interval::new(20.0, 30.0), 0.5);
        assert_eq!(
            list,
            vec![
                Interval::new(0.0, 10.0),
                Interval::new(20.0, 30.0),
                Interval::new(40.0, 50.0)
            ]
        );
    }

    #[test]
    fn any_overlap_binary_search() {
        let list = vec![
            Interval::new(0.0, 10.0),
            Interval::new(20.0, 30.0),
            Interval::new(40.0, 50.0),
        ];
        assert!(any_overlap(&list, &Interval::new(25.0, 28.0), 0.5));
        assert!(any_overlap(&list, &Interval::new(9.0, 21.0), 0.5));
        assert!(!any_overlap(&list, &Interval::new(11.0, 19.0), 0.5));
        assert!(!any_overlap(&list, &Interval::new(29.8, 40.2), 0.5));
        assert!(!any_overlap(&list, &Interval::new(60.0, 70.0), 0.5));
    }
}
