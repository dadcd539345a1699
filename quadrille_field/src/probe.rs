// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate probing: bounds clamp, anchor block, lane prune, and the
//! authoritative broad-phase scan, in one composable check.

use kurbo::Rect;

use crate::lanes::{LaneIndex, LanePrune};
use crate::source::ObstacleSource;
use crate::types::{
    DEFAULT_EPSILON, Obstacle, ObstacleFlags, ShapeId, fits_within, is_degenerate, overlaps,
};

/// One axis of the canvas.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

/// Why a candidate was rejected.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BlockCause {
    /// A solid obstacle overlaps the candidate beyond tolerance.
    Obstacle(ShapeId),
    /// The candidate overlaps the anchor shape itself.
    Anchor,
    /// The candidate leaves the inset page bounds.
    OutOfBounds,
    /// The candidate has no usable area.
    Degenerate,
}

/// Outcome of a single candidate check.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Verdict {
    /// Nothing blocks the candidate.
    Free,
    /// The candidate is blocked.
    Blocked(BlockCause),
}

impl Verdict {
    /// True for [`Verdict::Free`].
    pub fn is_free(&self) -> bool {
        matches!(self, Self::Free)
    }
}

/// A verdict plus bookkeeping the caller may act on.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Checked {
    /// The verdict itself.
    pub verdict: Verdict,
    /// Set when the lane index answered `Clear` for an obstacle it has
    /// indexed, yet the broad-phase scan found that obstacle blocking. The
    /// broad-phase result stands; the owner of the lane index should
    /// invalidate the affected region.
    pub desync: Option<ShapeId>,
}

/// Collision probe over an obstacle source.
///
/// Configured once per search with the ignore list, the anchor rectangle,
/// the page bounds, and optionally a [`LaneIndex`] accelerator, then asked
/// about each candidate in turn. The broad-phase scan against the source is
/// always authoritative; lanes only prune.
///
/// ```
/// use kurbo::Rect;
/// use quadrille_field::{Obstacle, ObstacleField, Probe, ShapeId};
///
/// let mut field = ObstacleField::new();
/// field.insert(Obstacle::new(ShapeId::new(1), Rect::new(216.0, 0.0, 456.0, 240.0)));
///
/// let probe = Probe::new(&field).blocking(Rect::new(0.0, 0.0, 200.0, 100.0));
/// assert!(!probe.is_free(&Rect::new(216.0, 0.0, 456.0, 240.0)));
/// assert!(probe.is_free(&Rect::new(216.0, 256.0, 456.0, 496.0)));
/// ```
pub struct Probe<'a, S: ObstacleSource + ?Sized> {
    source: &'a S,
    lanes: Option<&'a LaneIndex>,
    epsilon: f64,
    ignore: &'a [ShapeId],
    anchor: Option<Rect>,
    page: Option<(Rect, f64)>,
}

impl<S: ObstacleSource + ?Sized> core::fmt::Debug for Probe<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Probe")
            .field("epsilon", &self.epsilon)
            .field("ignore", &self.ignore)
            .field("anchor", &self.anchor)
            .field("page", &self.page)
            .field("lanes", &self.lanes.map(|l| l.len()))
            .finish_non_exhaustive()
    }
}

impl<'a, S: ObstacleSource + ?Sized> Probe<'a, S> {
    /// Create a probe over `source` with the default tolerance and no
    /// filters.
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            lanes: None,
            epsilon: DEFAULT_EPSILON,
            ignore: &[],
            anchor: None,
            page: None,
        }
    }

    /// Override the overlap tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Consult a lane index before the broad-phase scan.
    pub fn with_lanes(mut self, lanes: &'a LaneIndex) -> Self {
        self.lanes = Some(lanes);
        self
    }

    /// Ids that never block (the anchor as reported by the host, plus any
    /// active selection the host tracks by id rather than by flag).
    pub fn ignoring(mut self, ignore: &'a [ShapeId]) -> Self {
        self.ignore = ignore;
        self
    }

    /// Treat this rectangle as blocking regardless of the obstacle set.
    ///
    /// The anchor is normally on the ignore list (the host's own query would
    /// otherwise reject the adjacent primary candidate), so the probe tests
    /// it explicitly to keep the spiral from walking over it.
    pub fn blocking(mut self, anchor: Rect) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Reject candidates outside `page` shrunk by `inset` on every side.
    pub fn within(mut self, page: Rect, inset: f64) -> Self {
        self.page = Some((page, inset));
        self
    }

    /// The configured overlap tolerance.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Check a candidate rectangle.
    pub fn check(&self, rect: &Rect) -> Checked {
        if is_degenerate(rect) {
            return Checked {
                verdict: Verdict::Blocked(BlockCause::Degenerate),
                desync: None,
            };
        }
        if let Some((page, inset)) = self.page
            && !fits_within(&page, inset, rect)
        {
            return Checked {
                verdict: Verdict::Blocked(BlockCause::OutOfBounds),
                desync: None,
            };
        }
        if let Some(anchor) = self.anchor
            && overlaps(&anchor, rect, self.epsilon)
        {
            return Checked {
                verdict: Verdict::Blocked(BlockCause::Anchor),
                desync: None,
            };
        }

        let mut lanes_clear = false;
        if let Some(lanes) = self.lanes {
            match lanes.prune(rect) {
                LanePrune::Clear => lanes_clear = true,
                LanePrune::Suspects(suspects) => {
                    for o in &suspects {
                        if self.blocked_by(o, rect) {
                            return Checked {
                                verdict: Verdict::Blocked(BlockCause::Obstacle(o.id)),
                                desync: None,
                            };
                        }
                    }
                }
            }
        }

        // Lanes said free (or were absent, or their suspects all missed):
        // the broad-phase scan decides.
        for o in self.source.intersecting(*rect, self.epsilon) {
            if self.blocked_by(&o, rect) {
                let desync = self
                    .lanes
                    .filter(|l| lanes_clear && l.contains(o.id))
                    .map(|_| o.id);
                return Checked {
                    verdict: Verdict::Blocked(BlockCause::Obstacle(o.id)),
                    desync,
                };
            }
        }
        Checked {
            verdict: Verdict::Free,
            desync: None,
        }
    }

    /// Shorthand for a free/blocked answer.
    pub fn is_free(&self, rect: &Rect) -> bool {
        self.check(rect).verdict.is_free()
    }

    /// Nearest blocking edge along `axis` inside `band`, looking away from
    /// `from` in the `forward` (increasing-coordinate) or backward
    /// direction. The inset page edge participates like an obstacle edge.
    ///
    /// Used by spacing equalization to measure the free run beyond an
    /// accepted candidate.
    pub fn nearest_boundary(&self, band: &Rect, axis: Axis, from: f64, forward: bool) -> Option<f64> {
        let mut best: Option<f64> = None;
        let mut consider = |edge: f64| {
            let beyond = if forward { edge >= from } else { edge <= from };
            if !beyond {
                return;
            }
            best = Some(match best {
                None => edge,
                Some(b) if forward => b.min(edge),
                Some(b) => b.max(edge),
            });
        };

        if let Some((page, inset)) = self.page {
            let edge = match (axis, forward) {
                (Axis::X, true) => page.x1 - inset,
                (Axis::X, false) => page.x0 + inset,
                (Axis::Y, true) => page.y1 - inset,
                (Axis::Y, false) => page.y0 + inset,
            };
            consider(edge);
        }
        for o in self.source.intersecting(*band, self.epsilon) {
            if !o.flags.contains(ObstacleFlags::SOLID)
                || o.flags.contains(ObstacleFlags::SELECTED)
                || self.ignore.contains(&o.id)
                || is_degenerate(&o.rect)
            {
                continue;
            }
            let edge = match (axis, forward) {
                (Axis::X, true) => o.rect.x0,
                (Axis::X, false) => o.rect.x1,
                (Axis::Y, true) => o.rect.y0,
                (Axis::Y, false) => o.rect.y1,
            };
            consider(edge);
        }
        best
    }

    fn blocked_by(&self, o: &Obstacle, rect: &Rect) -> bool {
        o.flags.contains(ObstacleFlags::SOLID)
            && !o.flags.contains(ObstacleFlags::SELECTED)
            && !self.ignore.contains(&o.id)
            && !is_degenerate(&o.rect)
            && overlaps(&o.rect, rect, self.epsilon)
    }
}
