// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazy spiral candidate generation.
//!
//! Candidates live on a lattice of tile-sized cells anchored at the primary
//! position: immediately right of the anchor for row orientation,
//! immediately below for column orientation. The walk starts at the primary
//! cell and spirals outward clockwise in strides of snapped-size-plus-gap,
//! so a row anchor tries right, then below-right, and onward around the
//! ring; a column anchor tries below, then right-of-below.
//!
//! The sequence is finite: cells outside the [`SearchWindow`] are skipped
//! and the walk stops once a whole ring lies outside it. Consumption is
//! first-fit; the generator never ranks candidates.

use kurbo::{Point, Rect, Size, Vec2};

use crate::context::{AnchorContext, Orientation, SearchWindow};

/// Which tier produced a candidate.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Source {
    /// The primary position adjacent to the anchor.
    Primary,
    /// A later cell of the spiral sweep.
    Spiral,
    /// A size-reduced variant from the fit resolver.
    FitVariant,
}

/// A proposed placement rectangle under evaluation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Candidate {
    /// World-space bounds. The size is snapped; the position is derived
    /// from the unsnapped anchor edges and is not re-snapped.
    pub rect: Rect,
    /// Which tier produced it.
    pub source: Source,
}

// Clockwise direction cycles, phased so the first step leaves the primary
// cell in the orientation's second-preference direction.
const ROW_DIRS: [(i32, i32); 4] = [(0, 1), (-1, 0), (0, -1), (1, 0)];
const COL_DIRS: [(i32, i32); 4] = [(1, 0), (0, -1), (-1, 0), (0, 1)];

/// Lazy spiral iterator over placement candidates.
#[derive(Clone, Debug)]
pub struct Candidates {
    origin: Point,
    stride: Vec2,
    size: Size,
    dirs: [(i32, i32); 4],
    window: SearchWindow,
    cell: (i32, i32),
    dir: usize,
    leg_len: u32,
    run: u32,
    second_leg: bool,
    started: bool,
    done: bool,
}

impl Candidates {
    /// Start a spiral for the given context and window.
    pub fn new(ctx: &AnchorContext, window: SearchWindow) -> Self {
        let size = ctx.snapped_desired();
        let (origin, dirs) = match ctx.orientation {
            Orientation::Row => (Point::new(ctx.anchor.x1 + ctx.gap, ctx.anchor.y0), ROW_DIRS),
            Orientation::Column => (
                Point::new(ctx.anchor.x0, ctx.anchor.y1 + ctx.gap),
                COL_DIRS,
            ),
        };
        Self {
            origin,
            stride: ctx.stride(),
            size,
            dirs,
            window,
            cell: (0, 0),
            dir: 0,
            leg_len: 1,
            run: 1,
            second_leg: false,
            started: false,
            done: false,
        }
    }

    fn rect_for(&self, cell: (i32, i32)) -> Rect {
        let x = self.origin.x + f64::from(cell.0) * self.stride.x;
        let y = self.origin.y + f64::from(cell.1) * self.stride.y;
        Rect::new(x, y, x + self.size.width, y + self.size.height)
    }

    fn in_window(&self, cell: (i32, i32)) -> bool {
        cell.0.unsigned_abs() <= self.window.cols && cell.1.unsigned_abs() <= self.window.rows
    }
}

impl Iterator for Candidates {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(Candidate {
                rect: self.rect_for((0, 0)),
                source: Source::Primary,
            });
        }
        let reach = 2 * self.window.cols.max(self.window.rows) + 1;
        loop {
            if self.leg_len > reach {
                self.done = true;
                return None;
            }
            let (dx, dy) = self.dirs[self.dir];
            self.cell = (self.cell.0 + dx, self.cell.1 + dy);
            self.run -= 1;
            if self.run == 0 {
                self.dir = (self.dir + 1) % 4;
                if self.second_leg {
                    self.leg_len += 1;
                }
                self.second_leg = !self.second_leg;
                self.run = self.leg_len;
            }
            if self.in_window(self.cell) {
                return Some(Candidate {
                    rect: self.rect_for(self.cell),
                    source: Source::Spiral,
                });
            }
        }
    }
}
