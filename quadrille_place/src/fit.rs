// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Size-reduced fallback variants.
//!
//! Tried only after the full bounded spiral fails. Each variant sits
//! directly against one side of the anchor with the near edge fixed and the
//! away dimension shrunk in grid steps, down to the configured minimum.
//! Variants are ordered smallest-shrink first; at equal shrink the
//! orientation's primary side wins.

use kurbo::Rect;

use crate::context::{AnchorContext, Orientation};
use crate::spiral::{Candidate, Source};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Side {
    Right,
    Below,
    Left,
    Above,
}

impl Side {
    fn shrinks_width(self) -> bool {
        matches!(self, Self::Right | Self::Left)
    }
}

const ROW_SIDES: [Side; 4] = [Side::Right, Side::Below, Side::Left, Side::Above];
const COL_SIDES: [Side; 4] = [Side::Below, Side::Right, Side::Above, Side::Left];

/// Iterator over shrink variants for a context whose spiral came up empty.
#[derive(Clone, Debug)]
pub struct FitVariants {
    anchor: Rect,
    gap: f64,
    grid: f64,
    full_w: f64,
    full_h: f64,
    steps_w: u32,
    steps_h: u32,
    sides: [Side; 4],
    step: u32,
    side_idx: usize,
}

impl FitVariants {
    /// Build the variant sequence for a context.
    pub fn new(ctx: &AnchorContext) -> Self {
        let full = ctx.snapped_desired();
        let min = ctx.snapped_min();
        let steps_w = grid_steps(full.width, min.width, ctx.grid);
        let steps_h = grid_steps(full.height, min.height, ctx.grid);
        Self {
            anchor: ctx.anchor,
            gap: ctx.gap,
            grid: ctx.grid,
            full_w: full.width,
            full_h: full.height,
            steps_w,
            steps_h,
            sides: match ctx.orientation {
                Orientation::Row => ROW_SIDES,
                Orientation::Column => COL_SIDES,
            },
            step: 1,
            side_idx: 0,
        }
    }

    fn rect_for(&self, side: Side, step: u32) -> Rect {
        let shrink = f64::from(step) * self.grid;
        let (w, h) = if side.shrinks_width() {
            (self.full_w - shrink, self.full_h)
        } else {
            (self.full_w, self.full_h - shrink)
        };
        let (x, y) = match side {
            Side::Right => (self.anchor.x1 + self.gap, self.anchor.y0),
            Side::Below => (self.anchor.x0, self.anchor.y1 + self.gap),
            Side::Left => (self.anchor.x0 - self.gap - w, self.anchor.y0),
            Side::Above => (self.anchor.x0, self.anchor.y0 - self.gap - h),
        };
        Rect::new(x, y, x + w, y + h)
    }
}

impl Iterator for FitVariants {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        let max_steps = self.steps_w.max(self.steps_h);
        loop {
            if self.step > max_steps {
                return None;
            }
            if self.side_idx == self.sides.len() {
                self.side_idx = 0;
                self.step += 1;
                continue;
            }
            let side = self.sides[self.side_idx];
            self.side_idx += 1;
            let side_limit = if side.shrinks_width() {
                self.steps_w
            } else {
                self.steps_h
            };
            if self.step > side_limit {
                continue;
            }
            return Some(Candidate {
                rect: self.rect_for(side, self.step),
                source: Source::FitVariant,
            });
        }
    }
}

/// Whole grid steps available between a snapped size and its snapped
/// minimum.
fn grid_steps(full: f64, min: f64, grid: f64) -> u32 {
    if grid <= 0.0 || full <= min {
        return 0;
    }
    // Both inputs are grid multiples; round the quotient to absorb float
    // division noise.
    let q = (full - min) / grid + 0.5;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Quotient of snapped sizes is small and non-negative."
    )]
    let steps = q as u32;
    steps
}
