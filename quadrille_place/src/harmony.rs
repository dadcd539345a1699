// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spacing equalization for an accepted candidate.
//!
//! After first-fit acceptance, the tile's far edge may sit at an arbitrary
//! distance from the next boundary (page inset edge or neighboring
//! obstacle) while its near edge keeps the configured gap to the anchor.
//! One refinement pass moves the far edge so both gaps match. The pass is
//! strictly cosmetic: it never changes which candidate won, it refuses to
//! grow the tile into space wide enough for another tile, and it returns
//! the original rectangle whenever the adjusted one would shrink below the
//! minimum or fail the probe.

use kurbo::Rect;

use quadrille_field::{Axis, ObstacleSource, Probe};

use crate::context::{AnchorContext, Orientation};
use crate::snap::snap_size_down;

/// Equalize the far-edge gap of an accepted candidate.
///
/// Returns the adjusted rectangle, or `accepted` unchanged when no
/// adjustment is possible or safe.
pub fn equalize<S: ObstacleSource + ?Sized>(
    ctx: &AnchorContext,
    probe: &Probe<'_, S>,
    accepted: &Rect,
) -> Rect {
    let axis = match ctx.orientation {
        Orientation::Row => Axis::X,
        Orientation::Column => Axis::Y,
    };
    let (near, far, forward, current, minimum, stride) = match axis {
        Axis::X => {
            let forward = accepted.x0 + accepted.x1 >= ctx.anchor.x0 + ctx.anchor.x1;
            let (near, far) = if forward {
                (accepted.x0, accepted.x1)
            } else {
                (accepted.x1, accepted.x0)
            };
            (
                near,
                far,
                forward,
                accepted.width(),
                ctx.snapped_min().width,
                ctx.stride().x,
            )
        }
        Axis::Y => {
            let forward = accepted.y0 + accepted.y1 >= ctx.anchor.y0 + ctx.anchor.y1;
            let (near, far) = if forward {
                (accepted.y0, accepted.y1)
            } else {
                (accepted.y1, accepted.y0)
            };
            (
                near,
                far,
                forward,
                accepted.height(),
                ctx.snapped_min().height,
                ctx.stride().y,
            )
        }
    };

    let band = band_beyond(accepted, axis, far, forward, stride + ctx.gap);
    let Some(boundary) = probe.nearest_boundary(&band, axis, far, forward) else {
        return *accepted;
    };
    let slack = if forward { boundary - far } else { far - boundary };
    let delta = slack - ctx.gap;
    if delta < 0.0 && -delta <= probe.epsilon() {
        return *accepted;
    }
    if delta >= 0.0 && (delta <= probe.epsilon() || slack >= stride) {
        // Growing into a stride-sized hole would take another tile's spot.
        return *accepted;
    }

    let resized = snap_size_down(current + delta, ctx.grid);
    if resized < minimum || resized == current {
        return *accepted;
    }
    let adjusted = match (axis, forward) {
        (Axis::X, true) => Rect::new(near, accepted.y0, near + resized, accepted.y1),
        (Axis::X, false) => Rect::new(near - resized, accepted.y0, near, accepted.y1),
        (Axis::Y, true) => Rect::new(accepted.x0, near, accepted.x1, near + resized),
        (Axis::Y, false) => Rect::new(accepted.x0, near - resized, accepted.x1, near),
    };
    if probe.is_free(&adjusted) {
        adjusted
    } else {
        *accepted
    }
}

fn band_beyond(rect: &Rect, axis: Axis, from: f64, forward: bool, reach: f64) -> Rect {
    match (axis, forward) {
        (Axis::X, true) => Rect::new(from, rect.y0, from + reach, rect.y1),
        (Axis::X, false) => Rect::new(from - reach, rect.y0, from, rect.y1),
        (Axis::Y, true) => Rect::new(rect.x0, from, rect.x1, from + reach),
        (Axis::Y, false) => Rect::new(rect.x0, from - reach, rect.x1, from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PlacementConfig;
    use kurbo::Size;
    use quadrille_field::{Obstacle, ObstacleField, ShapeId};

    fn ctx(anchor: Rect, desired: Size) -> AnchorContext {
        AnchorContext::new(anchor, desired, &PlacementConfig::default()).unwrap()
    }

    #[test]
    fn shrinks_toward_a_close_obstacle() {
        let c = ctx(Rect::new(0.0, 0.0, 200.0, 100.0), Size::new(240.0, 240.0));
        let mut field = ObstacleField::new();
        // Neighbor 8px beyond the accepted far edge; the gap should open to
        // at least the anchor gap of 16.
        field.insert(Obstacle::new(ShapeId::new(1), Rect::new(464.0, 0.0, 600.0, 240.0)));
        let probe = Probe::new(&field);
        let accepted = Rect::new(216.0, 0.0, 456.0, 240.0);
        let adjusted = equalize(&c, &probe, &accepted);
        assert_eq!(adjusted.x0, 216.0);
        assert!(adjusted.x1 <= 464.0 - c.gap);
        assert_eq!(adjusted.width(), snap_size_down(240.0 - 8.0, 8.0));
    }

    #[test]
    fn grows_into_sub_stride_slack() {
        let c = ctx(Rect::new(0.0, 0.0, 200.0, 100.0), Size::new(240.0, 240.0));
        let mut field = ObstacleField::new();
        // 72px of slack: less than a stride (256), more than the gap.
        field.insert(Obstacle::new(ShapeId::new(1), Rect::new(528.0, 0.0, 700.0, 240.0)));
        let probe = Probe::new(&field);
        let accepted = Rect::new(216.0, 0.0, 456.0, 240.0);
        let adjusted = equalize(&c, &probe, &accepted);
        assert!(adjusted.width() > accepted.width());
        assert!(528.0 - adjusted.x1 >= c.gap);
    }

    #[test]
    fn leaves_open_space_alone() {
        let c = ctx(Rect::new(0.0, 0.0, 200.0, 100.0), Size::new(240.0, 240.0));
        let mut field = ObstacleField::new();
        // Slack beyond a full stride: another tile could land there.
        field.insert(Obstacle::new(ShapeId::new(1), Rect::new(800.0, 0.0, 900.0, 240.0)));
        let probe = Probe::new(&field);
        let accepted = Rect::new(216.0, 0.0, 456.0, 240.0);
        assert_eq!(equalize(&c, &probe, &accepted), accepted);
    }

    #[test]
    fn no_boundary_means_no_change() {
        let c = ctx(Rect::new(0.0, 0.0, 200.0, 100.0), Size::new(240.0, 240.0));
        let field = ObstacleField::new();
        let probe = Probe::new(&field);
        let accepted = Rect::new(216.0, 0.0, 456.0, 240.0);
        assert_eq!(equalize(&c, &probe, &accepted), accepted);
    }

    #[test]
    fn never_shrinks_below_minimum() {
        let c = ctx(Rect::new(0.0, 0.0, 200.0, 100.0), Size::new(40.0, 40.0));
        let mut field = ObstacleField::new();
        // Boundary so close that matching the gap would need a sub-minimum
        // tile; the original must survive.
        field.insert(Obstacle::new(ShapeId::new(1), Rect::new(258.0, 0.0, 400.0, 40.0)));
        let probe = Probe::new(&field);
        let accepted = Rect::new(216.0, 0.0, 256.0, 40.0);
        assert_eq!(equalize(&c, &probe, &accepted), accepted);
    }

    #[test]
    fn equalizes_vertically_for_column_anchors() {
        let c = ctx(Rect::new(0.0, 0.0, 100.0, 200.0), Size::new(240.0, 240.0));
        let mut field = ObstacleField::new();
        field.insert(Obstacle::new(ShapeId::new(1), Rect::new(0.0, 464.0, 240.0, 600.0)));
        let probe = Probe::new(&field);
        let accepted = Rect::new(0.0, 216.0, 240.0, 456.0);
        let adjusted = equalize(&c, &probe, &accepted);
        assert_eq!(adjusted.y0, 216.0);
        assert!(464.0 - adjusted.y1 >= c.gap);
        assert!(adjusted.height() < accepted.height());
    }

    #[test]
    fn page_inset_edge_counts_as_a_boundary() {
        let c = ctx(Rect::new(0.0, 0.0, 200.0, 100.0), Size::new(240.0, 240.0));
        let field = ObstacleField::new();
        let probe = Probe::new(&field).within(Rect::new(0.0, 0.0, 480.0, 600.0), 8.0);
        let accepted = Rect::new(216.0, 0.0, 456.0, 240.0);
        // Inner page edge at 472, slack 16 == gap: already harmonious.
        assert_eq!(equalize(&c, &probe, &accepted), accepted);
    }
}
