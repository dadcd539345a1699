// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! First-fit placement search: spiral sweep, then fit variants, then
//! spacing equalization on whatever won.

use alloc::vec::Vec;

use kurbo::Rect;

use quadrille_field::{ObstacleSource, Probe, ShapeId};

use crate::context::{AnchorContext, SearchWindow};
use crate::fit::FitVariants;
use crate::harmony;
use crate::spiral::{Candidates, Source};

/// A successful placement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// Final bounds after equalization.
    pub rect: Rect,
    /// Which tier produced the winning candidate.
    pub source: Source,
}

/// Everything one search run learned.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchReport {
    /// The placement, or `None` when the window (and every fit variant) was
    /// exhausted.
    pub placement: Option<Placement>,
    /// Obstacles the lane index claimed clear but the broad-phase scan
    /// blocked on. The lane index owner should invalidate their regions.
    pub stale_hits: Vec<ShapeId>,
    /// Candidates probed before the search ended.
    pub tried: u32,
}

/// Run a bounded first-fit search.
///
/// Spiral candidates are consumed greedily; the first free one wins and is
/// handed to the equalizer. Shrink variants form a strictly later tier:
/// they are only consulted once the whole spiral came up blocked. No
/// scoring, no ranking, no backtracking.
pub fn search<S: ObstacleSource + ?Sized>(
    ctx: &AnchorContext,
    probe: &Probe<'_, S>,
    window: SearchWindow,
) -> SearchReport {
    let mut report = SearchReport::default();
    let spiral = Candidates::new(ctx, window);
    let variants = FitVariants::new(ctx);
    for candidate in spiral.chain(variants) {
        report.tried += 1;
        let checked = probe.check(&candidate.rect);
        if let Some(id) = checked.desync {
            report.stale_hits.push(id);
        }
        if checked.verdict.is_free() {
            let rect = harmony::equalize(ctx, probe, &candidate.rect);
            report.placement = Some(Placement {
                rect,
                source: candidate.source,
            });
            return report;
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PlacementConfig;
    use kurbo::Size;
    use quadrille_field::{Obstacle, ObstacleField, overlaps};

    fn ctx(anchor: Rect, desired: Size) -> AnchorContext {
        AnchorContext::new(anchor, desired, &PlacementConfig::default()).unwrap()
    }

    fn field_with(rects: &[Rect]) -> ObstacleField {
        let mut field = ObstacleField::new();
        for (i, r) in rects.iter().enumerate() {
            field.insert(Obstacle::new(ShapeId::new(i as u64), *r));
        }
        field
    }

    // Empty scene: the primary candidate is exactly anchor.right + gap at
    // the anchor's top, with the snapped desired size.
    #[test]
    fn open_scene_takes_the_primary_slot() {
        let c = ctx(Rect::new(0.0, 0.0, 200.0, 100.0), Size::new(240.0, 240.0));
        let field = field_with(&[]);
        let probe = Probe::new(&field).blocking(c.anchor);
        let report = search(&c, &probe, SearchWindow::default());
        let placement = report.placement.unwrap();
        assert_eq!(placement.rect, Rect::new(216.0, 0.0, 456.0, 240.0));
        assert_eq!(placement.source, Source::Primary);
        assert_eq!(report.tried, 1);
    }

    // A blocked primary falls through to the next spiral stride below it.
    #[test]
    fn blocked_primary_steps_down_the_spiral() {
        let c = ctx(Rect::new(0.0, 0.0, 200.0, 100.0), Size::new(240.0, 240.0));
        let obstacle = Rect::new(216.0, 0.0, 456.0, 240.0);
        let field = field_with(&[obstacle]);
        let probe = Probe::new(&field).blocking(c.anchor);
        let report = search(&c, &probe, SearchWindow::default());
        let placement = report.placement.unwrap();
        assert_eq!(placement.rect, Rect::new(216.0, 256.0, 456.0, 496.0));
        assert_eq!(placement.source, Source::Spiral);
        assert!(!overlaps(&placement.rect, &obstacle, 0.5));
    }

    // Page bounds push the primary out; the spiral provides the next slot.
    #[test]
    fn page_bounds_force_the_next_stride() {
        let config = PlacementConfig {
            page_inset: 20.0,
            ..PlacementConfig::default()
        };
        let anchor = Rect::new(564.0, 0.0, 764.0, 100.0);
        let c = AnchorContext::new(anchor, Size::new(240.0, 240.0), &config).unwrap();
        let field = field_with(&[]);
        let probe = Probe::new(&field)
            .blocking(anchor)
            .within(Rect::new(0.0, 0.0, 800.0, 600.0), 20.0);
        // Primary would start at x = 780 and overflow the inset page edge.
        let report = search(&c, &probe, SearchWindow::default());
        let placement = report.placement.unwrap();
        assert_ne!(placement.rect.x0, 780.0);
        assert!(placement.rect.x1 <= 780.0);
        assert!(placement.rect.y0 >= 20.0);
    }

    // The anchor itself is never overlapped, even though it is not part of
    // the obstacle set.
    #[test]
    fn spiral_never_lands_on_the_anchor() {
        let c = ctx(Rect::new(0.0, 0.0, 200.0, 100.0), Size::new(240.0, 240.0));
        let mut rects = Vec::new();
        // Wall off the right half-plane so the spiral has to try cells left
        // of and above the primary, which approach the anchor.
        for j in -8..8 {
            rects.push(Rect::new(216.0, j as f64 * 256.0, 1500.0, (j + 1) as f64 * 256.0));
        }
        let field = field_with(&rects);
        let probe = Probe::new(&field).blocking(c.anchor);
        let report = search(&c, &probe, SearchWindow::default());
        let placement = report.placement.unwrap();
        assert!(!overlaps(&placement.rect, &c.anchor, 0.5));
    }

    // When every full-size cell is blocked, the shrink tier still finds a
    // spot, and only then.
    #[test]
    fn fit_variants_are_a_last_resort() {
        let c = ctx(Rect::new(0.0, 0.0, 200.0, 100.0), Size::new(240.0, 240.0));
        // A wall 200px right of the anchor leaves a corridor only a
        // narrower tile fits into; every other side is walled off.
        let field = field_with(&[
            Rect::new(416.0, -3000.0, 3000.0, 3000.0),
            Rect::new(-3000.0, -3000.0, -20.0, 3000.0),
            Rect::new(-20.0, 116.0, 210.0, 3000.0),
            Rect::new(-20.0, -3000.0, 210.0, -10.0),
        ]);
        let probe = Probe::new(&field).blocking(c.anchor);
        let report = search(&c, &probe, SearchWindow::default());
        let placement = report.placement.unwrap();
        assert_eq!(placement.source, Source::FitVariant);
        assert_eq!(placement.rect.x0, 216.0);
        assert!(placement.rect.width() < 240.0);
        // Equalization keeps the anchor gap open toward the wall.
        assert!(416.0 - placement.rect.x1 >= c.gap);
    }

    // A fully walled-in anchor exhausts the search without a placement.
    #[test]
    fn walled_in_anchor_reports_exhaustion() {
        let c = ctx(Rect::new(0.0, 0.0, 200.0, 100.0), Size::new(240.0, 240.0));
        let field = field_with(&[
            Rect::new(-5000.0, -5000.0, 5000.0, -10.0),
            Rect::new(-5000.0, 110.0, 5000.0, 5000.0),
            Rect::new(-5000.0, -10.0, -10.0, 110.0),
            Rect::new(210.0, -10.0, 5000.0, 110.0),
        ]);
        let probe = Probe::new(&field).blocking(c.anchor);
        let report = search(&c, &probe, SearchWindow::default());
        assert!(report.placement.is_none());
        assert!(report.tried > 0);
    }

    // Accepted placements never overlap any obstacle beyond tolerance.
    #[test]
    fn acceptance_is_collision_sound() {
        let c = ctx(Rect::new(0.0, 0.0, 200.0, 100.0), Size::new(120.0, 120.0));
        let rects: Vec<Rect> = (0..20)
            .map(|i| {
                let x = (i % 5) as f64 * 150.0 - 100.0;
                let y = (i / 5) as f64 * 150.0 - 100.0;
                Rect::new(x, y, x + 130.0, y + 130.0)
            })
            .collect();
        let field = field_with(&rects);
        let probe = Probe::new(&field).blocking(c.anchor);
        let report = search(&c, &probe, SearchWindow::default());
        if let Some(p) = report.placement {
            for r in &rects {
                assert!(!overlaps(&p.rect, r, 0.5), "placement {:?} hits {:?}", p.rect, r);
            }
        }
    }
}
