// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lane interval index: grid-row/column-keyed occupied spans used to prune
//! collision probes in dense scenes.
//!
//! Every solid obstacle contributes its x-extent to each row lane it covers
//! (lanes keyed by `floor(y / lane)`) and its y-extent to each column lane.
//! A lane keeps the raw per-member spans plus a merged cache of sorted,
//! disjoint, non-touching intervals. A probe asks the index for the member
//! obstacles that could overlap a candidate; when the merged cache shows the
//! candidate's span entirely clear, no member needs testing at all.
//!
//! The index is advisory. A clear answer is always re-confirmed against the
//! authoritative obstacle source; a suspect list is tested rectangle-exact,
//! so pruning never falsely rejects a candidate. Maintenance is incremental:
//! [`LaneIndex::apply`] consumes the damage stream from
//! [`ObstacleField::commit`](crate::ObstacleField::commit), and only lanes a
//! change actually covers are re-merged.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use kurbo::Rect;

use crate::field::FieldDamage;
use crate::types::{
    Interval, Obstacle, ObstacleFlags, ShapeId, any_overlap, coalesce_insert, is_degenerate,
    overlaps,
};

/// Result of pruning a candidate rectangle against the lane index.
#[derive(Clone, Debug)]
pub enum LanePrune {
    /// No indexed span overlaps the candidate. Advisory: confirm against the
    /// authoritative source before accepting.
    Clear,
    /// Members whose lane spans overlap the candidate. Test their rects
    /// exactly; a hit here is a sound rejection.
    Suspects(Vec<Obstacle>),
}

#[derive(Clone, Debug, Default)]
struct Lane {
    spans: Vec<(ShapeId, Interval)>,
    merged: Vec<Interval>,
}

impl Lane {
    fn remerge(&mut self, epsilon: f64) {
        self.merged.clear();
        for &(_, iv) in &self.spans {
            coalesce_insert(&mut self.merged, iv, epsilon);
        }
    }
}

/// Row/column lane interval index over the obstacles of one page.
///
/// Owned by a placement session, never shared between pages. Rebuilt with
/// [`LaneIndex::rebuild`] on explicit invalidation; otherwise only touched
/// lanes are updated.
#[derive(Clone, Debug)]
pub struct LaneIndex {
    lane: f64,
    epsilon: f64,
    rows: BTreeMap<i64, Lane>,
    cols: BTreeMap<i64, Lane>,
    members: BTreeMap<ShapeId, Obstacle>,
}

impl LaneIndex {
    /// Create an empty index with the given lane size.
    ///
    /// `lane` must be positive; a few grid units is a good default. `epsilon`
    /// is the same overlap tolerance the probe uses.
    pub fn new(lane: f64, epsilon: f64) -> Self {
        debug_assert!(lane > 0.0, "lane size must be positive");
        Self {
            lane,
            epsilon,
            rows: BTreeMap::new(),
            cols: BTreeMap::new(),
            members: BTreeMap::new(),
        }
    }

    /// The lane size this index was built with.
    pub fn lane_size(&self) -> f64 {
        self.lane
    }

    /// Number of indexed obstacles.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether an obstacle is currently indexed.
    pub fn contains(&self, id: ShapeId) -> bool {
        self.members.contains_key(&id)
    }

    /// Index an obstacle. Non-solid and degenerate obstacles are skipped;
    /// re-inserting an indexed id replaces its previous spans.
    pub fn insert(&mut self, obstacle: Obstacle) {
        if self.members.contains_key(&obstacle.id) {
            self.remove(obstacle.id);
        }
        if is_degenerate(&obstacle.rect) || !obstacle.flags.contains(ObstacleFlags::SOLID) {
            return;
        }
        let r = obstacle.rect;
        for key in self.key(r.y0)..=self.key(r.y1) {
            let lane = self.rows.entry(key).or_default();
            lane.spans.push((obstacle.id, Interval::of_x(&r)));
            coalesce_insert(&mut lane.merged, Interval::of_x(&r), self.epsilon);
        }
        for key in self.key(r.x0)..=self.key(r.x1) {
            let lane = self.cols.entry(key).or_default();
            lane.spans.push((obstacle.id, Interval::of_y(&r)));
            coalesce_insert(&mut lane.merged, Interval::of_y(&r), self.epsilon);
        }
        self.members.insert(obstacle.id, obstacle);
    }

    /// Drop an obstacle's spans. Lanes it covered are re-merged from their
    /// remaining members; emptied lanes are freed.
    pub fn remove(&mut self, id: ShapeId) {
        let Some(o) = self.members.remove(&id) else {
            return;
        };
        let r = o.rect;
        let eps = self.epsilon;
        for key in self.key(r.y0)..=self.key(r.y1) {
            if let Some(lane) = self.rows.get_mut(&key) {
                lane.spans.retain(|(i, _)| *i != id);
                if lane.spans.is_empty() {
                    self.rows.remove(&key);
                } else {
                    lane.remerge(eps);
                }
            }
        }
        for key in self.key(r.x0)..=self.key(r.x1) {
            if let Some(lane) = self.cols.get_mut(&key) {
                lane.spans.retain(|(i, _)| *i != id);
                if lane.spans.is_empty() {
                    self.cols.remove(&key);
                } else {
                    lane.remerge(eps);
                }
            }
        }
    }

    /// Fold a damage batch into the index.
    pub fn apply(&mut self, damage: &FieldDamage) {
        for o in &damage.removed {
            self.remove(o.id);
        }
        for m in &damage.moved {
            self.remove(m.obstacle.id);
            self.insert(m.obstacle);
        }
        for o in &damage.added {
            self.insert(*o);
        }
    }

    /// Replace the entire index from an obstacle iterator.
    pub fn rebuild<I: IntoIterator<Item = Obstacle>>(&mut self, obstacles: I) {
        self.clear();
        for o in obstacles {
            self.insert(o);
        }
    }

    /// Drop every member overlapping `rect`.
    ///
    /// Used when the index is found to disagree with the authoritative
    /// source: removing suspect members can only make the index answer
    /// `Clear` more often, and `Clear` is re-confirmed anyway, so recovery
    /// errs on the safe side.
    pub fn invalidate_rect(&mut self, rect: Rect) {
        let doomed: Vec<ShapeId> = self
            .members
            .values()
            .filter(|o| overlaps(&o.rect, &rect, 0.0))
            .map(|o| o.id)
            .collect();
        for id in doomed {
            self.remove(id);
        }
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.cols.clear();
        self.members.clear();
    }

    /// Prune a candidate rectangle.
    ///
    /// Consults whichever lane direction covers the candidate in fewer
    /// lanes. Returns [`LanePrune::Clear`] when every covered lane's merged
    /// spans miss the candidate's extent, otherwise the deduplicated member
    /// obstacles whose spans overlap it.
    pub fn prune(&self, rect: &Rect) -> LanePrune {
        let row_span = self.key(rect.y1) - self.key(rect.y0);
        let col_span = self.key(rect.x1) - self.key(rect.x0);
        let (lanes, keys, extent) = if row_span <= col_span {
            (
                &self.rows,
                self.key(rect.y0)..=self.key(rect.y1),
                Interval::of_x(rect),
            )
        } else {
            (
                &self.cols,
                self.key(rect.x0)..=self.key(rect.x1),
                Interval::of_y(rect),
            )
        };

        let mut ids: BTreeSet<ShapeId> = BTreeSet::new();
        for key in keys {
            let Some(lane) = lanes.get(&key) else {
                continue;
            };
            if !any_overlap(&lane.merged, &extent, self.epsilon) {
                continue;
            }
            for (id, iv) in &lane.spans {
                if iv.overlaps(&extent, self.epsilon) {
                    ids.insert(*id);
                }
            }
        }
        if ids.is_empty() {
            return LanePrune::Clear;
        }
        let suspects = ids
            .into_iter()
            .filter_map(|id| self.members.get(&id).copied())
            .collect();
        LanePrune::Suspects(suspects)
    }

    #[inline]
    fn key(&self, v: f64) -> i64 {
        floor_to_i64(v / self.lane)
    }
}

#[inline]
fn floor_to_i64(v: f64) -> i64 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Lane keys are intentionally truncated to i64."
    )]
    let i = v as i64;
    if (i as f64) > v { i - 1 } else { i }
}
