// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A flat obstacle store with batched edits and coarse damage reporting.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::source::ObstacleSource;
use crate::types::{Obstacle, ObstacleFlags, ShapeId, is_degenerate, overlaps};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mark {
    Added,
    Updated,
    Removed,
}

#[derive(Clone, Debug)]
struct Entry {
    obstacle: Obstacle,
    mark: Option<Mark>,
    prev_rect: Option<Rect>, // for moved damage
}

/// Batched damage summary returned by [`ObstacleField::commit`].
///
/// Unlike a paint-damage list, entries carry shape ids so that a
/// [`LaneIndex`](crate::LaneIndex) can be maintained incrementally from the
/// same stream.
#[derive(Clone, Debug, Default)]
pub struct FieldDamage {
    /// Obstacles added since the last commit.
    pub added: Vec<Obstacle>,
    /// Obstacles removed since the last commit (with their final bounds).
    pub removed: Vec<Obstacle>,
    /// Obstacles whose bounds or flags changed since the last commit.
    pub moved: Vec<MovedObstacle>,
}

/// A single moved entry in [`FieldDamage`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MovedObstacle {
    /// The obstacle in its new state.
    pub obstacle: Obstacle,
    /// Bounds before the change.
    pub prev: Rect,
}

impl FieldDamage {
    /// True if no damage entries were recorded.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.moved.is_empty()
    }

    /// Union of all affected bounds. Returns `None` if empty.
    pub fn union(&self) -> Option<Rect> {
        let mut it = self
            .added
            .iter()
            .map(|o| o.rect)
            .chain(self.removed.iter().map(|o| o.rect))
            .chain(
                self.moved
                    .iter()
                    .flat_map(|m| [m.prev, m.obstacle.rect]),
            );
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }
}

/// Flat obstacle store keyed by host shape id.
///
/// Edits are marked and applied in a batch by [`ObstacleField::commit`],
/// which reports what changed. Queries observe pending edits immediately
/// (a removed-but-uncommitted obstacle no longer blocks); commit exists to
/// drive incremental consumers such as the lane index, not to gate reads.
#[derive(Clone, Debug, Default)]
pub struct ObstacleField {
    entries: BTreeMap<ShapeId, Entry>,
}

impl ObstacleField {
    /// Create an empty field.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Number of live (non-removed) obstacles.
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .filter(|e| e.mark != Some(Mark::Removed))
            .count()
    }

    /// True if no live obstacles remain.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current state of an obstacle, if live.
    pub fn get(&self, id: ShapeId) -> Option<Obstacle> {
        let e = self.entries.get(&id)?;
        if e.mark == Some(Mark::Removed) {
            return None;
        }
        Some(e.obstacle)
    }

    /// Insert an obstacle, or update it in place if the id already exists.
    pub fn insert(&mut self, obstacle: Obstacle) {
        match self.entries.get_mut(&obstacle.id) {
            Some(e) if e.mark != Some(Mark::Removed) => {
                if e.mark.is_none() {
                    e.prev_rect = Some(e.obstacle.rect);
                }
                e.obstacle = obstacle;
                if e.mark != Some(Mark::Added) {
                    e.mark = Some(Mark::Updated);
                }
            }
            _ => {
                self.entries.insert(
                    obstacle.id,
                    Entry {
                        obstacle,
                        mark: Some(Mark::Added),
                        prev_rect: None,
                    },
                );
            }
        }
    }

    /// Update an obstacle's bounds.
    pub fn update(&mut self, id: ShapeId, rect: Rect) {
        if let Some(e) = self.live_entry_mut(id) {
            if e.mark.is_none() {
                e.prev_rect = Some(e.obstacle.rect);
            }
            e.obstacle.rect = rect;
            if e.mark != Some(Mark::Added) {
                e.mark = Some(Mark::Updated);
            }
        }
    }

    /// Update an obstacle's flags.
    pub fn set_flags(&mut self, id: ShapeId, flags: ObstacleFlags) {
        if let Some(e) = self.live_entry_mut(id) {
            if e.mark.is_none() {
                e.prev_rect = Some(e.obstacle.rect);
            }
            e.obstacle.flags = flags;
            if e.mark != Some(Mark::Added) {
                e.mark = Some(Mark::Updated);
            }
        }
    }

    /// Remove an obstacle. Removing an id added since the last commit drops
    /// it without reporting damage.
    pub fn remove(&mut self, id: ShapeId) {
        if let Some(e) = self.entries.get_mut(&id) {
            if e.mark == Some(Mark::Added) {
                self.entries.remove(&id);
            } else {
                e.mark = Some(Mark::Removed);
            }
        }
    }

    /// Drop everything without reporting damage.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Apply pending edits and report what changed since the last commit.
    pub fn commit(&mut self) -> FieldDamage {
        let mut damage = FieldDamage::default();
        let mut dead: Vec<ShapeId> = Vec::new();
        for (id, e) in &mut self.entries {
            match e.mark.take() {
                Some(Mark::Added) => damage.added.push(e.obstacle),
                Some(Mark::Removed) => {
                    damage.removed.push(e.obstacle);
                    dead.push(*id);
                }
                Some(Mark::Updated) => {
                    let prev = e.prev_rect.take().unwrap_or(e.obstacle.rect);
                    damage.moved.push(MovedObstacle {
                        obstacle: e.obstacle,
                        prev,
                    });
                }
                None => {}
            }
        }
        for id in dead {
            self.entries.remove(&id);
        }
        damage
    }

    /// Iterate all live obstacles.
    pub fn obstacles(&self) -> impl Iterator<Item = Obstacle> + '_ {
        self.entries
            .values()
            .filter(|e| e.mark != Some(Mark::Removed))
            .map(|e| e.obstacle)
    }

    fn live_entry_mut(&mut self, id: ShapeId) -> Option<&mut Entry> {
        let e = self.entries.get_mut(&id)?;
        if e.mark == Some(Mark::Removed) {
            return None;
        }
        Some(e)
    }
}

impl ObstacleSource for ObstacleField {
    fn intersecting<'a>(
        &'a self,
        rect: Rect,
        epsilon: f64,
    ) -> Box<dyn Iterator<Item = Obstacle> + 'a> {
        Box::new(self.obstacles().filter(move |o| {
            !is_degenerate(&o.rect) && overlaps(&o.rect, &rect, epsilon)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_EPSILON;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, x + w, y + h)
    }

    #[test]
    fn insert_commit_and_query() {
        let mut field = ObstacleField::new();
        field.insert(Obstacle::new(ShapeId::new(1), rect(0.0, 0.0, 100.0, 100.0)));
        let damage = field.commit();
        assert_eq!(damage.added.len(), 1);
        assert!(damage.removed.is_empty() && damage.moved.is_empty());

        let hits: Vec<_> = field
            .intersecting(rect(50.0, 50.0, 10.0, 10.0), DEFAULT_EPSILON)
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, ShapeId::new(1));
    }

    #[test]
    fn added_then_removed_before_commit_is_ignored() {
        let mut field = ObstacleField::new();
        field.insert(Obstacle::new(ShapeId::new(7), rect(0.0, 0.0, 10.0, 10.0)));
        field.remove(ShapeId::new(7));
        let damage = field.commit();
        assert!(damage.is_empty());
        assert!(field.is_empty());
    }

    #[test]
    fn removed_after_commit_reports_removed() {
        let mut field = ObstacleField::new();
        field.insert(Obstacle::new(ShapeId::new(2), rect(0.0, 0.0, 10.0, 10.0)));
        let _ = field.commit();
        field.remove(ShapeId::new(2));
        let damage = field.commit();
        assert_eq!(damage.removed.len(), 1);
        assert!(damage.added.is_empty());
        assert!(field.get(ShapeId::new(2)).is_none());
    }

    #[test]
    fn moved_reports_prev_and_new() {
        let mut field = ObstacleField::new();
        field.insert(Obstacle::new(ShapeId::new(3), rect(0.0, 0.0, 10.0, 10.0)));
        let _ = field.commit();
        field.update(ShapeId::new(3), rect(40.0, 0.0, 10.0, 10.0));
        let damage = field.commit();
        assert_eq!(damage.moved.len(), 1);
        assert_eq!(damage.moved[0].prev, rect(0.0, 0.0, 10.0, 10.0));
        assert_eq!(damage.moved[0].obstacle.rect, rect(40.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn pending_removal_is_visible_to_queries() {
        let mut field = ObstacleField::new();
        field.insert(Obstacle::new(ShapeId::new(4), rect(0.0, 0.0, 10.0, 10.0)));
        let _ = field.commit();
        field.remove(ShapeId::new(4));
        // Not yet committed, but queries already skip it.
        assert_eq!(
            field
                .intersecting(rect(0.0, 0.0, 10.0, 10.0), DEFAULT_EPSILON)
                .count(),
            0
        );
    }

    #[test]
    fn flags_change_reports_moved_with_same_rect() {
        let mut field = ObstacleField::new();
        let id = ShapeId::new(5);
        field.insert(Obstacle::new(id, rect(0.0, 0.0, 10.0, 10.0)));
        let _ = field.commit();
        field.set_flags(id, ObstacleFlags::SOLID | ObstacleFlags::SELECTED);
        let damage = field.commit();
        assert_eq!(damage.moved.len(), 1);
        assert_eq!(damage.moved[0].prev, damage.moved[0].obstacle.rect);
        assert!(damage.moved[0].obstacle.flags.contains(ObstacleFlags::SELECTED));
    }

    #[test]
    fn union_covers_all_damage() {
        let mut field = ObstacleField::new();
        field.insert(Obstacle::new(ShapeId::new(1), rect(0.0, 0.0, 10.0, 10.0)));
        field.insert(Obstacle::new(ShapeId::new(2), rect(90.0, 90.0, 10.0, 10.0)));
        let damage = field.commit();
        assert_eq!(damage.union(), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(field.commit().union(), None);
    }
}
