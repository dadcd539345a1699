// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Randomized agreement between lane-accelerated probes and brute-force
//! broad-phase scans.

use kurbo::Rect;
use proptest::prelude::*;
use quadrille_field::{
    DEFAULT_EPSILON, LaneIndex, Obstacle, ObstacleField, Probe, ShapeId, Verdict,
};

fn arb_rect() -> impl Strategy<Value = Rect> {
    (
        -500.0f64..500.0,
        -500.0f64..500.0,
        8.0f64..300.0,
        8.0f64..300.0,
    )
        .prop_map(|(x, y, w, h)| Rect::new(x, y, x + w, y + h))
}

fn arb_scene() -> impl Strategy<Value = Vec<Rect>> {
    prop::collection::vec(arb_rect(), 0..40)
}

proptest! {
    #[test]
    fn lane_and_brute_force_verdicts_agree(
        scene in arb_scene(),
        candidates in prop::collection::vec(arb_rect(), 1..30),
        lane in 16.0f64..200.0,
    ) {
        let mut field = ObstacleField::new();
        for (i, r) in scene.iter().enumerate() {
            field.insert(Obstacle::new(ShapeId::new(i as u64), *r));
        }
        let mut lanes = LaneIndex::new(lane, DEFAULT_EPSILON);
        lanes.apply(&field.commit());

        let brute = Probe::new(&field);
        let fast = Probe::new(&field).with_lanes(&lanes);
        for cand in &candidates {
            let a = brute.check(cand);
            let b = fast.check(cand);
            // Causes may differ (scan order), but free/blocked must not.
            prop_assert_eq!(
                matches!(a.verdict, Verdict::Free),
                matches!(b.verdict, Verdict::Free),
                "candidate {:?}", cand
            );
            // A freshly built index never desyncs.
            prop_assert!(b.desync.is_none());
        }
    }

    #[test]
    fn lanes_stay_equivalent_under_edits(
        scene in arb_scene(),
        moves in prop::collection::vec((0usize..40, arb_rect()), 0..20),
        removals in prop::collection::vec(0usize..40, 0..10),
        candidates in prop::collection::vec(arb_rect(), 1..20),
    ) {
        let mut field = ObstacleField::new();
        for (i, r) in scene.iter().enumerate() {
            field.insert(Obstacle::new(ShapeId::new(i as u64), *r));
        }
        let mut lanes = LaneIndex::new(64.0, DEFAULT_EPSILON);
        lanes.apply(&field.commit());

        for (slot, r) in &moves {
            field.update(ShapeId::new(*slot as u64), *r);
        }
        for slot in &removals {
            field.remove(ShapeId::new(*slot as u64));
        }
        lanes.apply(&field.commit());

        let brute = Probe::new(&field);
        let fast = Probe::new(&field).with_lanes(&lanes);
        for cand in &candidates {
            prop_assert_eq!(
                brute.check(cand).verdict.is_free(),
                fast.check(cand).verdict.is_free(),
                "candidate {:?}", cand
            );
        }
    }
}
