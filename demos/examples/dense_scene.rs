// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lane-accelerated probing in a dense scene.
//!
//! Fill a page with tiles, keep a lane index in sync through batched
//! damage, and compare accelerated and brute-force searches.
//!
//! Run:
//! - `cargo run -p quadrille_demos --example dense_scene`

use kurbo::{Rect, Size};
use quadrille_field::{LaneIndex, Obstacle, ObstacleField, Probe, ShapeId};
use quadrille_place::{AnchorContext, PlacementConfig, SearchWindow, search};

fn main() {
    let config = PlacementConfig::default();
    let mut field = ObstacleField::new();

    // A 12x8 block of occupied tiles with slim gutters.
    let mut id = 0u64;
    for row in 0..8 {
        for col in 0..12 {
            let x = col as f64 * 250.0;
            let y = row as f64 * 250.0;
            field.insert(Obstacle::new(ShapeId::new(id), Rect::new(x, y, x + 240.0, y + 240.0)));
            id += 1;
        }
    }
    let mut lanes = LaneIndex::new(config.grid * 8.0, config.epsilon);
    lanes.apply(&field.commit());
    println!("indexed {} obstacles", lanes.len());

    // Anchor inside the block; the desired tile only fits past its edge.
    let anchor = Rect::new(0.0, 0.0, 240.0, 240.0);
    let ctx = AnchorContext::new(anchor, Size::new(240.0, 240.0), &config).unwrap();
    let ignore = [ShapeId::new(0)];

    let fast = Probe::new(&field)
        .with_lanes(&lanes)
        .ignoring(&ignore)
        .blocking(anchor);
    let brute = Probe::new(&field).ignoring(&ignore).blocking(anchor);

    let report = search(&ctx, &fast, SearchWindow::default());
    let reference = search(&ctx, &brute, SearchWindow::default());
    assert_eq!(report.placement, reference.placement);

    match report.placement {
        Some(p) => println!(
            "placed at {:?} after {} candidates (brute force agreed)",
            p.rect, report.tried
        ),
        None => println!("window exhausted after {} candidates", report.tried),
    }

    // Scene edits keep flowing through damage; the lane index never
    // rebuilds wholesale.
    field.update(ShapeId::new(14), Rect::new(500.0, -500.0, 740.0, -260.0));
    lanes.apply(&field.commit());
    println!("after moving a tile the index still tracks {} obstacles", lanes.len());
}
