// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement basics.
//!
//! Build an obstacle field, search for a spot next to an anchor, and watch
//! the spiral step around a blocker.
//!
//! Run:
//! - `cargo run -p quadrille_demos --example basic_placement`

use kurbo::{Rect, Size};
use quadrille_field::{Obstacle, ObstacleField, Probe, ShapeId};
use quadrille_place::{AnchorContext, PlacementConfig, SearchWindow, search};

fn main() {
    let config = PlacementConfig::default();
    let anchor = Rect::new(0.0, 0.0, 200.0, 100.0);
    let ctx = AnchorContext::new(anchor, Size::new(240.0, 240.0), &config).unwrap();

    // An empty scene: the tile lands immediately right of the anchor.
    let mut field = ObstacleField::new();
    let probe = Probe::new(&field).blocking(anchor);
    let open = search(&ctx, &probe, SearchWindow::default());
    println!("open scene: {:?}", open.placement.unwrap().rect);

    // Occupy that spot; the spiral steps to the next stride below it.
    field.insert(Obstacle::new(ShapeId::new(1), Rect::new(216.0, 0.0, 456.0, 240.0)));
    let probe = Probe::new(&field).blocking(anchor);
    let blocked = search(&ctx, &probe, SearchWindow::default());
    let placement = blocked.placement.unwrap();
    println!(
        "after blocking the primary: {:?} (source {:?}, {} candidates tried)",
        placement.rect, placement.source, blocked.tried
    );
    assert_eq!(placement.rect, Rect::new(216.0, 256.0, 456.0, 496.0));
}
