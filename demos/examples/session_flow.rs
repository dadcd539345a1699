// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A full preview/commit gesture against a toy host.
//!
//! Implements the host traits over an `ObstacleField`, subscribes to
//! session events, and walks begin → update → commit with a scene
//! mutation in between. Session logging goes to stderr via
//! `tracing-subscriber`.
//!
//! Run:
//! - `cargo run -p quadrille_demos --example session_flow`

use kurbo::{Rect, Size};
use quadrille_field::{Obstacle, ObstacleField, ObstacleSource, ShapeId};
use quadrille_place::{Intent, PlacementConfig};
use quadrille_session::{CanvasHost, CommitError, Session, SessionEvent, ShapeWrite};

struct DemoHost {
    field: ObstacleField,
    page: Rect,
    next_id: u64,
}

impl ObstacleSource for DemoHost {
    fn intersecting<'a>(
        &'a self,
        rect: Rect,
        epsilon: f64,
    ) -> Box<dyn Iterator<Item = Obstacle> + 'a> {
        self.field.intersecting(rect, epsilon)
    }
}

impl CanvasHost for DemoHost {
    fn shape_rect(&self, id: ShapeId) -> Option<Rect> {
        self.field.get(id).map(|o| o.rect)
    }

    fn page_bounds(&self) -> Option<Rect> {
        Some(self.page)
    }

    fn modifier_held(&self) -> bool {
        true
    }

    fn atomic_commit(&mut self, write: &ShapeWrite) -> Result<ShapeId, CommitError> {
        let id = ShapeId::new(self.next_id);
        self.next_id += 1;
        self.field.insert(Obstacle::new(id, write.rect()));
        let _ = self.field.commit();
        println!("host committed {:?} as {:?}", write.rect(), id);
        Ok(id)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let mut host = DemoHost {
        field: ObstacleField::new(),
        page: Rect::new(0.0, 0.0, 1600.0, 1000.0),
        next_id: 100,
    };
    let anchor = ShapeId::new(1);
    host.field
        .insert(Obstacle::new(anchor, Rect::new(40.0, 40.0, 240.0, 140.0)));
    let _ = host.field.commit();

    let mut session = Session::new(PlacementConfig::default());
    let sub = session.subscribe(|ev| match ev {
        SessionEvent::PreviewShown(rect) => println!("preview -> {rect:?}"),
        SessionEvent::PreviewHidden => println!("preview hidden"),
        SessionEvent::Committed(id) => println!("committed -> {id:?}"),
        SessionEvent::Cancelled(reason) => println!("cancelled ({reason:?})"),
    });

    // Modifier held over the anchor: a preview appears.
    let handle = session
        .begin_preview(&host, anchor, Size::new(240.0, 240.0), Intent::media(Size::new(1600.0, 900.0)))
        .expect("anchor is live and the modifier is held");

    // Someone drops a tile on the previewed spot; the next tick moves the
    // preview instead of overlapping.
    host.field.insert(Obstacle::new(
        ShapeId::new(2),
        Rect::new(256.0, 40.0, 496.0, 280.0),
    ));
    let damage = host.field.commit();
    session.scene_changed(&damage);
    let moved = session.update_preview(&host, handle).expect("gesture is live");
    println!("preview after mutation: {moved:?}");

    // Commit: one atomic write, sized for 16:9 media.
    let id = session.commit(&mut host, handle).expect("commit succeeds");
    println!("final shape: {:?}", host.shape_rect(id));

    session.unsubscribe(sub);
}
