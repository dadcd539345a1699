// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=quadrille_field --heading-base-level=0

//! Quadrille Field: collision probing over the obstacles of a canvas page.
//!
//! Quadrille Field answers one question for the placement engine: "is this
//! rectangle free of obstacles?" It does so with an epsilon tolerance so
//! that merely-touching neighbors never count as collisions, an ignore list
//! and selection flags so the anchor and the active selection never block,
//! and an optional lane interval index that prunes probes in dense scenes
//! without a full obstacle scan.
//!
//! - [`ObstacleField`]: flat obstacle store with batched edits; `commit`
//!   yields a [`FieldDamage`] stream carrying ids, which keeps a
//!   [`LaneIndex`] incrementally up to date.
//! - [`ObstacleSource`]: the seam a host scene implements so probes can run
//!   against its own storage instead.
//! - [`Probe`]: one configured check combining the page-bounds clamp, the
//!   anchor block, the lane prune, and the authoritative broad-phase scan.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Rect;
//! use quadrille_field::{LaneIndex, Obstacle, ObstacleField, Probe, ShapeId};
//!
//! let mut field = ObstacleField::new();
//! field.insert(Obstacle::new(ShapeId::new(1), Rect::new(216.0, 0.0, 456.0, 240.0)));
//! let damage = field.commit();
//!
//! let mut lanes = LaneIndex::new(64.0, quadrille_field::DEFAULT_EPSILON);
//! lanes.apply(&damage);
//!
//! let probe = Probe::new(&field).with_lanes(&lanes);
//! assert!(!probe.is_free(&Rect::new(216.0, 0.0, 456.0, 240.0)));
//! assert!(probe.is_free(&Rect::new(216.0, 256.0, 456.0, 496.0)));
//! ```
//!
//! The lane index is advisory: a clear answer is always confirmed by the
//! broad-phase scan, and a disagreement the index should have caught is
//! reported on [`Checked::desync`] so the owner can invalidate the affected
//! region. Float inputs are assumed finite; degenerate rectangles are
//! skipped defensively rather than rejected loudly.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod field;
pub mod lanes;
pub mod probe;
pub mod source;
pub mod types;

pub use field::{FieldDamage, MovedObstacle, ObstacleField};
pub use lanes::{LaneIndex, LanePrune};
pub use probe::{Axis, BlockCause, Checked, Probe, Verdict};
pub use source::ObstacleSource;
pub use types::{
    DEFAULT_EPSILON, Interval, Obstacle, ObstacleFlags, ShapeId, fits_within, is_degenerate,
    overlaps, truncate_to,
};
