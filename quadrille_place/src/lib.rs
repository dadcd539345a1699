// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=quadrille_place --heading-base-level=0

//! Quadrille Place: anchor-relative tile placement for an infinite canvas.
//!
//! Given an anchor shape and a desired tile size, this crate decides where
//! a new tile should go and what size it should take:
//!
//! - [`snap`]: grid quantization. Sizes snap once; positions derive from
//!   the unsnapped anchor edges, so candidates stay flush with what is
//!   actually on screen.
//! - [`Candidates`]: a lazy, bounded, clockwise spiral of tile-sized
//!   strides starting right of (or below) the anchor. First-fit: the
//!   consumer takes the first candidate the probe clears.
//! - [`FitVariants`]: the fallback tier; anchored-edge shrink variants
//!   tried only after the whole spiral is blocked.
//! - [`harmony`]: equalizes the accepted tile's far gap against the next
//!   boundary so spacing reads evenly, reverting on any conflict.
//! - [`sizer`]: turns an intent (free block, media, embed) plus available
//!   bounds into committed dimensions, identical for preview and commit.
//! - [`search`]: drives the tiers against a [`Probe`] and reports the
//!   placement or a typed exhaustion.
//!
//! Collision answers come from [`quadrille_field`]; a session layer owns
//! gestures and commits on top of this crate.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use quadrille_field::{ObstacleField, Probe};
//! use quadrille_place::{AnchorContext, PlacementConfig, SearchWindow, search};
//!
//! let config = PlacementConfig::default();
//! let anchor = Rect::new(0.0, 0.0, 200.0, 100.0);
//! let ctx = AnchorContext::new(anchor, Size::new(240.0, 240.0), &config).unwrap();
//!
//! let field = ObstacleField::new();
//! let probe = Probe::new(&field).blocking(anchor);
//! let report = search(&ctx, &probe, SearchWindow::default());
//!
//! let placement = report.placement.unwrap();
//! assert_eq!(placement.rect, Rect::new(216.0, 0.0, 456.0, 240.0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod context;
pub mod engine;
pub mod fit;
pub mod harmony;
pub mod sizer;
pub mod snap;
pub mod spiral;

pub use context::{AnchorContext, Orientation, PlacementConfig, SearchWindow};
pub use engine::{Placement, SearchReport, search};
pub use fit::FitVariants;
pub use sizer::{Intent, IntentKind, SizedShape, resolve};
pub use spiral::{Candidate, Candidates, Source};
