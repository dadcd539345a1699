// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=quadrille_session --heading-base-level=0

//! Quadrille Session: the preview/commit protocol over the placement
//! engine.
//!
//! A [`Session`] owns one page's placement gestures. The host (editor or
//! canvas surface) implements [`CanvasHost`] and forwards input events;
//! the session runs the bounded search from [`quadrille_place`] against
//! the obstacles in [`quadrille_field`], keeps a live preview correct
//! under pointer movement and scene mutation, and turns a commit gesture
//! into one atomic host write.
//!
//! ## Protocol
//!
//! - [`Session::begin_preview`] when the trigger modifier is held over an
//!   anchor: `Idle → Previewing`.
//! - [`Session::update_preview`] on every pointer/camera/scene event while
//!   previewing; [`Session::expand_search`] when the host wants a wider
//!   window after an empty result.
//! - [`Session::commit`] revalidates against the live scene (one
//!   regeneration if the preview went stale), sizes the content, and hands
//!   the host a single [`ShapeWrite`]: `Previewing → Committing → Idle`.
//! - [`Session::cancel`], modifier release, Escape, pointer cancellation,
//!   or a context change: `→ Cancelled → Idle`, with no scene side
//!   effects.
//!
//! Everything is synchronous and single-threaded; re-entrant recomputation
//! is resolved latest-wins. Failures are typed ([`SessionError`]), never
//! panics. Transitions are observable through
//! [`Session::subscribe`] / [`Session::unsubscribe`], independent of any
//! particular UI binding. State-machine logging goes through [`tracing`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod error;
pub mod events;
pub mod host;
pub mod session;

pub use error::SessionError;
pub use events::{CancelReason, SessionEvent, SubscriptionId, Subscriptions};
pub use host::{CanvasHost, CommitError, ShapeWrite};
pub use session::{PreviewHandle, Session, SessionState};
