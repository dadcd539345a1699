// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The placement session state machine.
//!
//! One session drives one page's placement gestures:
//! `Idle → Previewing → {Committing → Idle, Cancelled → Idle}`. The host
//! calls in on every relevant input event (pointer, camera, modifier,
//! scene change); the session recomputes the preview synchronously and
//! reports transitions through its subscription registry. The only
//! mutating operation is the commit's single atomic write, performed by
//! the host.

use alloc::vec::Vec;

use kurbo::{Rect, Size};
use tracing::{debug, trace, warn};

use quadrille_field::{FieldDamage, LaneIndex, Obstacle, Probe, ShapeId};
use quadrille_place::{
    AnchorContext, Intent, Placement, PlacementConfig, SearchWindow, search, sizer,
};

use crate::error::SessionError;
use crate::events::{CancelReason, SessionEvent, Subscriptions, SubscriptionId};
use crate::host::{CanvasHost, ShapeWrite};

/// Where a session currently is in its lifecycle.
///
/// `Committing` and `Cancelled` are transient: both settle back to `Idle`
/// within the call that entered them, but each is observable through the
/// corresponding [`SessionEvent`] before the next preview tick.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SessionState {
    /// No gesture in flight.
    Idle,
    /// A preview is being tracked against the live scene.
    Previewing,
    /// A commit is validating and writing.
    Committing,
    /// A gesture is unwinding with no scene side effects.
    Cancelled,
}

/// Capability to operate on the current gesture.
///
/// Carries the gesture epoch; once the gesture ends (commit, cancel, or a
/// new `begin_preview`), old handles fail with
/// [`SessionError::ExpiredHandle`] instead of acting on the new gesture.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PreviewHandle {
    epoch: u64,
}

/// Placement session for one page.
///
/// Owns the gesture state and the page's lane index. Host access is passed
/// into each call rather than stored, so the session holds no borrow of
/// the scene between events.
pub struct Session {
    config: PlacementConfig,
    state: SessionState,
    epoch: u64,
    seq: u64,
    anchor_id: Option<ShapeId>,
    desired: Size,
    intent: Option<Intent>,
    ctx: Option<AnchorContext>,
    ctx_stale: bool,
    window: SearchWindow,
    lanes: LaneIndex,
    held: Option<Placement>,
    subs: Subscriptions,
}

impl Session {
    /// Create an idle session.
    ///
    /// The lane index uses eight grid units per lane, a reasonable balance
    /// between lane count and span density for tile-sized content.
    pub fn new(config: PlacementConfig) -> Self {
        let lane = if config.grid > 0.0 {
            config.grid * 8.0
        } else {
            64.0
        };
        let epsilon = config.epsilon;
        Self {
            config,
            state: SessionState::Idle,
            epoch: 0,
            seq: 0,
            anchor_id: None,
            desired: Size::ZERO,
            intent: None,
            ctx: None,
            ctx_stale: false,
            window: SearchWindow::default(),
            lanes: LaneIndex::new(lane, epsilon),
            held: None,
            subs: Subscriptions::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The rectangle currently previewed, if any.
    pub fn preview_rect(&self) -> Option<Rect> {
        self.held.map(|p| p.rect)
    }

    /// The current search window (grows only via
    /// [`Session::expand_search`]).
    pub fn window(&self) -> SearchWindow {
        self.window
    }

    /// Register an event listener.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&SessionEvent) + 'static,
    ) -> SubscriptionId {
        self.subs.subscribe(listener)
    }

    /// Remove an event listener.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subs.unsubscribe(id)
    }

    /// Start a gesture: `Idle → Previewing`.
    ///
    /// Requires the trigger modifier to be held and a live, non-degenerate
    /// anchor. An in-flight gesture is cancelled first. Runs the initial
    /// search before returning, so the preview (or its absence) is already
    /// observable.
    pub fn begin_preview<H: CanvasHost + ?Sized>(
        &mut self,
        host: &H,
        anchor: ShapeId,
        desired: Size,
        intent: Intent,
    ) -> Result<PreviewHandle, SessionError> {
        if self.state == SessionState::Previewing {
            self.cancel_internal(CancelReason::ContextChanged);
        }
        if !host.modifier_held() {
            return Err(SessionError::ModifierNotHeld);
        }
        let anchor_rect = host.shape_rect(anchor).ok_or(SessionError::DegenerateInput)?;
        let ctx = AnchorContext::new(anchor_rect, desired, &self.config)
            .ok_or(SessionError::DegenerateInput)?;

        self.epoch += 1;
        self.state = SessionState::Previewing;
        self.anchor_id = Some(anchor);
        self.desired = desired;
        self.intent = Some(intent);
        self.ctx = Some(ctx);
        self.ctx_stale = false;
        self.window = SearchWindow::default();
        self.held = None;
        debug!(anchor = anchor.raw(), epoch = self.epoch, "gesture began");

        self.seed_lanes(host);
        self.run_search(host);
        Ok(PreviewHandle { epoch: self.epoch })
    }

    /// Recompute the preview against the current scene.
    ///
    /// Call on every pointer, camera, or scene change while previewing.
    /// `Ok(None)` means the bounded search is exhausted: the preview shows
    /// nothing, and the caller may opt into [`Session::expand_search`].
    pub fn update_preview<H: CanvasHost + ?Sized>(
        &mut self,
        host: &H,
        handle: PreviewHandle,
    ) -> Result<Option<Rect>, SessionError> {
        self.check_handle(handle)?;
        self.refresh_context(host)?;
        Ok(self.run_search(host))
    }

    /// Grow the search window geometrically and retry.
    ///
    /// Only the host triggers this (a held gesture with no result yet);
    /// the session never expands on its own, keeping routine preview
    /// ticks bounded.
    pub fn expand_search<H: CanvasHost + ?Sized>(
        &mut self,
        host: &H,
        handle: PreviewHandle,
    ) -> Result<Option<Rect>, SessionError> {
        self.check_handle(handle)?;
        self.refresh_context(host)?;
        if !self.window.is_max() {
            self.window = self.window.expanded();
            trace!(cols = self.window.cols, rows = self.window.rows, "window expanded");
            self.seed_lanes(host);
        }
        Ok(self.run_search(host))
    }

    /// Commit the held preview: `Previewing → Committing → Idle`.
    ///
    /// Revalidates against the current obstacle set first; if the scene
    /// moved underneath the preview, generation is re-run once before
    /// giving up. The host write is all-or-nothing. On failure the session
    /// returns to `Previewing` so the gesture can continue.
    pub fn commit<H: CanvasHost + ?Sized>(
        &mut self,
        host: &mut H,
        handle: PreviewHandle,
    ) -> Result<ShapeId, SessionError> {
        self.check_handle(handle)?;
        self.state = SessionState::Committing;

        let outcome = self.validate_for_commit(host);
        let placement = match outcome {
            Ok(p) => p,
            Err(e) => {
                self.state = SessionState::Previewing;
                match e {
                    SessionError::NoCandidateFound => {
                        self.held = None;
                        self.subs.emit(&SessionEvent::PreviewHidden);
                    }
                    // The gesture's anchor is gone; nothing to return to.
                    SessionError::StaleCandidate => {
                        self.cancel_internal(CancelReason::ContextChanged);
                    }
                    _ => {}
                }
                return Err(e);
            }
        };

        let intent = self.intent.clone().unwrap_or_else(Intent::block);
        let sized = sizer::resolve(
            &intent,
            placement.rect.size(),
            self.config.max,
            self.config.grid,
        );
        let write = ShapeWrite {
            origin: placement.rect.origin(),
            size: sized.size,
            intent: sized.intent,
        };
        match host.atomic_commit(&write) {
            Ok(id) => {
                debug!(shape = id.raw(), "commit landed");
                self.subs.emit(&SessionEvent::Committed(id));
                self.finish_gesture();
                Ok(id)
            }
            Err(e) => {
                warn!(reason = %e, "host rejected commit");
                self.state = SessionState::Previewing;
                Err(e.into())
            }
        }
    }

    /// Cancel the gesture explicitly. A handle from a finished gesture is
    /// a no-op.
    pub fn cancel(&mut self, handle: PreviewHandle) {
        if handle.epoch == self.epoch && self.state != SessionState::Idle {
            self.cancel_internal(CancelReason::Explicit);
        }
    }

    /// The trigger modifier changed; releasing it cancels any gesture.
    pub fn modifier_changed(&mut self, held: bool) {
        if !held && self.state == SessionState::Previewing {
            self.cancel_internal(CancelReason::ModifierReleased);
        }
    }

    /// Escape pressed.
    pub fn escape(&mut self) {
        if self.state == SessionState::Previewing {
            self.cancel_internal(CancelReason::Escape);
        }
    }

    /// The pointer stream was cancelled by the platform.
    pub fn pointer_cancelled(&mut self) {
        if self.state == SessionState::Previewing {
            self.cancel_internal(CancelReason::PointerCancelled);
        }
    }

    /// Selection or editing context changed under the gesture.
    pub fn context_changed(&mut self) {
        if self.state == SessionState::Previewing {
            self.cancel_internal(CancelReason::ContextChanged);
        }
    }

    /// Fold host-reported scene changes into the lane index.
    ///
    /// Cheap and incremental; safe to call at any state. If the anchor
    /// itself changed, the context is rebuilt on the next preview tick.
    pub fn scene_changed(&mut self, damage: &FieldDamage) {
        self.lanes.apply(damage);
        if let Some(anchor) = self.anchor_id {
            let touches_anchor = damage.removed.iter().any(|o| o.id == anchor)
                || damage.moved.iter().any(|m| m.obstacle.id == anchor)
                || damage.added.iter().any(|o| o.id == anchor);
            if touches_anchor {
                self.ctx_stale = true;
            }
        }
    }

    /// The camera moved or zoomed; anchor-derived state is recomputed on
    /// the next preview tick.
    pub fn camera_changed(&mut self) {
        self.ctx_stale = true;
    }

    fn check_handle(&self, handle: PreviewHandle) -> Result<(), SessionError> {
        if handle.epoch != self.epoch || self.state != SessionState::Previewing {
            return Err(SessionError::ExpiredHandle);
        }
        Ok(())
    }

    /// Rebuild the anchor context if an event marked it stale. Cancels the
    /// gesture when the anchor no longer yields a usable context.
    fn refresh_context<H: CanvasHost + ?Sized>(
        &mut self,
        host: &H,
    ) -> Result<(), SessionError> {
        if !self.ctx_stale {
            return Ok(());
        }
        let anchor = self.anchor_id.ok_or(SessionError::ExpiredHandle)?;
        let ctx = host
            .shape_rect(anchor)
            .and_then(|r| AnchorContext::new(r, self.desired, &self.config));
        match ctx {
            Some(ctx) => {
                self.ctx = Some(ctx);
                self.ctx_stale = false;
                self.seed_lanes(host);
                Ok(())
            }
            None => {
                self.cancel_internal(CancelReason::ContextChanged);
                Err(SessionError::ExpiredHandle)
            }
        }
    }

    fn seed_lanes<H: CanvasHost + ?Sized>(&mut self, host: &H) {
        let Some(ctx) = self.ctx.as_ref() else {
            return;
        };
        let extent = ctx.search_extent(self.window);
        let obstacles: Vec<Obstacle> = host.intersecting(extent, self.config.epsilon).collect();
        self.lanes.rebuild(obstacles);
    }

    /// One synchronous search pass. Latest call wins: a pass that was
    /// superseded while computing installs nothing.
    fn run_search<H: CanvasHost + ?Sized>(&mut self, host: &H) -> Option<Rect> {
        let (Some(ctx), Some(anchor_id)) = (self.ctx.clone(), self.anchor_id) else {
            return None;
        };
        self.seq += 1;
        let my_seq = self.seq;

        let ignore = [anchor_id];
        let report = {
            let mut probe = Probe::new(host)
                .with_epsilon(self.config.epsilon)
                .ignoring(&ignore)
                .blocking(ctx.anchor)
                .with_lanes(&self.lanes);
            if let Some(page) = host.page_bounds() {
                probe = probe.within(page, self.config.page_inset);
            }
            search(&ctx, &probe, self.window)
        };

        for id in &report.stale_hits {
            warn!(shape = id.raw(), "lane index disagreed with broad phase; dropping member");
            self.lanes.remove(*id);
        }
        if self.seq != my_seq {
            return self.preview_rect();
        }

        let previous = self.held.map(|p| p.rect);
        self.held = report.placement;
        trace!(tried = report.tried, found = self.held.is_some(), "search pass");
        match (previous, self.preview_rect()) {
            (_, Some(rect)) if previous != Some(rect) => {
                self.subs.emit(&SessionEvent::PreviewShown(rect));
            }
            (Some(_), None) => self.subs.emit(&SessionEvent::PreviewHidden),
            _ => {}
        }
        self.preview_rect()
    }

    /// Commit-time revalidation against the authoritative obstacle set,
    /// with the single regeneration attempt the stale path allows.
    fn validate_for_commit<H: CanvasHost + ?Sized>(
        &mut self,
        host: &H,
    ) -> Result<Placement, SessionError> {
        let anchor_id = self.anchor_id.ok_or(SessionError::StaleCandidate)?;
        let ctx = host
            .shape_rect(anchor_id)
            .and_then(|r| AnchorContext::new(r, self.desired, &self.config))
            .ok_or(SessionError::StaleCandidate)?;
        let ignore = [anchor_id];
        let mut probe = Probe::new(host)
            .with_epsilon(self.config.epsilon)
            .ignoring(&ignore)
            .blocking(ctx.anchor);
        if let Some(page) = host.page_bounds() {
            probe = probe.within(page, self.config.page_inset);
        }

        if let Some(held) = self.held
            && probe.is_free(&held.rect)
        {
            return Ok(held);
        }

        // The scene moved underneath the preview (or there was none);
        // generation runs once more before the commit gives up.
        debug!("held candidate invalid at commit; regenerating once");
        let report = search(&ctx, &probe, self.window);
        report.placement.ok_or(SessionError::NoCandidateFound)
    }

    fn cancel_internal(&mut self, reason: CancelReason) {
        debug!(?reason, epoch = self.epoch, "gesture cancelled");
        self.state = SessionState::Cancelled;
        self.subs.emit(&SessionEvent::Cancelled(reason));
        self.clear_gesture();
    }

    fn finish_gesture(&mut self) {
        self.clear_gesture();
    }

    fn clear_gesture(&mut self) {
        self.state = SessionState::Idle;
        self.epoch += 1;
        self.anchor_id = None;
        self.intent = None;
        self.ctx = None;
        self.ctx_stale = false;
        self.held = None;
        self.window = SearchWindow::default();
    }
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("epoch", &self.epoch)
            .field("anchor", &self.anchor_id)
            .field("window", &self.window)
            .field("held", &self.held)
            .field("lanes", &self.lanes.len())
            .field("subs", &self.subs)
            .finish_non_exhaustive()
    }
}
