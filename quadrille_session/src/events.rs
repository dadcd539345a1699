// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session events and the subscribe/unsubscribe contract.
//!
//! UI bindings come and go (mount/unmount, view recycling), so the session
//! exposes an explicit subscription registry instead of assuming any
//! particular wiring. Subscribers receive every transition the session
//! makes; a cancellation is always observable before the next preview tick.

use alloc::boxed::Box;
use alloc::vec::Vec;

use kurbo::Rect;

use quadrille_field::ShapeId;

/// Why a gesture was cancelled.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CancelReason {
    /// The trigger modifier was released.
    ModifierReleased,
    /// Escape was pressed.
    Escape,
    /// The pointer stream was cancelled by the platform.
    PointerCancelled,
    /// The anchor, selection, or surrounding context changed under the
    /// gesture.
    ContextChanged,
    /// The host called cancel directly.
    Explicit,
}

/// A session transition, delivered to subscribers as it happens.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// A preview rectangle is available (new gesture or moved preview).
    PreviewShown(Rect),
    /// The search came up empty; any visible preview should disappear.
    PreviewHidden,
    /// A commit landed; the host returned this shape id.
    Committed(ShapeId),
    /// The gesture was cancelled with no scene side effects.
    Cancelled(CancelReason),
}

/// Handle returned by [`Subscriptions::subscribe`]; pass it back to
/// unsubscribe.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&SessionEvent)>;

/// Registry of session event listeners.
#[derive(Default)]
pub struct Subscriptions {
    entries: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl Subscriptions {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a listener; keep the id to unsubscribe later.
    pub fn subscribe(&mut self, listener: impl FnMut(&SessionEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if the id was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(i, _)| *i != id);
        self.entries.len() != before
    }

    /// Number of live listeners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn emit(&mut self, event: &SessionEvent) {
        for (_, listener) in &mut self.entries {
            listener(event);
        }
    }
}

impl core::fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscriptions")
            .field("listeners", &self.entries.len())
            .finish_non_exhaustive()
    }
}
