// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed session outcomes. None of these are fatal to the host.

use thiserror::Error;

use crate::host::CommitError;

/// Why a session operation did not produce a placement.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SessionError {
    /// The bounded search (including fit variants) found nothing. The
    /// caller may retry with an expanded window.
    #[error("search window exhausted without a free placement")]
    NoCandidateFound,
    /// The gesture's context evaporated between preview and commit (for
    /// example the anchor was deleted mid-commit).
    #[error("scene changed between preview and commit")]
    StaleCandidate,
    /// The anchor or the desired size has no usable area.
    #[error("anchor or desired size is degenerate")]
    DegenerateInput,
    /// The trigger modifier is not held; no gesture can start.
    #[error("trigger modifier is not held")]
    ModifierNotHeld,
    /// The handle belongs to a gesture that already ended.
    #[error("preview handle belongs to a finished gesture")]
    ExpiredHandle,
    /// The host rejected the atomic write.
    #[error("host rejected the atomic write: {0}")]
    Commit(#[from] CommitError),
}
