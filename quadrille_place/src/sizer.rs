// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Final content sizing, decoupled from placement position.
//!
//! The sizer turns an accepted candidate's bounds and a content intent into
//! committed dimensions. Aspect-locked content gets the larger-area fit
//! that respects both bounds without cropping or letterboxing; free content
//! fills the bounds. Results snap down to the grid so they never exceed the
//! space the search validated, and the same function serves preview and
//! commit so nothing visibly resizes after creation.

use alloc::string::String;

use kurbo::Size;

use crate::snap::snap_size_down;

/// What kind of content a placement will hold.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntentKind {
    /// Free-form content; fills whatever space is available.
    Block,
    /// Media with known or probed intrinsic dimensions.
    Media {
        /// Intrinsic pixel size; fixes the aspect ratio.
        natural: Size,
    },
    /// Embedded content with a declared aspect ratio (width over height).
    Embed {
        /// Width-over-height ratio.
        ratio: f64,
    },
}

/// Content payload carried through a placement gesture.
///
/// Opaque to every geometry component; only the sizer reads it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intent {
    /// Content kind, driving the sizing rule.
    pub kind: IntentKind,
    /// Optional display title for previews.
    pub title: Option<String>,
    /// Optional content reference (image URL, channel slug, and the like).
    pub reference: Option<String>,
}

impl Intent {
    /// Free-form content.
    pub fn block() -> Self {
        Self {
            kind: IntentKind::Block,
            title: None,
            reference: None,
        }
    }

    /// Media with intrinsic dimensions.
    pub fn media(natural: Size) -> Self {
        Self {
            kind: IntentKind::Media { natural },
            title: None,
            reference: None,
        }
    }

    /// Embed with a declared aspect ratio.
    pub fn embed(ratio: f64) -> Self {
        Self {
            kind: IntentKind::Embed { ratio },
            title: None,
            reference: None,
        }
    }

    /// Attach a title, builder-style.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach a content reference, builder-style.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Width-over-height ratio this content is locked to, if any.
    ///
    /// Degenerate intrinsic sizes and non-finite ratios read as unlocked;
    /// malformed content should still place, just unconstrained.
    pub fn ratio(&self) -> Option<f64> {
        match self.kind {
            IntentKind::Block => None,
            IntentKind::Media { natural } => {
                (natural.width > 0.0 && natural.height > 0.0)
                    .then(|| natural.width / natural.height)
            }
            IntentKind::Embed { ratio } => (ratio.is_finite() && ratio > 0.0).then_some(ratio),
        }
    }
}

/// Committed dimensions plus the preview metadata a renderer needs.
#[derive(Clone, Debug, PartialEq)]
pub struct SizedShape {
    /// Final snapped size.
    pub size: Size,
    /// The intent that produced it, for preview rendering.
    pub intent: Intent,
}

/// Compute final dimensions for content inside `available` bounds.
///
/// `max` optionally caps the bounds first. The result is identical across
/// preview and commit by construction: same inputs, same function.
pub fn resolve(intent: &Intent, available: Size, max: Option<Size>, grid: f64) -> SizedShape {
    let avail = match max {
        Some(m) => Size::new(available.width.min(m.width), available.height.min(m.height)),
        None => available,
    };
    let fitted = match intent.ratio() {
        Some(ratio) => {
            let width_based_h = avail.width / ratio;
            if width_based_h <= avail.height {
                Size::new(avail.width, width_based_h)
            } else {
                Size::new(avail.height * ratio, avail.height)
            }
        }
        None => avail,
    };
    SizedShape {
        size: Size::new(
            snap_size_down(fitted.width, grid),
            snap_size_down(fitted.height, grid),
        ),
        intent: intent.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_bounds_use_the_height_based_pair() {
        let sized = resolve(&Intent::embed(2.0), Size::new(300.0, 100.0), None, 4.0);
        assert_eq!(sized.size, Size::new(200.0, 100.0));
    }

    #[test]
    fn tall_bounds_use_the_width_based_pair() {
        let sized = resolve(&Intent::embed(2.0), Size::new(200.0, 400.0), None, 8.0);
        assert_eq!(sized.size, Size::new(200.0, 96.0));
    }

    #[test]
    fn media_ratio_comes_from_natural_size() {
        let intent = Intent::media(Size::new(1600.0, 900.0));
        let sized = resolve(&intent, Size::new(240.0, 240.0), None, 8.0);
        // 16:9 inside a square: width-limited.
        assert_eq!(sized.size.width, 240.0);
        assert!(sized.size.height <= 240.0 * 9.0 / 16.0);
        // Snapping moves the height at most one grid unit off the true fit.
        let exact_height = 240.0 * 9.0 / 16.0;
        assert!(exact_height - sized.size.height <= 8.0);
    }

    #[test]
    fn unconstrained_content_fills_the_bounds() {
        let sized = resolve(&Intent::block(), Size::new(240.0, 240.0), None, 8.0);
        assert_eq!(sized.size, Size::new(240.0, 240.0));
    }

    #[test]
    fn max_caps_the_available_bounds() {
        let sized = resolve(
            &Intent::block(),
            Size::new(640.0, 480.0),
            Some(Size::new(320.0, 320.0)),
            8.0,
        );
        assert_eq!(sized.size, Size::new(320.0, 320.0));
    }

    #[test]
    fn result_never_exceeds_available_bounds() {
        for (w, h) in [(301.0, 99.0), (123.0, 457.0), (48.0, 48.0)] {
            let sized = resolve(&Intent::embed(1.5), Size::new(w, h), None, 8.0);
            assert!(sized.size.width <= w);
            assert!(sized.size.height <= h);
        }
    }

    #[test]
    fn degenerate_media_reads_as_unconstrained() {
        let intent = Intent::media(Size::new(0.0, 900.0));
        assert_eq!(intent.ratio(), None);
        assert_eq!(Intent::embed(f64::NAN).ratio(), None);
        assert_eq!(Intent::embed(-2.0).ratio(), None);
    }

    #[test]
    fn preview_and_commit_agree() {
        let intent = Intent::media(Size::new(800.0, 600.0)).with_title("print");
        let a = resolve(&intent, Size::new(240.0, 240.0), None, 8.0);
        let b = resolve(&intent, Size::new(240.0, 240.0), None, 8.0);
        assert_eq!(a, b);
        assert_eq!(a.intent.title.as_deref(), Some("print"));
    }
}
