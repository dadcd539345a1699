// Copyright 2026 the Quadrille Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid quantization.
//!
//! Sizes snap **up** to the next grid multiple with a floor of one grid
//! unit, so a tile never collapses to zero. Positions derived from an
//! anchor snap **down**. Both are idempotent, and the placement pipeline
//! applies each at most once per candidate: positions are computed
//! arithmetically from the unsnapped anchor edges plus stride multiples and
//! are never re-snapped afterwards, which keeps candidates flush with the
//! anchor's true on-screen edges.

/// Snap a size up to the next multiple of `grid`, with a floor of one grid
/// unit. A non-positive `grid` returns the input unchanged.
#[inline]
pub fn snap_size(v: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return v;
    }
    let k = ceil_to_i64(v / grid).max(1);
    grid * k as f64
}

/// Snap a size down to the previous multiple of `grid`, with the same
/// one-unit floor. Used where an upper bound must not be exceeded.
#[inline]
pub fn snap_size_down(v: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return v;
    }
    let k = floor_to_i64(v / grid).max(1);
    grid * k as f64
}

/// Snap a coordinate down to the previous multiple of `grid`.
#[inline]
pub fn snap_down(v: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return v;
    }
    grid * floor_to_i64(v / grid) as f64
}

#[inline]
fn floor_to_i64(v: f64) -> i64 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Grid multiples are intentionally truncated to i64."
    )]
    let i = v as i64;
    if (i as f64) > v { i - 1 } else { i }
}

#[inline]
fn ceil_to_i64(v: f64) -> i64 {
    -floor_to_i64(-v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_snap_up() {
        assert_eq!(snap_size(240.0, 8.0), 240.0);
        assert_eq!(snap_size(241.0, 8.0), 248.0);
        assert_eq!(snap_size(1.0, 8.0), 8.0);
    }

    #[test]
    fn sizes_never_snap_to_zero() {
        assert_eq!(snap_size(0.0, 8.0), 8.0);
        assert_eq!(snap_size(-3.0, 8.0), 8.0);
        assert_eq!(snap_size_down(3.0, 8.0), 8.0);
    }

    #[test]
    fn snap_is_idempotent() {
        for v in [0.0, 1.0, 7.9, 8.0, 100.5, 240.0, 1023.0] {
            assert_eq!(snap_size(snap_size(v, 8.0), 8.0), snap_size(v, 8.0));
            assert_eq!(snap_down(snap_down(v, 8.0), 8.0), snap_down(v, 8.0));
        }
    }

    #[test]
    fn positions_snap_down_including_negatives() {
        assert_eq!(snap_down(17.0, 8.0), 16.0);
        assert_eq!(snap_down(-0.5, 8.0), -8.0);
        assert_eq!(snap_down(-16.0, 8.0), -16.0);
    }

    #[test]
    fn non_positive_grid_is_identity() {
        assert_eq!(snap_size(37.0, 0.0), 37.0);
        assert_eq!(snap_down(37.0, -1.0), 37.0);
    }

    #[test]
    fn size_down_stays_at_or_below() {
        assert_eq!(snap_size_down(247.0, 8.0), 240.0);
        assert_eq!(snap_size_down(240.0, 8.0), 240.0);
    }
}
