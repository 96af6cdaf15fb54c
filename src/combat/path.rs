//! Straight-line teleport paths
//!
//! No obstacle awareness: waypoints are a pure linear interpolation between
//! the two endpoints as they were when the path was computed.

use crate::core::types::Vec3;

/// Waypoints from `from` (exclusive) to `to` (inclusive), spaced at most
/// `offset` apart
///
/// Returns `ceil(distance / offset)` points; an empty path when the two
/// points coincide or `offset` is not positive.
pub fn find_path(from: Vec3, to: Vec3, offset: f64) -> Vec<Vec3> {
    if offset <= 0.0 || !offset.is_finite() {
        return Vec::new();
    }

    let delta = to - from;
    let steps = (delta.length() / offset).ceil();
    if !steps.is_finite() || steps < 1.0 {
        return Vec::new();
    }

    let count = steps as usize;
    (1..=count)
        .map(|step| from + delta * step as f64 / steps)
        .collect()
}
