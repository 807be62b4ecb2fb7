use corelib::models::{DirectionVector, RrgPoint};

/// Minimum step length (in ratio/momentum units) considered real movement.
///
/// A last step shorter than this is treated as numeric noise, and the heading
/// is taken over the last two steps instead. Tunable.
pub const JITTER_THRESHOLD: f64 = 0.5;

/// Heading of the latest movement of a tail.
///
/// Uses the last two points. If that step is shorter than
/// [`JITTER_THRESHOLD`] and a third point exists, the vector from the
/// third-to-last point to the last one is used instead (angle and magnitude).
///
/// Returns `None` for fewer than two points.
pub fn direction(points: &[RrgPoint]) -> Option<DirectionVector> {
    let n = points.len();
    if n < 2 {
        return None;
    }

    let last = &points[n - 1];
    let step = vector_between(&points[n - 2], last);

    if step.magnitude < JITTER_THRESHOLD && n >= 3 {
        return Some(vector_between(&points[n - 3], last));
    }

    Some(step)
}

fn vector_between(from: &RrgPoint, to: &RrgPoint) -> DirectionVector {
    let dx = to.rs_ratio - from.rs_ratio;
    let dy = to.rs_momentum - from.rs_momentum;

    DirectionVector {
        angle_degrees: normalize_degrees(dy.atan2(dx).to_degrees()),
        magnitude: dx.hypot(dy),
    }
}

/// Map any angle into `[0, 360)`.
fn normalize_degrees(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    // rem_euclid can round tiny negatives up to exactly 360.0
    if d >= 360.0 { 0.0 } else { d }
}
