use cgmath::{InnerSpace, MetricSpace, Vector3};

/// Squared length below which a difference vector has no usable direction.
pub const DEGENERATE_LENGTH2: f32 = 1.0e-12;

pub fn approximately_equals(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}

/// Component-wise comparison of two vectors.
pub fn v_approximately_equals(v1: Vector3<f32>, v2: Vector3<f32>, tolerance: f32) -> bool {
    approximately_equals(v1.x, v2.x, tolerance)
        && approximately_equals(v1.y, v2.y, tolerance)
        && approximately_equals(v1.z, v2.z, tolerance)
}

pub fn distance_between(v1: Vector3<f32>, v2: Vector3<f32>) -> f32 {
    v1.distance(v2)
}

/**
 * Unit vector pointing from `start` to `end`.
 *
 * Returns `None` when the two points coincide, instead of the NaN vector a plain
 * `normalize` would give. Callers pick their own fallback direction.
 */
pub fn direction_between(start: Vector3<f32>, end: Vector3<f32>) -> Option<Vector3<f32>> {
    safe_normalize(end - start)
}

pub fn safe_normalize(v: Vector3<f32>) -> Option<Vector3<f32>> {
    let len2 = v.magnitude2();
    if !len2.is_finite() || len2 <= DEGENERATE_LENGTH2 {
        return None;
    }
    Some(v / len2.sqrt())
}

/// Any unit vector perpendicular to `u`. `u` must be unit length.
pub fn perpendicular_to(u: Vector3<f32>) -> Vector3<f32> {
    let perp = if u.y.abs() < 0.99 {
        Vector3::new(-u.z, 0.0, u.x) // cross(u, UP)
    } else {
        Vector3::new(0.0, u.z, -u.y) // cross(u, RIGHT)
    };
    perp.normalize()
}
