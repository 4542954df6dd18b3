// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scalar helpers and the named thresholds used across the crate.

use std::f64::consts::TAU;

/// Degeneracy threshold for axis lengths and similar near-zero checks.
pub const EPSILON: f64 = 1e-10;

/// `|a·b|` above `1 - PARALLEL_EPSILON` routes [`crate::Mat3::rotate_a_to_b`]
/// through the reflection branch.
pub const PARALLEL_EPSILON: f64 = 1e-4;

/// [`crate::Quat::slerp`] only uses the spherical weights when
/// `1 - dot` exceeds this; closer quaternions are blended linearly.
pub const SLERP_LINEAR_THRESHOLD: f64 = 0.1;

/// Allowed deviation of a plane normal's magnitude from 1.
pub const UNIT_NORMAL_TOLERANCE: f64 = 0.01;

/// Clamps `value` to the inclusive `[min, max]` range.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    debug_assert!(min <= max, "invalid clamp range: {min} > {max}");
    value.max(min).min(max)
}

/// Converts degrees to radians.
pub fn deg_to_rad(value: f64) -> f64 {
    value * (TAU / 360.0)
}

/// Converts radians to degrees.
pub fn rad_to_deg(value: f64) -> f64 {
    value * (360.0 / TAU)
}

/// Linear interpolation, `a` at `t = 0` and `b` at `t = 1`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Absolute-difference comparison used by every `equals_epsilon`.
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deg_rad_roundtrip_basic_angles() {
        for deg in [0.0, 45.0, 90.0, 180.0, -90.0] {
            assert!(approx_eq(rad_to_deg(deg_to_rad(deg)), deg, 1e-12));
        }
    }

    #[test]
    fn clamp_and_lerp() {
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, 0.0, 1.0), 0.0);
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
    }

    #[test]
    fn approx_eq_is_inclusive() {
        assert!(approx_eq(1.0, 1.5, 0.5));
        assert!(!approx_eq(1.0, 1.5, 0.25));
    }
}
