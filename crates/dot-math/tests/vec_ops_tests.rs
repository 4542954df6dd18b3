// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use dot_math::{MathError, Vec2, Vec3, Vec4};

#[test]
fn vec2_cross_is_signed_area() {
    assert_eq!(Vec2::UNIT_X.cross(&Vec2::UNIT_Y), 1.0);
    assert_eq!(Vec2::UNIT_Y.cross(&Vec2::UNIT_X), -1.0);
    assert_eq!(Vec2::new(3.0, 4.0).magnitude(), 5.0);
}

#[test]
fn vec3_cross_follows_right_hand_rule() {
    assert_eq!(Vec3::UNIT_X.cross(&Vec3::UNIT_Y), Vec3::UNIT_Z);
    assert_eq!(Vec3::UNIT_Z.cross(&Vec3::UNIT_X), Vec3::UNIT_Y);
}

#[test]
fn operators_match_methods() {
    let a = Vec3::new(1.0, -2.0, 3.0);
    let b = Vec3::new(0.5, 0.5, 0.5);
    assert_eq!(a + b, a.plus(&b));
    assert_eq!(a - b, a.minus(&b));
    assert_eq!(a * 2.0, a.times(2.0));
    assert_eq!(-a, a.negated());
}

#[test]
fn zero_vectors_do_not_normalize() {
    assert!(matches!(
        Vec2::ZERO.normalized(),
        Err(MathError::ZeroMagnitude { .. })
    ));
    assert!(Vec3::ZERO.normalized().is_err());
    assert!(Vec4::ZERO.normalized().is_err());
}

#[test]
fn homogeneous_widening_and_narrowing() {
    let p = Vec2::new(1.0, 2.0).to_vec3(1.0);
    assert_eq!(p, Vec3::new(1.0, 2.0, 1.0));
    let h = p.to_vec4(0.0);
    assert_eq!(h.w(), 0.0);
    assert_eq!(h.to_vec3(), p);
    assert_eq!(Vec4::from([1.0, 2.0, 3.0, 4.0]).dot(&Vec4::new(1.0, 1.0, 1.0, 1.0)), 10.0);
}

#[test]
fn finiteness() {
    assert!(Vec3::new(1.0, 2.0, 3.0).is_finite());
    assert!(!Vec3::new(1.0, f64::NAN, 3.0).is_finite());
    assert!(!Vec2::new(f64::INFINITY, 0.0).is_finite());
}
