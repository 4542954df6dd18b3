// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
use dot_math::{MathError, Plane3, Ray2, Ray3, Vec2, Vec3};

const EPS: f64 = 1e-12;

#[test]
fn new_rejects_non_unit_normal() {
    let err = Plane3::new(Vec3::new(0.0, 0.0, 1.5), 1.0).unwrap_err();
    assert!(matches!(err, MathError::NonUnitNormal { magnitude } if magnitude == 1.5));
    // within tolerance
    assert!(Plane3::new(Vec3::new(0.0, 0.0, 1.005), 1.0).is_ok());
    assert!(Plane3::new(Vec3::ZERO, 0.0).is_err());
}

#[test]
fn axis_planes_have_expected_normals() {
    assert_eq!(Plane3::XY.normal(), Vec3::UNIT_Z);
    assert_eq!(Plane3::XZ.normal(), Vec3::UNIT_Y);
    assert_eq!(Plane3::YZ.normal(), Vec3::UNIT_X);
    assert_eq!(Plane3::XY.distance(), 0.0);
}

#[test]
fn from_triangle_builds_unit_normal_and_distance() {
    let a = Vec3::new(0.0, 0.0, 2.0);
    let b = Vec3::new(1.0, 0.0, 2.0);
    let c = Vec3::new(0.0, 1.0, 2.0);
    let plane = Plane3::from_triangle(&a, &b, &c).unwrap();
    // (c - a) × (b - a) = Y × X = -Z
    assert!(plane.normal().equals_epsilon(&Vec3::new(0.0, 0.0, -1.0), EPS));
    assert!((plane.distance() + 2.0).abs() < EPS);
    for p in [a, b, c] {
        assert!(plane.signed_distance_to_point(&p).abs() < EPS);
    }
}

#[test]
fn collinear_points_yield_no_plane() {
    let a = Vec3::new(1.0, 1.0, 1.0);
    let b = Vec3::new(2.0, 2.0, 2.0);
    let c = Vec3::new(4.0, 4.0, 4.0);
    assert_eq!(Plane3::from_triangle(&a, &b, &c), None);
    assert_eq!(Plane3::from_triangle(&a, &a, &a), None);
}

#[test]
fn ray_hits_plane_in_front_and_behind() {
    let plane = Plane3::new(Vec3::UNIT_Z, 3.0).unwrap();
    let ray = Ray3::new(Vec3::new(1.0, 2.0, 0.0), Vec3::new(0.0, 0.0, 2.0));
    assert_eq!(ray.distance_to_plane(&plane), Some(1.5));
    assert_eq!(
        plane.intersect_with_ray(&ray),
        Some(Vec3::new(1.0, 2.0, 3.0))
    );

    let away = Ray3::new(Vec3::new(0.0, 0.0, 5.0), Vec3::UNIT_Z);
    assert_eq!(away.distance_to_plane(&plane), Some(-2.0));
}

#[test]
fn parallel_ray_has_no_intersection() {
    let plane = Plane3::XZ;
    let ray = Ray3::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 1.0));
    assert_eq!(plane.intersect_with_ray(&ray), None);
}

#[test]
fn signed_distance_and_flip() {
    let plane = Plane3::new(Vec3::UNIT_X, 1.0).unwrap();
    let p = Vec3::new(4.0, 9.0, -9.0);
    assert_eq!(plane.signed_distance_to_point(&p), 3.0);
    assert_eq!(plane.flipped().signed_distance_to_point(&p), -3.0);
}

#[test]
fn ray3_point_and_shift() {
    let ray = Ray3::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0));
    assert_eq!(ray.point_at_distance(0.5), Vec3::new(1.0, 1.0, 0.0));
    let shifted = ray.shifted(2.0);
    assert_eq!(shifted.position(), Vec3::new(1.0, 4.0, 0.0));
    assert!(shifted.equals_epsilon(&Ray3::new(Vec3::new(1.0, 4.0, 0.0), ray.direction()), EPS));
}

#[test]
fn ray2_point_and_shift() {
    let ray = Ray2::new(Vec2::new(-1.0, 1.0), Vec2::new(2.0, 0.0));
    assert_eq!(ray.point_at_distance(1.5), Vec2::new(2.0, 1.0));
    assert_eq!(ray.shifted(-0.5).position(), Vec2::new(-2.0, 1.0));
}
