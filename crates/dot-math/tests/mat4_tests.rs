// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
use core::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4};

use dot_math::{MathError, Mat4, MatrixType, Rows4, Vec3, Vec4};
use proptest::prelude::*;

const EPS: f64 = 1e-9;

fn approx_eq16(a: &Mat4, b: &Mat4) {
    let (a, b) = (a.to_array(), b.to_array());
    for i in 0..16 {
        assert!((a[i] - b[i]).abs() <= EPS, "index {i}: {a:?} vs {b:?}");
    }
}

fn approx_eq3(a: Vec3, b: Vec3) {
    assert!(a.equals_epsilon(&b, EPS), "{a:?} vs {b:?}");
}

fn general_product(a: &Mat4, b: &Mat4) -> Mat4 {
    let (ra, rb) = (a.rows(), b.rows());
    let rows: Rows4 = core::array::from_fn(|r| {
        core::array::from_fn(|c| (0..4).map(|k| ra[r][k] * rb[k][c]).sum())
    });
    Mat4::new(rows)
}

#[test]
fn translations_add_and_match_general_product() {
    let a = Mat4::translation(2.0, 3.0, 4.0);
    let b = Mat4::translation(-1.0, 5.0, 0.5);
    let p = a.times_matrix(&b);
    assert_eq!(p.matrix_type(), MatrixType::Translation);
    assert!(p.equals(&Mat4::translation(1.0, 8.0, 4.5)));
    assert!(p.equals(&general_product(&a, &b)));
}

#[test]
fn scalings_multiply() {
    let p = Mat4::scaling(2.0, 3.0, 4.0).times_matrix(&Mat4::uniform_scaling(0.5));
    assert_eq!(p.matrix_type(), MatrixType::Scaling);
    assert!(p.equals(&Mat4::scaling(1.0, 1.5, 2.0)));
}

#[test]
fn rotations_are_affine_and_compose_affinely() {
    let r = Mat4::rotation_x(FRAC_PI_4).times_matrix(&Mat4::translation(1.0, 2.0, 3.0));
    assert_eq!(r.matrix_type(), MatrixType::Affine);
    assert_eq!(r.rows()[3], [0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn perspective_forces_general_product() {
    let p = Mat4::perspective(FRAC_PI_2, 1.5, 0.1, 100.0);
    assert_eq!(p.matrix_type(), MatrixType::Other);
    let view = Mat4::translation(0.0, 0.0, -5.0);
    let pv = p.times_matrix(&view);
    assert_eq!(pv.matrix_type(), MatrixType::Other);
    approx_eq16(&pv, &general_product(&p, &view));
}

#[test]
fn perspective_maps_near_and_far_planes() {
    let (near, far) = (0.5, 50.0);
    let p = Mat4::perspective(FRAC_PI_3, 2.0, near, far);
    let ndc = |z: f64| {
        let clip = p.times_vector4(&Vec4::new(0.0, 0.0, z, 1.0));
        clip.z() / clip.w()
    };
    assert!((ndc(-near) + 1.0).abs() < EPS);
    assert!((ndc(-far) - 1.0).abs() < EPS);
    // cot(fov/2) on the y axis, divided by aspect on x
    let f = 1.0 / (FRAC_PI_3 / 2.0).tan();
    assert!((p.m11() - f).abs() < EPS);
    assert!((p.m00() - f / 2.0).abs() < EPS);
}

#[test]
fn inverse_per_tag() {
    let other = Mat4::new([
        [2.0, 0.0, 1.0, 0.0],
        [1.0, 3.0, 0.0, 0.0],
        [0.0, 1.0, 4.0, 0.0],
        [0.0, 0.0, 0.5, 1.0],
    ]);
    let cases = [
        Mat4::IDENTITY,
        Mat4::translation(1.0, -2.0, 3.0),
        Mat4::scaling(2.0, 4.0, -8.0),
        Mat4::rotation_axis_angle(&Vec3::new(0.0, 0.6, 0.8), 1.1)
            .times_matrix(&Mat4::translation(3.0, 2.0, 1.0)),
        other,
    ];
    let expected = [
        MatrixType::Identity,
        MatrixType::Translation,
        MatrixType::Scaling,
        MatrixType::Affine,
        MatrixType::Other,
    ];
    for (m, kind) in cases.iter().zip(expected) {
        assert_eq!(m.matrix_type(), kind);
        let inv = m.inverted().unwrap();
        approx_eq16(&m.times_matrix(&inv), &Mat4::IDENTITY);
        approx_eq16(&inv.times_matrix(m), &Mat4::IDENTITY);
    }
}

#[test]
fn affine_inverse_keeps_exact_bottom_row() {
    let m = Mat4::rotation_y(0.7).times_matrix(&Mat4::scaling(2.0, 3.0, 5.0));
    let inv = m.inverted().unwrap();
    assert_eq!(inv.matrix_type(), MatrixType::Affine);
    assert_eq!(inv.rows()[3], [0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn singular_matrices_fail_to_invert() {
    let zero = Mat4::new([[0.0; 4]; 4]);
    assert!(matches!(
        zero.inverted(),
        Err(MathError::SingularMatrix { .. })
    ));

    let mut flat = Mat4::scaling(1.0, 0.0, 1.0);
    assert!(flat.invert().is_err());
    assert!(flat.equals(&Mat4::scaling(1.0, 0.0, 1.0)));

    let repeated_rows = Mat4::new([
        [1.0, 2.0, 3.0, 4.0],
        [1.0, 2.0, 3.0, 4.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);
    assert_eq!(repeated_rows.determinant(), 0.0);
    assert!(repeated_rows.inverted().is_err());
}

#[test]
fn point_delta_and_normal_products() {
    let m = Mat4::translation(5.0, -3.0, 2.0).times_matrix(&Mat4::rotation_z(FRAC_PI_2));
    approx_eq3(m.times_vector3(&Vec3::UNIT_X), Vec3::new(5.0, -2.0, 2.0));
    approx_eq3(m.times_relative_vector3(&Vec3::UNIT_X), Vec3::UNIT_Y);
    approx_eq3(m.times_transpose_vector3(&Vec3::UNIT_Y), Vec3::UNIT_X);

    let v = m.times_vector4(&Vec4::new(1.0, 0.0, 0.0, 0.0));
    assert!(v.equals_epsilon(&Vec4::new(0.0, 1.0, 0.0, 0.0), EPS));
}

#[test]
fn relative_vector_uses_every_column() {
    // Each entry of the 3×3 block is distinct so a transposed or repeated
    // term shows up in the result.
    let m = Mat4::new([
        [1.0, 2.0, 3.0, 100.0],
        [4.0, 5.0, 6.0, 200.0],
        [7.0, 8.0, 9.0, 300.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);
    let v = Vec3::new(1.0, 10.0, 100.0);
    assert_eq!(m.times_relative_vector3(&v), Vec3::new(321.0, 654.0, 987.0));
}

#[test]
fn scale_vector_of_affine_matches_column_norms() {
    let m = Mat4::translation(4.0, 5.0, 6.0)
        .times_matrix(&Mat4::rotation_x(0.3))
        .times_matrix(&Mat4::scaling(2.0, 3.0, 4.0));
    approx_eq3(m.scale_vector(), Vec3::new(2.0, 3.0, 4.0));
    approx_eq3(m.translation_part(), Vec3::new(4.0, 5.0, 6.0));
}

#[test]
fn scale_vector_of_perspective_is_finite() {
    let m = Mat4::perspective(1.0, 2.0, 1.0, 10.0);
    let s = m.scale_vector();
    assert!(s.is_finite(), "{s:?}");
    let f = 1.0 / 0.5_f64.tan();
    approx_eq3(s, Vec3::new(f / 2.0, f, 11.0 / 9.0));
}

#[test]
fn rows_and_column_major_agree() {
    let rows = [
        [1.0, 2.0, 3.0, 4.0],
        [5.0, 6.0, 7.0, 8.0],
        [9.0, 10.0, 11.0, 12.0],
        [13.0, 14.0, 15.0, 16.0],
    ];
    let m = Mat4::from(rows);
    assert_eq!(m.m12(), 7.0);
    assert_eq!(m.m30(), 13.0);
    let mut n = Mat4::IDENTITY;
    n.column_major(&m.to_array());
    assert!(n.equals(&m));
    assert_eq!(n.matrix_type(), MatrixType::Other);
}

#[test]
fn mul_operators_match_methods() {
    let a = Mat4::rotation_y(FRAC_PI_3);
    let b = Mat4::translation(1.0, 2.0, 3.0);
    assert!((a * b).equals(&a.times_matrix(&b)));
    let mut c = a;
    c *= &b;
    assert!(c.equals(&a.times_matrix(&b)));
    let mut d = a;
    d.prepend_matrix(&b);
    assert!(d.equals(&b.times_matrix(&a)));
}

#[test]
fn transpose_negate_add_subtract() {
    let a = Mat4::perspective(1.0, 1.0, 1.0, 10.0);
    assert!(a.transposed().transposed().equals(&a));
    assert!(a.plus(&a.negated()).equals(&Mat4::new([[0.0; 4]; 4])));
    assert!(a.minus(&a).equals(&Mat4::new([[0.0; 4]; 4])));
    assert_eq!(Mat4::scaling(1.0, 2.0, 3.0).transposed().matrix_type(), MatrixType::Scaling);
}

#[test]
fn css_matrix3d_is_column_major() {
    let s = Mat4::translation(1.0, 2.0, 3.0).css_transform();
    assert_eq!(s, "matrix3d(1,0,0,0,0,1,0,0,0,0,1,0,1,2,3,1)");
}

#[test]
fn frozen_identity_reads_through() {
    let id = Mat4::IDENTITY.make_immutable();
    assert!(id.is_identity());
    assert_eq!(id.determinant(), 1.0);
}

fn affine_strategy() -> impl Strategy<Value = Mat4> {
    (
        prop::array::uniform3(-1.0..1.0f64),
        -3.0..3.0f64,
        prop::array::uniform3(0.2..4.0f64),
        prop::array::uniform3(-10.0..10.0f64),
    )
        .prop_filter_map("axis too short", |(axis, angle, scale, t)| {
            let axis = Vec3::from(axis).normalized().ok()?;
            Some(
                Mat4::translation(t[0], t[1], t[2])
                    .times_matrix(&Mat4::rotation_axis_angle(&axis, angle))
                    .times_matrix(&Mat4::scaling(scale[0], scale[1], scale[2])),
            )
        })
}

proptest! {
    #[test]
    fn affine_inverse_round_trips(m in affine_strategy()) {
        let inv = m.inverted().unwrap();
        prop_assert!(m.times_matrix(&inv).equals_epsilon(&Mat4::IDENTITY, 1e-8));
    }

    #[test]
    fn affine_product_matches_general(a in affine_strategy(), b in affine_strategy()) {
        let fast = a.times_matrix(&b);
        prop_assert_eq!(fast.matrix_type(), MatrixType::Affine);
        prop_assert!(fast.equals_epsilon(&general_product(&a, &b), 1e-9));
    }

    #[test]
    fn point_round_trips_through_inverse(m in affine_strategy(), p in prop::array::uniform3(-50.0..50.0f64)) {
        let p = Vec3::from(p);
        let back = m.inverted().unwrap().times_vector3(&m.times_vector3(&p));
        prop_assert!(back.equals_epsilon(&p, 1e-7));
    }
}
