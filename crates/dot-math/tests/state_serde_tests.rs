// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![cfg(feature = "serde")]
#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
use dot_math::{MathError, Mat3, Mat4, MatrixState, MatrixType, Plane3, Quat, Ray3, Vec2, Vec3};

#[test]
fn mat3_state_restores_entries_and_tag() {
    let m = Mat3::scaling(2.0, -3.0);
    let json = serde_json::to_string(&m.to_state()).unwrap();
    assert!(json.contains("\"type\":\"SCALING\""), "{json}");
    let state: MatrixState = serde_json::from_str(&json).unwrap();
    let back = Mat3::from_state(&state).unwrap();
    assert!(back.equals(&m));
    assert_eq!(back.matrix_type(), MatrixType::Scaling);
}

#[test]
fn mat4_state_is_column_major() {
    let m = Mat4::translation(7.0, 8.0, 9.0);
    let state = m.to_state();
    assert_eq!(&state.entries[12..15], &[7.0, 8.0, 9.0]);
    let value = serde_json::to_value(&state).unwrap();
    assert_eq!(value["type"], "TRANSLATION");
    let back = Mat4::from_state(&serde_json::from_value(value).unwrap()).unwrap();
    assert!(back.equals(&m));
    assert_eq!(back.matrix_type(), MatrixType::Translation);
}

#[test]
fn decoding_rejects_bad_records() {
    let short: MatrixState =
        serde_json::from_str(r#"{"entries":[1,0,0,0,1,0,0,0],"type":"AFFINE"}"#).unwrap();
    assert_eq!(
        Mat3::from_state(&short).unwrap_err(),
        MathError::InvalidStateLength {
            expected: 9,
            found: 8
        }
    );

    let unknown: MatrixState =
        serde_json::from_str(r#"{"entries":[1,0,0,0,1,0,0,0,1],"type":"SHEAR"}"#).unwrap();
    assert_eq!(
        Mat3::from_state(&unknown).unwrap_err(),
        MathError::UnknownMatrixType("SHEAR".to_owned())
    );

    let nine = Mat3::IDENTITY.to_state();
    assert!(Mat4::from_state(&nine).is_err());
}

#[test]
fn value_types_serialize() {
    let q = Quat::new(0.0, 0.6, 0.0, 0.8);
    let back: Quat = serde_json::from_str(&serde_json::to_string(&q).unwrap()).unwrap();
    assert_eq!(back, q);

    let plane = Plane3::new(Vec3::UNIT_Y, 2.0).unwrap();
    let back: Plane3 = serde_json::from_str(&serde_json::to_string(&plane).unwrap()).unwrap();
    assert_eq!(back, plane);

    let ray = Ray3::new(Vec3::new(1.0, 2.0, 3.0), Vec3::UNIT_Z);
    let back: Ray3 = serde_json::from_str(&serde_json::to_string(&ray).unwrap()).unwrap();
    assert_eq!(back, ray);
}

#[test]
fn record_claiming_a_tag_its_entries_lack_is_rejected() {
    let scale = r#"{"entries":[2,0,0,0,2,0,0,0,1],"type":"IDENTITY"}"#;
    let state: MatrixState = serde_json::from_str(scale).unwrap();
    assert_eq!(
        Mat3::from_state(&state).unwrap_err(),
        MathError::InconsistentMatrixType {
            claimed: MatrixType::Identity
        }
    );

    // the same entries under an honest tag keep working geometry
    let honest: MatrixState =
        serde_json::from_str(&scale.replace("IDENTITY", "SCALING")).unwrap();
    let m = Mat3::from_state(&honest).unwrap();
    let moved = m.times_matrix(&Mat3::translation(1.0, 1.0));
    assert_eq!(moved.times_vector2(&Vec2::ZERO), Vec2::new(2.0, 2.0));
    assert!(m.inverted().unwrap().equals(&Mat3::scaling(0.5, 0.5)));

    let skewed: MatrixState = serde_json::from_str(
        r#"{"entries":[1,0,0,0.5,0,1,0,0,0,0,1,0,0,0,0,1],"type":"AFFINE"}"#,
    )
    .unwrap();
    assert!(matches!(
        Mat4::from_state(&skewed),
        Err(MathError::InconsistentMatrixType {
            claimed: MatrixType::Affine
        })
    ));
}

#[test]
fn plane_decoding_validates_the_normal() {
    let err = serde_json::from_str::<Plane3>(r#"{"normal":{"data":[0,5,0]},"distance":1}"#)
        .unwrap_err();
    assert!(err.to_string().contains("unit vector"), "{err}");
    assert!(serde_json::from_str::<Plane3>(r#"{"normal":{"data":[0,1,0]},"distance":1}"#).is_ok());
}
