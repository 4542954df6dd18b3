// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! dot-math: fixed-dimension linear algebra for 2D/3D scene code.
//!
//! Matrices carry a [`MatrixType`] tag so products and inverses of
//! identities, translations and scalings take closed-form shortcuts. On top
//! of them sit quaternions, planes, rays and [`Transform`], which caches the
//! inverse and transposes of its matrix until the matrix changes.
//!
//! All scalars are `f64`. Shared constants are `const` values, and
//! [`Frozen`] wraps a value so it can be read but never mutated.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::many_single_char_names,
    clippy::module_name_repetitions,
    clippy::use_self
)]
// Exact comparisons are part of the contract: singular inversion fails on a
// determinant of exactly zero and tag inference checks for exact 0/1 rows.
#![allow(clippy::float_cmp)]

mod error;
mod frozen;
mod mat3;
mod mat4;
mod matrix_type;
mod plane3;
mod quat;
mod ray2;
mod ray3;
mod state;
pub mod transform;
pub mod util;
mod vec2;
mod vec3;
mod vec4;

pub use error::MathError;
pub use frozen::Frozen;
pub use mat3::Mat3;
pub use mat4::{Mat4, Rows4};
pub use matrix_type::MatrixType;
pub use plane3::Plane3;
pub use quat::Quat;
pub use ray2::Ray2;
pub use ray3::Ray3;
pub use state::MatrixState;
pub use transform::{ListenerId, SquareMatrix, Transform, Transform3, Transform4};
pub use util::{
    approx_eq, clamp, deg_to_rad, lerp, rad_to_deg, EPSILON, PARALLEL_EPSILON,
    SLERP_LINEAR_THRESHOLD, UNIT_NORMAL_TOLERANCE,
};
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
