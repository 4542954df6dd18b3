// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::ops::{Add, Mul, Neg, Sub};

use crate::{approx_eq, MathError, Vec4};

/// 3D vector used as a point, delta or normal depending on context.
///
/// * Points go through [`crate::Mat4::times_vector3`] (homogeneous `w = 1`).
/// * Deltas go through [`crate::Mat4::times_relative_vector3`] (`w = 0`).
/// * Normals go through [`crate::Transform4::transform_normal3`].
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    data: [f64; 3],
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit vector pointing along the positive X axis.
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit vector pointing along the positive Y axis.
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit vector pointing along the positive Z axis.
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Creates a vector from components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { data: [x, y, z] }
    }

    /// Returns the components as an array.
    pub fn to_array(self) -> [f64; 3] {
        self.data
    }

    /// X component.
    pub fn x(&self) -> f64 {
        self.data[0]
    }

    /// Y component.
    pub fn y(&self) -> f64 {
        self.data[1]
    }

    /// Z component.
    pub fn z(&self) -> f64 {
        self.data[2]
    }

    /// Adds two vectors.
    pub fn plus(&self, other: &Self) -> Self {
        Self::new(
            self.x() + other.x(),
            self.y() + other.y(),
            self.z() + other.z(),
        )
    }

    /// Subtracts another vector.
    pub fn minus(&self, other: &Self) -> Self {
        Self::new(
            self.x() - other.x(),
            self.y() - other.y(),
            self.z() - other.z(),
        )
    }

    /// Scales the vector by a scalar.
    pub fn times(&self, scalar: f64) -> Self {
        Self::new(self.x() * scalar, self.y() * scalar, self.z() * scalar)
    }

    /// Component-wise negation.
    pub fn negated(&self) -> Self {
        Self::new(-self.x(), -self.y(), -self.z())
    }

    /// Dot product with another vector.
    pub fn dot(&self, other: &Self) -> f64 {
        self.x() * other.x() + self.y() * other.y() + self.z() * other.z()
    }

    /// Cross product with another vector.
    pub fn cross(&self, other: &Self) -> Self {
        let (ax, ay, az) = (self.x(), self.y(), self.z());
        let (bx, by, bz) = (other.x(), other.y(), other.z());
        Self::new(ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx)
    }

    /// Vector magnitude.
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Squared magnitude of the vector.
    pub fn magnitude_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Returns the unit vector pointing the same way.
    ///
    /// A zero vector has no direction; asking for one is a caller bug and
    /// yields [`MathError::ZeroMagnitude`].
    pub fn normalized(&self) -> Result<Self, MathError> {
        let mag = self.magnitude();
        if mag == 0.0 {
            return Err(MathError::ZeroMagnitude {
                operation: "Vec3::normalized",
            });
        }
        Ok(self.times(1.0 / mag))
    }

    /// Per-component absolute-difference comparison.
    pub fn equals_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| approx_eq(*a, *b, epsilon))
    }

    /// True when every component is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Widens to a homogeneous vector with the given `w`.
    pub fn to_vec4(&self, w: f64) -> Vec4 {
        Vec4::new(self.x(), self.y(), self.z(), w)
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(value: [f64; 3]) -> Self {
        Self { data: value }
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.plus(&rhs)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.minus(&rhs)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        self.times(rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        self.negated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_eq!(Vec3::UNIT_X.cross(&Vec3::UNIT_Y), Vec3::UNIT_Z);
        assert_eq!(Vec3::UNIT_Y.cross(&Vec3::UNIT_X), -Vec3::UNIT_Z);
    }

    #[test]
    fn normalized_rejects_zero_vector() {
        assert!(matches!(
            Vec3::ZERO.normalized(),
            Err(MathError::ZeroMagnitude { .. })
        ));
    }

    #[test]
    fn normalized_has_unit_magnitude() {
        let n = Vec3::new(3.0, 4.0, 12.0).normalized();
        assert!(matches!(n, Ok(v) if (v.magnitude() - 1.0).abs() < 1e-12));
    }
}
