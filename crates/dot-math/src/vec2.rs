// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::ops::{Add, Mul, Neg, Sub};

use crate::{approx_eq, MathError, Vec3};

/// 2D vector, the operand type for [`crate::Mat3`] used as a 2D affine transform.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    data: [f64; 2],
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Unit vector along +X.
    pub const UNIT_X: Self = Self::new(1.0, 0.0);

    /// Unit vector along +Y.
    pub const UNIT_Y: Self = Self::new(0.0, 1.0);

    /// Creates a vector from components.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { data: [x, y] }
    }

    /// Returns the components as an array.
    pub fn to_array(self) -> [f64; 2] {
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

    /// Adds two vectors.
    pub fn plus(&self, other: &Self) -> Self {
        Self::new(self.x() + other.x(), self.y() + other.y())
    }

    /// Subtracts another vector.
    pub fn minus(&self, other: &Self) -> Self {
        Self::new(self.x() - other.x(), self.y() - other.y())
    }

    /// Scales the vector by a scalar.
    pub fn times(&self, scalar: f64) -> Self {
        Self::new(self.x() * scalar, self.y() * scalar)
    }

    /// Component-wise negation.
    pub fn negated(&self) -> Self {
        Self::new(-self.x(), -self.y())
    }

    /// Dot product.
    pub fn dot(&self, other: &Self) -> f64 {
        self.x() * other.x() + self.y() * other.y()
    }

    /// Scalar (z-component) cross product.
    pub fn cross(&self, other: &Self) -> f64 {
        self.x() * other.y() - self.y() * other.x()
    }

    /// Vector magnitude.
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Squared magnitude.
    pub fn magnitude_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Unit vector in the same direction; zero vectors are rejected.
    pub fn normalized(&self) -> Result<Self, MathError> {
        let mag = self.magnitude();
        if mag == 0.0 {
            return Err(MathError::ZeroMagnitude {
                operation: "Vec2::normalized",
            });
        }
        Ok(self.times(1.0 / mag))
    }

    /// Per-component absolute-difference comparison.
    pub fn equals_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        approx_eq(self.x(), other.x(), epsilon) && approx_eq(self.y(), other.y(), epsilon)
    }

    /// True when both components are finite.
    pub fn is_finite(&self) -> bool {
        self.x().is_finite() && self.y().is_finite()
    }

    /// Widens to 3D with the given `z` (use `1.0` for homogeneous points).
    pub fn to_vec3(&self, z: f64) -> Vec3 {
        Vec3::new(self.x(), self.y(), z)
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from(value: [f64; 2]) -> Self {
        Self { data: value }
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.plus(&rhs)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.minus(&rhs)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        self.times(rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        self.negated()
    }
}
