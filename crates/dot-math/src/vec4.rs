// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::ops::{Add, Mul, Neg, Sub};

use crate::{approx_eq, MathError, Vec3};

/// Homogeneous 4D vector `(x, y, z, w)`.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec4 {
    data: [f64; 4],
}

impl Vec4 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a vector from components.
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { data: [x, y, z, w] }
    }

    /// Returns the components as an array.
    pub fn to_array(self) -> [f64; 4] {
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

    /// W (homogeneous) component.
    pub fn w(&self) -> f64 {
        self.data[3]
    }

    /// Adds two vectors.
    pub fn plus(&self, other: &Self) -> Self {
        Self::new(
            self.x() + other.x(),
            self.y() + other.y(),
            self.z() + other.z(),
            self.w() + other.w(),
        )
    }

    /// Subtracts another vector.
    pub fn minus(&self, other: &Self) -> Self {
        Self::new(
            self.x() - other.x(),
            self.y() - other.y(),
            self.z() - other.z(),
            self.w() - other.w(),
        )
    }

    /// Scales every component.
    pub fn times(&self, scalar: f64) -> Self {
        Self::new(
            self.x() * scalar,
            self.y() * scalar,
            self.z() * scalar,
            self.w() * scalar,
        )
    }

    /// Component-wise negation.
    pub fn negated(&self) -> Self {
        self.times(-1.0)
    }

    /// Four-component dot product.
    pub fn dot(&self, other: &Self) -> f64 {
        self.x() * other.x() + self.y() * other.y() + self.z() * other.z() + self.w() * other.w()
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
                operation: "Vec4::normalized",
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

    /// Drops `w` without dividing.
    pub fn to_vec3(&self) -> Vec3 {
        Vec3::new(self.x(), self.y(), self.z())
    }
}

impl From<[f64; 4]> for Vec4 {
    fn from(value: [f64; 4]) -> Self {
        Self { data: value }
    }
}

impl Add for Vec4 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.plus(&rhs)
    }
}

impl Sub for Vec4 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.minus(&rhs)
    }
}

impl Mul<f64> for Vec4 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        self.times(rhs)
    }
}

impl Neg for Vec4 {
    type Output = Self;
    fn neg(self) -> Self {
        self.negated()
    }
}
