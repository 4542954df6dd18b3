// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::{approx_eq, MathError, Mat3, MatrixType, Vec3, EPSILON, SLERP_LINEAR_THRESHOLD};

/// Quaternion stored as `(x, y, z, w)` with `w` the scalar part.
///
/// * Plain algebra (`plus`, `times_scalar`) works on any quaternion.
/// * Used as a rotation it is assumed to be a versor (unit length), except
///   in [`Quat::to_rotation_matrix`] which rescales by `2 / |q|²`.
/// * Value type: every operation returns a new quaternion.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quat {
    data: [f64; 4],
}

impl Quat {
    /// `(x, y, z)` vector part and `w` scalar part, stored as given.
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { data: [x, y, z, w] }
    }

    /// `(0, 0, 0, 1)`, the no-op rotation.
    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Components as `[x, y, z, w]`.
    pub fn to_array(self) -> [f64; 4] {
        self.data
    }

    /// X (vector) component.
    pub fn x(&self) -> f64 {
        self.data[0]
    }

    /// Y (vector) component.
    pub fn y(&self) -> f64 {
        self.data[1]
    }

    /// Z (vector) component.
    pub fn z(&self) -> f64 {
        self.data[2]
    }

    /// W (scalar) component.
    pub fn w(&self) -> f64 {
        self.data[3]
    }

    /// Rotation of `angle` radians about `axis` (right-handed).
    ///
    /// The axis is normalised here. An axis of length ≤ `EPSILON` has no
    /// orientation and yields the identity.
    pub fn from_axis_angle(axis: &Vec3, angle: f64) -> Self {
        let len = axis.magnitude();
        if len <= EPSILON {
            return Self::identity();
        }
        let (sin_half, cos_half) = (angle * 0.5).sin_cos();
        let scaled = axis.times(sin_half / len);
        Self::new(scaled.x(), scaled.y(), scaled.z(), cos_half)
    }

    /// Builds a rotation from Euler angles in radians.
    ///
    /// Argument order follows jMonkeyEngine's `fromAngles(x, y, z)`: `yaw`
    /// is the angle about +X, `roll` about +Y and `pitch` about +Z.
    pub fn from_euler_angles(yaw: f64, roll: f64, pitch: f64) -> Self {
        let (sin_pitch, cos_pitch) = (pitch * 0.5).sin_cos();
        let (sin_roll, cos_roll) = (roll * 0.5).sin_cos();
        let (sin_yaw, cos_yaw) = (yaw * 0.5).sin_cos();

        let a = cos_roll * cos_pitch;
        let b = sin_roll * sin_pitch;
        let c = cos_roll * sin_pitch;
        let d = sin_roll * cos_pitch;

        Self::new(
            a * sin_yaw + b * cos_yaw,
            d * cos_yaw + c * sin_yaw,
            c * cos_yaw - d * sin_yaw,
            a * cos_yaw - b * sin_yaw,
        )
    }

    /// Minimal rotation taking unit vector `a` onto unit vector `b`.
    ///
    /// Goes through [`Mat3::rotate_a_to_b`], so the nearly (anti)parallel
    /// case is handled by the reflection branch there.
    pub fn rotation_between(a: &Vec3, b: &Vec3) -> Self {
        Self::from_rotation_matrix(&Mat3::rotate_a_to_b(a, b))
    }

    /// Component-wise sum.
    pub fn plus(&self, other: &Self) -> Self {
        Self::new(
            self.x() + other.x(),
            self.y() + other.y(),
            self.z() + other.z(),
            self.w() + other.w(),
        )
    }

    /// Scales every component.
    pub fn times_scalar(&self, s: f64) -> Self {
        Self::new(self.x() * s, self.y() * s, self.z() * s, self.w() * s)
    }

    /// Hamilton product `self * other`.
    ///
    /// The terms are summed in the jMonkeyEngine order (`x·w`, `z·y`, `y·z`,
    /// `w·x`, ...). Algebraically this is the textbook product, but dependent
    /// code compares results bit-for-bit, so the summation order is fixed.
    ///
    /// # Examples
    /// ```
    /// use core::f64::consts::FRAC_PI_2;
    /// use dot_math::{Quat, Vec3};
    /// let yaw = Quat::from_axis_angle(&Vec3::UNIT_Y, FRAC_PI_2);
    /// let pitch = Quat::from_axis_angle(&Vec3::UNIT_X, FRAC_PI_2);
    /// // Non-commutative: pitch*yaw is different
    /// assert_ne!(yaw.times_quaternion(&pitch), pitch.times_quaternion(&yaw));
    /// ```
    pub fn times_quaternion(&self, q: &Self) -> Self {
        let (x, y, z, w) = (self.x(), self.y(), self.z(), self.w());
        Self::new(
            x * q.w() - z * q.y() + y * q.z() + w * q.x(),
            -x * q.z() + y * q.w() + z * q.x() + w * q.y(),
            x * q.y() - y * q.x() + z * q.w() + w * q.z(),
            -x * q.x() - y * q.y() - z * q.z() + w * q.w(),
        )
    }

    /// Rotates `v` by this versor (`q v q*` expanded).
    pub fn times_vector3(&self, v: &Vec3) -> Vec3 {
        if v.magnitude() == 0.0 {
            return Vec3::ZERO;
        }
        let (x, y, z, w) = (self.x(), self.y(), self.z(), self.w());
        Vec3::new(
            w * w * v.x() + 2.0 * y * w * v.z() - 2.0 * z * w * v.y() + x * x * v.x()
                + 2.0 * y * x * v.y()
                + 2.0 * z * x * v.z()
                - z * z * v.x()
                - y * y * v.x(),
            2.0 * x * y * v.x() + y * y * v.y() + 2.0 * z * y * v.z() + 2.0 * w * z * v.x()
                - z * z * v.y()
                + w * w * v.y()
                - 2.0 * x * w * v.z()
                - x * x * v.y(),
            2.0 * x * z * v.x() + 2.0 * y * z * v.y() + z * z * v.z() - 2.0 * w * y * v.x()
                - y * y * v.z()
                + 2.0 * w * x * v.y()
                - x * x * v.z()
                + w * w * v.z(),
        )
    }

    /// Four-component dot product.
    pub fn dot(&self, other: &Self) -> f64 {
        self.x() * other.x() + self.y() * other.y() + self.z() * other.z() + self.w() * other.w()
    }

    /// Squared norm.
    pub fn magnitude_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Norm.
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Unit quaternion in the same direction; the zero quaternion is rejected.
    pub fn normalized(&self) -> Result<Self, MathError> {
        let mag = self.magnitude();
        if mag == 0.0 {
            return Err(MathError::ZeroMagnitude {
                operation: "Quat::normalized",
            });
        }
        Ok(self.times_scalar(1.0 / mag))
    }

    /// Negates every component (the same rotation).
    pub fn negated(&self) -> Self {
        self.times_scalar(-1.0)
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

    /// Converts to a 3×3 rotation matrix.
    ///
    /// Products are scaled by `2 / |q|²` so non-unit quaternions still give
    /// a pure rotation; the zero quaternion maps to the identity.
    pub fn to_rotation_matrix(&self) -> Mat3 {
        let norm = self.magnitude_squared();
        let flip = if norm == 1.0 {
            2.0
        } else if norm > 0.0 {
            2.0 / norm
        } else {
            0.0
        };

        let (x, y, z, w) = (self.x(), self.y(), self.z(), self.w());
        let xx = x * x * flip;
        let xy = x * y * flip;
        let xz = x * z * flip;
        let xw = w * x * flip;
        let yy = y * y * flip;
        let yz = y * z * flip;
        let yw = w * y * flip;
        let zz = z * z * flip;
        let zw = w * z * flip;

        let mut m = Mat3::IDENTITY;
        m.column_major(
            1.0 - (yy + zz),
            xy + zw,
            xz - yw,
            xy - zw,
            1.0 - (xx + zz),
            yz + xw,
            xz + yw,
            yz - xw,
            1.0 - (xx + yy),
            Some(MatrixType::Other),
        );
        m
    }

    /// Extracts a quaternion from a rotation matrix.
    ///
    /// Branches on the trace (Graphics Gems / Shepperd): a non-negative
    /// trace takes the direct square root, otherwise the largest diagonal
    /// entry picks which component is solved first. Each branch divides by
    /// the largest available quantity, which keeps the result stable.
    pub fn from_rotation_matrix(m: &Mat3) -> Self {
        let (v00, v01, v02) = (m.m00(), m.m01(), m.m02());
        let (v10, v11, v12) = (m.m10(), m.m11(), m.m12());
        let (v20, v21, v22) = (m.m20(), m.m21(), m.m22());

        let trace = v00 + v11 + v22;

        if trace >= 0.0 {
            let root = (trace + 1.0).sqrt();
            let s = 0.5 / root;
            Self::new(
                (v21 - v12) * s,
                (v02 - v20) * s,
                (v10 - v01) * s,
                0.5 * root,
            )
        } else if v00 > v11 && v00 > v22 {
            let root = (1.0 + v00 - v11 - v22).sqrt();
            let s = 0.5 / root;
            Self::new(
                0.5 * root,
                (v10 + v01) * s,
                (v02 + v20) * s,
                (v21 - v12) * s,
            )
        } else if v11 > v22 {
            let root = (1.0 + v11 - v00 - v22).sqrt();
            let s = 0.5 / root;
            Self::new(
                (v10 + v01) * s,
                0.5 * root,
                (v21 + v12) * s,
                (v02 - v20) * s,
            )
        } else {
            let root = (1.0 + v22 - v00 - v11).sqrt();
            let s = 0.5 / root;
            Self::new(
                (v02 + v20) * s,
                (v21 + v12) * s,
                0.5 * root,
                (v10 - v01) * s,
            )
        }
    }

    /// Shortest-path spherical linear interpolation.
    ///
    /// - Identical inputs return `a` untouched.
    /// - A negative dot product negates `b` first so the short arc is taken.
    /// - When `1 - dot <= SLERP_LINEAR_THRESHOLD` the components are blended
    ///   linearly, avoiding the `1 / sin(theta)` blow-up.
    pub fn slerp(a: &Self, b: &Self, t: f64) -> Self {
        if a.data == b.data {
            return *a;
        }

        let mut dot = a.dot(b);
        let b = if dot < 0.0 {
            dot = -dot;
            b.negated()
        } else {
            *b
        };

        let mut ratio_a = 1.0 - t;
        let mut ratio_b = t;

        if 1.0 - dot > SLERP_LINEAR_THRESHOLD {
            let theta = dot.min(1.0).acos();
            let inv_sin_theta = 1.0 / theta.sin();
            ratio_a = ((1.0 - t) * theta).sin() * inv_sin_theta;
            ratio_b = (t * theta).sin() * inv_sin_theta;
        }

        a.times_scalar(ratio_a).plus(&b.times_scalar(ratio_b))
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::identity()
    }
}

/// `[x, y, z, w]`, vector part first. Non-unit values are kept; only the
/// rotation conversions rescale by the magnitude.
impl From<[f64; 4]> for Quat {
    fn from(value: [f64; 4]) -> Self {
        Self { data: value }
    }
}

impl core::ops::Mul for Quat {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.times_quaternion(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_properties() {
        let id = Quat::identity();
        assert_eq!(id.times_quaternion(&id), id);
        assert!(id.to_rotation_matrix().equals(&Mat3::IDENTITY));
    }

    #[test]
    fn zero_quaternion_maps_to_identity_matrix() {
        let m = Quat::new(0.0, 0.0, 0.0, 0.0).to_rotation_matrix();
        assert!(m.equals(&Mat3::IDENTITY));
    }

    #[test]
    fn degenerate_axis_yields_identity() {
        assert_eq!(Quat::from_axis_angle(&Vec3::ZERO, 1.0), Quat::identity());
    }
}
