// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::{MathError, Ray3, Vec3, UNIT_NORMAL_TOLERANCE};

/// Oriented plane `{ p : normal · p = distance }`.
///
/// The normal is unit length, so `normal * distance` is the point of the
/// plane closest to the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "PlaneRecord"))]
pub struct Plane3 {
    normal: Vec3,
    distance: f64,
}

/// Unchecked wire shape; decoding goes through [`Plane3::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct PlaneRecord {
    normal: Vec3,
    distance: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<PlaneRecord> for Plane3 {
    type Error = MathError;

    fn try_from(record: PlaneRecord) -> Result<Self, Self::Error> {
        Self::new(record.normal, record.distance)
    }
}

impl Plane3 {
    /// The `z = 0` plane, facing +Z.
    pub const XY: Self = Self::from_parts(Vec3::UNIT_Z, 0.0);
    /// The `y = 0` plane, facing +Y.
    pub const XZ: Self = Self::from_parts(Vec3::UNIT_Y, 0.0);
    /// The `x = 0` plane, facing +X.
    pub const YZ: Self = Self::from_parts(Vec3::UNIT_X, 0.0);

    const fn from_parts(normal: Vec3, distance: f64) -> Self {
        Self { normal, distance }
    }

    /// Creates a plane from a unit normal and a signed distance.
    ///
    /// A normal whose magnitude is further than `UNIT_NORMAL_TOLERANCE` from
    /// one is rejected with [`MathError::NonUnitNormal`].
    ///
    /// # Examples
    /// ```
    /// use dot_math::{MathError, Plane3, Vec3};
    /// assert!(Plane3::new(Vec3::UNIT_Y, 2.0).is_ok());
    /// assert!(matches!(
    ///     Plane3::new(Vec3::new(0.0, 2.0, 0.0), 2.0),
    ///     Err(MathError::NonUnitNormal { .. })
    /// ));
    /// ```
    pub fn new(normal: Vec3, distance: f64) -> Result<Self, MathError> {
        let magnitude = normal.magnitude();
        if !magnitude.is_finite() || (magnitude - 1.0).abs() >= UNIT_NORMAL_TOLERANCE {
            return Err(MathError::NonUnitNormal { magnitude });
        }
        if !distance.is_finite() {
            return Err(MathError::NonFinite {
                operation: "Plane3::new",
            });
        }
        Ok(Self::from_parts(normal, distance))
    }

    /// Plane through three points, facing along `(c - a) × (b - a)`.
    ///
    /// Collinear (or coincident) points span no plane and yield `None`.
    pub fn from_triangle(a: &Vec3, b: &Vec3, c: &Vec3) -> Option<Self> {
        let normal = c.minus(a).cross(&b.minus(a));
        let normal = normal.normalized().ok()?;
        Some(Self::from_parts(normal, normal.dot(a)))
    }

    /// Unit normal.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Signed distance from the origin along the normal.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Point where `ray` meets the plane, or `None` when they are parallel.
    ///
    /// Intersections behind the ray origin are still reported; check
    /// [`Ray3::distance_to_plane`] when only forward hits matter.
    pub fn intersect_with_ray(&self, ray: &Ray3) -> Option<Vec3> {
        ray.distance_to_plane(self).map(|t| ray.point_at_distance(t))
    }

    /// Signed distance from `point` to the plane (positive on the normal side).
    pub fn signed_distance_to_point(&self, point: &Vec3) -> f64 {
        self.normal.dot(point) - self.distance
    }

    /// The same plane facing the other way.
    pub fn flipped(&self) -> Self {
        Self::from_parts(self.normal.negated(), -self.distance)
    }

    /// Per-component absolute-difference comparison.
    pub fn equals_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        self.normal.equals_epsilon(&other.normal, epsilon)
            && crate::approx_eq(self.distance, other.distance, epsilon)
    }
}

impl core::fmt::Display for Plane3 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Plane3(n=[{}, {}, {}], d={})",
            self.normal.x(),
            self.normal.y(),
            self.normal.z(),
            self.distance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_planes_pass_through_origin() {
        for plane in [Plane3::XY, Plane3::XZ, Plane3::YZ] {
            assert_eq!(plane.signed_distance_to_point(&Vec3::ZERO), 0.0);
        }
    }

    #[test]
    fn flipped_keeps_point_set() {
        let p = Plane3::new(Vec3::UNIT_Z, 3.0).unwrap_or(Plane3::XY);
        let q = p.flipped();
        let on_plane = Vec3::new(5.0, -2.0, 3.0);
        assert_eq!(p.signed_distance_to_point(&on_plane), 0.0);
        assert_eq!(q.signed_distance_to_point(&on_plane), 0.0);
    }
}
