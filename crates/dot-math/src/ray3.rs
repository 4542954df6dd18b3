// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::{Plane3, Vec3};

/// Half-line `position + direction * t` in 3D.
///
/// The direction is not normalised; `t` is measured in multiples of it.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ray3 {
    position: Vec3,
    direction: Vec3,
}

impl Ray3 {
    /// Creates a ray from an origin and a direction.
    pub const fn new(position: Vec3, direction: Vec3) -> Self {
        Self {
            position,
            direction,
        }
    }

    /// Origin.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Direction (not necessarily unit length).
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// `position + direction * t`.
    pub fn point_at_distance(&self, t: f64) -> Vec3 {
        self.position.plus(&self.direction.times(t))
    }

    /// Same direction, origin advanced to `point_at_distance(t)`.
    pub fn shifted(&self, t: f64) -> Self {
        Self::new(self.point_at_distance(t), self.direction)
    }

    /// Parameter `t` where the ray crosses `plane`; `None` when parallel.
    ///
    /// Negative values mean the plane lies behind the origin.
    pub fn distance_to_plane(&self, plane: &Plane3) -> Option<f64> {
        let normal = plane.normal();
        let denominator = self.direction.dot(&normal);
        if denominator == 0.0 {
            return None;
        }
        Some((plane.distance() - self.position.dot(&normal)) / denominator)
    }

    /// Per-component comparison of origin and direction.
    pub fn equals_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        self.position.equals_epsilon(&other.position, epsilon)
            && self.direction.equals_epsilon(&other.direction, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_ray_misses_plane() {
        let ray = Ray3::new(Vec3::new(0.0, 0.0, 1.0), Vec3::UNIT_X);
        assert_eq!(ray.distance_to_plane(&Plane3::XY), None);
    }

    #[test]
    fn shifted_moves_origin_only() {
        let ray = Ray3::new(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0));
        let s = ray.shifted(1.5);
        assert_eq!(s.position(), Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(s.direction(), ray.direction());
    }
}
