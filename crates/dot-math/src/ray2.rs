// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::Vec2;

/// Half-line `position + direction * t` in the plane.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ray2 {
    position: Vec2,
    direction: Vec2,
}

impl Ray2 {
    /// Creates a ray from an origin and a direction.
    pub const fn new(position: Vec2, direction: Vec2) -> Self {
        Self {
            position,
            direction,
        }
    }

    /// Origin.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Direction (not necessarily unit length).
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// `position + direction * t`.
    pub fn point_at_distance(&self, t: f64) -> Vec2 {
        self.position.plus(&self.direction.times(t))
    }

    /// Same direction, origin advanced to `point_at_distance(t)`.
    pub fn shifted(&self, t: f64) -> Self {
        Self::new(self.point_at_distance(t), self.direction)
    }

    /// Per-component comparison of origin and direction.
    pub fn equals_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        self.position.equals_epsilon(&other.position, epsilon)
            && self.direction.equals_epsilon(&other.direction, epsilon)
    }
}
