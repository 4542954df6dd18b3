// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Cached transforms.
//!
//! A [`Transform`] owns one primary matrix and memoises three derived ones
//! (inverse, transpose, inverse-transpose). Each derived matrix carries a
//! dirty bit; every replacement of the primary clears all three before
//! listeners run, and getters recompute on first read.

use core::fmt;

use tracing::trace;

use crate::{MathError, Mat3, Mat4, Ray2, Ray3, Vec2, Vec3};

/// Operations a [`Transform`] needs from its matrix type.
pub trait SquareMatrix: Copy + fmt::Debug {
    /// Multiplicative identity.
    const IDENTITY: Self;

    /// Short name used in log records.
    const NAME: &'static str;

    /// True when every entry is finite.
    fn is_finite(&self) -> bool;

    /// True when the matrix is (tagged or numerically) the identity.
    fn is_identity(&self) -> bool;

    /// `self * m`.
    fn times_matrix(&self, m: &Self) -> Self;

    /// Transpose.
    fn transposed(&self) -> Self;

    /// Inverse, failing on a singular matrix.
    fn inverted(&self) -> Result<Self, MathError>;
}

impl SquareMatrix for Mat3 {
    const IDENTITY: Self = Mat3::IDENTITY;
    const NAME: &'static str = "Mat3";

    fn is_finite(&self) -> bool {
        Mat3::is_finite(self)
    }

    fn is_identity(&self) -> bool {
        Mat3::is_identity(self)
    }

    fn times_matrix(&self, m: &Self) -> Self {
        Mat3::times_matrix(self, m)
    }

    fn transposed(&self) -> Self {
        Mat3::transposed(self)
    }

    fn inverted(&self) -> Result<Self, MathError> {
        Mat3::inverted(self)
    }
}

impl SquareMatrix for Mat4 {
    const IDENTITY: Self = Mat4::IDENTITY;
    const NAME: &'static str = "Mat4";

    fn is_finite(&self) -> bool {
        Mat4::is_finite(self)
    }

    fn is_identity(&self) -> bool {
        Mat4::is_identity(self)
    }

    fn times_matrix(&self, m: &Self) -> Self {
        Mat4::times_matrix(self, m)
    }

    fn transposed(&self) -> Self {
        Mat4::transposed(self)
    }

    fn inverted(&self) -> Result<Self, MathError> {
        Mat4::inverted(self)
    }
}

/// Handle returned by [`Transform::add_listener`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener<M> = Box<dyn FnMut(&M)>;

/// 2D affine transform backed by a [`Mat3`].
pub type Transform3 = Transform<Mat3>;

/// 3D homogeneous transform backed by a [`Mat4`].
pub type Transform4 = Transform<Mat4>;

/// Primary matrix plus lazily recomputed inverse, transpose and
/// inverse-transpose.
///
/// Getters for derived matrices take `&mut self` because they may fill the
/// cache; the returned references are shared, so callers cannot alter a
/// cached value.
///
/// # Examples
/// ```
/// use dot_math::{Mat4, Transform4, Vec3};
/// let mut t = Transform4::new(Mat4::translation(1.0, 2.0, 3.0))?;
/// let p = t.transform_position3(&Vec3::ZERO);
/// assert_eq!(t.inverse_position3(&p)?, Vec3::ZERO);
/// # Ok::<(), dot_math::MathError>(())
/// ```
pub struct Transform<M: SquareMatrix> {
    matrix: M,
    inverse: M,
    inverse_valid: bool,
    transposed: M,
    transposed_valid: bool,
    inverse_transposed: M,
    inverse_transposed_valid: bool,
    listeners: Vec<(ListenerId, Listener<M>)>,
    next_listener: u64,
    recompute_count: u64,
}

impl<M: SquareMatrix> Transform<M> {
    /// Wraps `matrix`; non-finite entries are rejected.
    pub fn new(matrix: M) -> Result<Self, MathError> {
        ensure_finite(&matrix, "Transform::new")?;
        let mut t = Self::identity();
        t.matrix = matrix;
        t.invalidate();
        Ok(t)
    }

    /// Identity transform with all caches already valid.
    pub fn identity() -> Self {
        Self {
            matrix: M::IDENTITY,
            inverse: M::IDENTITY,
            inverse_valid: true,
            transposed: M::IDENTITY,
            transposed_valid: true,
            inverse_transposed: M::IDENTITY,
            inverse_transposed_valid: true,
            listeners: Vec::new(),
            next_listener: 0,
            recompute_count: 0,
        }
    }

    /// The primary matrix.
    pub fn matrix(&self) -> &M {
        &self.matrix
    }

    /// True when the primary matrix is the identity.
    pub fn is_identity(&self) -> bool {
        self.matrix.is_identity()
    }

    /// True when the primary matrix is finite.
    pub fn is_finite(&self) -> bool {
        self.matrix.is_finite()
    }

    /// Number of derived matrices recomputed so far.
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    /// Registers a callback run with the new primary matrix after each change.
    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&M) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Unregisters a callback. Returns `false` if `id` was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Replaces the primary matrix.
    pub fn set_matrix(&mut self, matrix: &M) -> Result<&mut Self, MathError> {
        ensure_finite(matrix, "Transform::set_matrix")?;
        self.replace(*matrix);
        Ok(self)
    }

    /// `primary = m * primary`.
    pub fn prepend(&mut self, m: &M) -> Result<&mut Self, MathError> {
        ensure_finite(m, "Transform::prepend")?;
        let next = m.times_matrix(&self.matrix);
        self.replace(next);
        Ok(self)
    }

    /// `primary = primary * m`.
    pub fn append(&mut self, m: &M) -> Result<&mut Self, MathError> {
        ensure_finite(m, "Transform::append")?;
        let next = self.matrix.times_matrix(m);
        self.replace(next);
        Ok(self)
    }

    /// Inverse of the primary matrix, recomputed if stale.
    pub fn inverse(&mut self) -> Result<&M, MathError> {
        if !self.inverse_valid {
            self.inverse = self.matrix.inverted()?;
            self.inverse_valid = true;
            self.note_recompute("inverse");
        }
        Ok(&self.inverse)
    }

    /// Transpose of the primary matrix, recomputed if stale.
    pub fn matrix_transposed(&mut self) -> &M {
        if !self.transposed_valid {
            self.transposed = self.matrix.transposed();
            self.transposed_valid = true;
            self.note_recompute("transposed");
        }
        &self.transposed
    }

    /// Transpose of the inverse, built from the cached inverse.
    pub fn inverse_transposed(&mut self) -> Result<&M, MathError> {
        if !self.inverse_transposed_valid {
            let inverse = *self.inverse()?;
            self.inverse_transposed = inverse.transposed();
            self.inverse_transposed_valid = true;
            self.note_recompute("inverse_transposed");
        }
        Ok(&self.inverse_transposed)
    }

    fn replace(&mut self, matrix: M) {
        self.matrix = matrix;
        self.invalidate();
        if !self.listeners.is_empty() {
            trace!(
                matrix = M::NAME,
                listeners = self.listeners.len(),
                "notifying transform listeners"
            );
            let current = self.matrix;
            for (_, listener) in &mut self.listeners {
                listener(&current);
            }
        }
    }

    fn invalidate(&mut self) {
        self.inverse_valid = false;
        self.transposed_valid = false;
        self.inverse_transposed_valid = false;
    }

    fn note_recompute(&mut self, which: &'static str) {
        self.recompute_count += 1;
        trace!(
            matrix = M::NAME,
            cache = which,
            count = self.recompute_count,
            "recomputed transform cache"
        );
    }
}

impl<M: SquareMatrix> Default for Transform<M> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<M: SquareMatrix> Clone for Transform<M> {
    /// Copies the matrix and caches; listeners stay with the original.
    fn clone(&self) -> Self {
        Self {
            matrix: self.matrix,
            inverse: self.inverse,
            inverse_valid: self.inverse_valid,
            transposed: self.transposed,
            transposed_valid: self.transposed_valid,
            inverse_transposed: self.inverse_transposed,
            inverse_transposed_valid: self.inverse_transposed_valid,
            listeners: Vec::new(),
            next_listener: 0,
            recompute_count: 0,
        }
    }
}

impl<M: SquareMatrix> fmt::Debug for Transform<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("matrix", &self.matrix)
            .field("inverse_valid", &self.inverse_valid)
            .field("transposed_valid", &self.transposed_valid)
            .field("inverse_transposed_valid", &self.inverse_transposed_valid)
            .field("listeners", &self.listeners.len())
            .field("recompute_count", &self.recompute_count)
            .finish_non_exhaustive()
    }
}

fn ensure_finite<M: SquareMatrix>(m: &M, operation: &'static str) -> Result<(), MathError> {
    if m.is_finite() {
        Ok(())
    } else {
        Err(MathError::NonFinite { operation })
    }
}

impl Transform<Mat3> {
    /// `primary = translation(x, y) * primary`.
    pub fn prepend_translation(&mut self, x: f64, y: f64) -> Result<&mut Self, MathError> {
        self.prepend(&Mat3::translation(x, y))
    }

    /// `primary = primary * translation(x, y)`.
    pub fn append_translation(&mut self, x: f64, y: f64) -> Result<&mut Self, MathError> {
        self.append(&Mat3::translation(x, y))
    }

    /// Maps a point (translation applied).
    pub fn transform_position2(&self, v: &Vec2) -> Vec2 {
        self.matrix.times_vector2(v)
    }

    /// Maps a delta (translation ignored).
    pub fn transform_delta2(&self, v: &Vec2) -> Vec2 {
        self.matrix.times_relative_vector2(v)
    }

    /// Maps a normal through the inverse-transpose.
    pub fn transform_normal2(&mut self, v: &Vec2) -> Result<Vec2, MathError> {
        Ok(self.inverse_transposed()?.times_relative_vector2(v))
    }

    /// X coordinate of the mapped point `(x, y)`.
    pub fn transform_x(&self, x: f64, y: f64) -> f64 {
        let m = &self.matrix;
        m.m00() * x + m.m01() * y + m.m02()
    }

    /// Y coordinate of the mapped point `(x, y)`.
    pub fn transform_y(&self, x: f64, y: f64) -> f64 {
        let m = &self.matrix;
        m.m10() * x + m.m11() * y + m.m12()
    }

    /// Maps a ray by its origin and the point one direction-length along it.
    pub fn transform_ray2(&self, ray: &Ray2) -> Ray2 {
        let origin = self.transform_position2(&ray.position());
        let tip = self.transform_position2(&ray.position().plus(&ray.direction()));
        Ray2::new(origin, tip.minus(&origin))
    }

    /// Inverse of [`Transform::transform_position2`].
    pub fn inverse_position2(&mut self, v: &Vec2) -> Result<Vec2, MathError> {
        Ok(self.inverse()?.times_vector2(v))
    }

    /// Inverse of [`Transform::transform_delta2`].
    pub fn inverse_delta2(&mut self, v: &Vec2) -> Result<Vec2, MathError> {
        Ok(self.inverse()?.times_relative_vector2(v))
    }

    /// Inverse of [`Transform::transform_normal2`]: the primary's transpose.
    pub fn inverse_normal2(&self, v: &Vec2) -> Vec2 {
        self.matrix.times_transpose_vector2(v)
    }

    /// X coordinate of `(x, y)` mapped through the inverse.
    pub fn inverse_x(&mut self, x: f64, y: f64) -> Result<f64, MathError> {
        let m = self.inverse()?;
        Ok(m.m00() * x + m.m01() * y + m.m02())
    }

    /// Y coordinate of `(x, y)` mapped through the inverse.
    pub fn inverse_y(&mut self, x: f64, y: f64) -> Result<f64, MathError> {
        let m = self.inverse()?;
        Ok(m.m10() * x + m.m11() * y + m.m12())
    }

    /// Inverse of [`Transform::transform_ray2`].
    pub fn inverse_ray2(&mut self, ray: &Ray2) -> Result<Ray2, MathError> {
        let origin = self.inverse_position2(&ray.position())?;
        let tip = self.inverse_position2(&ray.position().plus(&ray.direction()))?;
        Ok(Ray2::new(origin, tip.minus(&origin)))
    }
}

impl Transform<Mat4> {
    /// `primary = translation(x, y, z) * primary`.
    pub fn prepend_translation(&mut self, x: f64, y: f64, z: f64) -> Result<&mut Self, MathError> {
        self.prepend(&Mat4::translation(x, y, z))
    }

    /// `primary = primary * translation(x, y, z)`.
    pub fn append_translation(&mut self, x: f64, y: f64, z: f64) -> Result<&mut Self, MathError> {
        self.append(&Mat4::translation(x, y, z))
    }

    /// Maps a point (`w = 1`, no perspective divide).
    pub fn transform_position3(&self, v: &Vec3) -> Vec3 {
        self.matrix.times_vector3(v)
    }

    /// Maps a delta (translation ignored).
    pub fn transform_delta3(&self, v: &Vec3) -> Vec3 {
        self.matrix.times_relative_vector3(v)
    }

    /// Maps a normal through the inverse-transpose, so non-uniform scale
    /// keeps it perpendicular to transformed surfaces.
    pub fn transform_normal3(&mut self, v: &Vec3) -> Result<Vec3, MathError> {
        Ok(self.inverse_transposed()?.times_relative_vector3(v))
    }

    /// Maps a ray by its origin and the point one direction-length along it.
    pub fn transform_ray(&self, ray: &Ray3) -> Ray3 {
        let origin = self.transform_position3(&ray.position());
        let tip = self.transform_position3(&ray.position().plus(&ray.direction()));
        Ray3::new(origin, tip.minus(&origin))
    }

    /// Inverse of [`Transform::transform_position3`].
    pub fn inverse_position3(&mut self, v: &Vec3) -> Result<Vec3, MathError> {
        Ok(self.inverse()?.times_vector3(v))
    }

    /// Inverse of [`Transform::transform_delta3`].
    pub fn inverse_delta3(&mut self, v: &Vec3) -> Result<Vec3, MathError> {
        Ok(self.inverse()?.times_relative_vector3(v))
    }

    /// Inverse of [`Transform::transform_normal3`]: the primary's transpose.
    pub fn inverse_normal3(&self, v: &Vec3) -> Vec3 {
        self.matrix.times_transpose_vector3(v)
    }

    /// Inverse of [`Transform::transform_ray`].
    pub fn inverse_ray(&mut self, ray: &Ray3) -> Result<Ray3, MathError> {
        let origin = self.inverse_position3(&ray.position())?;
        let tip = self.inverse_position3(&ray.position().plus(&ray.direction()))?;
        Ok(Ray3::new(origin, tip.minus(&origin)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_starts_with_valid_caches() {
        let mut t = Transform4::identity();
        assert!(t.inverse().is_ok());
        t.matrix_transposed();
        assert!(t.inverse_transposed().is_ok());
        assert_eq!(t.recompute_count(), 0);
    }

    #[test]
    fn remove_unknown_listener_is_false() {
        let mut t = Transform3::identity();
        let id = t.add_listener(|_| {});
        assert!(t.remove_listener(id));
        assert!(!t.remove_listener(id));
    }
}
