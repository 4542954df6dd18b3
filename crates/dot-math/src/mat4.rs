// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::fmt;

use tracing::debug;

use crate::{approx_eq, Frozen, MathError, MatrixState, MatrixType, Vec3, Vec4};

/// Row-major view of a 4×4 matrix, used for construction and the product loops.
pub type Rows4 = [[f64; 4]; 4];

/// 4x4 homogeneous matrix of `f64`, column-major, carrying a [`MatrixType`].
///
/// The tag picks the product and inversion shortcuts, so it only ever
/// claims a specialised shape the entries really have. `Affine` means the
/// bottom row is exactly `[0, 0, 0, 1]`; [`Mat4::perspective`] is `Other`.
/// Points take an implicit `w = 1` and are not divided by the resulting `w`.
///
/// # Examples
/// ```
/// use dot_math::{Mat4, MatrixType, Vec3};
/// let moved = Mat4::translation(1.0, 0.0, 0.0).times_matrix(&Mat4::translation(0.0, 2.0, 0.0));
/// assert_eq!(moved.matrix_type(), MatrixType::Translation);
/// let spun = moved.times_matrix(&Mat4::rotation_z(0.5));
/// assert_eq!(spun.matrix_type(), MatrixType::Affine);
/// assert_eq!(moved.times_vector3(&Vec3::ZERO), Vec3::new(1.0, 2.0, 0.0));
/// ```
#[derive(Debug, Copy, Clone)]
pub struct Mat4 {
    entries: [f64; 16],
    kind: MatrixType,
}

macro_rules! cell_accessors {
    ($($name:ident => ($row:expr, $col:expr)),* $(,)?) => {
        $(
            #[doc = concat!("Entry at row ", stringify!($row), ", column ", stringify!($col), ".")]
            pub fn $name(&self) -> f64 {
                self.at($row, $col)
            }
        )*
    };
}

impl Mat4 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self::from_parts(
        [
            1.0, 0.0, 0.0, 0.0, // col 0
            0.0, 1.0, 0.0, 0.0, // col 1
            0.0, 0.0, 1.0, 0.0, // col 2
            0.0, 0.0, 0.0, 1.0, // col 3
        ],
        MatrixType::Identity,
    );

    const fn from_parts(entries: [f64; 16], kind: MatrixType) -> Self {
        Self { entries, kind }
    }

    /// Builds from row-major rows, inferring `Affine` or `Other`.
    pub fn new(rows: Rows4) -> Self {
        Self::from_row_major(rows, None)
    }

    /// Builds from row-major rows with an explicit or inferred tag.
    pub fn from_row_major(rows: Rows4, kind: Option<MatrixType>) -> Self {
        let mut m = Self::IDENTITY;
        m.row_major(rows, kind);
        m
    }

    /// The shared [`Mat4::IDENTITY`], tagged `Identity`.
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Translation by `(x, y, z)`, tagged `Translation`.
    ///
    /// The offset lands in entries `m03`, `m13`, `m23`.
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.set_to_translation(x, y, z);
        m
    }

    /// Translation by a vector.
    pub fn translation_from_vector(v: &Vec3) -> Self {
        Self::translation(v.x(), v.y(), v.z())
    }

    /// Per-axis scale, tagged `Scaling`.
    pub fn scaling(x: f64, y: f64, z: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.set_to_scale(x, y, z);
        m
    }

    /// Uniform scale on all three axes.
    pub fn uniform_scaling(s: f64) -> Self {
        Self::scaling(s, s, s)
    }

    /// Rotation about a unit `axis` by `angle` radians (Rodrigues' formula).
    pub fn rotation_axis_angle(axis: &Vec3, angle: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.set_to_rotation_axis_angle(axis, angle);
        m
    }

    /// Right-handed rotation about +X, tagged `Affine`.
    pub fn rotation_x(angle: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.set_to_rotation_x(angle);
        m
    }

    /// Right-handed rotation about +Y, tagged `Affine`.
    pub fn rotation_y(angle: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.set_to_rotation_y(angle);
        m
    }

    /// Right-handed rotation about +Z, tagged `Affine`.
    pub fn rotation_z(angle: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.set_to_rotation_z(angle);
        m
    }

    /// OpenGL-style perspective projection (`gluPerspective`).
    ///
    /// `fov_y` is the full vertical field of view in radians. Depth maps
    /// `[-z_near, -z_far]` to clip-space `[-1, 1]`.
    pub fn perspective(fov_y: f64, aspect: f64, z_near: f64, z_far: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.set_to_perspective(fov_y, aspect, z_near, z_far);
        m
    }

    /// Rebuilds a matrix from a persisted [`MatrixState`].
    pub fn from_state(state: &MatrixState) -> Result<Self, MathError> {
        let (entries, kind) = state.decode::<16>()?;
        Ok(Self::from_parts(entries, kind))
    }

    /// Captures entries and tag for persistence.
    pub fn to_state(&self) -> MatrixState {
        MatrixState {
            entries: self.entries.to_vec(),
            kind: self.kind.name().to_owned(),
        }
    }

    /// Wraps a copy in a read-only [`Frozen`] handle.
    pub fn make_immutable(self) -> Frozen<Self> {
        Frozen::new(self)
    }

    // ── accessors ──────────────────────────────────────────────────────

    fn at(&self, row: usize, col: usize) -> f64 {
        self.entries[col * 4 + row]
    }

    cell_accessors! {
        m00 => (0, 0), m01 => (0, 1), m02 => (0, 2), m03 => (0, 3),
        m10 => (1, 0), m11 => (1, 1), m12 => (1, 2), m13 => (1, 3),
        m20 => (2, 0), m21 => (2, 1), m22 => (2, 2), m23 => (2, 3),
        m30 => (3, 0), m31 => (3, 1), m32 => (3, 2), m33 => (3, 3),
    }

    /// Column-major entries.
    pub fn entries(&self) -> &[f64; 16] {
        &self.entries
    }

    /// Copy of the sixteen entries, column by column.
    pub fn to_array(self) -> [f64; 16] {
        self.entries
    }

    /// Row-major copy of the entries.
    pub fn rows(&self) -> Rows4 {
        let mut rows = [[0.0; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = self.at(r, c);
            }
        }
        rows
    }

    /// The type tag currently attached to this matrix.
    pub fn matrix_type(&self) -> MatrixType {
        self.kind
    }

    /// Full 4×4 determinant.
    pub fn determinant(&self) -> f64 {
        Cofactors::of(&self.entries).determinant()
    }

    /// Translation read from the last column.
    pub fn translation_part(&self) -> Vec3 {
        Vec3::new(self.m03(), self.m13(), self.m23())
    }

    /// Per-axis scale of the transformed basis vectors.
    ///
    /// For each axis the unit point `e_i + w` is transformed (axis column
    /// plus translation column), projected, and measured against the
    /// projected origin (translation column alone). For affine matrices both
    /// homogeneous weights are `1` and this is the norm of the upper three
    /// entries of the axis column. When either weight is zero (a perspective
    /// matrix sends the origin to infinity) the point cannot be projected and
    /// the axis column's upper three entries are measured directly.
    pub fn scale_vector(&self) -> Vec3 {
        let origin = [self.m03(), self.m13(), self.m23(), self.m33()];
        let axis = |c: usize| {
            let tip: [f64; 4] = core::array::from_fn(|r| self.at(r, c) + origin[r]);
            let delta = |r: usize| {
                if tip[3] == 0.0 || origin[3] == 0.0 {
                    self.at(r, c)
                } else {
                    tip[r] / tip[3] - origin[r] / origin[3]
                }
            };
            (0..3).map(|r| delta(r) * delta(r)).sum::<f64>().sqrt()
        };
        Vec3::new(axis(0), axis(1), axis(2))
    }

    /// True when tagged identity or numerically equal to it.
    pub fn is_identity(&self) -> bool {
        self.kind == MatrixType::Identity || self.equals(&Self::IDENTITY)
    }

    /// True when the bottom row is `[0, 0, 0, 1]`.
    pub fn is_affine(&self) -> bool {
        self.kind.is_affine_shaped()
            || (self.m30() == 0.0 && self.m31() == 0.0 && self.m32() == 0.0 && self.m33() == 1.0)
    }

    /// True when every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.entries.iter().all(|v| v.is_finite())
    }

    /// Entry-wise exact equality; the type tag is not compared.
    pub fn equals(&self, other: &Self) -> bool {
        self.entries == other.entries
    }

    /// Entry-wise `|a - b| <= epsilon`.
    pub fn equals_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        self.entries
            .iter()
            .zip(other.entries.iter())
            .all(|(a, b)| approx_eq(*a, *b, epsilon))
    }

    // ── canonical mutator ──────────────────────────────────────────────

    /// Sets every entry from row-major rows.
    ///
    /// `kind` is taken verbatim when given; otherwise `Affine` or `Other` is
    /// inferred from the bottom row. The specialised tags are never inferred.
    pub fn row_major(&mut self, rows: Rows4, kind: Option<MatrixType>) -> &mut Self {
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                self.entries[c * 4 + r] = *value;
            }
        }
        self.kind = kind.unwrap_or_else(|| MatrixType::infer(&rows[3]));
        self
    }

    /// Sets every entry from a column-major array, inferring the tag.
    pub fn column_major(&mut self, entries: &[f64; 16]) -> &mut Self {
        let rows: Rows4 = core::array::from_fn(|r| core::array::from_fn(|c| entries[c * 4 + r]));
        self.row_major(rows, None)
    }

    /// Copies another matrix's entries and tag.
    pub fn set(&mut self, m: &Self) -> &mut Self {
        self.row_major(m.rows(), Some(m.kind))
    }

    // ── shape setters ──────────────────────────────────────────────────

    /// Resets to the identity.
    pub fn set_to_identity(&mut self) -> &mut Self {
        self.set(&Self::IDENTITY)
    }

    /// Sets a translation.
    pub fn set_to_translation(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.row_major(
            [
                [1.0, 0.0, 0.0, x],
                [0.0, 1.0, 0.0, y],
                [0.0, 0.0, 1.0, z],
                [0.0, 0.0, 0.0, 1.0],
            ],
            Some(MatrixType::Translation),
        )
    }

    /// Sets a non-uniform scale.
    pub fn set_to_scale(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.row_major(
            [
                [x, 0.0, 0.0, 0.0],
                [0.0, y, 0.0, 0.0],
                [0.0, 0.0, z, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            Some(MatrixType::Scaling),
        )
    }

    /// Sets the top three rows of an affine transform.
    pub fn set_to_affine(&mut self, top: [[f64; 4]; 3]) -> &mut Self {
        self.row_major(
            [top[0], top[1], top[2], [0.0, 0.0, 0.0, 1.0]],
            Some(MatrixType::Affine),
        )
    }

    /// Sets a rotation about a unit axis (Rodrigues' rotation formula).
    pub fn set_to_rotation_axis_angle(&mut self, axis: &Vec3, angle: f64) -> &mut Self {
        let (s, c) = angle.sin_cos();
        let cc = 1.0 - c;
        let (x, y, z) = (axis.x(), axis.y(), axis.z());
        self.row_major(
            [
                [x * x * cc + c, x * y * cc - z * s, x * z * cc + y * s, 0.0],
                [y * x * cc + z * s, y * y * cc + c, y * z * cc - x * s, 0.0],
                [z * x * cc - y * s, z * y * cc + x * s, z * z * cc + c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            Some(MatrixType::Affine),
        )
    }

    /// Sets a rotation about +X.
    pub fn set_to_rotation_x(&mut self, angle: f64) -> &mut Self {
        let (s, c) = angle.sin_cos();
        self.row_major(
            [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, c, -s, 0.0],
                [0.0, s, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            Some(MatrixType::Affine),
        )
    }

    /// Sets a rotation about +Y.
    pub fn set_to_rotation_y(&mut self, angle: f64) -> &mut Self {
        let (s, c) = angle.sin_cos();
        self.row_major(
            [
                [c, 0.0, s, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [-s, 0.0, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            Some(MatrixType::Affine),
        )
    }

    /// Sets a rotation about +Z.
    pub fn set_to_rotation_z(&mut self, angle: f64) -> &mut Self {
        let (s, c) = angle.sin_cos();
        self.row_major(
            [
                [c, -s, 0.0, 0.0],
                [s, c, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            Some(MatrixType::Affine),
        )
    }

    /// Sets an OpenGL-style perspective projection, see [`Mat4::perspective`].
    pub fn set_to_perspective(
        &mut self,
        fov_y: f64,
        aspect: f64,
        z_near: f64,
        z_far: f64,
    ) -> &mut Self {
        let f = 1.0 / (fov_y * 0.5).tan();
        let depth = z_near - z_far;
        self.row_major(
            [
                [f / aspect, 0.0, 0.0, 0.0],
                [0.0, f, 0.0, 0.0],
                [0.0, 0.0, (z_far + z_near) / depth, (2.0 * z_far * z_near) / depth],
                [0.0, 0.0, -1.0, 0.0],
            ],
            Some(MatrixType::Other),
        )
    }

    // ── arithmetic, in place ───────────────────────────────────────────

    fn zip_with(&mut self, m: &Self, op: impl Fn(f64, f64) -> f64) -> &mut Self {
        let a = self.rows();
        let b = m.rows();
        let rows: Rows4 = core::array::from_fn(|r| core::array::from_fn(|c| op(a[r][c], b[r][c])));
        self.row_major(rows, None)
    }

    /// `self += m`.
    pub fn add(&mut self, m: &Self) -> &mut Self {
        self.zip_with(m, |a, b| a + b)
    }

    /// `self -= m`.
    pub fn subtract(&mut self, m: &Self) -> &mut Self {
        self.zip_with(m, |a, b| a - b)
    }

    /// Transposes in place. Identity and scaling keep their tag.
    pub fn transpose(&mut self) -> &mut Self {
        let a = self.rows();
        let rows: Rows4 = core::array::from_fn(|r| core::array::from_fn(|c| a[c][r]));
        let kind = match self.kind {
            MatrixType::Identity | MatrixType::Scaling => Some(self.kind),
            _ => None,
        };
        self.row_major(rows, kind)
    }

    /// Negates every entry.
    pub fn negate(&mut self) -> &mut Self {
        let rows = self.rows().map(|row| row.map(|v| -v));
        self.row_major(rows, None)
    }

    /// Inverts in place, dispatching on the type tag.
    ///
    /// `Identity`, `Translation` and `Scaling` use closed forms. `Affine` and
    /// `Other` use the full cofactor expansion; an `Affine` input keeps an
    /// exact `[0, 0, 0, 1]` bottom row and its tag. A determinant of exactly
    /// zero yields [`MathError::SingularMatrix`] and leaves `self` untouched.
    pub fn invert(&mut self) -> Result<&mut Self, MathError> {
        match self.kind {
            MatrixType::Identity => Ok(self),
            MatrixType::Translation => {
                let (x, y, z) = (-self.m03(), -self.m13(), -self.m23());
                Ok(self.set_to_translation(x, y, z))
            }
            MatrixType::Scaling => {
                let det = self.m00() * self.m11() * self.m22() * self.m33();
                self.ensure_invertible(det)?;
                Ok(self.row_major(
                    [
                        [1.0 / self.m00(), 0.0, 0.0, 0.0],
                        [0.0, 1.0 / self.m11(), 0.0, 0.0],
                        [0.0, 0.0, 1.0 / self.m22(), 0.0],
                        [0.0, 0.0, 0.0, 1.0 / self.m33()],
                    ],
                    Some(MatrixType::Scaling),
                ))
            }
            MatrixType::Affine | MatrixType::Other => {
                let cof = Cofactors::of(&self.entries);
                let det = cof.determinant();
                self.ensure_invertible(det)?;
                let inv = cof.inverse_entries(&self.entries, det);
                let mut rows: Rows4 =
                    core::array::from_fn(|r| core::array::from_fn(|c| inv[c * 4 + r]));
                if self.kind == MatrixType::Affine {
                    rows[3] = [0.0, 0.0, 0.0, 1.0];
                    return Ok(self.row_major(rows, Some(MatrixType::Affine)));
                }
                Ok(self.row_major(rows, None))
            }
        }
    }

    fn ensure_invertible(&self, determinant: f64) -> Result<(), MathError> {
        if determinant == 0.0 {
            debug!(kind = %self.kind, "rejected inversion of singular Mat4");
            return Err(MathError::SingularMatrix { determinant });
        }
        Ok(())
    }

    /// Multiplies the matrix with another matrix in place (`self = self * m`).
    ///
    /// Same dispatch as [`crate::Mat3::multiply_matrix`]: identity
    /// short-circuit, same-tag translation/scaling closed forms, the reduced
    /// affine product when neither side is `Other`, and finally the general
    /// product.
    pub fn multiply_matrix(&mut self, m: &Self) -> &mut Self {
        if m.kind == MatrixType::Identity {
            return self;
        }
        if self.kind == MatrixType::Identity {
            return self.set(m);
        }

        if self.kind == m.kind {
            match self.kind {
                MatrixType::Translation => {
                    return self.set_to_translation(
                        self.m03() + m.m03(),
                        self.m13() + m.m13(),
                        self.m23() + m.m23(),
                    );
                }
                MatrixType::Scaling => {
                    return self.set_to_scale(
                        self.m00() * m.m00(),
                        self.m11() * m.m11(),
                        self.m22() * m.m22(),
                    );
                }
                _ => {}
            }
        }

        let a = self.rows();
        let b = m.rows();

        if self.kind != MatrixType::Other && m.kind != MatrixType::Other {
            let mut out = [[0.0, 0.0, 0.0, 0.0], [0.0; 4], [0.0; 4], [0.0, 0.0, 0.0, 1.0]];
            for (r, row) in out.iter_mut().take(3).enumerate() {
                for (c, cell) in row.iter_mut().enumerate() {
                    let sum: f64 = (0..3).map(|k| a[r][k] * b[k][c]).sum();
                    *cell = if c == 3 { sum + a[r][3] } else { sum };
                }
            }
            return self.row_major(out, Some(MatrixType::Affine));
        }

        let mut out = [[0.0; 4]; 4];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| a[r][k] * b[k][c]).sum();
            }
        }
        self.row_major(out, Some(MatrixType::Other))
    }

    /// `self = m * self`.
    pub fn prepend_matrix(&mut self, m: &Self) -> &mut Self {
        let product = m.times_matrix(self);
        self.set(&product)
    }

    // ── arithmetic, returning new values ───────────────────────────────

    /// `self + m`.
    pub fn plus(&self, m: &Self) -> Self {
        let mut out = *self;
        out.add(m);
        out
    }

    /// `self - m`.
    pub fn minus(&self, m: &Self) -> Self {
        let mut out = *self;
        out.subtract(m);
        out
    }

    /// Transposed copy.
    pub fn transposed(&self) -> Self {
        let mut out = *self;
        out.transpose();
        out
    }

    /// Negated copy.
    pub fn negated(&self) -> Self {
        let mut out = *self;
        out.negate();
        out
    }

    /// Inverse; `self` is left unchanged.
    pub fn inverted(&self) -> Result<Self, MathError> {
        let mut out = *self;
        out.invert()?;
        Ok(out)
    }

    /// Matrix product `self * m`.
    ///
    /// # Examples
    /// ```
    /// use dot_math::Mat4;
    /// let s = Mat4::scaling(2.0, 3.0, 4.0);
    /// let both = s.times_matrix(&Mat4::scaling(0.5, 1.0, 0.25));
    /// assert_eq!(both.to_array(), Mat4::IDENTITY.to_array());
    /// assert!(Mat4::IDENTITY.times_matrix(&s).equals(&s));
    /// ```
    pub fn times_matrix(&self, m: &Self) -> Self {
        let mut out = *self;
        out.multiply_matrix(m);
        out
    }

    // ── vector products ────────────────────────────────────────────────

    /// Transforms a point (`w = 1`); translation applied, no perspective divide.
    pub fn times_vector3(&self, v: &Vec3) -> Vec3 {
        Vec3::new(
            self.m00() * v.x() + self.m01() * v.y() + self.m02() * v.z() + self.m03(),
            self.m10() * v.x() + self.m11() * v.y() + self.m12() * v.z() + self.m13(),
            self.m20() * v.x() + self.m21() * v.y() + self.m22() * v.z() + self.m23(),
        )
    }

    /// Full homogeneous product.
    pub fn times_vector4(&self, v: &Vec4) -> Vec4 {
        Vec4::new(
            self.m00() * v.x() + self.m01() * v.y() + self.m02() * v.z() + self.m03() * v.w(),
            self.m10() * v.x() + self.m11() * v.y() + self.m12() * v.z() + self.m13() * v.w(),
            self.m20() * v.x() + self.m21() * v.y() + self.m22() * v.z() + self.m23() * v.w(),
            self.m30() * v.x() + self.m31() * v.y() + self.m32() * v.z() + self.m33() * v.w(),
        )
    }

    /// `transpose(upper 3×3) * v`; used with the inverse to transform normals.
    pub fn times_transpose_vector3(&self, v: &Vec3) -> Vec3 {
        Vec3::new(
            self.m00() * v.x() + self.m10() * v.y() + self.m20() * v.z(),
            self.m01() * v.x() + self.m11() * v.y() + self.m21() * v.z(),
            self.m02() * v.x() + self.m12() * v.y() + self.m22() * v.z(),
        )
    }

    /// `transpose(self) * v` on the full homogeneous vector.
    pub fn times_transpose_vector4(&self, v: &Vec4) -> Vec4 {
        Vec4::new(
            self.m00() * v.x() + self.m10() * v.y() + self.m20() * v.z() + self.m30() * v.w(),
            self.m01() * v.x() + self.m11() * v.y() + self.m21() * v.z() + self.m31() * v.w(),
            self.m02() * v.x() + self.m12() * v.y() + self.m22() * v.z() + self.m32() * v.w(),
            self.m03() * v.x() + self.m13() * v.y() + self.m23() * v.z() + self.m33() * v.w(),
        )
    }

    /// Transforms a delta (`w = 0`): the upper-left 3×3 block times `v`.
    pub fn times_relative_vector3(&self, v: &Vec3) -> Vec3 {
        Vec3::new(
            self.m00() * v.x() + self.m01() * v.y() + self.m02() * v.z(),
            self.m10() * v.x() + self.m11() * v.y() + self.m12() * v.z(),
            self.m20() * v.x() + self.m21() * v.y() + self.m22() * v.z(),
        )
    }

    /// In-place [`Mat4::times_vector3`].
    pub fn multiply_vector3<'v>(&self, v: &'v mut Vec3) -> &'v mut Vec3 {
        *v = self.times_vector3(v);
        v
    }

    /// In-place [`Mat4::times_vector4`].
    pub fn multiply_vector4<'v>(&self, v: &'v mut Vec4) -> &'v mut Vec4 {
        *v = self.times_vector4(v);
        v
    }

    /// CSS `matrix3d(...)` string, entries in column-major order.
    pub fn css_transform(&self) -> String {
        let parts: Vec<String> = self.entries.iter().map(f64::to_string).collect();
        format!("matrix3d({})", parts.join(","))
    }
}

/// The twelve 2×2 sub-determinants shared by the 4×4 determinant and adjugate.
///
/// Indices follow the raw column-major array; the expansion is symmetric in
/// layout, so the adjugate comes out in the same layout.
struct Cofactors {
    b: [f64; 12],
}

impl Cofactors {
    fn of(a: &[f64; 16]) -> Self {
        Self {
            b: [
                a[0] * a[5] - a[1] * a[4],
                a[0] * a[6] - a[2] * a[4],
                a[0] * a[7] - a[3] * a[4],
                a[1] * a[6] - a[2] * a[5],
                a[1] * a[7] - a[3] * a[5],
                a[2] * a[7] - a[3] * a[6],
                a[8] * a[13] - a[9] * a[12],
                a[8] * a[14] - a[10] * a[12],
                a[8] * a[15] - a[11] * a[12],
                a[9] * a[14] - a[10] * a[13],
                a[9] * a[15] - a[11] * a[13],
                a[10] * a[15] - a[11] * a[14],
            ],
        }
    }

    fn determinant(&self) -> f64 {
        let b = &self.b;
        b[0] * b[11] - b[1] * b[10] + b[2] * b[9] + b[3] * b[8] - b[4] * b[7] + b[5] * b[6]
    }

    fn inverse_entries(&self, a: &[f64; 16], det: f64) -> [f64; 16] {
        let b = &self.b;
        let inv = 1.0 / det;
        [
            (a[5] * b[11] - a[6] * b[10] + a[7] * b[9]) * inv,
            (a[2] * b[10] - a[1] * b[11] - a[3] * b[9]) * inv,
            (a[13] * b[5] - a[14] * b[4] + a[15] * b[3]) * inv,
            (a[10] * b[4] - a[9] * b[5] - a[11] * b[3]) * inv,
            (a[6] * b[8] - a[4] * b[11] - a[7] * b[7]) * inv,
            (a[0] * b[11] - a[2] * b[8] + a[3] * b[7]) * inv,
            (a[14] * b[2] - a[12] * b[5] - a[15] * b[1]) * inv,
            (a[8] * b[5] - a[10] * b[2] + a[11] * b[1]) * inv,
            (a[4] * b[10] - a[5] * b[8] + a[7] * b[6]) * inv,
            (a[1] * b[8] - a[0] * b[10] - a[3] * b[6]) * inv,
            (a[12] * b[4] - a[13] * b[2] + a[15] * b[0]) * inv,
            (a[9] * b[2] - a[8] * b[4] - a[11] * b[0]) * inv,
            (a[5] * b[7] - a[4] * b[9] - a[6] * b[6]) * inv,
            (a[0] * b[9] - a[1] * b[7] + a[2] * b[6]) * inv,
            (a[13] * b[1] - a[12] * b[3] - a[14] * b[0]) * inv,
            (a[8] * b[3] - a[9] * b[1] + a[10] * b[0]) * inv,
        ]
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Compares entries only; two equal matrices may carry different tags.
impl PartialEq for Mat4 {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Display for Mat4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();
        for (i, row) in rows.iter().enumerate() {
            write!(f, "{} {} {} {}", row[0], row[1], row[2], row[3])?;
            if i < 3 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl From<Rows4> for Mat4 {
    fn from(rows: Rows4) -> Self {
        Self::new(rows)
    }
}

impl core::ops::Mul for Mat4 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        self.times_matrix(&rhs)
    }
}

impl core::ops::MulAssign for Mat4 {
    fn mul_assign(&mut self, rhs: Self) {
        self.multiply_matrix(&rhs);
    }
}

impl core::ops::MulAssign<&Mat4> for Mat4 {
    fn mul_assign(&mut self, rhs: &Mat4) {
        self.multiply_matrix(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cofactor_determinant_matches_diagonal_product() {
        let m = Mat4::new([
            [2.0, 0.0, 0.0, 0.0],
            [0.0, 3.0, 0.0, 0.0],
            [0.0, 0.0, 4.0, 0.0],
            [0.0, 0.0, 0.0, 5.0],
        ]);
        assert_eq!(m.determinant(), 120.0);
    }

    #[test]
    fn determinant_of_row_swap_flips_sign() {
        let m = Mat4::new([
            [0.0, 1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        assert_eq!(m.determinant(), -1.0);
    }

    #[test]
    fn rows_round_trip_through_row_major() {
        let rows = [
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ];
        let m = Mat4::new(rows);
        assert_eq!(m.rows(), rows);
        assert_eq!(m.m12(), 7.0);
        assert_eq!(m.m30(), 13.0);
        assert_eq!(m.matrix_type(), MatrixType::Other);
    }

    #[test]
    fn affine_inverse_keeps_exact_bottom_row() {
        let m = Mat4::rotation_x(0.3)
            .times_matrix(&Mat4::translation(1.0, 2.0, 3.0))
            .times_matrix(&Mat4::scaling(2.0, 3.0, 5.0));
        let inv = m.inverted();
        assert!(matches!(&inv, Ok(i) if i.matrix_type() == MatrixType::Affine));
        if let Ok(inv) = inv {
            assert_eq!(inv.rows()[3], [0.0, 0.0, 0.0, 1.0]);
        }
    }
}
