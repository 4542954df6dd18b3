// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::fmt;

use tracing::debug;

use crate::{
    approx_eq, Frozen, MathError, MatrixState, MatrixType, Mat4, Vec2, Vec3, PARALLEL_EPSILON,
};

/// Column‑major 3×3 matrix with an algebraic type tag.
///
/// - Doubles as a 2D affine transform (bottom row `[0, 0, 1]`) and as a 3D
///   linear map (rotations from [`Mat3::rotation_axis_angle`] or
///   [`crate::Quat::to_rotation_matrix`]).
/// - Every write goes through [`Mat3::row_major`], which stores the entries
///   and either takes the caller's [`MatrixType`] or infers `Affine`/`Other`
///   from the bottom row.
/// - Multiplication and inversion dispatch on the tag, so a tag that claims
///   `Identity`, `Translation` or `Scaling` must be exact.
///
/// # Examples
/// ```
/// use dot_math::{Mat3, MatrixType, Vec2};
/// let t = Mat3::translation(2.0, 3.0).times_matrix(&Mat3::translation(4.0, 5.0));
/// assert_eq!(t.matrix_type(), MatrixType::Translation);
/// assert_eq!(t.times_vector2(&Vec2::ZERO), Vec2::new(6.0, 8.0));
/// ```
#[derive(Debug, Copy, Clone)]
pub struct Mat3 {
    entries: [f64; 9],
    kind: MatrixType,
}

impl Mat3 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self::from_parts(
        [
            1.0, 0.0, 0.0, // col 0
            0.0, 1.0, 0.0, // col 1
            0.0, 0.0, 1.0, // col 2
        ],
        MatrixType::Identity,
    );

    /// Mirror across the Y axis (`x -> -x`).
    pub const X_REFLECTION: Self = Self::from_parts(
        [
            -1.0, 0.0, 0.0, // col 0
            0.0, 1.0, 0.0, // col 1
            0.0, 0.0, 1.0, // col 2
        ],
        MatrixType::Affine,
    );

    /// Mirror across the X axis (`y -> -y`).
    pub const Y_REFLECTION: Self = Self::from_parts(
        [
            1.0, 0.0, 0.0, // col 0
            0.0, -1.0, 0.0, // col 1
            0.0, 0.0, 1.0, // col 2
        ],
        MatrixType::Affine,
    );

    const fn from_parts(entries: [f64; 9], kind: MatrixType) -> Self {
        Self { entries, kind }
    }

    /// Builds a matrix from row-major arguments, inferring `Affine` or `Other`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        m00: f64,
        m01: f64,
        m02: f64,
        m10: f64,
        m11: f64,
        m12: f64,
        m20: f64,
        m21: f64,
        m22: f64,
    ) -> Self {
        let mut m = Self::IDENTITY;
        m.row_major(m00, m01, m02, m10, m11, m12, m20, m21, m22, None);
        m
    }

    /// Returns the identity matrix.
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// 2D translation by `(x, y)`.
    pub fn translation(x: f64, y: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.set_to_translation(x, y);
        m
    }

    /// 2D translation by a vector.
    pub fn translation_from_vector(v: &Vec2) -> Self {
        Self::translation(v.x(), v.y())
    }

    /// 2D non-uniform scale; the homogeneous entry stays `1`.
    pub fn scaling(x: f64, y: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.set_to_scale(x, y);
        m
    }

    /// 2D uniform scale.
    pub fn uniform_scaling(s: f64) -> Self {
        Self::scaling(s, s)
    }

    /// 2D affine matrix from its top two rows.
    pub fn affine(m00: f64, m01: f64, m02: f64, m10: f64, m11: f64, m12: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.set_to_affine(m00, m01, m02, m10, m11, m12);
        m
    }

    /// 3D rotation about a unit `axis` by `angle` radians (Rodrigues' formula).
    pub fn rotation_axis_angle(axis: &Vec3, angle: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.set_to_rotation_axis_angle(axis, angle);
        m
    }

    /// 3D rotation about +X.
    pub fn rotation_x(angle: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.set_to_rotation_x(angle);
        m
    }

    /// 3D rotation about +Y.
    pub fn rotation_y(angle: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.set_to_rotation_y(angle);
        m
    }

    /// Rotation about +Z; as a 2D transform this is a counter-clockwise rotation.
    pub fn rotation_z(angle: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.set_to_rotation_z(angle);
        m
    }

    /// 2D rotation by `angle` radians (same matrix as [`Mat3::rotation_z`]).
    pub fn rotation_2d(angle: f64) -> Self {
        Self::rotation_z(angle)
    }

    /// 2D rotation by `angle` about the point `(x, y)`.
    pub fn rotation_around(angle: f64, x: f64, y: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.set_to_rotation_around(angle, x, y);
        m
    }

    /// 2D rotation by `angle` about `point`.
    pub fn rotation_around_point(angle: f64, point: &Vec2) -> Self {
        Self::rotation_around(angle, point.x(), point.y())
    }

    /// `translation(x, y) * rotation_2d(angle)`.
    pub fn translation_rotation(x: f64, y: f64, angle: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.set_to_translation_rotation(x, y, angle);
        m
    }

    /// `translation(x, y) * rotation_2d(angle) * uniform_scaling(scale)`.
    pub fn scaling_translation_rotation(scale: f64, x: f64, y: f64, angle: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.set_to_scale_translation_rotation(scale, x, y, angle);
        m
    }

    /// Builds from SVG/DOM matrix components `a..f`.
    pub fn from_svg_matrix(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.set_to_svg_matrix(a, b, c, d, e, f);
        m
    }

    /// Minimal rotation taking unit vector `a` onto unit vector `b`.
    ///
    /// See [`Mat3::set_rotation_a_to_b`] for the two numeric branches.
    pub fn rotate_a_to_b(a: &Vec3, b: &Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.set_rotation_a_to_b(a, b);
        m
    }

    /// Rebuilds a matrix from a persisted [`MatrixState`].
    pub fn from_state(state: &MatrixState) -> Result<Self, MathError> {
        let (entries, kind) = state.decode::<9>()?;
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
        self.entries[col * 3 + row]
    }

    /// Entry at row 0, column 0.
    pub fn m00(&self) -> f64 {
        self.at(0, 0)
    }
    /// Entry at row 0, column 1.
    pub fn m01(&self) -> f64 {
        self.at(0, 1)
    }
    /// Entry at row 0, column 2.
    pub fn m02(&self) -> f64 {
        self.at(0, 2)
    }
    /// Entry at row 1, column 0.
    pub fn m10(&self) -> f64 {
        self.at(1, 0)
    }
    /// Entry at row 1, column 1.
    pub fn m11(&self) -> f64 {
        self.at(1, 1)
    }
    /// Entry at row 1, column 2.
    pub fn m12(&self) -> f64 {
        self.at(1, 2)
    }
    /// Entry at row 2, column 0.
    pub fn m20(&self) -> f64 {
        self.at(2, 0)
    }
    /// Entry at row 2, column 1.
    pub fn m21(&self) -> f64 {
        self.at(2, 1)
    }
    /// Entry at row 2, column 2.
    pub fn m22(&self) -> f64 {
        self.at(2, 2)
    }

    /// Column-major entries.
    pub fn entries(&self) -> &[f64; 9] {
        &self.entries
    }

    /// Column-major entries by value.
    pub fn to_array(self) -> [f64; 9] {
        self.entries
    }

    /// The type tag currently attached to this matrix.
    pub fn matrix_type(&self) -> MatrixType {
        self.kind
    }

    /// Full 3×3 determinant.
    pub fn determinant(&self) -> f64 {
        self.m00() * self.m11() * self.m22()
            + self.m01() * self.m12() * self.m20()
            + self.m02() * self.m10() * self.m21()
            - self.m02() * self.m11() * self.m20()
            - self.m01() * self.m10() * self.m22()
            - self.m00() * self.m12() * self.m21()
    }

    /// 2D translation stored in the last column.
    pub fn translation_part(&self) -> Vec2 {
        Vec2::new(self.m02(), self.m12())
    }

    /// Lengths of the transformed 2D basis vectors.
    pub fn scale_vector(&self) -> Vec2 {
        Vec2::new(
            self.m00().hypot(self.m10()),
            self.m01().hypot(self.m11()),
        )
    }

    /// Uniform scale estimate, negative when the 2D part flips handedness.
    pub fn signed_scale(&self) -> f64 {
        let det2 = self.m00() * self.m11() - self.m01() * self.m10();
        det2.abs().sqrt().copysign(det2)
    }

    /// 2D rotation angle of the transformed X axis.
    pub fn rotation_angle(&self) -> f64 {
        self.m10().atan2(self.m00())
    }

    /// True when tagged identity or numerically equal to it.
    pub fn is_identity(&self) -> bool {
        self.kind == MatrixType::Identity || self.equals(&Self::IDENTITY)
    }

    /// True when the matrix is a pure 2D translation.
    pub fn is_translation(&self) -> bool {
        self.kind == MatrixType::Translation
            || (self.m00() == 1.0
                && self.m11() == 1.0
                && self.m22() == 1.0
                && self.m01() == 0.0
                && self.m10() == 0.0
                && self.m20() == 0.0
                && self.m21() == 0.0)
    }

    /// True when the bottom row is `[0, 0, 1]`.
    pub fn is_affine(&self) -> bool {
        self.kind.is_affine_shaped()
            || (self.m20() == 0.0 && self.m21() == 0.0 && self.m22() == 1.0)
    }

    /// Affine with no rotation or shear: axes map onto themselves.
    pub fn is_aligned(&self) -> bool {
        self.is_affine() && self.m01() == 0.0 && self.m10() == 0.0
    }

    /// Affine and either aligned or swapping X and Y (quarter-turn rotations).
    pub fn is_axis_aligned(&self) -> bool {
        self.is_affine()
            && ((self.m01() == 0.0 && self.m10() == 0.0)
                || (self.m00() == 0.0 && self.m11() == 0.0))
    }

    /// True when every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.entries.iter().all(|v| v.is_finite())
    }

    /// Entry-wise exact equality; the type tag is not compared.
    pub fn equals(&self, other: &Self) -> bool {
        self.entries == other.entries
    }

    /// Entry-wise `|a - b| <= epsilon`, each entry judged on its own.
    pub fn equals_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        self.entries
            .iter()
            .zip(other.entries.iter())
            .all(|(a, b)| approx_eq(*a, *b, epsilon))
    }

    // ── canonical mutator ──────────────────────────────────────────────

    /// Sets every entry from row-major arguments.
    ///
    /// `kind` is taken verbatim when given. Otherwise the tag is inferred,
    /// which only ever yields `Affine` or `Other`.
    #[allow(clippy::too_many_arguments)]
    pub fn row_major(
        &mut self,
        m00: f64,
        m01: f64,
        m02: f64,
        m10: f64,
        m11: f64,
        m12: f64,
        m20: f64,
        m21: f64,
        m22: f64,
        kind: Option<MatrixType>,
    ) -> &mut Self {
        self.entries = [m00, m10, m20, m01, m11, m21, m02, m12, m22];
        self.kind = kind.unwrap_or_else(|| MatrixType::infer(&[m20, m21, m22]));
        self
    }

    /// Sets every entry from column-major arguments.
    #[allow(clippy::too_many_arguments)]
    pub fn column_major(
        &mut self,
        m00: f64,
        m10: f64,
        m20: f64,
        m01: f64,
        m11: f64,
        m21: f64,
        m02: f64,
        m12: f64,
        m22: f64,
        kind: Option<MatrixType>,
    ) -> &mut Self {
        self.row_major(m00, m01, m02, m10, m11, m12, m20, m21, m22, kind)
    }

    /// Copies a column-major array in, inferring the tag.
    pub fn set_array(&mut self, entries: &[f64; 9]) -> &mut Self {
        let [m00, m10, m20, m01, m11, m21, m02, m12, m22] = *entries;
        self.row_major(m00, m01, m02, m10, m11, m12, m20, m21, m22, None)
    }

    /// Copies another matrix's entries and tag.
    pub fn set(&mut self, m: &Self) -> &mut Self {
        self.row_major(
            m.m00(),
            m.m01(),
            m.m02(),
            m.m10(),
            m.m11(),
            m.m12(),
            m.m20(),
            m.m21(),
            m.m22(),
            Some(m.kind),
        )
    }

    // ── shape setters ──────────────────────────────────────────────────

    /// Resets to the identity.
    pub fn set_to_identity(&mut self) -> &mut Self {
        self.row_major(
            1.0,
            0.0,
            0.0,
            0.0,
            1.0,
            0.0,
            0.0,
            0.0,
            1.0,
            Some(MatrixType::Identity),
        )
    }

    /// Sets a 2D translation.
    pub fn set_to_translation(&mut self, x: f64, y: f64) -> &mut Self {
        self.row_major(
            1.0,
            0.0,
            x,
            0.0,
            1.0,
            y,
            0.0,
            0.0,
            1.0,
            Some(MatrixType::Translation),
        )
    }

    /// Sets a 2D scale.
    pub fn set_to_scale(&mut self, x: f64, y: f64) -> &mut Self {
        self.row_major(
            x,
            0.0,
            0.0,
            0.0,
            y,
            0.0,
            0.0,
            0.0,
            1.0,
            Some(MatrixType::Scaling),
        )
    }

    /// Sets the top two rows of a 2D affine transform.
    pub fn set_to_affine(
        &mut self,
        m00: f64,
        m01: f64,
        m02: f64,
        m10: f64,
        m11: f64,
        m12: f64,
    ) -> &mut Self {
        self.row_major(
            m00,
            m01,
            m02,
            m10,
            m11,
            m12,
            0.0,
            0.0,
            1.0,
            Some(MatrixType::Affine),
        )
    }

    /// Sets a 3D rotation about a unit axis (Rodrigues' rotation formula).
    pub fn set_to_rotation_axis_angle(&mut self, axis: &Vec3, angle: f64) -> &mut Self {
        let (s, c) = angle.sin_cos();
        let cc = 1.0 - c;
        let (x, y, z) = (axis.x(), axis.y(), axis.z());
        self.row_major(
            x * x * cc + c,
            x * y * cc - z * s,
            x * z * cc + y * s,
            y * x * cc + z * s,
            y * y * cc + c,
            y * z * cc - x * s,
            z * x * cc - y * s,
            z * y * cc + x * s,
            z * z * cc + c,
            Some(MatrixType::Other),
        )
    }

    /// Sets a rotation about +X.
    pub fn set_to_rotation_x(&mut self, angle: f64) -> &mut Self {
        let (s, c) = angle.sin_cos();
        self.row_major(
            1.0,
            0.0,
            0.0,
            0.0,
            c,
            -s,
            0.0,
            s,
            c,
            Some(MatrixType::Other),
        )
    }

    /// Sets a rotation about +Y.
    pub fn set_to_rotation_y(&mut self, angle: f64) -> &mut Self {
        let (s, c) = angle.sin_cos();
        self.row_major(
            c,
            0.0,
            s,
            0.0,
            1.0,
            0.0,
            -s,
            0.0,
            c,
            Some(MatrixType::Other),
        )
    }

    /// Sets a rotation about +Z. The bottom row stays `[0, 0, 1]`, so the
    /// result is tagged `Affine`.
    pub fn set_to_rotation_z(&mut self, angle: f64) -> &mut Self {
        let (s, c) = angle.sin_cos();
        self.row_major(
            c,
            -s,
            0.0,
            s,
            c,
            0.0,
            0.0,
            0.0,
            1.0,
            Some(MatrixType::Affine),
        )
    }

    /// Sets a 2D rotation about `(x, y)`.
    pub fn set_to_rotation_around(&mut self, angle: f64, x: f64, y: f64) -> &mut Self {
        let (s, c) = angle.sin_cos();
        self.row_major(
            c,
            -s,
            x - c * x + s * y,
            s,
            c,
            y - s * x - c * y,
            0.0,
            0.0,
            1.0,
            Some(MatrixType::Affine),
        )
    }

    /// Sets `translation(x, y) * rotation_2d(angle)`.
    pub fn set_to_translation_rotation(&mut self, x: f64, y: f64, angle: f64) -> &mut Self {
        let (s, c) = angle.sin_cos();
        self.row_major(c, -s, x, s, c, y, 0.0, 0.0, 1.0, Some(MatrixType::Affine))
    }

    /// Sets `translation(x, y) * rotation_2d(angle) * uniform_scaling(scale)`.
    pub fn set_to_scale_translation_rotation(
        &mut self,
        scale: f64,
        x: f64,
        y: f64,
        angle: f64,
    ) -> &mut Self {
        let (s, c) = angle.sin_cos();
        self.row_major(
            scale * c,
            -scale * s,
            x,
            scale * s,
            scale * c,
            y,
            0.0,
            0.0,
            1.0,
            Some(MatrixType::Affine),
        )
    }

    /// Sets from SVG/DOM matrix components (`a c e / b d f / 0 0 1`).
    pub fn set_to_svg_matrix(
        &mut self,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        e: f64,
        f: f64,
    ) -> &mut Self {
        self.row_major(a, c, e, b, d, f, 0.0, 0.0, 1.0, Some(MatrixType::Affine))
    }

    /// Sets the minimal rotation that maps unit vector `a` onto unit vector `b`.
    ///
    /// Möller–Hughes. The direct formula scales by `1 / (1 + a·b)` and blows
    /// up as `a` approaches `-b`, so when `|a·b| > 1 - PARALLEL_EPSILON` the
    /// rotation is composed from two reflections through the coordinate
    /// axis least aligned with `a`.
    pub fn set_rotation_a_to_b(&mut self, a: &Vec3, b: &Vec3) -> &mut Self {
        let e = a.dot(b);
        let f = e.abs();

        if f > 1.0 - PARALLEL_EPSILON {
            let abs = Vec3::new(a.x().abs(), a.y().abs(), a.z().abs());
            let pivot = if abs.x() < abs.y() {
                if abs.x() < abs.z() {
                    Vec3::UNIT_X
                } else {
                    Vec3::UNIT_Z
                }
            } else if abs.y() < abs.z() {
                Vec3::UNIT_Y
            } else {
                Vec3::UNIT_Z
            };

            let u = pivot.minus(a);
            let v = pivot.minus(b);
            let c1 = 2.0 / u.dot(&u);
            let c2 = 2.0 / v.dot(&v);
            let c3 = c1 * c2 * u.dot(&v);

            // R = I - c1 u uᵀ - c2 v vᵀ + c3 v uᵀ
            let cell = |ui: f64, uj: f64, vi: f64, vj: f64, diag: f64| {
                -c1 * ui * uj - c2 * vi * vj + c3 * vi * uj + diag
            };
            let (ux, uy, uz) = (u.x(), u.y(), u.z());
            let (vx, vy, vz) = (v.x(), v.y(), v.z());
            return self.row_major(
                cell(ux, ux, vx, vx, 1.0),
                cell(ux, uy, vx, vy, 0.0),
                cell(ux, uz, vx, vz, 0.0),
                cell(uy, ux, vy, vx, 0.0),
                cell(uy, uy, vy, vy, 1.0),
                cell(uy, uz, vy, vz, 0.0),
                cell(uz, ux, vz, vx, 0.0),
                cell(uz, uy, vz, vy, 0.0),
                cell(uz, uz, vz, vz, 1.0),
                Some(MatrixType::Other),
            );
        }

        let v = a.cross(b);
        let h = 1.0 / (1.0 + e);
        let hvx = h * v.x();
        let hvz = h * v.z();
        let hvxy = hvx * v.y();
        let hvxz = hvx * v.z();
        let hvyz = hvz * v.y();
        self.row_major(
            e + hvx * v.x(),
            hvxy - v.z(),
            hvxz + v.y(),
            hvxy + v.z(),
            e + h * v.y() * v.y(),
            hvyz - v.x(),
            hvxz - v.y(),
            hvyz + v.x(),
            e + hvz * v.z(),
            Some(MatrixType::Other),
        )
    }

    /// Rounds every entry to single precision. The tag is kept: `0` and `1`
    /// survive the round trip exactly.
    #[allow(clippy::cast_possible_truncation)]
    pub fn set_to_f32_precision(&mut self) -> &mut Self {
        self.entries = self.entries.map(|v| f64::from(v as f32));
        self
    }

    // ── arithmetic, in place ───────────────────────────────────────────

    /// `self += m`.
    pub fn add(&mut self, m: &Self) -> &mut Self {
        self.row_major(
            self.m00() + m.m00(),
            self.m01() + m.m01(),
            self.m02() + m.m02(),
            self.m10() + m.m10(),
            self.m11() + m.m11(),
            self.m12() + m.m12(),
            self.m20() + m.m20(),
            self.m21() + m.m21(),
            self.m22() + m.m22(),
            None,
        )
    }

    /// `self -= m`.
    pub fn subtract(&mut self, m: &Self) -> &mut Self {
        self.row_major(
            self.m00() - m.m00(),
            self.m01() - m.m01(),
            self.m02() - m.m02(),
            self.m10() - m.m10(),
            self.m11() - m.m11(),
            self.m12() - m.m12(),
            self.m20() - m.m20(),
            self.m21() - m.m21(),
            self.m22() - m.m22(),
            None,
        )
    }

    /// Transposes in place. Identity and scaling keep their tag.
    pub fn transpose(&mut self) -> &mut Self {
        let kind = match self.kind {
            MatrixType::Identity | MatrixType::Scaling => Some(self.kind),
            _ => None,
        };
        self.row_major(
            self.m00(),
            self.m10(),
            self.m20(),
            self.m01(),
            self.m11(),
            self.m21(),
            self.m02(),
            self.m12(),
            self.m22(),
            kind,
        )
    }

    /// Negates every entry.
    pub fn negate(&mut self) -> &mut Self {
        self.row_major(
            -self.m00(),
            -self.m01(),
            -self.m02(),
            -self.m10(),
            -self.m11(),
            -self.m12(),
            -self.m20(),
            -self.m21(),
            -self.m22(),
            None,
        )
    }

    /// Inverts in place, dispatching on the type tag.
    ///
    /// - `Identity` is its own inverse.
    /// - `Translation` negates the translation column.
    /// - `Scaling` reciprocates the diagonal.
    /// - `Affine` uses the reduced adjugate (bottom row assumed `[0, 0, 1]`).
    /// - `Other` uses the full adjugate.
    ///
    /// A determinant of exactly zero yields [`MathError::SingularMatrix`] and
    /// leaves `self` untouched.
    pub fn invert(&mut self) -> Result<&mut Self, MathError> {
        match self.kind {
            MatrixType::Identity => Ok(self),
            MatrixType::Translation => Ok(self.row_major(
                1.0,
                0.0,
                -self.m02(),
                0.0,
                1.0,
                -self.m12(),
                0.0,
                0.0,
                1.0,
                Some(MatrixType::Translation),
            )),
            MatrixType::Scaling => {
                let det = self.m00() * self.m11() * self.m22();
                self.ensure_invertible(det)?;
                Ok(self.row_major(
                    1.0 / self.m00(),
                    0.0,
                    0.0,
                    0.0,
                    1.0 / self.m11(),
                    0.0,
                    0.0,
                    0.0,
                    1.0 / self.m22(),
                    Some(MatrixType::Scaling),
                ))
            }
            MatrixType::Affine => {
                let det = self.determinant();
                self.ensure_invertible(det)?;
                Ok(self.row_major(
                    (-self.m12() * self.m21() + self.m11() * self.m22()) / det,
                    (self.m02() * self.m21() - self.m01() * self.m22()) / det,
                    (-self.m02() * self.m11() + self.m01() * self.m12()) / det,
                    (self.m12() * self.m20() - self.m10() * self.m22()) / det,
                    (-self.m02() * self.m20() + self.m00() * self.m22()) / det,
                    (self.m02() * self.m10() - self.m00() * self.m12()) / det,
                    0.0,
                    0.0,
                    1.0,
                    Some(MatrixType::Affine),
                ))
            }
            MatrixType::Other => {
                let det = self.determinant();
                self.ensure_invertible(det)?;
                Ok(self.row_major(
                    (-self.m12() * self.m21() + self.m11() * self.m22()) / det,
                    (self.m02() * self.m21() - self.m01() * self.m22()) / det,
                    (-self.m02() * self.m11() + self.m01() * self.m12()) / det,
                    (self.m12() * self.m20() - self.m10() * self.m22()) / det,
                    (-self.m02() * self.m20() + self.m00() * self.m22()) / det,
                    (self.m02() * self.m10() - self.m00() * self.m12()) / det,
                    (-self.m11() * self.m20() + self.m10() * self.m21()) / det,
                    (self.m01() * self.m20() - self.m00() * self.m21()) / det,
                    (-self.m01() * self.m10() + self.m00() * self.m11()) / det,
                    Some(MatrixType::Other),
                ))
            }
        }
    }

    fn ensure_invertible(&self, determinant: f64) -> Result<(), MathError> {
        if determinant == 0.0 {
            debug!(kind = %self.kind, "rejected inversion of singular Mat3");
            return Err(MathError::SingularMatrix { determinant });
        }
        Ok(())
    }

    /// `self = self * m`, choosing the cheapest path the two tags allow.
    ///
    /// Order of checks:
    /// 1. either side `Identity`: the other operand is the answer;
    /// 2. both `Translation` (or both `Scaling`): closed form, same tag;
    /// 3. neither `Other`: reduced affine product, tagged `Affine`;
    /// 4. general product, tagged `Other`.
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
                    return self.row_major(
                        1.0,
                        0.0,
                        self.m02() + m.m02(),
                        0.0,
                        1.0,
                        self.m12() + m.m12(),
                        0.0,
                        0.0,
                        1.0,
                        Some(MatrixType::Translation),
                    );
                }
                MatrixType::Scaling => {
                    return self.row_major(
                        self.m00() * m.m00(),
                        0.0,
                        0.0,
                        0.0,
                        self.m11() * m.m11(),
                        0.0,
                        0.0,
                        0.0,
                        1.0,
                        Some(MatrixType::Scaling),
                    );
                }
                _ => {}
            }
        }

        if self.kind != MatrixType::Other && m.kind != MatrixType::Other {
            return self.row_major(
                self.m00() * m.m00() + self.m01() * m.m10(),
                self.m00() * m.m01() + self.m01() * m.m11(),
                self.m00() * m.m02() + self.m01() * m.m12() + self.m02(),
                self.m10() * m.m00() + self.m11() * m.m10(),
                self.m10() * m.m01() + self.m11() * m.m11(),
                self.m10() * m.m02() + self.m11() * m.m12() + self.m12(),
                0.0,
                0.0,
                1.0,
                Some(MatrixType::Affine),
            );
        }

        self.row_major(
            self.m00() * m.m00() + self.m01() * m.m10() + self.m02() * m.m20(),
            self.m00() * m.m01() + self.m01() * m.m11() + self.m02() * m.m21(),
            self.m00() * m.m02() + self.m01() * m.m12() + self.m02() * m.m22(),
            self.m10() * m.m00() + self.m11() * m.m10() + self.m12() * m.m20(),
            self.m10() * m.m01() + self.m11() * m.m11() + self.m12() * m.m21(),
            self.m10() * m.m02() + self.m11() * m.m12() + self.m12() * m.m22(),
            self.m20() * m.m00() + self.m21() * m.m10() + self.m22() * m.m20(),
            self.m20() * m.m01() + self.m21() * m.m11() + self.m22() * m.m21(),
            self.m20() * m.m02() + self.m21() * m.m12() + self.m22() * m.m22(),
            Some(MatrixType::Other),
        )
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
    pub fn times_matrix(&self, m: &Self) -> Self {
        let mut out = *self;
        out.multiply_matrix(m);
        out
    }

    // ── vector products ────────────────────────────────────────────────

    /// Transforms a 2D point (`w = 1`): linear part plus translation.
    pub fn times_vector2(&self, v: &Vec2) -> Vec2 {
        Vec2::new(
            self.m00() * v.x() + self.m01() * v.y() + self.m02(),
            self.m10() * v.x() + self.m11() * v.y() + self.m12(),
        )
    }

    /// Full 3×3 product with a 3-vector.
    pub fn times_vector3(&self, v: &Vec3) -> Vec3 {
        Vec3::new(
            self.m00() * v.x() + self.m01() * v.y() + self.m02() * v.z(),
            self.m10() * v.x() + self.m11() * v.y() + self.m12() * v.z(),
            self.m20() * v.x() + self.m21() * v.y() + self.m22() * v.z(),
        )
    }

    /// `transpose(upper 2×2) * v`, the building block for normal transforms.
    pub fn times_transpose_vector2(&self, v: &Vec2) -> Vec2 {
        Vec2::new(
            self.m00() * v.x() + self.m10() * v.y(),
            self.m01() * v.x() + self.m11() * v.y(),
        )
    }

    /// Transforms a 2D delta (`w = 0`): translation ignored.
    pub fn times_relative_vector2(&self, v: &Vec2) -> Vec2 {
        Vec2::new(
            self.m00() * v.x() + self.m01() * v.y(),
            self.m10() * v.x() + self.m11() * v.y(),
        )
    }

    /// In-place [`Mat3::times_vector2`].
    pub fn multiply_vector2<'v>(&self, v: &'v mut Vec2) -> &'v mut Vec2 {
        *v = self.times_vector2(v);
        v
    }

    /// In-place [`Mat3::times_vector3`].
    pub fn multiply_vector3<'v>(&self, v: &'v mut Vec3) -> &'v mut Vec3 {
        *v = self.times_vector3(v);
        v
    }

    /// In-place [`Mat3::times_transpose_vector2`].
    pub fn multiply_transpose_vector2<'v>(&self, v: &'v mut Vec2) -> &'v mut Vec2 {
        *v = self.times_transpose_vector2(v);
        v
    }

    /// In-place [`Mat3::times_relative_vector2`].
    pub fn multiply_relative_vector2<'v>(&self, v: &'v mut Vec2) -> &'v mut Vec2 {
        *v = self.times_relative_vector2(v);
        v
    }

    // ── conversions ────────────────────────────────────────────────────

    /// Embeds the 3×3 block in the upper-left of a 4×4 (3D linear map).
    pub fn to_mat4(&self) -> Mat4 {
        let kind = match self.kind {
            MatrixType::Identity => MatrixType::Identity,
            MatrixType::Scaling => MatrixType::Scaling,
            _ => MatrixType::Affine,
        };
        Mat4::from_row_major(
            [
                [self.m00(), self.m01(), self.m02(), 0.0],
                [self.m10(), self.m11(), self.m12(), 0.0],
                [self.m20(), self.m21(), self.m22(), 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            Some(kind),
        )
    }

    /// Lifts a 2D affine transform into 3D, leaving Z untouched.
    ///
    /// The bottom row of `self` is ignored, so the result is always affine.
    pub fn to_affine_mat4(&self) -> Mat4 {
        let kind = match self.kind {
            MatrixType::Other => MatrixType::Affine,
            kind => kind,
        };
        Mat4::from_row_major(
            [
                [self.m00(), self.m01(), 0.0, self.m02()],
                [self.m10(), self.m11(), 0.0, self.m12()],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            Some(kind),
        )
    }

    /// CSS `matrix(a,b,c,d,e,f)` string for the 2D affine part.
    pub fn css_transform(&self) -> String {
        format!(
            "matrix({},{},{},{},{},{})",
            self.m00(),
            self.m10(),
            self.m01(),
            self.m11(),
            self.m02(),
            self.m12()
        )
    }

    /// Shortest SVG `transform` attribute value for this matrix.
    ///
    /// Identity renders as an empty string.
    pub fn svg_transform(&self) -> String {
        match self.kind {
            MatrixType::Identity => String::new(),
            MatrixType::Translation => format!("translate({},{})", self.m02(), self.m12()),
            MatrixType::Scaling if self.m00() == self.m11() => format!("scale({})", self.m00()),
            MatrixType::Scaling => format!("scale({},{})", self.m00(), self.m11()),
            MatrixType::Affine | MatrixType::Other => self.css_transform(),
        }
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Compares entries only; two equal matrices may carry different tags.
impl PartialEq for Mat3 {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Display for Mat3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {} {}", self.m00(), self.m01(), self.m02())?;
        writeln!(f, "{} {} {}", self.m10(), self.m11(), self.m12())?;
        write!(f, "{} {} {}", self.m20(), self.m21(), self.m22())
    }
}

impl core::ops::Mul for Mat3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        self.times_matrix(&rhs)
    }
}

impl core::ops::MulAssign for Mat3 {
    fn mul_assign(&mut self, rhs: Self) {
        self.multiply_matrix(&rhs);
    }
}

impl core::ops::MulAssign<&Mat3> for Mat3 {
    fn mul_assign(&mut self, rhs: &Mat3) {
        self.multiply_matrix(rhs);
    }
}
