// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Algebraic shape classification carried by every matrix.
//!
//! The tag is conservative: `Identity`, `Translation`, `Scaling` and `Affine`
//! are promises the fast paths rely on, while `Other` is always a valid
//! answer, even for a matrix whose entries happen to fit a tighter shape.
//! Only explicit factories and setters assign the three specialised tags;
//! shape inference ([`MatrixType::infer`]) never goes further than `Affine`.

use core::fmt;

use crate::MathError;

/// Closed set of matrix shapes used to pick multiplication and inversion paths.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatrixType {
    /// Exactly the identity.
    Identity,
    /// Identity linear part with a translation column.
    Translation,
    /// Diagonal scale with no translation.
    Scaling,
    /// Bottom row is exactly `[0, .., 0, 1]`.
    Affine,
    /// Anything else; valid for every matrix.
    #[default]
    Other,
}

impl MatrixType {
    /// Canonical upper-case name used in persisted state.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Identity => "IDENTITY",
            Self::Translation => "TRANSLATION",
            Self::Scaling => "SCALING",
            Self::Affine => "AFFINE",
            Self::Other => "OTHER",
        }
    }

    /// Parses a canonical name back into a tag.
    pub fn from_name(name: &str) -> Result<Self, MathError> {
        match name {
            "IDENTITY" => Ok(Self::Identity),
            "TRANSLATION" => Ok(Self::Translation),
            "SCALING" => Ok(Self::Scaling),
            "AFFINE" => Ok(Self::Affine),
            "OTHER" => Ok(Self::Other),
            unknown => Err(MathError::UnknownMatrixType(unknown.to_owned())),
        }
    }

    /// Infers `Affine` or `Other` from a bottom row.
    ///
    /// `bottom_row` must end with the homogeneous entry.
    pub fn infer(bottom_row: &[f64]) -> Self {
        match bottom_row.split_last() {
            Some((last, rest)) if *last == 1.0 && rest.iter().all(|v| *v == 0.0) => {
                Self::Affine
            }
            _ => Self::Other,
        }
    }

    /// True for every tag except `Other`; such matrices have an affine bottom row.
    pub const fn is_affine_shaped(self) -> bool {
        !matches!(self, Self::Other)
    }
}

impl fmt::Display for MatrixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
