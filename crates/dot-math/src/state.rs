// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Plain structural records for the host framework's persistence layer.

use crate::{MathError, MatrixType};

/// Serialisable snapshot of a matrix: column-major entries plus type tag name.
///
/// Produced by `Mat3::to_state`/`Mat4::to_state` and consumed by the matching
/// `from_state`, which rebuilds an identical instance (entries and tag).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixState {
    /// Entries in column-major order.
    pub entries: Vec<f64>,
    /// Canonical type tag name, see [`MatrixType::name`].
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: String,
}

impl MatrixState {
    /// Validates the record and returns the fixed-size entry array and tag.
    pub(crate) fn decode<const N: usize>(&self) -> Result<([f64; N], MatrixType), MathError> {
        let entries: [f64; N] =
            self.entries
                .as_slice()
                .try_into()
                .map_err(|_| MathError::InvalidStateLength {
                    expected: N,
                    found: self.entries.len(),
                })?;
        if !entries.iter().all(|v| v.is_finite()) {
            return Err(MathError::NonFinite {
                operation: "MatrixState::decode",
            });
        }
        let kind = MatrixType::from_name(&self.kind)?;
        if !shape_admits(&entries, kind) {
            return Err(MathError::InconsistentMatrixType { claimed: kind });
        }
        Ok((entries, kind))
    }
}

/// Whether column-major `entries` of an `n`x`n` matrix (`N = n * n`) really
/// have the shape `kind` promises. `Other` admits anything.
fn shape_admits<const N: usize>(entries: &[f64; N], kind: MatrixType) -> bool {
    let n = if N == 9 { 3 } else { 4 };
    let at = |r: usize, c: usize| entries[c * n + r];
    let last = n - 1;
    let bottom_row_affine = (0..last).all(|c| at(last, c) == 0.0) && at(last, last) == 1.0;
    let identity_at = |r: usize, c: usize| if r == c { 1.0 } else { 0.0 };
    match kind {
        MatrixType::Other => true,
        MatrixType::Affine => bottom_row_affine,
        MatrixType::Identity => (0..n).all(|r| (0..n).all(|c| at(r, c) == identity_at(r, c))),
        MatrixType::Translation => {
            bottom_row_affine
                && (0..last).all(|r| (0..last).all(|c| at(r, c) == identity_at(r, c)))
        }
        MatrixType::Scaling => {
            at(last, last) == 1.0 && (0..n).all(|r| (0..n).all(|c| r == c || at(r, c) == 0.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_wrong_length() {
        let state = MatrixState {
            entries: vec![1.0; 8],
            kind: "OTHER".to_owned(),
        };
        assert_eq!(
            state.decode::<9>(),
            Err(MathError::InvalidStateLength {
                expected: 9,
                found: 8
            })
        );
    }

    #[test]
    fn decode_rejects_unknown_tag() {
        let state = MatrixState {
            entries: vec![0.0; 9],
            kind: "SHEAR".to_owned(),
        };
        assert_eq!(
            state.decode::<9>(),
            Err(MathError::UnknownMatrixType("SHEAR".to_owned()))
        );
    }

    #[test]
    fn tags_are_checked_against_entries() {
        let scale = [2.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 1.0];
        let state = |kind: &str| MatrixState {
            entries: scale.to_vec(),
            kind: kind.to_owned(),
        };
        assert!(state("SCALING").decode::<9>().is_ok());
        assert!(state("AFFINE").decode::<9>().is_ok());
        assert!(state("OTHER").decode::<9>().is_ok());
        for kind in [MatrixType::Identity, MatrixType::Translation] {
            assert_eq!(
                state(kind.name()).decode::<9>(),
                Err(MathError::InconsistentMatrixType { claimed: kind })
            );
        }
    }

    #[test]
    fn translation_tag_needs_identity_linear_part() {
        let mut entries = [
            1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 3.0, 0.0, 0.0, 1.0,
        ];
        let ok = MatrixState {
            entries: entries.to_vec(),
            kind: "TRANSLATION".to_owned(),
        };
        assert!(ok.decode::<16>().is_ok());
        entries[5] = 2.0;
        let bad = MatrixState {
            entries: entries.to_vec(),
            kind: "TRANSLATION".to_owned(),
        };
        assert_eq!(
            bad.decode::<16>(),
            Err(MathError::InconsistentMatrixType {
                claimed: MatrixType::Translation
            })
        );
    }
}
