// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type shared by every fallible math operation.
//!
//! All failures here are local and synchronous. Nothing is retried and no
//! caller should substitute a default (an identity matrix for a failed
//! inversion, say) because that silently corrupts downstream geometry.

use thiserror::Error;

use crate::MatrixType;

/// Failure modes for matrix, vector, quaternion and transform operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    /// The matrix has a determinant of exactly zero and cannot be inverted.
    #[error("matrix could not be inverted, determinant = {determinant}")]
    SingularMatrix {
        /// Determinant that was computed for the rejected matrix.
        determinant: f64,
    },
    /// An input carried NaN or infinite entries.
    #[error("{operation} requires finite entries")]
    NonFinite {
        /// Name of the operation that rejected the input.
        operation: &'static str,
    },
    /// A plane normal was not unit length.
    #[error("plane normal must be a unit vector (magnitude {magnitude})")]
    NonUnitNormal {
        /// Magnitude of the rejected normal.
        magnitude: f64,
    },
    /// A zero-length vector or quaternion was used where a direction is required.
    #[error("{operation} on a zero-magnitude value")]
    ZeroMagnitude {
        /// Name of the operation that rejected the input.
        operation: &'static str,
    },
    /// A persisted matrix named a type tag outside the closed set.
    #[error("unknown matrix type: {0}")]
    UnknownMatrixType(String),
    /// A persisted matrix claimed a specialised tag its entries do not satisfy.
    #[error("matrix entries do not have the shape of a {claimed} matrix")]
    InconsistentMatrixType {
        /// Tag named by the record.
        claimed: MatrixType,
    },
    /// A persisted matrix carried the wrong number of entries.
    #[error("matrix state has {found} entries, expected {expected}")]
    InvalidStateLength {
        /// Entry count required by the target matrix shape.
        expected: usize,
        /// Entry count found in the state record.
        found: usize,
    },
}
