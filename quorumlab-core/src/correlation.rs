//! Block-structured correlation matrices with a validity guarantee.
//!
//! Ensembles drawn from a few model families correlate strongly within a
//! family and weakly across families. `from_groups` builds that block
//! structure directly, then projects it onto the nearest valid correlation
//! matrix: symmetric, unit diagonal, and positive semi-definite.

use nalgebra::{DMatrix, SymmetricEigen};
use thiserror::Error;

/// Eigenvalues below this are clipped during PSD projection.
const EIGENVALUE_FLOOR: f64 = 1e-6;

/// Errors from wrapping an externally produced matrix.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CorrelationError {
    #[error("correlation matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
}

/// A symmetric correlation matrix over ensemble members.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    matrix: DMatrix<f64>,
}

impl CorrelationMatrix {
    /// Builds a block correlation matrix from group sizes.
    ///
    /// Members of the same group correlate at `within`, members of
    /// different groups at `between`, and the diagonal is 1. The raw block
    /// matrix is then PSD-projected: eigenvalues are clipped from below,
    /// the matrix is rebuilt, rescaled back to unit variance, and the
    /// diagonal forced to exactly 1. Degenerate inputs (single group,
    /// correlations at ±1) therefore still yield a valid matrix.
    pub fn from_groups(group_sizes: &[usize], within: f64, between: f64) -> Self {
        let n: usize = group_sizes.iter().sum();
        if n == 0 {
            return Self {
                matrix: DMatrix::zeros(0, 0),
            };
        }
        let mut matrix = DMatrix::from_element(n, n, between);
        let mut start = 0;
        for &size in group_sizes {
            for i in start..start + size {
                for j in start..start + size {
                    matrix[(i, j)] = within;
                }
            }
            start += size;
        }
        for i in 0..n {
            matrix[(i, i)] = 1.0;
        }
        Self {
            matrix: project_to_psd(matrix),
        }
    }

    /// Wraps an externally produced matrix without projection.
    ///
    /// Only squareness is validated; callers supplying their own matrix
    /// (e.g. an empirical agreement matrix) are trusted on its entries.
    pub fn from_matrix(matrix: DMatrix<f64>) -> Result<Self, CorrelationError> {
        if matrix.nrows() != matrix.ncols() {
            return Err(CorrelationError::NotSquare {
                rows: matrix.nrows(),
                cols: matrix.ncols(),
            });
        }
        Ok(Self { matrix })
    }

    /// Number of members (matrix dimension).
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Entry at row `i`, column `j`. Panics if out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix[(i, j)]
    }

    /// Sum of all entries, diagonal included.
    pub fn total(&self) -> f64 {
        self.matrix.sum()
    }

    /// Smallest eigenvalue; 0.0 for the empty matrix.
    pub fn min_eigenvalue(&self) -> f64 {
        if self.matrix.nrows() == 0 {
            return 0.0;
        }
        let eigen = SymmetricEigen::new(self.matrix.clone());
        eigen.eigenvalues.min()
    }

    /// Borrows the underlying matrix.
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }
}

/// Projects a symmetric matrix onto the valid correlation matrices.
///
/// Clips the eigenspectrum at a small positive floor, rebuilds, rescales
/// rows and columns back to unit variance, then pins the diagonal to 1.
/// The clipped spectrum keeps every variance strictly positive, so the
/// rescale never divides by zero.
fn project_to_psd(matrix: DMatrix<f64>) -> DMatrix<f64> {
    let n = matrix.nrows();
    let eigen = SymmetricEigen::new(matrix);
    let clipped = eigen.eigenvalues.map(|v| v.max(EIGENVALUE_FLOOR));
    let mut rebuilt =
        &eigen.eigenvectors * DMatrix::from_diagonal(&clipped) * eigen.eigenvectors.transpose();
    let scale: Vec<f64> = (0..n).map(|i| rebuilt[(i, i)].sqrt()).collect();
    for i in 0..n {
        for j in 0..n {
            rebuilt[(i, j)] /= scale[i] * scale[j];
        }
    }
    for i in 0..n {
        rebuilt[(i, i)] = 1.0;
    }
    rebuilt
}
