//! Validated observation-matrix boundary.
//!
//! Every clustering entry point takes an [`ObservationMatrix`], a rectangular
//! `f64` matrix (rows are samples, columns are features) that is checked once
//! at construction. The algorithms themselves never re-validate: a value that
//! made it past this boundary is finite, and the matrix is non-empty.

use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::error::{Error, Result};

/// An immutable matrix of observations, shape `(n_samples, n_features)`.
///
/// # Examples
///
/// ```
/// use clusterkit::ObservationMatrix;
///
/// let points = ObservationMatrix::from_rows(&[
///     vec![1.0, 2.0],
///     vec![1.5, 1.8],
///     vec![5.0, 8.0],
/// ]).unwrap();
///
/// assert_eq!(points.n_samples(), 3);
/// assert_eq!(points.n_features(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ObservationMatrix {
    data: Array2<f64>,
}

impl ObservationMatrix {
    /// Wrap an existing `ndarray` matrix, validating it.
    ///
    /// # Errors
    ///
    /// - `Error::EmptyInput` if the matrix has zero rows or zero columns.
    /// - `Error::NonFinite` if any entry is NaN or infinite.
    pub fn from_array(data: Array2<f64>) -> Result<Self> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(Error::EmptyInput);
        }
        for ((row, col), &value) in data.indexed_iter() {
            if !value.is_finite() {
                return Err(Error::NonFinite { row, col });
            }
        }
        Ok(Self { data })
    }

    /// Build a matrix from per-sample rows.
    ///
    /// # Errors
    ///
    /// In addition to the `from_array` checks, fails with `Error::RaggedRows`
    /// if the rows do not all have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::EmptyInput);
        }
        let width = rows[0].len();
        let mut flat = Vec::with_capacity(rows.len() * width);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(Error::RaggedRows {
                    row: i,
                    expected: width,
                    actual: row.len(),
                });
            }
            flat.extend_from_slice(row);
        }
        let data = Array2::from_shape_vec((rows.len(), width), flat)
            .map_err(|_| Error::EmptyInput)?;
        Self::from_array(data)
    }

    /// Wrap a matrix that is already known to be valid.
    ///
    /// Used internally for perturbed copies: finite input plus finite noise
    /// stays finite, so the scan is skipped.
    pub(crate) fn from_array_unchecked(data: Array2<f64>) -> Self {
        Self { data }
    }

    /// Number of observations (rows).
    pub fn n_samples(&self) -> usize {
        self.data.nrows()
    }

    /// Number of features (columns).
    pub fn n_features(&self) -> usize {
        self.data.ncols()
    }

    /// View of a single observation.
    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.data.row(index)
    }

    /// View of the whole matrix.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Borrow the underlying array.
    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }
}
