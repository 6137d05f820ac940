use crate::errors::ConformalError;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::ops::{Add, Mul, Sub};

/// Floating point types scores and thresholds are computed in.
pub trait FloatData<T>:
    Mul<Output = T> + Display + Add<Output = T> + Sub<Output = T> + Copy + Debug + PartialOrd + Send + Sync
{
    /// Convert from f64.
    fn from_f64(v: f64) -> T;
    /// Check if value is NaN.
    fn is_nan(self) -> bool;
}

impl FloatData<f64> for f64 {
    fn from_f64(v: f64) -> f64 {
        v
    }
    fn is_nan(self) -> bool {
        self.is_nan()
    }
}

impl FloatData<f32> for f32 {
    fn from_f64(v: f64) -> f32 {
        v as f32
    }
    fn is_nan(self) -> bool {
        self.is_nan()
    }
}

/// Contiguous Column Major Matrix data container.
///
/// Model outputs and one-hot ground truth are both passed around as this
/// borrowed view: `rows` samples by `cols` labels, stored column by column
/// (Fortran-style), the layout a numpy array with `order="F"` hands over
/// without a copy.
///
/// # Type Parameters
/// * `T` - The numeric type of the data (e.g., `f32`, `f64`).
pub struct Matrix<'a, T> {
    /// The raw data stored in a single slice.
    pub data: &'a [T],
    /// Indices into the data row-wise.
    pub index: Vec<usize>,
    /// Number of rows in the matrix.
    pub rows: usize,
    /// Number of columns in the matrix.
    pub cols: usize,
    stride1: usize,
    stride2: usize,
}

impl<'a, T> Matrix<'a, T> {
    // Defaults to column major
    /// Create a new Matrix.
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Self {
        Matrix {
            data,
            index: (0..rows).collect(),
            rows,
            cols,
            stride1: rows,
            stride2: 1,
        }
    }

    /// Check that the backing slice really holds a `rows` x `cols` array.
    ///
    /// * `name` - Argument name reported in the error.
    pub fn validate(&self, name: &str) -> Result<(), ConformalError> {
        if self.cols == 0 {
            return Err(ConformalError::InvalidInputType(
                name.to_string(),
                "expected a 2D array with at least one column".to_string(),
            ));
        }
        if self.data.len() != self.rows * self.cols {
            return Err(ConformalError::InvalidInputType(
                name.to_string(),
                format!(
                    "expected {} values for a {}x{} array, found {}",
                    self.rows * self.cols,
                    self.rows,
                    self.cols,
                    self.data.len()
                ),
            ));
        }
        Ok(())
    }

    /// Get a single reference to an item in the matrix.
    ///
    /// * `i` - The ith row of the data to get.
    /// * `j` - the jth column of the data to get.
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.data[self.item_index(i, j)]
    }

    fn item_index(&self, i: usize, j: usize) -> usize {
        let mut idx = self.stride2 * i;
        idx += j * self.stride1;
        idx
    }

    /// Get access to a row of the data, as an iterator.
    pub fn get_row_iter(&self, row: usize) -> std::iter::StepBy<std::iter::Skip<std::slice::Iter<'a, T>>> {
        self.data.iter().skip(row).step_by(self.rows)
    }
}

impl<'a, T> Matrix<'a, T>
where
    T: Copy,
{
    /// Get a row of the data as a vector.
    pub fn get_row(&self, row: usize) -> Vec<T> {
        self.get_row_iter(row).copied().collect()
    }
}

/// A lightweight row major matrix, this is primarily
/// for returning data to the user, such as the per-label
/// scores of every row in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowMajorMatrix<T> {
    /// The raw data in row-major order.
    pub data: Vec<T>,
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    stride1: usize,
    stride2: usize,
}

impl<T> RowMajorMatrix<T> {
    /// Create a new RowMajorMatrix.
    pub fn new(data: Vec<T>, rows: usize, cols: usize) -> Self {
        RowMajorMatrix {
            data,
            rows,
            cols,
            stride1: 1,
            stride2: cols,
        }
    }

    /// Get a single reference to an item in the matrix.
    ///
    /// * `i` - The ith row of the data to get.
    /// * `j` - the jth column of the data to get.
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.data[self.item_index(i, j)]
    }

    /// Get a whole row as a slice.
    pub fn get_row(&self, row: usize) -> &[T] {
        let start = self.item_index(row, 0);
        &self.data[start..start + self.cols]
    }

    fn item_index(&self, i: usize, j: usize) -> usize {
        let mut idx = self.stride2 * i;
        idx += j * self.stride1;
        idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rowmatrix_get() {
        let v = vec![1, 2, 3, 5, 6, 7];
        let m = RowMajorMatrix::new(v, 2, 3);
        println!("{:?}", m);
        assert_eq!(m.get(0, 0), &1);
        assert_eq!(m.get(1, 0), &5);
        assert_eq!(m.get(0, 2), &3);
        assert_eq!(m.get(1, 1), &6);
        assert_eq!(m.get_row(1), &[5, 6, 7]);
    }

    #[test]
    fn test_matrix_get() {
        let v = vec![1, 2, 3, 5, 6, 7];
        let m = Matrix::new(&v, 2, 3);
        assert_eq!(m.get(0, 0), &1);
        assert_eq!(m.get(1, 0), &2);
    }

    #[test]
    fn test_matrix_row() {
        let v = vec![1, 2, 3, 5, 6, 7];
        let m = Matrix::new(&v, 3, 2);
        assert_eq!(m.get_row(2), vec![3, 7]);
        assert_eq!(m.get_row(0), vec![1, 5]);
        assert_eq!(m.get_row(1), vec![2, 6]);
    }

    #[test]
    fn test_matrix_validate() {
        let v = vec![1.0, 2.0, 3.0, 5.0, 6.0, 7.0];
        assert!(Matrix::new(&v, 3, 2).validate("x").is_ok());
        assert!(matches!(
            Matrix::new(&v, 4, 2).validate("x"),
            Err(ConformalError::InvalidInputType(..))
        ));
        assert!(matches!(
            Matrix::new(&v[..0], 0, 0).validate("x"),
            Err(ConformalError::InvalidInputType(..))
        ));
    }
}
