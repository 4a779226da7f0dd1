//! Dense `f64` containers.
//!
//! `Matrix` is stored row-major in one contiguous buffer, `Vector` is a plain
//! buffer. Both are owned by the caller; the backend only creates, copies and
//! releases them.

use super::status::LinalgStatus;

/// A dense row-major matrix of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Wraps a row-major buffer.
    ///
    /// # Errors
    /// Returns [`LinalgStatus::Ebadlen`] if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, LinalgStatus> {
        match rows.checked_mul(cols) {
            Some(len) if len == data.len() => Ok(Self { data, rows, cols }),
            _ => Err(LinalgStatus::Ebadlen),
        }
    }

    /// Builds a matrix from equal-length rows.
    ///
    /// # Errors
    /// Returns [`LinalgStatus::Ebadlen`] if the rows are ragged.
    pub fn from_rows(rows: &[&[f64]]) -> Result<Self, LinalgStatus> {
        let cols = rows.first().map_or(0, |row| row.len());
        if rows.iter().any(|row| row.len() != cols) {
            return Err(LinalgStatus::Ebadlen);
        }
        let data = rows.iter().flat_map(|row| row.iter().copied()).collect();
        Self::from_vec(rows.len(), cols, data)
    }

    /// Number of rows.
    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline(always)]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// True if `rows == cols`.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Element at `(row, col)`, or `None` when out of bounds.
    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Mutable element at `(row, col)`, or `None` when out of bounds.
    #[inline(always)]
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut f64> {
        if row < self.rows && col < self.cols {
            Some(&mut self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Row `row` as a slice.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row < self.rows {
            let start = row * self.cols;
            Some(&self.data[start..start + self.cols])
        } else {
            None
        }
    }

    /// Row-major contents.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable row-major contents.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Sets every element to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// True if any element is NaN.
    pub fn has_nan(&self) -> bool {
        self.data.iter().any(|x| x.is_nan())
    }
}

/// A dense vector of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    /// Wraps a buffer.
    pub fn from_vec(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Number of elements.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the vector has no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element `i`, or `None` when out of bounds.
    #[inline(always)]
    pub fn get(&self, i: usize) -> Option<f64> {
        self.data.get(i).copied()
    }

    /// Mutable element `i`.
    #[inline(always)]
    pub fn get_mut(&mut self, i: usize) -> Option<&mut f64> {
        self.data.get_mut(i)
    }

    /// Contents.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable contents.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Sets every element to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// True if any element is NaN.
    pub fn has_nan(&self) -> bool {
        self.data.iter().any(|x| x.is_nan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_indexing_is_row_major() {
        let m = Matrix::from_rows(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.get(0, 2), Some(3.0));
        assert_eq!(m.get(1, 0), Some(4.0));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(0, 3), None);
        assert_eq!(m.row(1), Some(&[4.0, 5.0, 6.0][..]));
        assert!(!m.is_square());
    }

    #[test]
    fn test_matrix_from_vec_checks_length() {
        assert_eq!(
            Matrix::from_vec(2, 2, vec![0.0; 3]),
            Err(LinalgStatus::Ebadlen)
        );
        assert_eq!(
            Matrix::from_rows(&[&[1.0], &[1.0, 2.0]]),
            Err(LinalgStatus::Ebadlen)
        );
    }

    #[test]
    fn test_nan_detection() {
        let mut m = Matrix::from_vec(2, 2, vec![0.0; 4]).unwrap();
        assert!(!m.has_nan());
        *m.get_mut(1, 1).unwrap() = f64::NAN;
        assert!(m.has_nan());

        let mut v = Vector::from_vec(vec![1.0, 2.0]);
        assert!(!v.has_nan());
        *v.get_mut(0).unwrap() = f64::NAN;
        assert!(v.has_nan());
    }
}
