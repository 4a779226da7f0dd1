//! The allocate/copy/free seam to the linear-algebra library.

use super::dense::{Matrix, Vector};
use super::status::{self, LinalgStatus};

/// Primitive container operations of a linear-algebra library.
///
/// Allocation signals failure with `None`, copies with a non-success status,
/// mirroring the C-style contract the safe wrappers are designed around.
pub trait LinalgBackend: Send + Sync {
    /// Allocates a `rows x cols` matrix, or `None` if the request cannot be satisfied.
    fn alloc_matrix(&self, rows: usize, cols: usize) -> Option<Matrix>;

    /// Allocates a vector of length `len`, or `None` if the request cannot be satisfied.
    fn alloc_vector(&self, len: usize) -> Option<Vector>;

    /// Copies `src` into `dest`; both must have the same shape.
    fn copy_matrix(&self, dest: &mut Matrix, src: &Matrix) -> LinalgStatus;

    /// Copies `src` into `dest`; both must have the same length.
    fn copy_vector(&self, dest: &mut Vector, src: &Vector) -> LinalgStatus;

    /// Releases a matrix.
    fn free_matrix(&self, matrix: Matrix) {
        drop(matrix);
    }

    /// Releases a vector.
    fn free_vector(&self, vector: Vector) {
        drop(vector);
    }

    /// Translates a status code into a message.
    fn strerror(&self, code: i32) -> &'static str {
        status::strerror(code)
    }
}

/// Heap-backed implementation.
///
/// Zero-sized shapes are refused, as are shapes whose element count overflows
/// `usize` or exceeds the optional per-allocation element limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenseBackend {
    element_limit: Option<usize>,
}

impl DenseBackend {
    /// A backend limited only by the system allocator.
    pub const fn new() -> Self {
        Self { element_limit: None }
    }

    /// A backend that refuses any single allocation of more than `limit` elements.
    pub const fn with_element_limit(limit: usize) -> Self {
        Self {
            element_limit: Some(limit),
        }
    }

    /// The per-allocation element limit, if any.
    pub const fn element_limit(&self) -> Option<usize> {
        self.element_limit
    }

    fn buffer(&self, len: usize) -> Option<Vec<f64>> {
        if self.element_limit.is_some_and(|limit| len > limit) {
            trace_event!(debug, len, "allocation exceeds element limit");
            return None;
        }
        let mut data = Vec::new();
        if data.try_reserve_exact(len).is_err() {
            trace_event!(debug, len, "system allocator refused request");
            return None;
        }
        data.resize(len, 0.0);
        Some(data)
    }
}

impl LinalgBackend for DenseBackend {
    fn alloc_matrix(&self, rows: usize, cols: usize) -> Option<Matrix> {
        if rows == 0 || cols == 0 {
            trace_event!(debug, rows, cols, "matrix dimensions must be positive integers");
            return None;
        }
        let len = rows.checked_mul(cols)?;
        let data = self.buffer(len)?;
        Matrix::from_vec(rows, cols, data).ok()
    }

    fn alloc_vector(&self, len: usize) -> Option<Vector> {
        if len == 0 {
            trace_event!(debug, "vector length must be a positive integer");
            return None;
        }
        self.buffer(len).map(Vector::from_vec)
    }

    fn copy_matrix(&self, dest: &mut Matrix, src: &Matrix) -> LinalgStatus {
        if dest.shape() != src.shape() {
            trace_event!(
                debug,
                dest = ?dest.shape(),
                src = ?src.shape(),
                "matrix sizes are different"
            );
            return LinalgStatus::Ebadlen;
        }
        dest.as_mut_slice().copy_from_slice(src.as_slice());
        LinalgStatus::Success
    }

    fn copy_vector(&self, dest: &mut Vector, src: &Vector) -> LinalgStatus {
        if dest.len() != src.len() {
            trace_event!(debug, dest = dest.len(), src = src.len(), "vector lengths are not equal");
            return LinalgStatus::Ebadlen;
        }
        dest.as_mut_slice().copy_from_slice(src.as_slice());
        LinalgStatus::Success
    }
}
